// tests/pipeline_execution_tests.rs
mod common;

use common::*;
use serial_test::serial;
use storefront::pipeline::{skip_when, Handler};
use storefront::{CatalogError, ContextData, PipelineControl, PipelineError, PipelineResult, Product};

/// Context of a small repricing workflow used to exercise the engine.
#[derive(Debug, Default)]
struct RepriceCtx {
  product: Product,
  discount: f64,
  trail: Vec<String>,
  stop_at: Option<&'static str>,
}

fn tracing_handler(label: &'static str) -> Handler<RepriceCtx, CatalogError> {
  Box::new(move |ctx: ContextData<RepriceCtx>| {
    Box::pin(async move {
      let mut guard = ctx.write();
      guard.trail.push(label.to_string());
      if guard.stop_at == Some(label) {
        return Ok(PipelineControl::Stop);
      }
      Ok(PipelineControl::Continue)
    })
  })
}

fn reprice_pipeline() -> storefront::Pipeline<RepriceCtx, CatalogError> {
  let mut p = storefront::Pipeline::<RepriceCtx, CatalogError>::new(
    "reprice",
    &[("load", false, None), ("discount", false, None), ("round", false, None)],
  );
  p.on("load", tracing_handler("load"));
  p.on("discount", |ctx: ContextData<RepriceCtx>| async move {
    let mut guard = ctx.write();
    guard.product.price *= 1.0 - guard.discount;
    guard.trail.push("discount".to_string());
    Ok::<_, CatalogError>(PipelineControl::Continue)
  });
  p.on("round", |ctx: ContextData<RepriceCtx>| async move {
    let mut guard = ctx.write();
    guard.product.price = (guard.product.price * 100.0).round() / 100.0;
    guard.trail.push("round".to_string());
    Ok::<_, CatalogError>(PipelineControl::Continue)
  });
  p
}

fn ctx_for(price: f64, discount: f64) -> ContextData<RepriceCtx> {
  ContextData::new(RepriceCtx {
    product: Product::draft("Desk lamp", price),
    discount,
    ..RepriceCtx::default()
  })
}

#[tokio::test]
#[serial]
async fn test_steps_run_in_declaration_order() {
  setup_tracing();
  let pipeline = reprice_pipeline();
  let ctx = ctx_for(19.99, 0.15);

  let result = pipeline.run(ctx.clone()).await.unwrap();

  assert_eq!(result, PipelineResult::Completed);
  let guard = ctx.read();
  assert_eq!(guard.trail, vec!["load", "discount", "round"]);
  assert_eq!(guard.product.price, 16.99);
}

#[tokio::test]
#[serial]
async fn test_stop_ends_the_run_early() {
  setup_tracing();
  let pipeline = reprice_pipeline();
  let ctx = ctx_for(10.0, 0.5);
  ctx.write().stop_at = Some("load");

  let result = pipeline.run(ctx.clone()).await.unwrap();

  assert_eq!(result, PipelineResult::Stopped);
  let guard = ctx.read();
  assert_eq!(guard.trail, vec!["load"]);
  assert_eq!(guard.product.price, 10.0);
}

#[tokio::test]
#[serial]
async fn test_handler_error_is_returned_and_later_steps_do_not_run() {
  setup_tracing();
  let mut pipeline = reprice_pipeline();
  pipeline.before("discount", |ctx: ContextData<RepriceCtx>| async move {
    let discount = ctx.read().discount;
    if discount > 0.9 {
      return Err(CatalogError::not_found("discount-policy"));
    }
    Ok(PipelineControl::Continue)
  });
  let ctx = ctx_for(10.0, 0.95);

  let err = pipeline.run(ctx.clone()).await.unwrap_err();

  assert!(matches!(err, CatalogError::NotFound { ref id } if id == "discount-policy"));
  assert_eq!(ctx.read().trail, vec!["load"]);
}

#[tokio::test]
#[serial]
async fn test_skip_condition_bypasses_step() {
  setup_tracing();
  let mut pipeline = reprice_pipeline();
  pipeline.set_skip_condition("discount", skip_when(|d: &RepriceCtx| d.discount == 0.0));
  let ctx = ctx_for(12.5, 0.0);

  pipeline.run(ctx.clone()).await.unwrap();

  assert_eq!(ctx.read().trail, vec!["load", "round"]);
}

#[tokio::test]
#[serial]
async fn test_required_step_without_handlers_fails() {
  setup_tracing();
  let pipeline = storefront::Pipeline::<RepriceCtx, CatalogError>::new("empty", &[("unhandled", false, None)]);

  let err = pipeline.run(ctx_for(1.0, 0.0)).await.unwrap_err();

  match err {
    CatalogError::Pipeline(PipelineError::HandlerMissing { pipeline, step_name }) => {
      assert_eq!(pipeline, "empty");
      assert_eq!(step_name, "unhandled");
    }
    other => panic!("expected HandlerMissing, got {other:?}"),
  }
}

#[tokio::test]
#[serial]
async fn test_optional_step_without_handlers_is_skipped() {
  setup_tracing();
  let mut pipeline = reprice_pipeline();
  pipeline.insert_after("discount", "audit", true, None);
  let ctx = ctx_for(5.0, 0.0);

  let result = pipeline.run(ctx.clone()).await.unwrap();

  assert_eq!(result, PipelineResult::Completed);
  assert_eq!(pipeline.step_names(), vec!["load", "discount", "audit", "round"]);
}

#[tokio::test]
#[serial]
async fn test_before_on_after_order_within_a_step() {
  setup_tracing();
  let mut pipeline = storefront::Pipeline::<RepriceCtx, CatalogError>::new("phases", &[("only", false, None)]);
  pipeline.after("only", tracing_handler("after"));
  pipeline.on("only", tracing_handler("on"));
  pipeline.before("only", tracing_handler("before"));
  let ctx = ctx_for(1.0, 0.0);

  pipeline.run(ctx.clone()).await.unwrap();

  assert_eq!(ctx.read().trail, vec!["before", "on", "after"]);
}

#[tokio::test]
#[serial]
async fn test_structural_edits() {
  setup_tracing();
  let mut pipeline = reprice_pipeline();
  pipeline.insert_before("load", "authorize", false, None);
  pipeline.on("authorize", tracing_handler("authorize"));
  pipeline.remove_step("round");
  pipeline.remove_step("no-such-step");
  let ctx = ctx_for(40.0, 0.25);

  pipeline.run(ctx.clone()).await.unwrap();

  assert_eq!(pipeline.step_names(), vec!["authorize", "load", "discount"]);
  let guard = ctx.read();
  assert_eq!(guard.trail, vec!["authorize", "load", "discount"]);
  assert_eq!(guard.product.price, 30.0);
}

#[test]
#[should_panic(expected = "not declared")]
fn test_hook_on_unknown_step_panics() {
  let mut pipeline = reprice_pipeline();
  pipeline.on("lod", tracing_handler("typo"));
}

#[test]
fn test_context_data_unwraps_once_clones_are_gone() {
  let ctx = ctx_for(3.0, 0.0);
  let other = ctx.clone();
  let ctx = ctx.try_into_inner().unwrap_err();
  drop(other);
  let data = ctx.try_into_inner().ok().unwrap();
  assert_eq!(data.product.price, 3.0);
}
