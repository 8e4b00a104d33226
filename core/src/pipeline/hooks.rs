// storefront/src/pipeline/hooks.rs

//! Registration of `before` / `on` / `after` handlers.

use crate::error::PipelineError;
use crate::pipeline::context_data::ContextData;
use crate::pipeline::control::PipelineControl;
use crate::pipeline::definition::Pipeline;
use crate::pipeline::step::{Handler, Phase};
use std::future::Future;
use tracing::{event, Level};

impl<TData, Err> Pipeline<TData, Err>
where
  TData: 'static + Send + Sync,
  Err: std::error::Error + From<PipelineError> + Send + Sync + 'static,
{
  /// Runs before the step's `on` handlers. Typical use: guards and preconditions.
  pub fn before<F, HandlerErr>(
    &mut self,
    step_name: &str,
    handler_fn: impl Fn(ContextData<TData>) -> F + Send + Sync + 'static,
  ) where
    F: Future<Output = Result<PipelineControl, HandlerErr>> + Send + 'static,
    HandlerErr: Into<Err> + Send + Sync + 'static,
  {
    self.register(Phase::Before, step_name, handler_fn);
  }

  /// The step's main work.
  pub fn on<F, HandlerErr>(
    &mut self,
    step_name: &str,
    handler_fn: impl Fn(ContextData<TData>) -> F + Send + Sync + 'static,
  ) where
    F: Future<Output = Result<PipelineControl, HandlerErr>> + Send + 'static,
    HandlerErr: Into<Err> + Send + Sync + 'static,
  {
    self.register(Phase::On, step_name, handler_fn);
  }

  /// Runs once the step's `on` handlers succeeded. Typical use: reporting.
  pub fn after<F, HandlerErr>(
    &mut self,
    step_name: &str,
    handler_fn: impl Fn(ContextData<TData>) -> F + Send + Sync + 'static,
  ) where
    F: Future<Output = Result<PipelineControl, HandlerErr>> + Send + 'static,
    HandlerErr: Into<Err> + Send + Sync + 'static,
  {
    self.register(Phase::After, step_name, handler_fn);
  }

  fn register<F, HandlerErr>(
    &mut self,
    phase: Phase,
    step_name: &str,
    handler_fn: impl Fn(ContextData<TData>) -> F + Send + Sync + 'static,
  ) where
    F: Future<Output = Result<PipelineControl, HandlerErr>> + Send + 'static,
    HandlerErr: Into<Err> + Send + Sync + 'static,
  {
    self.step_index(step_name);
    let handler: Handler<TData, Err> = Box::new(move |ctx_data| {
      let fut = handler_fn(ctx_data);
      Box::pin(async move { fut.await.map_err(Into::into) })
    });
    self
      .hooks
      .entry(step_name.to_string())
      .or_default()
      .phase_mut(phase)
      .push(handler);
    event!(Level::TRACE, pipeline = %self.name, step = step_name, phase = phase.as_str(), "Handler registered.");
  }
}
