// storefront/src/catalog/deleter.rs

//! Existence-checked delete: look the product up, then remove it.

use super::contexts::{CatalogDeps, DeleteProductCtxData};
use crate::error::{CatalogError, CatalogResult, PipelineError};
use crate::model::Product;
use crate::pipeline::{ContextData, Pipeline, PipelineControl};
use std::sync::Arc;
use tracing::{info, instrument, warn};

pub const DELETE_PIPELINE: &str = "delete_product";

pub fn build_delete_pipeline() -> Pipeline<DeleteProductCtxData, CatalogError> {
  let mut p = Pipeline::<DeleteProductCtxData, CatalogError>::new(
    DELETE_PIPELINE,
    &[("lookup_product", false, None), ("remove_product", false, None)],
  );

  p.on("lookup_product", |ctx: ContextData<DeleteProductCtxData>| async move {
    let (finder, id) = {
      let guard = ctx.read();
      (guard.deps.finder(), guard.id.clone())
    };
    match finder.find_by_id(&id).await? {
      Some(product) => {
        ctx.write().found = Some(product);
        Ok::<_, CatalogError>(PipelineControl::Continue)
      }
      None => {
        warn!(%id, "Nothing to delete.");
        Err(CatalogError::not_found(id))
      }
    }
  });

  p.on("remove_product", |ctx: ContextData<DeleteProductCtxData>| async move {
    let (products, found) = {
      let guard = ctx.read();
      (Arc::clone(&guard.deps.products), guard.found.clone())
    };
    let Some(product) = found else {
      return Err(CatalogError::from(PipelineError::MissingOutput {
        pipeline: DELETE_PIPELINE.to_string(),
        what: "a looked-up product",
      }));
    };
    info!("Deleting product {}", product.id.as_deref().unwrap_or_default());
    products
      .delete(&product)
      .await
      .map_err(|source| CatalogError::Persistence { source })?;
    ctx.write().deleted = true;
    Ok(PipelineControl::Continue)
  });

  p
}

#[derive(Clone)]
pub struct ProductDeleter {
  deps: CatalogDeps,
  pipeline: Arc<Pipeline<DeleteProductCtxData, CatalogError>>,
}

impl ProductDeleter {
  pub fn new(deps: CatalogDeps) -> Self {
    Self {
      deps,
      pipeline: Arc::new(build_delete_pipeline()),
    }
  }

  /// Deletes the product `id` and returns what was removed.
  ///
  /// Fails with [`CatalogError::NotFound`] when the id is unknown, which
  /// includes a second delete of the same id.
  #[instrument(name = "ProductDeleter::delete_by_id", skip(self), err(Display))]
  pub async fn delete_by_id(&self, id: &str) -> CatalogResult<Product> {
    let ctx = ContextData::new(DeleteProductCtxData::new(self.deps.clone(), id));
    self.pipeline.run(ctx.clone()).await?;
    let guard = ctx.read();
    match (&guard.found, guard.deleted) {
      (Some(product), true) => Ok(product.clone()),
      _ => Err(CatalogError::from(PipelineError::MissingOutput {
        pipeline: DELETE_PIPELINE.to_string(),
        what: "a deleted product",
      })),
    }
  }
}
