// storefront/src/catalog/mutator.rs

//! The save pipeline: validation, category resolution, timestamp defaulting,
//! photo staging, persistence and the post-persist photo transfer.

use super::contexts::{CatalogDeps, SaveProductCtxData};
use crate::error::{CatalogError, CatalogResult, PipelineError, ValidationErrors};
use crate::files::{unique_photo_name, UploadedFile};
use crate::model::Product;
use crate::pipeline::{skip_when, ContextData, Pipeline, PipelineControl};
use chrono::Utc;
use std::io;
use std::sync::Arc;
use tracing::{event, info, instrument, warn, Level};

pub const SAVE_PIPELINE: &str = "save_product";

/// Field checks run before anything touches a store.
pub fn validate_candidate(candidate: &Product, category_id: &str) -> Result<(), ValidationErrors> {
  let mut errors = ValidationErrors::default();
  if candidate.name.trim().is_empty() {
    errors.push("name", "must not be empty");
  }
  if !candidate.price.is_finite() {
    errors.push("price", "must be a number");
  } else if candidate.price < 0.0 {
    errors.push("price", "must not be negative");
  }
  if category_id.trim().is_empty() {
    errors.push("category", "must be selected");
  }
  if errors.is_empty() {
    Ok(())
  } else {
    Err(errors)
  }
}

/// Declares the save pipeline. Steps run strictly in this order.
pub fn build_save_pipeline() -> Pipeline<SaveProductCtxData, CatalogError> {
  let mut p = Pipeline::<SaveProductCtxData, CatalogError>::new(
    SAVE_PIPELINE,
    &[
      ("validate_candidate", false, None),
      ("resolve_category", false, None),
      ("default_timestamp", false, skip_when(|d: &SaveProductCtxData| d.candidate.created_at.is_some())),
      ("stage_photo", false, skip_when(|d: &SaveProductCtxData| !d.has_named_upload())),
      ("assign_category", false, None),
      ("persist_product", false, None),
      ("transfer_photo", false, skip_when(|d: &SaveProductCtxData| d.staged_photo.is_none())),
    ],
  );

  p.on("validate_candidate", |ctx: ContextData<SaveProductCtxData>| async move {
    let outcome = {
      let guard = ctx.read();
      validate_candidate(&guard.candidate, &guard.category_id)
    };
    match outcome {
      Ok(()) => Ok(PipelineControl::Continue),
      Err(errors) => {
        warn!(%errors, "Product form rejected.");
        Err(CatalogError::Validation(errors))
      }
    }
  });

  p.on("resolve_category", |ctx: ContextData<SaveProductCtxData>| async move {
    let (categories, category_id) = {
      let guard = ctx.read();
      (Arc::clone(&guard.deps.categories), guard.category_id.clone())
    };
    match categories.find_by_id(&category_id).await? {
      Some(category) => {
        event!(Level::DEBUG, category_id = %category.id, "Category resolved.");
        ctx.write().resolved_category = Some(category);
        Ok::<_, CatalogError>(PipelineControl::Continue)
      }
      None => {
        warn!(%category_id, "Save refused: unknown category.");
        Err(CatalogError::CategoryNotFound { category_id })
      }
    }
  });

  p.on("default_timestamp", |ctx: ContextData<SaveProductCtxData>| async move {
    ctx.write().candidate.created_at = Some(Utc::now());
    Ok::<_, CatalogError>(PipelineControl::Continue)
  });

  p.on("stage_photo", |ctx: ContextData<SaveProductCtxData>| async move {
    let mut guard = ctx.write();
    let original = guard
      .upload
      .lock()
      .as_ref()
      .and_then(UploadedFile::base_name)
      .map(str::to_string)
      .unwrap_or_default();
    let photo = unique_photo_name(&original);
    event!(Level::DEBUG, %original, %photo, "Photo name staged.");
    guard.candidate.photo = Some(photo.clone());
    guard.staged_photo = Some(photo);
    Ok::<_, CatalogError>(PipelineControl::Continue)
  });

  p.on("assign_category", |ctx: ContextData<SaveProductCtxData>| async move {
    let mut guard = ctx.write();
    match guard.resolved_category.clone() {
      Some(category) => {
        guard.candidate.category = Some(category);
        Ok(PipelineControl::Continue)
      }
      None => Err(CatalogError::from(PipelineError::MissingOutput {
        pipeline: SAVE_PIPELINE.to_string(),
        what: "a resolved category",
      })),
    }
  });

  p.on("persist_product", |ctx: ContextData<SaveProductCtxData>| async move {
    let (products, candidate) = {
      let guard = ctx.read();
      (Arc::clone(&guard.deps.products), guard.candidate.clone())
    };
    let saved = products
      .save(candidate)
      .await
      .map_err(|source| CatalogError::Persistence { source })?;
    ctx.write().saved = Some(saved);
    Ok::<_, CatalogError>(PipelineControl::Continue)
  });

  p.after("persist_product", |ctx: ContextData<SaveProductCtxData>| async move {
    let saved = ctx.map_read(|d| &d.saved);
    if let Some(saved) = &*saved {
      info!("Category assigned: {}", saved.category_id().unwrap_or_default());
      info!("Product saved: {} Id: {}", saved.name, saved.id.as_deref().unwrap_or_default());
    }
    Ok::<_, CatalogError>(PipelineControl::Continue)
  });

  p.on("transfer_photo", |ctx: ContextData<SaveProductCtxData>| async move {
    let (files, upload_dir, photo, upload, saved) = {
      let guard = ctx.read();
      let upload = guard.upload.lock().take();
      (
        Arc::clone(&guard.deps.files),
        guard.deps.upload_dir.clone(),
        guard.staged_photo.clone(),
        upload,
        guard.saved.clone(),
      )
    };
    let (Some(photo), Some(upload), Some(saved)) = (photo, upload, saved) else {
      return Err(CatalogError::from(PipelineError::MissingOutput {
        pipeline: SAVE_PIPELINE.to_string(),
        what: "a staged upload",
      }));
    };
    let Some(path) = upload_dir.resolve(&photo) else {
      warn!(%photo, "Staged photo name does not resolve inside the upload directory.");
      return Err(CatalogError::FileTransfer {
        saved: Box::new(saved),
        path: upload_dir.path().to_path_buf(),
        source: io::Error::new(io::ErrorKind::InvalidInput, "photo name leaves the upload directory"),
      });
    };
    match files.write(&path, upload.content).await {
      Ok(()) => {
        event!(Level::DEBUG, path = %path.display(), "Photo stored.");
        Ok(PipelineControl::Continue)
      }
      Err(source) => {
        warn!(path = %path.display(), error = %source, "Photo transfer failed after the product was saved.");
        Err(CatalogError::FileTransfer {
          saved: Box::new(saved),
          path,
          source,
        })
      }
    }
  });

  p
}

/// Creates or updates products through the save pipeline.
#[derive(Clone)]
pub struct ProductMutator {
  deps: CatalogDeps,
  pipeline: Arc<Pipeline<SaveProductCtxData, CatalogError>>,
}

impl ProductMutator {
  pub fn new(deps: CatalogDeps) -> Self {
    Self {
      deps,
      pipeline: Arc::new(build_save_pipeline()),
    }
  }

  /// Saves `candidate` under the category `category_id`, storing `upload` as
  /// its photo when one with a file name is given.
  ///
  /// The photo bytes are written only after the product is persisted. A
  /// failure there is reported as [`CatalogError::FileTransfer`], which still
  /// carries the saved product.
  #[instrument(
    name = "ProductMutator::save",
    skip(self, candidate, upload),
    fields(product_id = candidate.id.as_deref().unwrap_or("<new>"), with_upload = upload.is_some()),
    err(Display)
  )]
  pub async fn save(
    &self,
    candidate: Product,
    category_id: &str,
    upload: Option<UploadedFile>,
  ) -> CatalogResult<Product> {
    let ctx = ContextData::new(SaveProductCtxData::new(self.deps.clone(), candidate, category_id, upload));
    self.pipeline.run(ctx.clone()).await?;
    let saved = ctx.read().saved.clone();
    saved.ok_or_else(|| {
      CatalogError::from(PipelineError::MissingOutput {
        pipeline: SAVE_PIPELINE.to_string(),
        what: "a saved product",
      })
    })
  }
}
