// storefront/src/catalog/contexts.rs

//! State carried through the save and delete pipelines.

use super::finder::ProductFinder;
use crate::files::{FileStore, UploadDir, UploadedFile};
use crate::model::{Category, Product};
use crate::store::{CategoryStore, ProductStore};
use parking_lot::Mutex;
use std::sync::Arc;

/// Collaborators every mutation needs. Cheap to clone; read-only after startup.
#[derive(Clone)]
pub struct CatalogDeps {
  pub products: Arc<dyn ProductStore>,
  pub categories: Arc<dyn CategoryStore>,
  pub files: Arc<dyn FileStore>,
  pub upload_dir: UploadDir,
}

impl CatalogDeps {
  pub fn new(
    products: Arc<dyn ProductStore>,
    categories: Arc<dyn CategoryStore>,
    files: Arc<dyn FileStore>,
    upload_dir: UploadDir,
  ) -> Self {
    Self {
      products,
      categories,
      files,
      upload_dir,
    }
  }

  pub fn finder(&self) -> ProductFinder {
    ProductFinder::new(Arc::clone(&self.products))
  }
}

pub struct SaveProductCtxData {
  pub deps: CatalogDeps,
  pub candidate: Product,
  pub category_id: String,
  /// Taken exactly once, by `transfer_photo`.
  pub upload: Mutex<Option<UploadedFile>>,
  pub resolved_category: Option<Category>,
  pub staged_photo: Option<String>,
  pub saved: Option<Product>,
}

impl SaveProductCtxData {
  pub fn new(deps: CatalogDeps, candidate: Product, category_id: impl Into<String>, upload: Option<UploadedFile>) -> Self {
    Self {
      deps,
      candidate,
      category_id: category_id.into(),
      upload: Mutex::new(upload),
      resolved_category: None,
      staged_photo: None,
      saved: None,
    }
  }

  /// True when an upload with a non-empty file name came with the form.
  pub fn has_named_upload(&self) -> bool {
    self.upload.lock().as_ref().is_some_and(UploadedFile::has_filename)
  }
}

pub struct DeleteProductCtxData {
  pub deps: CatalogDeps,
  pub id: String,
  pub found: Option<Product>,
  pub deleted: bool,
}

impl DeleteProductCtxData {
  pub fn new(deps: CatalogDeps, id: impl Into<String>) -> Self {
    Self {
      deps,
      id: id.into(),
      found: None,
      deleted: false,
    }
  }
}
