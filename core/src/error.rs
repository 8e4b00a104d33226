// storefront/src/error.rs

use crate::model::Product;
use crate::store::StoreError;
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Failures raised by the pipeline engine itself rather than by a handler.
#[derive(Debug, Error)]
pub enum PipelineError {
  #[error("Pipeline '{pipeline}': required step '{step_name}' has no handlers")]
  HandlerMissing { pipeline: String, step_name: String },

  #[error("Pipeline '{pipeline}' finished without producing {what}")]
  MissingOutput { pipeline: String, what: &'static str },
}

/// One rejected form field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
  pub field: &'static str,
  pub message: String,
}

/// Every field error found on a submitted product, in field order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors(pub Vec<FieldError>);

impl ValidationErrors {
  pub fn push(&mut self, field: &'static str, message: impl Into<String>) {
    self.0.push(FieldError {
      field,
      message: message.into(),
    });
  }

  pub fn is_empty(&self) -> bool {
    self.0.is_empty()
  }

  pub fn for_field(&self, field: &str) -> Option<&FieldError> {
    self.0.iter().find(|e| e.field == field)
  }
}

impl fmt::Display for ValidationErrors {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let mut first = true;
    for err in &self.0 {
      if !first {
        f.write_str("; ")?;
      }
      write!(f, "{}: {}", err.field, err.message)?;
      first = false;
    }
    Ok(())
  }
}

#[derive(Debug, Error)]
pub enum CatalogError {
  #[error("Product not found: {id}")]
  NotFound { id: String },

  #[error("Category not found: {category_id}")]
  CategoryNotFound { category_id: String },

  #[error("Invalid product: {0}")]
  Validation(ValidationErrors),

  /// The store refused the write; nothing was persisted.
  #[error("Failed to persist product: {source}")]
  Persistence {
    #[source]
    source: StoreError,
  },

  /// The product row is durable, only the photo bytes are missing.
  #[error("Product {} saved but its photo could not be written to {}: {source}", .saved.id.as_deref().unwrap_or("?"), .path.display())]
  FileTransfer {
    saved: Box<Product>,
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },

  /// A read-side query (listing, lookup) failed.
  #[error("Catalog store query failed: {0}")]
  Store(#[from] StoreError),

  #[error("Catalog workflow error: {0}")]
  Pipeline(#[from] PipelineError),
}

impl CatalogError {
  pub fn not_found(id: impl Into<String>) -> Self {
    CatalogError::NotFound { id: id.into() }
  }

  /// True when the product was written before the failure happened.
  pub fn is_persisted(&self) -> bool {
    matches!(self, CatalogError::FileTransfer { .. })
  }
}

pub type CatalogResult<T, E = CatalogError> = std::result::Result<T, E>;
