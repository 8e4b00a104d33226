// apps/catalog_app/src/errors.rs

use storefront::CatalogError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
  #[error("Configuration Error: {0}")]
  Config(String),

  #[error("Invalid Input: {0}")]
  Input(String),

  #[error("Catalog Error: {source}")]
  Catalog {
    #[from]
    source: CatalogError,
  },

  #[error("I/O Error: {0}")]
  Io(#[from] std::io::Error),

  #[error("Output Error: {0}")]
  Output(#[from] serde_json::Error),
}

pub type Result<T, E = AppError> = std::result::Result<T, E>;
