// storefront/src/store/mod.rs

//! Document-store collaborators.
//!
//! The catalog only needs four primitives per collection. Any backend that can
//! provide them asynchronously (a document database driver, a REST client, the
//! bundled [`MemoryCatalogStore`]) plugs in through these traits.

pub mod memory;

use crate::model::{Category, Product};
use async_trait::async_trait;
use futures_util::stream::BoxStream;
use thiserror::Error;

pub use memory::MemoryCatalogStore;

#[derive(Debug, Error)]
pub enum StoreError {
  #[error("document store unavailable: {0}")]
  Unavailable(String),

  #[error("document store rejected the write: {0}")]
  Rejected(String),

  #[error(transparent)]
  Backend(#[from] anyhow::Error),
}

/// Stream of documents as produced by a store query.
pub type DocumentStream<T> = BoxStream<'static, Result<T, StoreError>>;

#[async_trait]
pub trait ProductStore: Send + Sync + 'static {
  /// All products in the store's native order.
  ///
  /// Implementations should not start the query before the stream is first polled.
  fn find_all(&self) -> DocumentStream<Product>;

  async fn find_by_id(&self, id: &str) -> Result<Option<Product>, StoreError>;

  /// Inserts (no id yet) or replaces (id set) a product and returns the stored
  /// document, id included.
  async fn save(&self, product: Product) -> Result<Product, StoreError>;

  async fn delete(&self, product: &Product) -> Result<(), StoreError>;
}

#[async_trait]
pub trait CategoryStore: Send + Sync + 'static {
  fn find_all(&self) -> DocumentStream<Category>;

  async fn find_by_id(&self, id: &str) -> Result<Option<Category>, StoreError>;
}
