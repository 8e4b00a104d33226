// storefront/src/store/memory.rs

use super::{CategoryStore, DocumentStream, ProductStore, StoreError};
use crate::model::{Category, Product};
use async_trait::async_trait;
use futures_util::stream::{self, StreamExt};
use parking_lot::RwLock;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tracing::{event, Level};
use uuid::Uuid;

#[derive(Default)]
struct Collections {
  products: Vec<Product>,
  categories: Vec<Category>,
}

/// In-process document store holding both collections in insertion order.
///
/// Cloning is cheap and every clone sees the same documents. The number of
/// product listing queries actually executed is tracked so callers can check
/// how often a stream went back to the store.
#[derive(Clone, Default)]
pub struct MemoryCatalogStore {
  data: Arc<RwLock<Collections>>,
  product_queries: Arc<AtomicUsize>,
}

impl MemoryCatalogStore {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn with_categories(categories: impl IntoIterator<Item = Category>) -> Self {
    let store = Self::new();
    store.data.write().categories.extend(categories);
    store
  }

  pub fn insert_category(&self, category: Category) {
    let mut data = self.data.write();
    match data.categories.iter_mut().find(|c| c.id == category.id) {
      Some(existing) => *existing = category,
      None => data.categories.push(category),
    }
  }

  /// Number of product `find_all` queries that have started running.
  pub fn product_queries(&self) -> usize {
    self.product_queries.load(Ordering::SeqCst)
  }

  pub fn product_count(&self) -> usize {
    self.data.read().products.len()
  }

  /// Copy of the stored products, in store order.
  pub fn products(&self) -> Vec<Product> {
    self.data.read().products.clone()
  }
}

#[async_trait]
impl ProductStore for MemoryCatalogStore {
  fn find_all(&self) -> DocumentStream<Product> {
    let data = Arc::clone(&self.data);
    let queries = Arc::clone(&self.product_queries);
    // The snapshot is taken on first poll, not here.
    stream::once(async move {
      queries.fetch_add(1, Ordering::SeqCst);
      let snapshot = data.read().products.clone();
      event!(Level::TRACE, documents = snapshot.len(), "Product query executed.");
      stream::iter(snapshot.into_iter().map(Ok))
    })
    .flatten()
    .boxed()
  }

  async fn find_by_id(&self, id: &str) -> Result<Option<Product>, StoreError> {
    Ok(
      self
        .data
        .read()
        .products
        .iter()
        .find(|p| p.id.as_deref() == Some(id))
        .cloned(),
    )
  }

  async fn save(&self, mut product: Product) -> Result<Product, StoreError> {
    let mut data = self.data.write();
    match product.id.clone() {
      Some(id) => match data.products.iter_mut().find(|p| p.id.as_deref() == Some(id.as_str())) {
        Some(existing) => *existing = product.clone(),
        None => data.products.push(product.clone()),
      },
      None => {
        product.id = Some(Uuid::new_v4().simple().to_string());
        data.products.push(product.clone());
      }
    }
    Ok(product)
  }

  async fn delete(&self, product: &Product) -> Result<(), StoreError> {
    let Some(id) = product.id.as_deref() else {
      return Err(StoreError::Rejected("cannot delete a product without an id".to_string()));
    };
    self.data.write().products.retain(|p| p.id.as_deref() != Some(id));
    Ok(())
  }
}

#[async_trait]
impl CategoryStore for MemoryCatalogStore {
  fn find_all(&self) -> DocumentStream<Category> {
    let data = Arc::clone(&self.data);
    stream::once(async move {
      let snapshot = data.read().categories.clone();
      stream::iter(snapshot.into_iter().map(Ok))
    })
    .flatten()
    .boxed()
  }

  async fn find_by_id(&self, id: &str) -> Result<Option<Category>, StoreError> {
    Ok(self.data.read().categories.iter().find(|c| c.id == id).cloned())
  }
}
