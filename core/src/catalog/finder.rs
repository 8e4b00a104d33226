// storefront/src/catalog/finder.rs

use crate::error::{CatalogError, CatalogResult};
use crate::model::Product;
use crate::store::ProductStore;
use std::sync::Arc;
use tracing::{event, instrument, Level};

/// Single-product lookup with an explicit "absent" outcome.
#[derive(Clone)]
pub struct ProductFinder {
  products: Arc<dyn ProductStore>,
}

impl ProductFinder {
  pub fn new(products: Arc<dyn ProductStore>) -> Self {
    Self { products }
  }

  /// `Ok(None)` when no stored product has this id.
  ///
  /// A document coming back without an id is reported as absent too: only a
  /// persisted product can be shown, edited or deleted.
  #[instrument(name = "ProductFinder::find_by_id", skip(self), err(Display))]
  pub async fn find_by_id(&self, id: &str) -> CatalogResult<Option<Product>> {
    let found = self.products.find_by_id(id).await?.filter(Product::is_persisted);
    if found.is_none() {
      event!(Level::DEBUG, "No product with this id.");
    }
    Ok(found)
  }

  /// Like [`find_by_id`](Self::find_by_id) with absence turned into [`CatalogError::NotFound`].
  pub async fn require(&self, id: &str) -> CatalogResult<Product> {
    self.find_by_id(id).await?.ok_or_else(|| CatalogError::not_found(id))
  }
}
