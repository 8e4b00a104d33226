// storefront/src/catalog/reader.rs

//! The base listing: store query, name transform, per-element observation.

use crate::error::{CatalogError, CatalogResult};
use crate::model::Product;
use crate::store::{DocumentStream, ProductStore, StoreError};
use futures_util::future;
use futures_util::stream::{self, BoxStream, Stream, StreamExt, TryStreamExt};
use std::sync::Arc;
use tracing::info;

/// A lazily evaluated, single-pass listing of products.
pub type CatalogStream = BoxStream<'static, CatalogResult<Product>>;

/// Side effect run on every product as it flows past, after the name transform.
///
/// Attached once to the stream that is actually consumed, so observing never
/// triggers a query of its own.
pub type Observer = Arc<dyn Fn(&Product) + Send + Sync + 'static>;

/// The default observer: one `info` event per product, carrying its (uppercased) name.
pub fn log_observer() -> Observer {
  Arc::new(|product: &Product| {
    info!(product_id = product.id.as_deref().unwrap_or_default(), "{}", product.name);
  })
}

pub fn uppercase_name(mut product: Product) -> Product {
  product.name = product.name.to_uppercase();
  product
}

/// Ends `source` right after its first error, so a failed query terminates the
/// listing instead of being followed by stray items.
pub(crate) fn stop_after_error<S, T, E>(source: S) -> impl Stream<Item = Result<T, E>> + Send
where
  S: Stream<Item = Result<T, E>> + Send,
  T: Send,
  E: Send,
{
  source.scan(false, |failed, item| {
    let next = if *failed {
      None
    } else {
      *failed = item.is_err();
      Some(item)
    };
    future::ready(next)
  })
}

#[derive(Clone)]
pub struct CatalogReader {
  products: Arc<dyn ProductStore>,
  observer: Observer,
}

impl CatalogReader {
  pub fn new(products: Arc<dyn ProductStore>) -> Self {
    Self {
      products,
      observer: log_observer(),
    }
  }

  pub fn with_observer(mut self, observer: Observer) -> Self {
    self.observer = observer;
    self
  }

  /// Every product in store order with its name uppercased and observed.
  ///
  /// Nothing is queried until the returned stream is first polled.
  pub fn read_all(&self) -> CatalogStream {
    self.shape(self.source())
  }

  /// The raw store query, deferred until first poll.
  pub(crate) fn source(&self) -> DocumentStream<Product> {
    let products = Arc::clone(&self.products);
    stream::once(async move { products.find_all() }).flatten().boxed()
  }

  /// Applies the transform and the observer to a raw product sequence.
  pub(crate) fn shape<S>(&self, source: S) -> CatalogStream
  where
    S: Stream<Item = Result<Product, StoreError>> + Send + 'static,
  {
    let observer = Arc::clone(&self.observer);
    stop_after_error(source.map_err(CatalogError::from))
      .map_ok(uppercase_name)
      .inspect_ok(move |product| observer(product))
      .boxed()
  }
}
