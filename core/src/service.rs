// storefront/src/service.rs

//! `CatalogService`: the operations the web layer calls.

use crate::catalog::{
  BatchStream, CatalogDeps, CatalogReader, CatalogStream, ChunkedStreamer, Observer, ProductDeleter, ProductFinder,
  ProductMutator,
};
use crate::error::{CatalogError, CatalogResult};
use crate::files::{FileStore, UploadDir, UploadedFile};
use crate::model::{Category, Product};
use crate::store::{CategoryStore, ProductStore};
use futures_util::stream::{BoxStream, StreamExt, TryStreamExt};
use std::num::NonZeroUsize;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::instrument;

/// Wires the readers and the mutation pipelines around one set of collaborators.
///
/// Clones share the collaborators but nothing else; concurrent calls do not
/// interfere with each other.
#[derive(Clone)]
pub struct CatalogService {
  deps: CatalogDeps,
  reader: CatalogReader,
  streamer: ChunkedStreamer,
  finder: ProductFinder,
  mutator: ProductMutator,
  deleter: ProductDeleter,
}

impl CatalogService {
  pub fn new(
    products: Arc<dyn ProductStore>,
    categories: Arc<dyn CategoryStore>,
    files: Arc<dyn FileStore>,
    upload_dir: UploadDir,
  ) -> Self {
    Self::from_deps(CatalogDeps::new(products, categories, files, upload_dir))
  }

  pub fn from_deps(deps: CatalogDeps) -> Self {
    let reader = CatalogReader::new(Arc::clone(&deps.products));
    Self {
      streamer: ChunkedStreamer::new(reader.clone()),
      reader,
      finder: deps.finder(),
      mutator: ProductMutator::new(deps.clone()),
      deleter: ProductDeleter::new(deps.clone()),
      deps,
    }
  }

  /// Replaces the per-product log observer of every listing.
  pub fn with_observer(mut self, observer: Observer) -> Self {
    self.reader = self.reader.with_observer(observer);
    self.streamer = ChunkedStreamer::new(self.reader.clone());
    self
  }

  pub fn upload_dir(&self) -> &UploadDir {
    &self.deps.upload_dir
  }

  /// All products, names uppercased, each one logged as it is emitted.
  pub fn list_all(&self) -> CatalogStream {
    self.reader.read_all()
  }

  /// Same sequence as [`list_all`](Self::list_all), each product held back by
  /// `delay` and flushed in groups of `batch_size` (zero counts as one).
  pub fn list_paced(&self, delay: Duration, batch_size: usize) -> BatchStream {
    let batch_size = NonZeroUsize::new(batch_size).unwrap_or(NonZeroUsize::MIN);
    self.streamer.read_paced_batches(delay, batch_size)
  }

  /// Endless replay of the listing; see [`ChunkedStreamer::read_repeating`].
  pub fn list_repeating(&self) -> CatalogStream {
    self.streamer.read_repeating()
  }

  /// Categories a product can be filed under, in store order.
  pub fn list_categories(&self) -> BoxStream<'static, CatalogResult<Category>> {
    self.deps.categories.find_all().map_err(CatalogError::from).boxed()
  }

  pub async fn fetch_detail(&self, id: &str) -> CatalogResult<Option<Product>> {
    self.finder.find_by_id(id).await
  }

  /// Validates and saves a product; see [`ProductMutator::save`].
  #[instrument(name = "CatalogService::submit", skip(self, candidate, upload))]
  pub async fn submit(
    &self,
    candidate: Product,
    category_id: &str,
    upload: Option<UploadedFile>,
  ) -> CatalogResult<Product> {
    self.mutator.save(candidate, category_id, upload).await
  }

  pub async fn remove(&self, id: &str) -> CatalogResult<Product> {
    self.deleter.delete_by_id(id).await
  }

  /// The transient product that backs an empty creation form.
  pub fn blank_form(&self) -> Product {
    Product::default()
  }

  /// Location of a stored photo, `None` for names that would leave the upload directory.
  pub fn photo_path(&self, photo_name: &str) -> Option<PathBuf> {
    self.deps.upload_dir.resolve(photo_name)
  }
}
