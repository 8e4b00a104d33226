// tests/common/mod.rs
#![allow(dead_code)] // Not every test file uses every fixture

use async_trait::async_trait;
use futures_util::stream::{self, StreamExt};
use once_cell::sync::Lazy;
use parking_lot::Mutex;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use storefront::store::DocumentStream;
use storefront::{
  ByteSource, CatalogService, Category, CategoryStore, FileStore, MemoryCatalogStore, Observer, Product, ProductStore,
  StoreError, UploadDir,
};
use tracing::Level;

// --- Tracing ---
static TRACING_INIT: Lazy<()> = Lazy::new(|| {
  tracing_subscriber::fmt()
    .with_max_level(Level::DEBUG)
    .with_test_writer()
    .try_init()
    .ok();
});

pub fn setup_tracing() {
  Lazy::force(&TRACING_INIT);
}

/// `io::Write` sink shared with the test so emitted log lines can be asserted on.
#[derive(Clone, Default)]
pub struct CapturedLogs(pub Arc<Mutex<Vec<u8>>>);

impl CapturedLogs {
  pub fn contents(&self) -> String {
    String::from_utf8_lossy(&self.0.lock()).into_owned()
  }
}

impl io::Write for CapturedLogs {
  fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
    self.0.lock().extend_from_slice(buf);
    Ok(buf.len())
  }

  fn flush(&mut self) -> io::Result<()> {
    Ok(())
  }
}

/// Routes this thread's events into a buffer until the guard is dropped.
pub fn capture_logs() -> (CapturedLogs, tracing::subscriber::DefaultGuard) {
  let logs = CapturedLogs::default();
  let sink = logs.clone();
  let subscriber = tracing_subscriber::fmt()
    .with_max_level(Level::INFO)
    .with_ansi(false)
    .with_writer(move || sink.clone())
    .finish();
  let guard = tracing::subscriber::set_default(subscriber);
  (logs, guard)
}

// --- Catalog fixtures ---
pub fn electronics() -> Category {
  Category::new("cat-electronics", "Electronics")
}

pub fn sports() -> Category {
  Category::new("cat-sports", "Sports")
}

pub fn furniture() -> Category {
  Category::new("cat-furniture", "Furniture")
}

pub fn store_with_categories() -> MemoryCatalogStore {
  MemoryCatalogStore::with_categories([electronics(), sports(), furniture()])
}

/// Saves one product per name directly through the store, in order.
pub async fn seed_products(store: &MemoryCatalogStore, names: &[&str]) -> Vec<Product> {
  let mut saved = Vec::with_capacity(names.len());
  for (i, name) in names.iter().enumerate() {
    let mut product = Product::draft(*name, 10.0 * (i as f64 + 1.0));
    product.category = Some(electronics());
    saved.push(ProductStore::save(store, product).await.expect("seed save"));
  }
  saved
}

pub fn service_over(store: &MemoryCatalogStore, files: Arc<dyn FileStore>) -> CatalogService {
  CatalogService::new(
    Arc::new(store.clone()),
    Arc::new(store.clone()),
    files,
    UploadDir::new("/srv/uploads"),
  )
}

/// Observer that records each product name it sees.
pub fn recording_observer() -> (Observer, Arc<Mutex<Vec<String>>>) {
  let seen = Arc::new(Mutex::new(Vec::new()));
  let sink = Arc::clone(&seen);
  let observer: Observer = Arc::new(move |p: &Product| sink.lock().push(p.name.clone()));
  (observer, seen)
}

pub fn names(products: &[Product]) -> Vec<String> {
  products.iter().map(|p| p.name.clone()).collect()
}

// --- File stores ---
/// Keeps every written upload in memory.
#[derive(Default)]
pub struct RecordingFileStore {
  pub writes: Mutex<Vec<(PathBuf, Vec<u8>)>>,
}

impl RecordingFileStore {
  pub fn written_paths(&self) -> Vec<PathBuf> {
    self.writes.lock().iter().map(|(p, _)| p.clone()).collect()
  }
}

#[async_trait]
impl FileStore for RecordingFileStore {
  async fn write(&self, path: &Path, source: ByteSource) -> io::Result<()> {
    let mut bytes = Vec::new();
    let mut chunks = source.into_stream();
    while let Some(chunk) = chunks.next().await {
      bytes.extend_from_slice(&chunk?);
    }
    self.writes.lock().push((path.to_path_buf(), bytes));
    Ok(())
  }
}

/// Always fails, counting attempts.
#[derive(Default)]
pub struct FailingFileStore {
  pub attempts: AtomicUsize,
}

#[async_trait]
impl FileStore for FailingFileStore {
  async fn write(&self, _path: &Path, _source: ByteSource) -> io::Result<()> {
    self.attempts.fetch_add(1, Ordering::SeqCst);
    Err(io::Error::new(io::ErrorKind::PermissionDenied, "upload directory is read-only"))
  }
}

// --- Product stores with injected faults ---
/// Delegates to a memory store; `save` always fails and listings fail after
/// `fail_listing_after` documents (when set).
pub struct FaultyProductStore {
  pub inner: MemoryCatalogStore,
  pub fail_saves: bool,
  pub fail_listing_after: Option<usize>,
}

#[async_trait]
impl ProductStore for FaultyProductStore {
  fn find_all(&self) -> DocumentStream<Product> {
    let docs = self.inner.products();
    match self.fail_listing_after {
      Some(n) => {
        let head: Vec<Result<Product, StoreError>> = docs.into_iter().take(n).map(Ok).collect();
        stream::iter(head)
          .chain(stream::once(async { Err(StoreError::Unavailable("replica set lost".to_string())) }))
          .chain(stream::iter(vec![Ok(Product::draft("after-failure", 1.0))]))
          .boxed()
      }
      None => stream::iter(docs.into_iter().map(Ok)).boxed(),
    }
  }

  async fn find_by_id(&self, id: &str) -> Result<Option<Product>, StoreError> {
    ProductStore::find_by_id(&self.inner, id).await
  }

  async fn save(&self, product: Product) -> Result<Product, StoreError> {
    if self.fail_saves {
      return Err(StoreError::Rejected(format!("write concern failed for '{}'", product.name)));
    }
    ProductStore::save(&self.inner, product).await
  }

  async fn delete(&self, product: &Product) -> Result<(), StoreError> {
    ProductStore::delete(&self.inner, product).await
  }
}

/// Category store that counts lookups.
pub struct CountingCategoryStore {
  pub inner: MemoryCatalogStore,
  pub lookups: AtomicUsize,
}

impl CountingCategoryStore {
  pub fn new(inner: MemoryCatalogStore) -> Self {
    Self {
      inner,
      lookups: AtomicUsize::new(0),
    }
  }
}

#[async_trait]
impl CategoryStore for CountingCategoryStore {
  fn find_all(&self) -> DocumentStream<Category> {
    CategoryStore::find_all(&self.inner)
  }

  async fn find_by_id(&self, id: &str) -> Result<Option<Category>, StoreError> {
    self.lookups.fetch_add(1, Ordering::SeqCst);
    CategoryStore::find_by_id(&self.inner, id).await
  }
}
