// storefront/examples/basic_catalog.rs

use futures_util::stream::{StreamExt, TryStreamExt};
use std::sync::Arc;
use std::time::Duration;
use storefront::{
  ByteSource, CatalogError, CatalogService, Category, FileStore, MemoryCatalogStore, Product, UploadDir, UploadedFile,
};
use tracing::info;

/// Accepts uploads without storing them anywhere.
struct DiscardingFileStore;

#[async_trait::async_trait]
impl FileStore for DiscardingFileStore {
  async fn write(&self, path: &std::path::Path, source: ByteSource) -> std::io::Result<()> {
    let chunks: Vec<Vec<u8>> = source.into_stream().try_collect().await?;
    info!(path = %path.display(), bytes = chunks.iter().map(Vec::len).sum::<usize>(), "Upload discarded.");
    Ok(())
  }
}

#[tokio::main]
async fn main() -> Result<(), CatalogError> {
  tracing_subscriber::fmt().with_max_level(tracing::Level::INFO).init();

  info!("--- Basic Catalog Example ---");

  // 1. One in-memory store serves both collections.
  let store = MemoryCatalogStore::with_categories([
    Category::new("cat-kitchen", "Kitchen"),
    Category::new("cat-garden", "Garden"),
  ]);
  let service = CatalogService::new(
    Arc::new(store.clone()),
    Arc::new(store.clone()),
    Arc::new(DiscardingFileStore),
    UploadDir::new("./uploads"),
  );

  // 2. Save through the pipeline; the photo is written after the product.
  let kettle = service
    .submit(
      Product::draft("Kettle", 29.9),
      "cat-kitchen",
      Some(UploadedFile::new("kettle front.jpg", ByteSource::from_bytes(b"not really a jpeg".to_vec()))),
    )
    .await?;
  service.submit(Product::draft("Rake", 14.5), "cat-garden", None).await?;
  info!(photo = ?kettle.photo, "Kettle saved.");

  // 3. A form with problems never reaches the store.
  if let Err(CatalogError::Validation(errors)) = service.submit(Product::draft("", -1.0), "cat-garden", None).await {
    info!("Rejected form: {}", errors);
  }

  // 4. Listings are lazy; each consumption queries the store once.
  let all: Vec<Product> = service.list_all().try_collect().await?;
  info!("Listed {} products", all.len());

  let mut paced = service.list_paced(Duration::from_millis(200), 1);
  while let Some(batch) = paced.next().await {
    info!("Paced batch of {}", batch?.len());
  }

  let replayed: Vec<Product> = service.list_repeating().take(5).try_collect().await?;
  info!("First five of the endless listing: {:?}", replayed.iter().map(|p| p.name.as_str()).collect::<Vec<_>>());

  // 5. Deleting checks existence first.
  let kettle_id = kettle.id.unwrap_or_default();
  service.remove(&kettle_id).await?;
  match service.remove(&kettle_id).await {
    Err(CatalogError::NotFound { id }) => info!("Second delete refused, {} is gone", id),
    other => info!("Unexpected outcome: {:?}", other.map(|p| p.name)),
  }

  Ok(())
}
