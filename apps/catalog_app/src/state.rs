// apps/catalog_app/src/state.rs
use crate::config::AppConfig;
use crate::seed;
use std::sync::Arc;
use storefront::{CatalogService, LocalFileStore, MemoryCatalogStore, UploadDir};

#[derive(Clone)]
pub struct AppState {
  pub store: MemoryCatalogStore,
  pub service: CatalogService,
  pub config: Arc<AppConfig>, // Share loaded config
}

impl AppState {
  /// Wires the catalog service over a fresh in-memory store, seeded when configured.
  pub async fn build(config: Arc<AppConfig>) -> anyhow::Result<Self> {
    let store = MemoryCatalogStore::new();
    if config.seed_db {
      seed::seed(&store).await?;
    } else {
      for category in seed::categories() {
        store.insert_category(category);
      }
    }
    let service = CatalogService::new(
      Arc::new(store.clone()),
      Arc::new(store.clone()),
      Arc::new(LocalFileStore),
      UploadDir::new(config.uploads_path.clone()),
    );
    Ok(Self { store, service, config })
  }
}
