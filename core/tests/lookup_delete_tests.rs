// tests/lookup_delete_tests.rs
mod common;

use common::*;
use serial_test::serial;
use std::sync::Arc;
use storefront::CatalogError;

#[tokio::test]
#[serial]
async fn test_unknown_id_is_absent() {
  setup_tracing();
  let store = store_with_categories();
  seed_products(&store, &["Stool"]).await;
  let service = service_over(&store, Arc::new(RecordingFileStore::default()));

  assert_eq!(service.fetch_detail("no-such-id").await.unwrap(), None);
}

#[tokio::test]
#[serial]
async fn test_lookup_returns_stored_product_unchanged() {
  setup_tracing();
  let store = store_with_categories();
  let seeded = seed_products(&store, &["lowercase name"]).await;
  let service = service_over(&store, Arc::new(RecordingFileStore::default()));

  let found = service.fetch_detail(seeded[0].id.as_deref().unwrap()).await.unwrap();

  assert_eq!(found.as_ref(), Some(&seeded[0]));
  assert_eq!(found.unwrap().name, "lowercase name");
}

#[tokio::test]
#[serial]
async fn test_delete_removes_only_that_product() {
  setup_tracing();
  let store = store_with_categories();
  let seeded = seed_products(&store, &["Oak table", "Pine table"]).await;
  let service = service_over(&store, Arc::new(RecordingFileStore::default()));
  let id = seeded[0].id.clone().unwrap();

  let removed = service.remove(&id).await.unwrap();

  assert_eq!(removed, seeded[0]);
  assert_eq!(service.fetch_detail(&id).await.unwrap(), None);
  assert_eq!(names(&store.products()), vec!["Pine table"]);
}

#[tokio::test]
#[serial]
async fn test_deleting_twice_reports_not_found() {
  setup_tracing();
  let store = store_with_categories();
  let seeded = seed_products(&store, &["Bench"]).await;
  let service = service_over(&store, Arc::new(RecordingFileStore::default()));
  let id = seeded[0].id.clone().unwrap();

  service.remove(&id).await.unwrap();
  let err = service.remove(&id).await.unwrap_err();

  assert!(matches!(err, CatalogError::NotFound { id: ref missing } if *missing == id));
  assert_eq!(store.product_count(), 0);
}

#[tokio::test]
#[serial]
async fn test_delete_of_unknown_id_leaves_store_untouched() {
  setup_tracing();
  let store = store_with_categories();
  seed_products(&store, &["Lamp"]).await;
  let service = service_over(&store, Arc::new(RecordingFileStore::default()));

  let err = service.remove("no-such-id").await.unwrap_err();

  assert!(matches!(err, CatalogError::NotFound { .. }));
  assert_eq!(store.product_count(), 1);
}

#[tokio::test]
#[serial]
async fn test_delete_is_logged_with_the_id() {
  let store = store_with_categories();
  let seeded = seed_products(&store, &["Rug"]).await;
  let service = service_over(&store, Arc::new(RecordingFileStore::default()));
  let id = seeded[0].id.clone().unwrap();
  let (logs, _guard) = capture_logs();

  service.remove(&id).await.unwrap();

  let output = logs.contents();
  assert!(output.contains(&format!("Deleting product {id}")), "log output: {output}");
}
