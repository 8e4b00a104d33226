// apps/catalog_app/src/seed.rs

//! Fixed demo data so a fresh in-memory store has something to list.

use chrono::{TimeZone, Utc};
use storefront::{Category, MemoryCatalogStore, Product, ProductStore, StoreError};

pub fn categories() -> Vec<Category> {
  vec![
    Category::new("cat-electronics", "Electronics"),
    Category::new("cat-sports", "Sports"),
    Category::new("cat-furniture", "Furniture"),
  ]
}

const PRODUCTS: &[(&str, &str, f64, &str)] = &[
  ("p-1001", "Noise cancelling headphones", 199.0, "cat-electronics"),
  ("p-1002", "Mechanical keyboard", 89.5, "cat-electronics"),
  ("p-1003", "Trail running shoes", 120.0, "cat-sports"),
  ("p-1004", "Yoga mat", 25.0, "cat-sports"),
  ("p-1005", "Standing desk", 450.0, "cat-furniture"),
];

pub async fn seed(store: &MemoryCatalogStore) -> Result<usize, StoreError> {
  let categories = categories();
  for category in &categories {
    store.insert_category(category.clone());
  }
  for (day, (id, name, price, category_id)) in (1u32..).zip(PRODUCTS) {
    let product = Product {
      id: Some((*id).to_string()),
      name: (*name).to_string(),
      price: *price,
      created_at: Utc.with_ymd_and_hms(2024, 1, day, 9, 0, 0).single(),
      category: categories.iter().find(|c| c.id == *category_id).cloned(),
      photo: None,
    };
    ProductStore::save(store, product).await?;
  }
  tracing::info!(products = PRODUCTS.len(), categories = categories.len(), "Catalog seeded.");
  Ok(PRODUCTS.len())
}
