// storefront/src/model/category.rs

use serde::{Deserialize, Serialize};

/// A product category. Categories are read-only from the catalog's point of
/// view and are shared by value between the products that reference them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
  pub id: String,
  pub name: String,
}

impl Category {
  pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
    Self {
      id: id.into(),
      name: name.into(),
    }
  }
}
