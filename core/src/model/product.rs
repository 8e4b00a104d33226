// storefront/src/model/product.rs

use super::Category;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A catalog product.
///
/// A product starts transient (`id == None`) when a form is filled in and gets
/// its id from the store on the first successful save. From then on every save
/// keeps the id, and `created_at` keeps the value set by the first save.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Product {
  pub id: Option<String>,
  pub name: String,
  pub price: f64,
  pub created_at: Option<DateTime<Utc>>,
  /// Fully resolved category. Always `Some` on anything that went through a save.
  pub category: Option<Category>,
  /// Stored photo file name, `<token>-<sanitized original name>`.
  pub photo: Option<String>,
}

impl Product {
  /// A transient product as typed into the creation form.
  pub fn draft(name: impl Into<String>, price: f64) -> Self {
    Self {
      name: name.into(),
      price,
      ..Self::default()
    }
  }

  pub fn is_persisted(&self) -> bool {
    self.id.is_some()
  }

  pub fn category_id(&self) -> Option<&str> {
    self.category.as_ref().map(|c| c.id.as_str())
  }
}
