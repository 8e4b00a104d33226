// storefront/src/navigation.rs

//! What the user sees after each form or detail request: a page to render or
//! a redirect to the listing with a flash message.

use crate::error::{CatalogError, ValidationErrors};
use crate::files::UploadedFile;
use crate::model::Product;
use crate::service::CatalogService;
use std::fmt::Write as _;
use tracing::{event, Level};

pub const LISTING_PATH: &str = "/list";

pub const MSG_SAVED: &str = "Product saved successfully";
pub const MSG_DELETED: &str = "Product deleted successfully";
pub const MSG_NOT_FOUND: &str = "Product not found";
pub const MSG_DELETE_NOT_FOUND: &str = "Product to delete not found";
pub const MSG_UNKNOWN_CATEGORY: &str = "Selected category does not exist";
pub const MSG_NOT_SAVED: &str = "Product could not be saved";
pub const MSG_PHOTO_FAILED: &str = "Product saved but its photo could not be stored";
pub const MSG_UNAVAILABLE: &str = "Catalog is temporarily unavailable";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Redirect {
  pub path: String,
  pub success: Option<String>,
  pub error: Option<String>,
}

impl Redirect {
  pub fn to_listing() -> Self {
    Self {
      path: LISTING_PATH.to_string(),
      success: None,
      error: None,
    }
  }

  pub fn with_success(mut self, message: impl Into<String>) -> Self {
    self.success = Some(message.into());
    self
  }

  pub fn with_error(mut self, message: impl Into<String>) -> Self {
    self.error = Some(message.into());
    self
  }

  /// `path?success=...&error=...`, spaces encoded as `+`.
  pub fn location(&self) -> String {
    let mut location = self.path.clone();
    let mut separator = '?';
    for (key, value) in [("success", &self.success), ("error", &self.error)] {
      if let Some(value) = value {
        location.push(separator);
        location.push_str(key);
        location.push('=');
        location.push_str(&encode_query_value(value));
        separator = '&';
      }
    }
    location
  }
}

/// Form-style query encoding: unreserved characters kept, space as `+`,
/// everything else percent-encoded.
pub fn encode_query_value(value: &str) -> String {
  let mut encoded = String::with_capacity(value.len());
  for byte in value.bytes() {
    match byte {
      b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => encoded.push(byte as char),
      b' ' => encoded.push('+'),
      other => {
        let _ = write!(encoded, "%{:02X}", other);
      }
    }
  }
  encoded
}

#[derive(Debug, PartialEq)]
pub enum Navigation {
  Detail(Product),
  /// Re-render the product form with whatever the user typed plus the field errors.
  Form {
    candidate: Product,
    category_id: String,
    errors: ValidationErrors,
  },
  Redirect(Redirect),
}

impl Navigation {
  pub fn redirect_location(&self) -> Option<String> {
    match self {
      Navigation::Redirect(r) => Some(r.location()),
      _ => None,
    }
  }
}

fn listing_with_error(message: &str) -> Navigation {
  Navigation::Redirect(Redirect::to_listing().with_error(message))
}

impl CatalogService {
  /// Detail page, or back to the listing when the id is unknown.
  pub async fn show_detail(&self, id: &str) -> Navigation {
    match self.fetch_detail(id).await {
      Ok(Some(product)) => Navigation::Detail(product),
      Ok(None) => listing_with_error(MSG_NOT_FOUND),
      Err(e) => {
        event!(Level::ERROR, error = %e, "Detail lookup failed.");
        listing_with_error(MSG_UNAVAILABLE)
      }
    }
  }

  /// Edit form pre-filled with the stored product.
  pub async fn edit_form(&self, id: &str) -> Navigation {
    match self.fetch_detail(id).await {
      Ok(Some(product)) => Navigation::Form {
        category_id: product.category_id().unwrap_or_default().to_string(),
        candidate: product,
        errors: ValidationErrors::default(),
      },
      Ok(None) => listing_with_error(MSG_NOT_FOUND),
      Err(e) => {
        event!(Level::ERROR, error = %e, "Edit lookup failed.");
        listing_with_error(MSG_UNAVAILABLE)
      }
    }
  }

  pub async fn submit_form(&self, candidate: Product, category_id: &str, upload: Option<UploadedFile>) -> Navigation {
    // Kept so a rejected form comes back exactly as typed.
    let typed = candidate.clone();
    match self.submit(candidate, category_id, upload).await {
      Ok(_) => Navigation::Redirect(Redirect::to_listing().with_success(MSG_SAVED)),
      Err(CatalogError::Validation(errors)) => Navigation::Form {
        candidate: typed,
        category_id: category_id.to_string(),
        errors,
      },
      Err(CatalogError::CategoryNotFound { .. }) => listing_with_error(MSG_UNKNOWN_CATEGORY),
      Err(CatalogError::FileTransfer { .. }) => Navigation::Redirect(
        Redirect::to_listing()
          .with_success(MSG_SAVED)
          .with_error(MSG_PHOTO_FAILED),
      ),
      Err(e) => {
        event!(Level::ERROR, error = %e, "Product submission failed.");
        listing_with_error(MSG_NOT_SAVED)
      }
    }
  }

  pub async fn remove_and_redirect(&self, id: &str) -> Navigation {
    match self.remove(id).await {
      Ok(_) => Navigation::Redirect(Redirect::to_listing().with_success(MSG_DELETED)),
      Err(CatalogError::NotFound { .. }) => listing_with_error(MSG_DELETE_NOT_FOUND),
      Err(e) => {
        event!(Level::ERROR, error = %e, "Product removal failed.");
        listing_with_error(MSG_UNAVAILABLE)
      }
    }
  }
}
