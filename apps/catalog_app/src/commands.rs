// apps/catalog_app/src/commands.rs

//! One function per subcommand. Output goes to stdout as JSON lines, logs go
//! through tracing.

use crate::errors::{AppError, Result};
use crate::state::AppState;
use futures_util::stream::StreamExt;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use storefront::{ByteSource, CatalogError, Navigation, Product, UploadedFile};
use tracing::{info, warn};

fn emit<T: Serialize>(value: &T) -> Result<()> {
  println!("{}", serde_json::to_string(value)?);
  Ok(())
}

#[derive(Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
enum NavigationView<'a> {
  Detail {
    product: &'a Product,
  },
  Form {
    candidate: &'a Product,
    category_id: &'a str,
    errors: Vec<String>,
  },
  Redirect {
    location: String,
  },
}

fn emit_navigation(navigation: &Navigation) -> Result<()> {
  let view = match navigation {
    Navigation::Detail(product) => NavigationView::Detail { product },
    Navigation::Form {
      candidate,
      category_id,
      errors,
    } => NavigationView::Form {
      candidate,
      category_id,
      errors: errors.0.iter().map(|e| format!("{}: {}", e.field, e.message)).collect(),
    },
    Navigation::Redirect(redirect) => NavigationView::Redirect {
      location: redirect.location(),
    },
  };
  emit(&view)
}

pub async fn list(state: &AppState) -> Result<()> {
  let mut listing = state.service.list_all();
  while let Some(product) = listing.next().await {
    emit(&product?)?;
  }
  Ok(())
}

pub async fn paced(state: &AppState, delay: Option<Duration>, batch_size: Option<usize>) -> Result<()> {
  let delay = delay.unwrap_or(state.config.pace);
  let batch_size = batch_size.unwrap_or(state.config.batch_size);
  info!(?delay, batch_size, "Streaming paced listing.");
  let mut batches = state.service.list_paced(delay, batch_size);
  while let Some(batch) = batches.next().await {
    emit(&batch?)?;
  }
  Ok(())
}

pub async fn repeat(state: &AppState, count: usize) -> Result<()> {
  let mut endless = state.service.list_repeating().take(count);
  while let Some(product) = endless.next().await {
    emit(&product?)?;
  }
  Ok(())
}

pub async fn categories(state: &AppState) -> Result<()> {
  let mut categories = state.service.list_categories();
  while let Some(category) = categories.next().await {
    emit(&category?)?;
  }
  Ok(())
}

pub async fn show(state: &AppState, id: &str) -> Result<()> {
  emit_navigation(&state.service.show_detail(id).await)
}

pub async fn edit(state: &AppState, id: &str) -> Result<()> {
  emit_navigation(&state.service.edit_form(id).await)
}

/// Fields of the product form as given on the command line.
pub struct SaveArgs {
  pub id: Option<String>,
  pub name: String,
  pub price: f64,
  pub category: String,
  pub photo: Option<PathBuf>,
}

async fn read_upload(path: &Path) -> Result<UploadedFile> {
  let filename = path
    .file_name()
    .and_then(|n| n.to_str())
    .ok_or_else(|| AppError::Input(format!("'{}' has no usable file name", path.display())))?;
  let bytes = tokio::fs::read(path).await?;
  Ok(UploadedFile::new(filename, ByteSource::from_bytes(bytes)))
}

pub async fn save(state: &AppState, args: SaveArgs) -> Result<()> {
  let mut candidate = match &args.id {
    // Editing starts from the stored product so its timestamp and photo survive.
    Some(id) => match state.service.fetch_detail(id).await? {
      Some(existing) => existing,
      None => return Err(AppError::Catalog { source: CatalogError::not_found(id.as_str()) }),
    },
    None => state.service.blank_form(),
  };
  candidate.name = args.name;
  candidate.price = args.price;

  let upload = match &args.photo {
    Some(path) => Some(read_upload(path).await?),
    None => None,
  };

  let navigation = state.service.submit_form(candidate, &args.category, upload).await;
  emit_navigation(&navigation)?;
  info!(products = state.store.product_count(), "Catalog size after save.");
  Ok(())
}

pub async fn delete(state: &AppState, id: &str) -> Result<()> {
  emit_navigation(&state.service.remove_and_redirect(id).await)?;
  info!(products = state.store.product_count(), "Catalog size after delete.");
  Ok(())
}

pub fn photo_path(state: &AppState, name: &str) -> Result<()> {
  match state.service.photo_path(name) {
    Some(path) => {
      println!("{}", path.display());
      Ok(())
    }
    None => {
      warn!(%name, "Refusing photo name outside the upload directory.");
      Err(AppError::Input(format!("'{}' is not a valid photo name", name)))
    }
  }
}
