// apps/catalog_app/src/config.rs

use crate::errors::{AppError, Result};
use dotenvy::dotenv;
use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct AppConfig {
  /// Directory holding product photos.
  pub uploads_path: PathBuf,
  /// Delay in front of every product of a paced listing.
  pub pace: Duration,
  /// Products per flushed group of a paced listing.
  pub batch_size: usize,
  pub seed_db: bool,
}

fn parse_var<T>(name: &str, default: T) -> Result<T>
where
  T: FromStr,
  T::Err: std::fmt::Display,
{
  match env::var(name) {
    Ok(raw) => raw
      .trim()
      .parse::<T>()
      .map_err(|e| AppError::Config(format!("Invalid {} value '{}': {}", name, raw, e))),
    Err(env::VarError::NotPresent) => Ok(default),
    Err(e) => Err(AppError::Config(format!("Unreadable environment variable '{}': {}", name, e))),
  }
}

impl AppConfig {
  pub fn from_env() -> Result<Self> {
    dotenv().ok(); // Load .env file if present

    let uploads_path = parse_var("UPLOADS_PATH", PathBuf::from("./uploads"))?;
    let pace = Duration::from_millis(parse_var("CATALOG_PACE_MILLIS", 1000u64)?);
    let batch_size = parse_var("CATALOG_BATCH_SIZE", 2usize)?;
    if batch_size == 0 {
      return Err(AppError::Config("CATALOG_BATCH_SIZE must be at least 1".to_string()));
    }
    let seed_db = parse_var("SEED_DB", true)?;

    tracing::info!(uploads = %uploads_path.display(), ?pace, batch_size, seed_db, "Application configuration loaded.");

    Ok(Self {
      uploads_path,
      pace,
      batch_size,
      seed_db,
    })
  }
}
