// apps/catalog_app/src/main.rs

mod commands;
mod config;
mod errors;
mod seed;
mod state;

use crate::commands::SaveArgs;
use crate::config::AppConfig;
use crate::state::AppState;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::fmt::format::FmtSpan; // For span events in tracing
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "catalog_app")]
#[command(version, about = "Product catalog: listings, lookups, saves and deletes", long_about = None)]
struct Cli {
  /// Enable debug logging
  #[arg(short, long, global = true)]
  debug: bool,

  #[command(subcommand)]
  command: Command,
}

#[derive(Subcommand)]
enum Command {
  /// Print every product, names uppercased
  List,

  /// Print the listing in paced batches
  Paced {
    /// Delay before each product in milliseconds (default: CATALOG_PACE_MILLIS)
    #[arg(long, value_name = "MILLIS")]
    delay_ms: Option<u64>,

    /// Products per batch (default: CATALOG_BATCH_SIZE)
    #[arg(short, long)]
    batch: Option<usize>,
  },

  /// Print the first COUNT products of the endlessly repeating listing
  Repeat {
    #[arg(default_value_t = 10)]
    count: usize,
  },

  /// Print the categories a product can be filed under
  Categories,

  /// Show one product, or the redirect taken when it does not exist
  Show { id: String },

  /// Show the edit form of one product
  Edit { id: String },

  /// Create a product, or update one with --id
  Save {
    /// Id of the product to update
    #[arg(long)]
    id: Option<String>,

    #[arg(long)]
    name: String,

    #[arg(long)]
    price: f64,

    /// Category id, see `categories`
    #[arg(long)]
    category: String,

    /// Photo file to upload with the product
    #[arg(long, value_name = "FILE")]
    photo: Option<PathBuf>,
  },

  /// Delete one product
  Delete { id: String },

  /// Resolve a stored photo name inside the upload directory
  PhotoPath { name: String },
}

fn init_tracing(debug: bool) {
  let default_level = if debug { "debug" } else { "info" };
  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
  tracing_subscriber::fmt()
    .with_env_filter(filter) // RUST_LOG overrides --debug
    .with_span_events(FmtSpan::CLOSE) // Log when spans close, showing duration
    .with_writer(std::io::stderr)
    .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  let cli = Cli::parse();
  init_tracing(cli.debug);

  let app_config = match AppConfig::from_env() {
    Ok(cfg) => Arc::new(cfg),
    Err(e) => {
      tracing::error!(error = %e, "Failed to load application configuration.");
      return Err(e.into());
    }
  };
  let state = AppState::build(app_config).await?;

  let outcome = match cli.command {
    Command::List => commands::list(&state).await,
    Command::Paced { delay_ms, batch } => commands::paced(&state, delay_ms.map(Duration::from_millis), batch).await,
    Command::Repeat { count } => commands::repeat(&state, count).await,
    Command::Categories => commands::categories(&state).await,
    Command::Show { id } => commands::show(&state, &id).await,
    Command::Edit { id } => commands::edit(&state, &id).await,
    Command::Save {
      id,
      name,
      price,
      category,
      photo,
    } => {
      let args = SaveArgs {
        id,
        name,
        price,
        category,
        photo,
      };
      commands::save(&state, args).await
    }
    Command::Delete { id } => commands::delete(&state, &id).await,
    Command::PhotoPath { name } => commands::photo_path(&state, &name),
  };

  if let Err(e) = &outcome {
    tracing::error!(error = %e, "Command failed.");
  }
  Ok(outcome?)
}
