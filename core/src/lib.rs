// storefront/src/lib.rs

//! Storefront: asynchronous product catalog streams and step-pipeline mutations.
//!
//! The crate serves a product catalog held in a document store:
//!  - Listings as lazy streams: immediate, paced in batches for partial
//!    rendering, or replayed endlessly for chunked-transfer consumers.
//!  - Single-product lookups with an explicit "absent" outcome.
//!  - Saves run as a named-step pipeline (validate, resolve category, default
//!    the timestamp, stage the photo, persist, transfer the photo).
//!  - Existence-checked deletes.
//!
//! Stores and the photo file store are traits; [`MemoryCatalogStore`] and
//! [`LocalFileStore`] are bundled implementations.

pub mod catalog;
pub mod error;
pub mod files;
pub mod model;
pub mod navigation;
pub mod pipeline;
pub mod service;
pub mod store;

// --- Re-exports for the Public API ---

pub use crate::catalog::{
  log_observer, validate_candidate, BatchStream, CatalogDeps, CatalogReader, CatalogStream, ChunkedStreamer, Observer,
  ProductDeleter, ProductFinder, ProductMutator,
};
pub use crate::error::{CatalogError, CatalogResult, FieldError, PipelineError, ValidationErrors};
pub use crate::files::{ByteSource, FileStore, LocalFileStore, UploadDir, UploadedFile};
pub use crate::model::{Category, Product};
pub use crate::navigation::{Navigation, Redirect};
pub use crate::pipeline::{ContextData, Pipeline, PipelineControl, PipelineResult};
pub use crate::service::CatalogService;
pub use crate::store::{CategoryStore, MemoryCatalogStore, ProductStore, StoreError};

/*
    Typical wiring:
    1. Build the collaborators: a ProductStore + CategoryStore (one
       MemoryCatalogStore can be both), a FileStore and the UploadDir.
    2. `CatalogService::new(products, categories, files, upload_dir)`.
    3. Listings: `list_all()`, `list_paced(delay, batch)`, `list_repeating()`;
       consume with `StreamExt::next` and drop the stream to stop early.
    4. Mutations: `submit(candidate, category_id, upload)`, `remove(id)`, or the
       `navigation` variants when a redirect/flash outcome is wanted.
*/
