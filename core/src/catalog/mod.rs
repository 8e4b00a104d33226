// storefront/src/catalog/mod.rs

//! Catalog reads (listings, lookups) and mutations (save, delete).

pub mod chunked;
pub mod contexts;
pub mod deleter;
pub mod finder;
pub mod mutator;
pub mod reader;

pub use chunked::{BatchStream, ChunkedStreamer};
pub use contexts::{CatalogDeps, DeleteProductCtxData, SaveProductCtxData};
pub use deleter::ProductDeleter;
pub use finder::ProductFinder;
pub use mutator::{validate_candidate, ProductMutator};
pub use reader::{log_observer, uppercase_name, CatalogReader, CatalogStream, Observer};
