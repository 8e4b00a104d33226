// storefront/src/pipeline/mod.rs

//! A small asynchronous step-pipeline engine.
//!
//! The save and delete flows of the catalog are declared as named steps
//! (`resolve_category`, `persist_product`, ...) with `before`/`on`/`after`
//! handlers that share one [`ContextData`] per run.

pub mod context_data;
pub mod control;
pub mod definition;
pub mod execution;
pub mod hooks;
pub mod step;

pub use context_data::ContextData;
pub use control::{PipelineControl, PipelineResult};
pub use definition::Pipeline;
pub use step::{skip_when, Handler, Phase, SkipCondition, StepDef};
