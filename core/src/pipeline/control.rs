// storefront/src/pipeline/control.rs

//! Flow signals returned by handlers and the overall outcome of a run.

/// Returned by a handler to let the run proceed or end it early.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineControl {
  Continue,
  /// Halt now; no further handler of this step or any later step runs.
  Stop,
}

/// Outcome of [`Pipeline::run`](crate::pipeline::Pipeline::run) when no handler failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineResult {
  Completed,
  Stopped,
}
