// storefront/src/pipeline/step.rs

use super::ContextData;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

/// Predicate over the run's context. When it returns `true` the step is skipped.
pub type SkipCondition<TData> = Arc<dyn Fn(ContextData<TData>) -> bool + Send + Sync + 'static>;

/// Boxed asynchronous step handler.
///
/// Takes a clone of the run's [`ContextData`] and resolves to the flow signal or
/// the pipeline's error type.
pub type Handler<TData, Err> = Box<
  dyn Fn(ContextData<TData>) -> Pin<Box<dyn Future<Output = Result<super::PipelineControl, Err>> + Send>>
    + Send
    + Sync,
>;

/// Name, optionality and skip rule of one pipeline step.
#[derive(Clone)]
pub struct StepDef<TData: 'static + Send + Sync> {
  pub name: String,
  pub optional: bool,
  pub skip_if: Option<SkipCondition<TData>>,
}

impl<TData: 'static + Send + Sync> std::fmt::Debug for StepDef<TData> {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("StepDef")
      .field("name", &self.name)
      .field("optional", &self.optional)
      .field("has_skip_condition", &self.skip_if.is_some())
      .finish()
  }
}

/// The three hook phases of a step, run in declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
  Before,
  On,
  After,
}

impl Phase {
  pub const ALL: [Phase; 3] = [Phase::Before, Phase::On, Phase::After];

  pub fn as_str(self) -> &'static str {
    match self {
      Phase::Before => "before",
      Phase::On => "on",
      Phase::After => "after",
    }
  }
}

/// Handlers registered for one step, grouped by phase.
pub(crate) struct StepHooks<TData: 'static + Send + Sync, Err> {
  pub(crate) before: Vec<Handler<TData, Err>>,
  pub(crate) on: Vec<Handler<TData, Err>>,
  pub(crate) after: Vec<Handler<TData, Err>>,
}

impl<TData: 'static + Send + Sync, Err> Default for StepHooks<TData, Err> {
  fn default() -> Self {
    Self {
      before: Vec::new(),
      on: Vec::new(),
      after: Vec::new(),
    }
  }
}

impl<TData: 'static + Send + Sync, Err> StepHooks<TData, Err> {
  pub(crate) fn phase(&self, phase: Phase) -> &[Handler<TData, Err>] {
    match phase {
      Phase::Before => &self.before,
      Phase::On => &self.on,
      Phase::After => &self.after,
    }
  }

  pub(crate) fn phase_mut(&mut self, phase: Phase) -> &mut Vec<Handler<TData, Err>> {
    match phase {
      Phase::Before => &mut self.before,
      Phase::On => &mut self.on,
      Phase::After => &mut self.after,
    }
  }

  pub(crate) fn is_empty(&self) -> bool {
    self.before.is_empty() && self.on.is_empty() && self.after.is_empty()
  }
}

/// Builds a [`SkipCondition`] from a predicate over the locked context.
///
/// The read guard is held only while `predicate` runs.
pub fn skip_when<TData, F>(predicate: F) -> Option<SkipCondition<TData>>
where
  TData: 'static + Send + Sync,
  F: Fn(&TData) -> bool + Send + Sync + 'static,
{
  let condition: SkipCondition<TData> = Arc::new(move |ctx: ContextData<TData>| predicate(&ctx.read()));
  Some(condition)
}
