// storefront/src/pipeline/definition.rs

//! `Pipeline<TData, Err>`: construction and structural edits.

use crate::error::PipelineError;
use crate::pipeline::step::{SkipCondition, StepDef, StepHooks};
use std::collections::HashMap;

/// An ordered list of named steps plus the handlers hooked onto them.
///
/// `TData` is the state shared by the handlers of one run (wrapped in
/// [`ContextData`](crate::pipeline::ContextData)); `Err` is what handlers fail
/// with. Engine-level failures such as a required step without handlers are
/// converted into `Err` through `From<PipelineError>`.
///
/// A pipeline is built once and then run any number of times, concurrently if
/// needed: runs never share state except through the context they are given.
pub struct Pipeline<TData, Err>
where
  TData: 'static + Send + Sync,
  Err: std::error::Error + From<PipelineError> + Send + Sync + 'static,
{
  pub(crate) name: String,
  pub(crate) steps: Vec<StepDef<TData>>,
  pub(crate) hooks: HashMap<String, StepHooks<TData, Err>>,
}

impl<TData, Err> Pipeline<TData, Err>
where
  TData: 'static + Send + Sync,
  Err: std::error::Error + From<PipelineError> + Send + Sync + 'static,
{
  /// Creates a pipeline from `(step name, optional, skip_if)` triples.
  pub fn new(name: impl Into<String>, step_defs: &[(&str, bool, Option<SkipCondition<TData>>)]) -> Self {
    let mut pipeline = Self {
      name: name.into(),
      steps: Vec::with_capacity(step_defs.len()),
      hooks: HashMap::new(),
    };
    for (step_name, optional, skip_if) in step_defs {
      pipeline.ensure_step_absent(step_name);
      pipeline.steps.push(StepDef {
        name: (*step_name).to_string(),
        optional: *optional,
        skip_if: skip_if.clone(),
      });
    }
    pipeline
  }

  pub fn name(&self) -> &str {
    &self.name
  }

  /// Step names in execution order.
  pub fn step_names(&self) -> Vec<&str> {
    self.steps.iter().map(|s| s.name.as_str()).collect()
  }

  fn position(&self, step_name: &str) -> Option<usize> {
    self.steps.iter().position(|s| s.name == step_name)
  }

  /// Panics when `step_name` is not declared. Misspelt step names are setup bugs.
  pub(crate) fn step_index(&self, step_name: &str) -> usize {
    match self.position(step_name) {
      Some(idx) => idx,
      None => panic!("pipeline '{}': step '{}' is not declared", self.name, step_name),
    }
  }

  fn ensure_step_absent(&self, step_name: &str) {
    if self.position(step_name).is_some() {
      panic!("pipeline '{}': step '{}' is declared twice", self.name, step_name);
    }
  }

  pub fn insert_before(
    &mut self,
    existing_step: &str,
    new_step: impl Into<String>,
    optional: bool,
    skip_if: Option<SkipCondition<TData>>,
  ) {
    let idx = self.step_index(existing_step);
    let name = new_step.into();
    self.ensure_step_absent(&name);
    self.steps.insert(idx, StepDef { name, optional, skip_if });
  }

  pub fn insert_after(
    &mut self,
    existing_step: &str,
    new_step: impl Into<String>,
    optional: bool,
    skip_if: Option<SkipCondition<TData>>,
  ) {
    let idx = self.step_index(existing_step);
    let name = new_step.into();
    self.ensure_step_absent(&name);
    self.steps.insert(idx + 1, StepDef { name, optional, skip_if });
  }

  /// Removes a step and all of its handlers. Unknown names are ignored.
  pub fn remove_step(&mut self, step_name: &str) {
    if let Some(idx) = self.position(step_name) {
      self.steps.remove(idx);
      self.hooks.remove(step_name);
    }
  }

  pub fn set_optional(&mut self, step_name: &str, optional: bool) {
    let idx = self.step_index(step_name);
    self.steps[idx].optional = optional;
  }

  pub fn set_skip_condition(&mut self, step_name: &str, skip_if: Option<SkipCondition<TData>>) {
    let idx = self.step_index(step_name);
    self.steps[idx].skip_if = skip_if;
  }
}
