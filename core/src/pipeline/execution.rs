// storefront/src/pipeline/execution.rs

//! `Pipeline::run`.

use crate::error::PipelineError;
use crate::pipeline::context_data::ContextData;
use crate::pipeline::control::{PipelineControl, PipelineResult};
use crate::pipeline::definition::Pipeline;
use crate::pipeline::step::Phase;
use tracing::{event, Instrument, Level};

impl<TData, Err> Pipeline<TData, Err>
where
  TData: 'static + Send + Sync,
  Err: std::error::Error + From<PipelineError> + Send + Sync + 'static,
{
  /// Executes every step against `ctx_data`, strictly in declaration order.
  ///
  /// For each step: the skip condition is checked first, then the `before`,
  /// `on` and `after` handlers run one after another. The first handler error
  /// is returned as is and nothing after it runs. A handler returning
  /// [`PipelineControl::Stop`] ends the run with [`PipelineResult::Stopped`].
  pub async fn run(&self, ctx_data: ContextData<TData>) -> Result<PipelineResult, Err> {
    let run_span = tracing::info_span!("pipeline_run", pipeline = %self.name, num_steps = self.steps.len());
    self.run_steps(ctx_data).instrument(run_span).await
  }

  async fn run_steps(&self, ctx_data: ContextData<TData>) -> Result<PipelineResult, Err> {
    event!(Level::DEBUG, "Pipeline run starting.");

    for (step_idx, step_def) in self.steps.iter().enumerate() {
      let step_name = step_def.name.as_str();

      if let Some(skip_if) = &step_def.skip_if {
        if skip_if(ctx_data.clone()) {
          event!(Level::DEBUG, step = step_name, "Step skipped by its condition.");
          continue;
        }
      }

      let hooks = match self.hooks.get(step_name).filter(|h| !h.is_empty()) {
        Some(hooks) => hooks,
        None if step_def.optional => {
          event!(Level::DEBUG, step = step_name, "Optional step has no handlers, skipping.");
          continue;
        }
        None => {
          event!(Level::ERROR, step = step_name, "Required step has no handlers.");
          return Err(Err::from(PipelineError::HandlerMissing {
            pipeline: self.name.clone(),
            step_name: step_def.name.clone(),
          }));
        }
      };

      for phase in Phase::ALL {
        for (handler_idx, handler_fn) in hooks.phase(phase).iter().enumerate() {
          let handler_span = tracing::debug_span!(
            "step_handler",
            step = step_name,
            step_index = step_idx,
            phase = phase.as_str(),
            handler_index = handler_idx
          );
          match handler_fn(ctx_data.clone()).instrument(handler_span).await {
            Ok(PipelineControl::Continue) => {}
            Ok(PipelineControl::Stop) => {
              event!(Level::INFO, step = step_name, phase = phase.as_str(), "Pipeline stopped by handler.");
              return Ok(PipelineResult::Stopped);
            }
            Err(e) => {
              event!(Level::ERROR, step = step_name, phase = phase.as_str(), error = %e, "Handler failed.");
              return Err(e);
            }
          }
        }
      }
      event!(Level::TRACE, step = step_name, "Step finished.");
    }

    event!(Level::DEBUG, "Pipeline run completed.");
    Ok(PipelineResult::Completed)
  }
}
