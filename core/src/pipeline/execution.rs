// core/src/pipeline/execution.rs
use crate::core::context::FlowContext;
use crate::core::control::{Control, Outcome};
use crate::error::FlowError;
use crate::pipeline::definition::Flow;
use crate::pipeline::hooks::Phase;
use tracing::{event, info_span, instrument, Instrument, Level};

impl<T, E> Flow<T, E>
where
  T: Send + Sync + 'static,
  E: std::error::Error + From<FlowError> + Send + Sync + 'static,
{
  /// Runs every step in order against `ctx`.
  ///
  /// A step whose skip condition holds is passed over, as is an optional step
  /// with no handlers. A required step without handlers fails the run with
  /// [`FlowError::HandlerMissing`]. The first handler error is returned as is
  /// and the first `Control::Stop` ends the run with [`Outcome::Stopped`].
  #[instrument(
    name = "Flow::run",
    skip_all,
    fields(flow = %self.name, steps = self.steps.len()),
    err(Display)
  )]
  pub async fn run(&self, ctx: FlowContext<T>) -> Result<Outcome, E> {
    event!(Level::DEBUG, "Flow starting.");

    for (index, step) in self.steps.iter().enumerate() {
      let span = info_span!("flow_step", step = %step.name, index, optional = step.optional);

      if let Some(condition) = &step.skip_if {
        if condition(&ctx) {
          event!(parent: &span, Level::INFO, "Step skipped by condition.");
          continue;
        }
      }

      if !self.has_handlers(&step.name) {
        if step.optional {
          event!(parent: &span, Level::DEBUG, "Optional step has no handlers, skipping.");
          continue;
        }
        event!(parent: &span, Level::ERROR, "Required step has no handlers.");
        return Err(E::from(FlowError::HandlerMissing {
          flow: self.name.clone(),
          step: step.name.clone(),
        }));
      }

      if let Some(outcome) = self.run_step(&step.name, &ctx).instrument(span).await? {
        return Ok(outcome);
      }
    }

    event!(Level::DEBUG, "Flow completed.");
    Ok(Outcome::Completed)
  }

  async fn run_step(&self, step: &str, ctx: &FlowContext<T>) -> Result<Option<Outcome>, E> {
    for phase in Phase::ALL {
      let Some(handlers) = self.slot(phase).get(step) else {
        continue;
      };
      for (handler_index, handler) in handlers.iter().enumerate() {
        match handler(ctx.clone()).await {
          Ok(Control::Continue) => {}
          Ok(Control::Stop) => {
            event!(Level::INFO, phase = phase.as_str(), handler_index, "Flow stopped by handler.");
            return Ok(Some(Outcome::Stopped));
          }
          Err(e) => {
            event!(Level::ERROR, phase = phase.as_str(), handler_index, error = %e, "Handler failed.");
            return Err(e);
          }
        }
      }
    }
    Ok(None)
  }
}
