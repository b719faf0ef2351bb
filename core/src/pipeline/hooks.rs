// core/src/pipeline/hooks.rs
use crate::core::context::FlowContext;
use crate::core::control::Control;
use crate::core::handler::{boxed, Handler};
use crate::error::FlowError;
use crate::pipeline::definition::Flow;
use std::collections::HashMap;
use std::future::Future;
use tracing::{event, Level};

/// The three handler slots of a step, run in declaration order.
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

impl<T, E> Flow<T, E>
where
  T: Send + Sync + 'static,
  E: std::error::Error + From<FlowError> + Send + Sync + 'static,
{
  pub(crate) fn slot(&self, phase: Phase) -> &HashMap<String, Vec<Handler<T, E>>> {
    match phase {
      Phase::Before => &self.before,
      Phase::On => &self.on,
      Phase::After => &self.after,
    }
  }

  fn slot_mut(&mut self, phase: Phase) -> &mut HashMap<String, Vec<Handler<T, E>>> {
    match phase {
      Phase::Before => &mut self.before,
      Phase::On => &mut self.on,
      Phase::After => &mut self.after,
    }
  }

  /// Attaches `handler_fn` to `step` in the given phase. Several handlers may
  /// share a slot; they run in the order they were added.
  pub fn hook<F, UserErr>(
    &mut self,
    phase: Phase,
    step: &str,
    handler_fn: impl Fn(FlowContext<T>) -> F + Send + Sync + 'static,
  ) -> Result<(), FlowError>
  where
    F: Future<Output = Result<Control, UserErr>> + Send + 'static,
    UserErr: Into<E> + Send + Sync + 'static,
  {
    self.ensure_step(step)?;
    event!(Level::TRACE, flow = %self.name, step, phase = phase.as_str(), "Handler attached.");
    self
      .slot_mut(phase)
      .entry(step.to_string())
      .or_default()
      .push(boxed(handler_fn));
    Ok(())
  }

  pub fn before<F, UserErr>(
    &mut self,
    step: &str,
    handler_fn: impl Fn(FlowContext<T>) -> F + Send + Sync + 'static,
  ) -> Result<(), FlowError>
  where
    F: Future<Output = Result<Control, UserErr>> + Send + 'static,
    UserErr: Into<E> + Send + Sync + 'static,
  {
    self.hook(Phase::Before, step, handler_fn)
  }

  pub fn on<F, UserErr>(
    &mut self,
    step: &str,
    handler_fn: impl Fn(FlowContext<T>) -> F + Send + Sync + 'static,
  ) -> Result<(), FlowError>
  where
    F: Future<Output = Result<Control, UserErr>> + Send + 'static,
    UserErr: Into<E> + Send + Sync + 'static,
  {
    self.hook(Phase::On, step, handler_fn)
  }

  pub fn after<F, UserErr>(
    &mut self,
    step: &str,
    handler_fn: impl Fn(FlowContext<T>) -> F + Send + Sync + 'static,
  ) -> Result<(), FlowError>
  where
    F: Future<Output = Result<Control, UserErr>> + Send + 'static,
    UserErr: Into<E> + Send + Sync + 'static,
  {
    self.hook(Phase::After, step, handler_fn)
  }

  pub(crate) fn has_handlers(&self, step: &str) -> bool {
    Phase::ALL
      .iter()
      .any(|phase| self.slot(*phase).get(step).map_or(false, |v| !v.is_empty()))
  }
}
