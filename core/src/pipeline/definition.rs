// core/src/pipeline/definition.rs
use crate::core::handler::Handler;
use crate::core::step::Step;
use crate::error::FlowError;
use std::collections::HashMap;

/// A named, ordered sequence of steps over a context of type `T`.
///
/// Handlers return `Result<Control, E>`. Framework failures such as a missing
/// handler are converted into `E`, hence the `From<FlowError>` bound.
pub struct Flow<T, E>
where
  T: Send + Sync + 'static,
  E: std::error::Error + From<FlowError> + Send + Sync + 'static,
{
  pub(crate) name: String,
  pub(crate) steps: Vec<Step<T>>,
  pub(crate) before: HashMap<String, Vec<Handler<T, E>>>,
  pub(crate) on: HashMap<String, Vec<Handler<T, E>>>,
  pub(crate) after: HashMap<String, Vec<Handler<T, E>>>,
}

impl<T, E> Flow<T, E>
where
  T: Send + Sync + 'static,
  E: std::error::Error + From<FlowError> + Send + Sync + 'static,
{
  pub fn new(name: impl Into<String>, steps: Vec<Step<T>>) -> Self {
    Self {
      name: name.into(),
      steps,
      before: HashMap::new(),
      on: HashMap::new(),
      after: HashMap::new(),
    }
  }

  pub fn name(&self) -> &str {
    &self.name
  }

  pub fn step_names(&self) -> Vec<&str> {
    self.steps.iter().map(|s| s.name.as_str()).collect()
  }

  fn position(&self, step: &str) -> Result<usize, FlowError> {
    self
      .steps
      .iter()
      .position(|s| s.name == step)
      .ok_or_else(|| FlowError::UnknownStep {
        flow: self.name.clone(),
        step: step.to_string(),
      })
  }

  pub(crate) fn ensure_step(&self, step: &str) -> Result<(), FlowError> {
    self.position(step).map(|_| ())
  }

  fn ensure_absent(&self, step: &str) -> Result<(), FlowError> {
    if self.steps.iter().any(|s| s.name == step) {
      return Err(FlowError::DuplicateStep {
        flow: self.name.clone(),
        step: step.to_string(),
      });
    }
    Ok(())
  }

  pub fn insert_before(&mut self, existing: &str, step: Step<T>) -> Result<(), FlowError> {
    let idx = self.position(existing)?;
    self.ensure_absent(&step.name)?;
    self.steps.insert(idx, step);
    Ok(())
  }

  pub fn insert_after(&mut self, existing: &str, step: Step<T>) -> Result<(), FlowError> {
    let idx = self.position(existing)?;
    self.ensure_absent(&step.name)?;
    self.steps.insert(idx + 1, step);
    Ok(())
  }

  /// Removes the step together with every handler attached to it.
  pub fn remove_step(&mut self, step: &str) -> Result<(), FlowError> {
    let idx = self.position(step)?;
    self.steps.remove(idx);
    self.before.remove(step);
    self.on.remove(step);
    self.after.remove(step);
    Ok(())
  }

  pub fn set_optional(&mut self, step: &str, optional: bool) -> Result<(), FlowError> {
    let idx = self.position(step)?;
    self.steps[idx].optional = optional;
    Ok(())
  }
}
