// core/src/core/step.rs
use super::FlowContext;
use std::sync::Arc;

/// Evaluated right before a step runs. Returning `true` skips the step.
pub type SkipIf<T> = Arc<dyn Fn(&FlowContext<T>) -> bool + Send + Sync + 'static>;

#[derive(Clone)]
pub struct Step<T: Send + Sync + 'static> {
  pub name: String,
  /// An optional step without handlers is passed over instead of failing the run.
  pub optional: bool,
  pub skip_if: Option<SkipIf<T>>,
}

impl<T: Send + Sync + 'static> Step<T> {
  pub fn required(name: impl Into<String>) -> Self {
    Self {
      name: name.into(),
      optional: false,
      skip_if: None,
    }
  }

  pub fn optional(name: impl Into<String>) -> Self {
    Self {
      name: name.into(),
      optional: true,
      skip_if: None,
    }
  }

  pub fn skip_if(mut self, condition: impl Fn(&FlowContext<T>) -> bool + Send + Sync + 'static) -> Self {
    self.skip_if = Some(Arc::new(condition));
    self
  }
}

impl<T: Send + Sync + 'static> std::fmt::Debug for Step<T> {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("Step")
      .field("name", &self.name)
      .field("optional", &self.optional)
      .field("has_skip_condition", &self.skip_if.is_some())
      .finish()
  }
}
