// core/src/error.rs
use anyhow::Error as AnyhowError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FlowError {
  #[error("step '{step}' is not defined in flow '{flow}'")]
  UnknownStep { flow: String, step: String },

  #[error("step '{step}' already exists in flow '{flow}'")]
  DuplicateStep { flow: String, step: String },

  #[error("required step '{step}' in flow '{flow}' has no handlers")]
  HandlerMissing { flow: String, step: String },

  #[error("no flow registered for context type {context}")]
  NotRegistered { context: &'static str },

  #[error("flow '{flow}' expected a context of type {expected}")]
  ContextMismatch { flow: String, expected: &'static str },

  #[error("step handler failed: {source}")]
  Handler {
    #[source]
    source: AnyhowError,
  },
}

impl From<AnyhowError> for FlowError {
  fn from(source: AnyhowError) -> Self {
    FlowError::Handler { source }
  }
}

pub type FlowResult<T, E = FlowError> = std::result::Result<T, E>;
