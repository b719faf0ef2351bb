// core/src/registry.rs

//! A registry of flows keyed by the type of context they run on.

use crate::core::context::FlowContext;
use crate::core::control::Outcome;
use crate::error::FlowError;
use crate::pipeline::definition::Flow;

use async_trait::async_trait;
use parking_lot::RwLock;
use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::marker::PhantomData;
use std::sync::Arc;
use tracing::{event, Level};

#[async_trait]
trait ErasedFlow<E>: Send + Sync
where
  E: std::error::Error + Send + Sync + 'static,
{
  fn name(&self) -> &str;

  /// `ctx` must box a `FlowContext<T>` for the wrapped flow's `T`.
  async fn run_erased(&self, ctx: Box<dyn Any + Send>) -> Result<Outcome, E>;
}

struct FlowEntry<T, E>
where
  T: Send + Sync + 'static,
  E: std::error::Error + From<FlowError> + Send + Sync + 'static,
{
  flow: Flow<T, E>,
}

#[async_trait]
impl<T, E> ErasedFlow<E> for FlowEntry<T, E>
where
  T: Send + Sync + 'static,
  E: std::error::Error + From<FlowError> + Send + Sync + 'static,
{
  fn name(&self) -> &str {
    self.flow.name()
  }

  async fn run_erased(&self, ctx: Box<dyn Any + Send>) -> Result<Outcome, E> {
    let ctx = match ctx.downcast::<FlowContext<T>>() {
      Ok(ctx) => *ctx,
      Err(_) => {
        let expected = std::any::type_name::<FlowContext<T>>();
        event!(Level::ERROR, flow = %self.flow.name(), expected, "Context type mismatch.");
        return Err(E::from(FlowError::ContextMismatch {
          flow: self.flow.name().to_string(),
          expected,
        }));
      }
    };
    self.flow.run(ctx).await
  }
}

/// Holds at most one flow per context type.
pub struct FlowRegistry<E>
where
  E: std::error::Error + From<FlowError> + Send + Sync + 'static,
{
  flows: RwLock<HashMap<TypeId, Arc<dyn ErasedFlow<E>>>>,
  _err: PhantomData<E>,
}

impl<E> FlowRegistry<E>
where
  E: std::error::Error + From<FlowError> + Send + Sync + 'static,
{
  pub fn new() -> Self {
    Self {
      flows: RwLock::new(HashMap::new()),
      _err: PhantomData,
    }
  }

  /// Registers `flow` for its context type, replacing any earlier flow for
  /// the same type.
  pub fn register<T>(&self, flow: Flow<T, E>)
  where
    T: Send + Sync + 'static,
  {
    event!(Level::DEBUG, flow = %flow.name(), context = std::any::type_name::<T>(), "Registering flow.");
    let previous = self
      .flows
      .write()
      .insert(TypeId::of::<T>(), Arc::new(FlowEntry { flow }));
    if let Some(previous) = previous {
      event!(Level::WARN, replaced = %previous.name(), "Flow replaced for context type.");
    }
  }

  pub fn contains<T: Send + Sync + 'static>(&self) -> bool {
    self.flows.read().contains_key(&TypeId::of::<T>())
  }

  pub fn names(&self) -> Vec<String> {
    let mut names: Vec<String> = self.flows.read().values().map(|f| f.name().to_string()).collect();
    names.sort();
    names
  }

  /// Runs the flow registered for `T`. The caller keeps its own clone of
  /// `ctx` to read results back after the run.
  pub async fn run<T>(&self, ctx: FlowContext<T>) -> Result<Outcome, E>
  where
    T: Send + Sync + 'static,
  {
    let entry = self.flows.read().get(&TypeId::of::<T>()).cloned();
    let Some(entry) = entry else {
      let context = std::any::type_name::<T>();
      event!(Level::ERROR, context, "No flow registered.");
      return Err(E::from(FlowError::NotRegistered { context }));
    };
    entry.run_erased(Box::new(ctx)).await
  }
}

impl<E> Default for FlowRegistry<E>
where
  E: std::error::Error + From<FlowError> + Send + Sync + 'static,
{
  fn default() -> Self {
    Self::new()
  }
}
