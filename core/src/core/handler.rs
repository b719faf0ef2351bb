// core/src/core/handler.rs
use crate::core::context::FlowContext;
use crate::core::control::Control;
use std::future::Future;
use std::pin::Pin;

/// A boxed async step handler.
///
/// Handlers receive their own clone of the flow context, take locks only in
/// short synchronous scopes, and report whether the flow should go on.
pub type Handler<T, E> =
  Box<dyn Fn(FlowContext<T>) -> Pin<Box<dyn Future<Output = Result<Control, E>> + Send>> + Send + Sync>;

pub(crate) fn boxed<T, E, F, UserErr>(
  handler_fn: impl Fn(FlowContext<T>) -> F + Send + Sync + 'static,
) -> Handler<T, E>
where
  T: Send + Sync + 'static,
  F: Future<Output = Result<Control, UserErr>> + Send + 'static,
  UserErr: Into<E> + 'static,
  E: 'static,
{
  Box::new(move |ctx| {
    let fut = handler_fn(ctx);
    Box::pin(async move { fut.await.map_err(Into::into) })
  })
}
