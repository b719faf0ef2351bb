// core/src/lib.rs

//! olira-flow: named-step async pipelines for the Olira storefront.
//!
//! A [`Flow`] is an ordered list of named steps. Each step may carry
//! `before`, `on` and `after` handlers that operate on a shared
//! [`FlowContext`]. Handlers can stop the flow early by returning
//! [`Control::Stop`], and any handler error aborts the run.
//!
//! Flows are registered in a [`FlowRegistry`] keyed by their context type, so
//! callers only need to build a context value and hand it to the registry:
//!
//! ```ignore
//! let registry = FlowRegistry::<AppError>::new();
//! registry.register(checkout_flow());
//! let ctx = FlowContext::new(CheckoutCtx::new(form, cart));
//! registry.run(ctx.clone()).await?;
//! ```

pub mod core;
pub mod error;
pub mod pipeline;
pub mod registry;

pub use crate::core::context::FlowContext;
pub use crate::core::control::{Control, Outcome};
pub use crate::core::handler::Handler;
pub use crate::core::step::{SkipIf, Step};
pub use crate::error::{FlowError, FlowResult};
pub use crate::pipeline::{Flow, Phase};
pub use crate::registry::FlowRegistry;
