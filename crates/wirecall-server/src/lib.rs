//! # wirecall dispatcher
//!
//! The request-processing engine: decodes wire input through a codec,
//! classifies single/batch/notification traffic, binds declared handler
//! parameters, invokes handlers from the method registry, maps failures
//! onto the closed error taxonomy, and re-encodes the aggregate in the
//! originating wire format.
//!
//! ## Features
//! - Per-item failure isolation inside batches
//! - Output order matches input request order
//! - Notifications execute but never answer
//! - Declared parameter descriptors instead of runtime introspection

pub mod binder;
pub mod context;
pub mod dispatch;
pub mod error;
pub mod handler;
pub mod prelude;
pub mod registry;

// Re-export main types
pub use binder::{BoundArgs, ParamKind, ParamSpec, ValueShape, bind_params};
pub use context::RequestContext;
pub use dispatch::{DispatchOutput, Dispatcher};
pub use error::{HandlerError, map_handler_error};
pub use handler::{OutputMode, RpcHandler};
pub use registry::MethodRegistry;
