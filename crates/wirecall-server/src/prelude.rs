//! Convenient re-exports of the types most servers need.
//!
//! ```rust
//! use wirecall_server::prelude::*;
//! ```

pub use crate::binder::{BoundArgs, ParamKind, ParamSpec, ValueShape, bind_params};
pub use crate::context::RequestContext;
pub use crate::dispatch::{DispatchOutput, Dispatcher};
pub use crate::error::{HandlerError, map_handler_error};
pub use crate::handler::{OutputMode, RpcHandler};
pub use crate::registry::MethodRegistry;

pub use wirecall_codec::{Codec, CodecError, JsonRpcCodec, XmlRpcCodec};
pub use wirecall_protocol::{
    RequestId, RequestItem, RequestParams, RpcError, RpcErrorCode, RpcErrorObject, RpcMessage,
    RpcNotification, RpcRequest, RpcResponse, error_codes,
};
