//! # wirecall message model
//!
//! The internal, wire-format-independent representation of RPC traffic.
//! Codecs translate between these types and their wire format; the
//! dispatcher only ever sees this model.
//!
//! ## Features
//! - JSON-RPC 2.0 shaped request/response/notification types
//! - Closed error-code taxonomy with stable wire messages
//! - Untagged unions so `result` and `error` are mutually exclusive

pub mod error;
pub mod request;
pub mod response;
pub mod types;

// Re-export main types
pub use error::{RpcError, RpcErrorCode, RpcErrorObject};
pub use request::{RequestItem, RequestParams, RpcNotification, RpcRequest};
pub use response::{RpcMessage, RpcResponse};
pub use types::{ProtocolVersion, RequestId};

/// Protocol version literal carried by every message
pub const PROTOCOL_VERSION: &str = "2.0";

/// Standard error codes (JSON-RPC numbering, reused for XML-RPC faults)
pub mod error_codes {
    pub const PARSE_ERROR: i64 = -32700;
    pub const INVALID_REQUEST: i64 = -32600;
    pub const METHOD_NOT_FOUND: i64 = -32601;
    pub const INVALID_PARAMS: i64 = -32602;
    pub const INTERNAL_ERROR: i64 = -32603;
    pub const SERVER_ERROR: i64 = -32000;
}
