use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

use crate::types::{ProtocolVersion, RequestId};

/// Closed error-code taxonomy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RpcErrorCode {
    ParseError,
    InvalidRequest,
    MethodNotFound,
    InvalidParams,
    InternalError,
    ServerError,
}

impl RpcErrorCode {
    pub fn code(&self) -> i64 {
        match self {
            RpcErrorCode::ParseError => crate::error_codes::PARSE_ERROR,
            RpcErrorCode::InvalidRequest => crate::error_codes::INVALID_REQUEST,
            RpcErrorCode::MethodNotFound => crate::error_codes::METHOD_NOT_FOUND,
            RpcErrorCode::InvalidParams => crate::error_codes::INVALID_PARAMS,
            RpcErrorCode::InternalError => crate::error_codes::INTERNAL_ERROR,
            RpcErrorCode::ServerError => crate::error_codes::SERVER_ERROR,
        }
    }

    /// Message strings are part of the stable wire contract; diagnostic
    /// detail belongs in the error object's `data` field.
    pub fn message(&self) -> &'static str {
        match self {
            RpcErrorCode::ParseError => "Parse error",
            RpcErrorCode::InvalidRequest => "Invalid Request",
            RpcErrorCode::MethodNotFound => "Method not found",
            RpcErrorCode::InvalidParams => "Invalid params",
            RpcErrorCode::InternalError => "Internal error",
            RpcErrorCode::ServerError => "Server error",
        }
    }
}

impl fmt::Display for RpcErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code(), self.message())
    }
}

/// Error object carried inside an error response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RpcErrorObject {
    pub code: i64,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl RpcErrorObject {
    pub fn new(code: RpcErrorCode, data: Option<Value>) -> Self {
        Self {
            code: code.code(),
            message: code.message().to_string(),
            data,
        }
    }

    pub fn parse_error(data: Option<Value>) -> Self {
        Self::new(RpcErrorCode::ParseError, data)
    }

    pub fn invalid_request(data: Option<Value>) -> Self {
        Self::new(RpcErrorCode::InvalidRequest, data)
    }

    pub fn method_not_found(method: &str) -> Self {
        Self::new(
            RpcErrorCode::MethodNotFound,
            Some(Value::String(format!("Method '{}' not found", method))),
        )
    }

    pub fn invalid_params(detail: &str) -> Self {
        Self::new(
            RpcErrorCode::InvalidParams,
            Some(Value::String(detail.to_string())),
        )
    }

    pub fn internal_error(data: Option<Value>) -> Self {
        Self::new(RpcErrorCode::InternalError, data)
    }

    pub fn server_error(data: Option<Value>) -> Self {
        Self::new(RpcErrorCode::ServerError, data)
    }
}

/// An RPC error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RpcError {
    #[serde(rename = "jsonrpc")]
    pub version: ProtocolVersion,
    pub id: Option<RequestId>,
    pub error: RpcErrorObject,
}

impl RpcError {
    pub fn new(id: Option<RequestId>, error: RpcErrorObject) -> Self {
        Self {
            version: ProtocolVersion::V2_0,
            id,
            error,
        }
    }

    pub fn parse_error() -> Self {
        Self::new(None, RpcErrorObject::parse_error(None))
    }

    pub fn invalid_request(id: Option<RequestId>) -> Self {
        Self::new(id, RpcErrorObject::invalid_request(None))
    }

    pub fn method_not_found(id: RequestId, method: &str) -> Self {
        Self::new(Some(id), RpcErrorObject::method_not_found(method))
    }

    pub fn invalid_params(id: RequestId, detail: &str) -> Self {
        Self::new(Some(id), RpcErrorObject::invalid_params(detail))
    }

    pub fn internal_error(id: Option<RequestId>, data: Option<Value>) -> Self {
        Self::new(id, RpcErrorObject::internal_error(data))
    }

    pub fn server_error(id: RequestId, data: Option<Value>) -> Self {
        Self::new(Some(id), RpcErrorObject::server_error(data))
    }
}

impl fmt::Display for RpcError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RPC Error {}: {}", self.error.code, self.error.message)
    }
}

impl std::error::Error for RpcError {}
