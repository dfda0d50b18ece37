use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::RpcError;
use crate::types::{ProtocolVersion, RequestId};

/// A successful RPC response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RpcResponse {
    #[serde(rename = "jsonrpc")]
    pub version: ProtocolVersion,
    pub id: RequestId,
    pub result: Value,
}

impl RpcResponse {
    pub fn new(id: RequestId, result: Value) -> Self {
        Self {
            version: ProtocolVersion::V2_0,
            id,
            result,
        }
    }
}

/// Either a successful response or an error response. The untagged union
/// keeps `result` and `error` mutually exclusive by construction.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RpcMessage {
    /// Successful response with a result field
    Response(RpcResponse),
    /// Error response with an error field
    Error(RpcError),
}

impl RpcMessage {
    /// Create a success message
    pub fn success(id: RequestId, result: Value) -> Self {
        Self::Response(RpcResponse::new(id, result))
    }

    /// Create an error message
    pub fn error(error: RpcError) -> Self {
        Self::Error(error)
    }

    pub fn is_error(&self) -> bool {
        matches!(self, RpcMessage::Error(_))
    }

    /// Get the request ID from either side of the union
    pub fn id(&self) -> Option<&RequestId> {
        match self {
            RpcMessage::Response(resp) => Some(&resp.id),
            RpcMessage::Error(err) => err.id.as_ref(),
        }
    }
}

impl From<RpcResponse> for RpcMessage {
    fn from(response: RpcResponse) -> Self {
        Self::Response(response)
    }
}

impl From<RpcError> for RpcMessage {
    fn from(error: RpcError) -> Self {
        Self::Error(error)
    }
}
