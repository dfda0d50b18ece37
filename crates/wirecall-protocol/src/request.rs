use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::types::{ProtocolVersion, RequestId};

/// Parameters carried by a request or notification
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum RequestParams {
    /// Positional parameters as an array
    Array(Vec<Value>),
    /// Named parameters as an ordered object
    Object(Map<String, Value>),
}

impl RequestParams {
    /// Get a parameter by name (for object params)
    pub fn get(&self, key: &str) -> Option<&Value> {
        match self {
            RequestParams::Object(map) => map.get(key),
            RequestParams::Array(_) => None,
        }
    }

    /// Get a parameter by index (for array params)
    pub fn get_index(&self, index: usize) -> Option<&Value> {
        match self {
            RequestParams::Array(vec) => vec.get(index),
            RequestParams::Object(_) => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            RequestParams::Object(map) => map.is_empty(),
            RequestParams::Array(vec) => vec.is_empty(),
        }
    }

    /// Convert to a `serde_json::Value` for encoding
    pub fn to_value(&self) -> Value {
        match self {
            RequestParams::Object(map) => Value::Object(map.clone()),
            RequestParams::Array(arr) => Value::Array(arr.clone()),
        }
    }

    /// Build params from an already-decoded Value. Anything other than an
    /// array or object is not a valid params payload.
    pub fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Array(arr) => Some(RequestParams::Array(arr)),
            Value::Object(map) => Some(RequestParams::Object(map)),
            _ => None,
        }
    }
}

impl From<Map<String, Value>> for RequestParams {
    fn from(map: Map<String, Value>) -> Self {
        RequestParams::Object(map)
    }
}

impl From<Vec<Value>> for RequestParams {
    fn from(vec: Vec<Value>) -> Self {
        RequestParams::Array(vec)
    }
}

/// An RPC request expecting a response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RpcRequest {
    #[serde(rename = "jsonrpc")]
    pub version: ProtocolVersion,
    pub id: RequestId,
    pub method: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub params: Option<RequestParams>,
}

impl RpcRequest {
    pub fn new(id: RequestId, method: impl Into<String>, params: Option<RequestParams>) -> Self {
        Self {
            version: ProtocolVersion::V2_0,
            id,
            method: method.into(),
            params,
        }
    }

    /// Create a new request with no parameters
    pub fn new_no_params(id: RequestId, method: impl Into<String>) -> Self {
        Self::new(id, method, None)
    }

    /// Create a new request with object parameters
    pub fn new_with_object_params(
        id: RequestId,
        method: impl Into<String>,
        params: Map<String, Value>,
    ) -> Self {
        Self::new(id, method, Some(RequestParams::Object(params)))
    }

    /// Create a new request with array parameters
    pub fn new_with_array_params(
        id: RequestId,
        method: impl Into<String>,
        params: Vec<Value>,
    ) -> Self {
        Self::new(id, method, Some(RequestParams::Array(params)))
    }

    /// Get a parameter by name (if params are an object)
    pub fn get_param(&self, name: &str) -> Option<&Value> {
        self.params.as_ref()?.get(name)
    }
}

/// An RPC notification: a request without an id. Executed, never answered.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RpcNotification {
    #[serde(rename = "jsonrpc")]
    pub version: ProtocolVersion,
    pub method: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub params: Option<RequestParams>,
}

impl RpcNotification {
    pub fn new(method: impl Into<String>, params: Option<RequestParams>) -> Self {
        Self {
            version: ProtocolVersion::V2_0,
            method: method.into(),
            params,
        }
    }
}

/// One decoded item of wire input, classified by the presence of `id`.
///
/// `Request` must come first: an untagged deserializer takes the first
/// matching variant, and every request also parses as a notification.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RequestItem {
    Request(RpcRequest),
    Notification(RpcNotification),
}

impl RequestItem {
    pub fn method(&self) -> &str {
        match self {
            RequestItem::Request(r) => &r.method,
            RequestItem::Notification(n) => &n.method,
        }
    }

    pub fn params(&self) -> Option<&RequestParams> {
        match self {
            RequestItem::Request(r) => r.params.as_ref(),
            RequestItem::Notification(n) => n.params.as_ref(),
        }
    }

    pub fn id(&self) -> Option<&RequestId> {
        match self {
            RequestItem::Request(r) => Some(&r.id),
            RequestItem::Notification(_) => None,
        }
    }

    pub fn is_notification(&self) -> bool {
        matches!(self, RequestItem::Notification(_))
    }
}
