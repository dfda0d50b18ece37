//! The dispatch state machine.
//!
//! One top-level invocation runs: decode → classify → per-item processing
//! → aggregate → encode. Per-item failures are recovered at the item
//! boundary and become error responses; only the top-level decode/encode
//! steps short-circuit, and even those resolve to a single error response
//! rather than an unhandled fault.
//!
//! Batch items have no ordering dependency on each other, so they are
//! fanned out concurrently; `join_all` keeps the output in input order,
//! and one item's failure never touches a sibling.

use std::sync::Arc;

use futures::future::join_all;
use serde_json::{Value, json};
use tracing::{debug, error, warn};

use wirecall_codec::{Codec, CodecError};
use wirecall_protocol::{RequestId, RequestItem, RpcError, RpcMessage, error_codes};

use crate::binder::bind_params;
use crate::context::RequestContext;
use crate::error::map_handler_error;
use crate::handler::OutputMode;
use crate::registry::MethodRegistry;

/// Aggregated result of one dispatch, before wire encoding
#[derive(Debug, Clone, PartialEq)]
pub enum DispatchOutput {
    /// A lone notification: nothing goes on the wire
    Empty,
    /// Single request in, single response object out
    Single(Value),
    /// Batch in, list out — possibly empty when every item was a notification
    Batch(Vec<Value>),
}

/// Stateless request-processing engine over a read-only method registry
pub struct Dispatcher {
    registry: Arc<MethodRegistry>,
}

impl Dispatcher {
    pub fn new(registry: MethodRegistry) -> Self {
        Self {
            registry: Arc::new(registry),
        }
    }

    pub fn with_registry(registry: Arc<MethodRegistry>) -> Self {
        Self { registry }
    }

    /// Full wire-to-wire dispatch: decode through the codec, process, and
    /// re-encode in the originating format.
    ///
    /// A lone notification yields empty bytes. The only `Err` case is a
    /// codec that cannot encode even the fallback error response.
    pub async fn dispatch_bytes(
        &self,
        codec: &dyn Codec,
        bytes: &[u8],
    ) -> Result<Vec<u8>, CodecError> {
        let decoded = match codec.decode_request(bytes) {
            Ok(value) => value,
            Err(err) => {
                warn!("wire decode failed: {}", err);
                let parse_error = message_value(&RpcMessage::error(RpcError::parse_error()));
                return codec.encode_response(&parse_error);
            }
        };

        match self.dispatch_value(decoded).await {
            DispatchOutput::Empty => Ok(Vec::new()),
            DispatchOutput::Single(value) => self.encode(codec, &value),
            DispatchOutput::Batch(items) => self.encode(codec, &Value::Array(items)),
        }
    }

    fn encode(&self, codec: &dyn Codec, value: &Value) -> Result<Vec<u8>, CodecError> {
        match codec.encode_response(value) {
            Ok(bytes) => Ok(bytes),
            Err(err) => {
                error!("response encode failed: {}", err);
                let fallback = message_value(&RpcMessage::error(RpcError::internal_error(
                    None,
                    Some(json!("response could not be encoded")),
                )));
                codec.encode_response(&fallback)
            }
        }
    }

    /// Dispatch an already-decoded request Value. Transports that parse
    /// their own body reuse the state machine from here.
    pub async fn dispatch_value(&self, input: Value) -> DispatchOutput {
        match input {
            // Empty batch is itself an error, not an empty result
            Value::Array(items) if items.is_empty() => {
                warn!("rejecting empty batch");
                DispatchOutput::Single(message_value(&RpcMessage::error(
                    RpcError::invalid_request(None),
                )))
            }
            Value::Array(items) => {
                debug!("dispatching batch of {} items", items.len());
                let outputs = join_all(items.into_iter().map(|item| self.process_item(item))).await;
                DispatchOutput::Batch(outputs.into_iter().flatten().collect())
            }
            item @ Value::Object(_) => match self.process_item(item).await {
                Some(output) => DispatchOutput::Single(output),
                None => DispatchOutput::Empty,
            },
            _ => DispatchOutput::Single(message_value(&RpcMessage::error(
                RpcError::invalid_request(None),
            ))),
        }
    }

    /// Process one request or notification, isolated from its siblings.
    /// Returns `None` when the item contributes no output entry.
    async fn process_item(&self, raw: Value) -> Option<Value> {
        let salvaged_id = salvage_id(&raw);

        let item: RequestItem = match serde_json::from_value(raw) {
            Ok(item) => item,
            Err(err) => {
                warn!("structurally invalid request: {}", err);
                return Some(message_value(&RpcMessage::error(RpcError::invalid_request(
                    salvaged_id,
                ))));
            }
        };

        let method = item.method().to_string();
        let id = item.id().cloned();

        if method.is_empty() {
            // Structurally invalid, so the notification silence rule does
            // not apply: answer with whatever id the item carried, like the
            // deserialization-failure path above.
            warn!("request has an empty method name");
            return Some(message_value(&RpcMessage::error(RpcError::invalid_request(
                id,
            ))));
        }

        let Some(handler) = self.registry.lookup(&method) else {
            debug!(method = %method, "method not registered");
            let id = id?;
            return Some(message_value(&RpcMessage::error(RpcError::method_not_found(
                id, &method,
            ))));
        };

        let args = match bind_params(handler.params(), item.params()) {
            Ok(args) => args,
            Err(err) => {
                warn!(method = %method, "parameter binding failed: {}", err);
                let id = id?;
                return Some(message_value(&RpcMessage::error(RpcError::new(
                    Some(id),
                    map_handler_error(&err),
                ))));
            }
        };

        let ctx = RequestContext::new(&method, id.clone(), item.params().cloned());

        debug!(method = %method, "invoking handler");
        match handler.invoke(args, ctx).await {
            // Notifications execute with full side effects but never answer
            Ok(_) if id.is_none() => None,
            Ok(result) => match handler.output_mode() {
                OutputMode::Raw => Some(result),
                OutputMode::Enveloped => {
                    let id = id?;
                    Some(message_value(&RpcMessage::success(id, result)))
                }
            },
            Err(err) => {
                warn!(method = %method, "handler failed: {}", err);
                let id = id?;
                Some(message_value(&RpcMessage::error(RpcError::new(
                    Some(id),
                    map_handler_error(&err),
                ))))
            }
        }
    }
}

/// Serialize a message for aggregation. Serialization of the protocol
/// types cannot fail; the fallback keeps the path panic-free anyway.
fn message_value(message: &RpcMessage) -> Value {
    serde_json::to_value(message).unwrap_or_else(|_| {
        json!({
            "jsonrpc": "2.0",
            "id": null,
            "error": {
                "code": error_codes::INTERNAL_ERROR,
                "message": "Internal error",
            },
        })
    })
}

/// Pull a usable id out of a structurally invalid item so the error
/// response can still be correlated.
fn salvage_id(raw: &Value) -> Option<RequestId> {
    serde_json::from_value(raw.get("id")?.clone()).ok()
}
