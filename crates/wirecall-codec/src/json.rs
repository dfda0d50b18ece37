//! JSON-RPC 2.0 codec.
//!
//! The internal message model already matches the JSON-RPC wire shape, so
//! encode/decode degrade to strict serde_json round-trips. Malformed input
//! is an error; there is no coercion.

use serde_json::Value;

use crate::{Codec, CodecError};

/// Structural passthrough codec for JSON-RPC 2.0
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonRpcCodec;

impl JsonRpcCodec {
    pub fn new() -> Self {
        Self
    }

    fn decode(&self, bytes: &[u8]) -> Result<Value, CodecError> {
        let value = serde_json::from_slice(bytes)?;
        Ok(value)
    }

    fn encode(&self, value: &Value) -> Result<Vec<u8>, CodecError> {
        let bytes = serde_json::to_vec(value)?;
        Ok(bytes)
    }
}

impl Codec for JsonRpcCodec {
    fn content_type(&self) -> &'static str {
        "application/json"
    }

    fn encode_request(&self, value: &Value) -> Result<Vec<u8>, CodecError> {
        self.encode(value)
    }

    fn encode_response(&self, value: &Value) -> Result<Vec<u8>, CodecError> {
        self.encode(value)
    }

    fn decode_request(&self, bytes: &[u8]) -> Result<Value, CodecError> {
        self.decode(bytes)
    }

    fn decode_response(&self, bytes: &[u8]) -> Result<Value, CodecError> {
        self.decode(bytes)
    }
}
