//! # wirecall wire codecs
//!
//! Stateless bidirectional transforms between the internal message model
//! (a `serde_json::Value` shaped like the protocol crate's types) and a
//! concrete wire format. One implementation per format:
//!
//! - [`JsonRpcCodec`] — JSON-RPC 2.0, a direct structural passthrough
//! - [`XmlRpcCodec`] — XML-RPC, a recursive typed-value grammar
//!
//! Callers translate a decode failure into the Parse-error taxonomy entry
//! and an encode failure into Internal error; the underlying parser error
//! never crosses the wire.

pub mod json;
pub mod xml;

pub use json::JsonRpcCodec;
pub use xml::XmlRpcCodec;

use serde_json::Value;
use thiserror::Error;

/// Failure while transforming between the internal model and a wire format.
///
/// The direction (decode vs. encode) is known to the caller from which
/// trait method failed, so the variants only carry the cause.
#[derive(Debug, Error)]
pub enum CodecError {
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid UTF-8 in wire input: {0}")]
    Utf8(#[from] std::str::Utf8Error),

    #[error("malformed message: {0}")]
    Malformed(String),
}

impl CodecError {
    pub(crate) fn malformed(detail: impl Into<String>) -> Self {
        CodecError::Malformed(detail.into())
    }
}

/// Bidirectional transform between internal message Values and one wire
/// format. Implementations are stateless; a single instance may be shared
/// across concurrent dispatches.
pub trait Codec: Send + Sync {
    /// The content type this codec declares at the transport boundary
    fn content_type(&self) -> &'static str;

    /// Encode an internal request Value into wire bytes
    fn encode_request(&self, value: &Value) -> Result<Vec<u8>, CodecError>;

    /// Encode an internal response Value (single object or list) into wire bytes
    fn encode_response(&self, value: &Value) -> Result<Vec<u8>, CodecError>;

    /// Decode wire bytes into an internal request Value
    fn decode_request(&self, bytes: &[u8]) -> Result<Value, CodecError>;

    /// Decode wire bytes into an internal response Value
    fn decode_response(&self, bytes: &[u8]) -> Result<Value, CodecError>;
}
