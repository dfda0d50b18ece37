//! Handler failure taxonomy and the exception mapper.
//!
//! Handlers report domain failures as [`HandlerError`]; the dispatcher
//! runs them through [`map_handler_error`] to obtain a wire error object.
//! Only validation failures keep a distinct code (-32602); authentication,
//! authorization, not-found, and uncaught failures all collapse to the
//! generic -32000 with a fixed message — clients may depend on that
//! opacity, so the failure kind and detail ride in the `data` field only.

use serde_json::json;
use thiserror::Error;

use wirecall_protocol::RpcErrorObject;

/// Classified failure raised by a handler or the binder
#[derive(Debug, Error)]
pub enum HandlerError {
    #[error("validation failed: {0}")]
    Validation(String),

    #[error("authentication failed: {0}")]
    Authentication(String),

    #[error("authorization failed: {0}")]
    Authorization(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("{0}")]
    Uncaught(String),
}

impl HandlerError {
    /// Wrap an arbitrary error as an uncaught failure
    pub fn uncaught(err: impl std::fmt::Display) -> Self {
        HandlerError::Uncaught(err.to_string())
    }

    fn kind(&self) -> &'static str {
        match self {
            HandlerError::Validation(_) => "validation",
            HandlerError::Authentication(_) => "authentication",
            HandlerError::Authorization(_) => "authorization",
            HandlerError::NotFound(_) => "not-found",
            HandlerError::Uncaught(_) => "uncaught",
        }
    }

    fn detail(&self) -> &str {
        match self {
            HandlerError::Validation(d)
            | HandlerError::Authentication(d)
            | HandlerError::Authorization(d)
            | HandlerError::NotFound(d)
            | HandlerError::Uncaught(d) => d,
        }
    }
}

/// Pure mapping from a handler failure to a wire error object.
pub fn map_handler_error(err: &HandlerError) -> RpcErrorObject {
    match err {
        HandlerError::Validation(detail) => RpcErrorObject::invalid_params(detail),
        other => RpcErrorObject::server_error(Some(json!({
            "kind": other.kind(),
            "detail": other.detail(),
        }))),
    }
}
