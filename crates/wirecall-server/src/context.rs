use serde_json::{Map, Value};

use wirecall_protocol::{RequestId, RequestParams};

/// Per-invocation view of the originating request.
///
/// Always injectable into a handler and excluded from parameter-name
/// resolution; it exists only for the duration of one dispatch.
#[derive(Debug, Clone, Default)]
pub struct RequestContext {
    /// Method name as it arrived on the wire
    pub method: String,
    /// Request id; `None` for notifications
    pub id: Option<RequestId>,
    /// The raw params payload, untouched by the binder
    pub params: Option<RequestParams>,
    /// Transport-supplied metadata (auth principal, peer address, ...)
    pub metadata: Map<String, Value>,
}

impl RequestContext {
    pub fn new(method: impl Into<String>, id: Option<RequestId>, params: Option<RequestParams>) -> Self {
        Self {
            method: method.into(),
            id,
            params,
            metadata: Map::new(),
        }
    }

    /// Minimal context for tests and direct invocations
    pub fn for_method(method: impl Into<String>) -> Self {
        Self::new(method, None, None)
    }

    pub fn is_notification(&self) -> bool {
        self.id.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_notification_context() {
        let ctx = RequestContext::for_method("ping");
        assert!(ctx.is_notification());
        assert_eq!(ctx.method, "ping");
    }

    #[test]
    fn test_request_context() {
        let ctx = RequestContext::new("ping", Some(RequestId::Number(3)), None);
        assert!(!ctx.is_notification());
        assert_eq!(ctx.id, Some(RequestId::Number(3)));
    }
}
