use async_trait::async_trait;
use serde_json::Value;

use crate::binder::{BoundArgs, ParamSpec};
use crate::context::RequestContext;
use crate::error::HandlerError;

/// How a handler's return value reaches the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputMode {
    /// The returned Value is wrapped in a standard response envelope
    #[default]
    Enveloped,
    /// The returned Value is emitted as the item's output directly,
    /// bypassing response construction entirely
    Raw,
}

/// A named RPC method implementation.
///
/// Handlers declare their inputs up front as a [`ParamSpec`] list; the
/// binder resolves and validates arguments before `invoke` runs, so a
/// handler never re-parses the raw params payload unless it asked for it
/// via a raw-payload parameter. Domain failures come back as
/// [`HandlerError`] and are mapped onto the wire taxonomy by the
/// dispatcher — handlers never build wire error objects themselves.
#[async_trait]
pub trait RpcHandler: Send + Sync {
    /// Declared input descriptors, resolved by the binder
    fn params(&self) -> &[ParamSpec] {
        &[]
    }

    /// Whether results are enveloped in a response object (the default)
    /// or emitted raw
    fn output_mode(&self) -> OutputMode {
        OutputMode::Enveloped
    }

    /// Execute the method with bound arguments and the request context
    async fn invoke(&self, args: BoundArgs, ctx: RequestContext) -> Result<Value, HandlerError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::binder::{ParamKind, ValueShape};
    use serde_json::json;

    struct EchoHandler;

    #[async_trait]
    impl RpcHandler for EchoHandler {
        fn params(&self) -> &[ParamSpec] {
            const PARAMS: &[ParamSpec] = &[ParamSpec {
                name: "message",
                kind: ParamKind::Shaped(ValueShape::String),
                required: true,
            }];
            PARAMS
        }

        async fn invoke(
            &self,
            args: BoundArgs,
            _ctx: RequestContext,
        ) -> Result<Value, HandlerError> {
            let message = args
                .str_arg("message")
                .ok_or_else(|| HandlerError::Validation("message is required".to_string()))?;
            Ok(json!({ "echo": message }))
        }
    }

    #[tokio::test]
    async fn test_handler_defaults() {
        let handler = EchoHandler;
        assert_eq!(handler.output_mode(), OutputMode::Enveloped);
        assert_eq!(handler.params().len(), 1);
    }

    #[tokio::test]
    async fn test_handler_invoke() {
        let mut args = BoundArgs::new();
        args.insert("message", json!("hi"));

        let result = EchoHandler
            .invoke(args, RequestContext::for_method("echo"))
            .await
            .unwrap();
        assert_eq!(result, json!({"echo": "hi"}));
    }
}
