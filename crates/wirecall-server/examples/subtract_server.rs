//! Subtract Service Example
//!
//! Demonstrates the full wire-to-wire path: one registry and dispatcher
//! serving the same method over JSON-RPC and XML-RPC, including batches,
//! notifications, and error mapping.

use async_trait::async_trait;
use serde_json::{Value, json};

use wirecall_server::prelude::*;

struct SubtractHandler;

#[async_trait]
impl RpcHandler for SubtractHandler {
    fn params(&self) -> &[ParamSpec] {
        const PARAMS: &[ParamSpec] = &[
            ParamSpec::required("minuend", ValueShape::Integer),
            ParamSpec::required("subtrahend", ValueShape::Integer),
        ];
        PARAMS
    }

    async fn invoke(&self, args: BoundArgs, ctx: RequestContext) -> Result<Value, HandlerError> {
        let minuend = args
            .i64_arg("minuend")
            .ok_or_else(|| HandlerError::Validation("minuend must be an integer".to_string()))?;
        let subtrahend = args.i64_arg("subtrahend").ok_or_else(|| {
            HandlerError::Validation("subtrahend must be an integer".to_string())
        })?;

        println!("  ({}: {} - {})", ctx.method, minuend, subtrahend);
        Ok(json!(minuend - subtrahend))
    }
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let mut registry = MethodRegistry::new();
    registry.register("subtract", SubtractHandler);
    let dispatcher = Dispatcher::new(registry);

    let json_codec = JsonRpcCodec::new();
    let json_bodies: Vec<&[u8]> = vec![
        br#"{"jsonrpc":"2.0","method":"subtract","params":{"minuend":42,"subtrahend":23},"id":1}"#,
        br#"{"jsonrpc":"2.0","method":"subtract","params":[42,23]}"#,
        br#"[{"jsonrpc":"2.0","method":"subtract","params":[10,3],"id":"a"},
             {"jsonrpc":"2.0","method":"multiply","params":[2,3],"id":"b"}]"#,
        br#"{"jsonrpc":"2.0","method":"subtract","params":{"minuend":"x"},"id":2}"#,
    ];

    println!("== JSON-RPC ({}) ==", json_codec.content_type());
    for body in json_bodies {
        println!("request:  {}", String::from_utf8_lossy(body));
        match dispatcher.dispatch_bytes(&json_codec, body).await {
            Ok(out) if out.is_empty() => println!("response: (notification, no bytes)\n"),
            Ok(out) => println!("response: {}\n", String::from_utf8_lossy(&out)),
            Err(err) => println!("codec failure: {}\n", err),
        }
    }

    let xml_codec = XmlRpcCodec::new();
    let xml_body: &[u8] = br#"<?xml version="1.0"?>
<methodCall>
  <methodName>subtract</methodName>
  <params>
    <param><value><struct>
      <member><name>minuend</name><value><i4>42</i4></value></member>
      <member><name>subtrahend</name><value><i4>23</i4></value></member>
    </struct></value></param>
  </params>
</methodCall>"#;

    println!("== XML-RPC ({}) ==", xml_codec.content_type());
    println!("request:  {}", String::from_utf8_lossy(xml_body));
    match dispatcher.dispatch_bytes(&xml_codec, xml_body).await {
        Ok(out) => println!("response: {}", String::from_utf8_lossy(&out)),
        Err(err) => println!("codec failure: {}", err),
    }
}
