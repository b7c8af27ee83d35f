//! Calculator JSON-RPC Example
//!
//! Registers an `add`/`subtract` handler for the default session and feeds a
//! few payloads through the processor: a single call, a mixed batch with a
//! malformed entry and a notification, and a notification-only batch.
//!
//! Run with `RUST_LOG=debug` to see the processing pipeline.

use async_trait::async_trait;
use serde_json::{Value, json};
use tracing_subscriber::EnvFilter;

use turul_json_rpc_processor::prelude::*;

/// Calculator handler that implements basic arithmetic operations
struct CalculatorHandler;

impl CalculatorHandler {
    fn operands(params: Option<Value>) -> Result<(f64, f64), JsonRpcErrorObject> {
        let params = params.ok_or_else(|| JsonRpcErrorObject::invalid_params("Missing parameters"))?;
        let a = params["a"]
            .as_f64()
            .ok_or_else(|| JsonRpcErrorObject::invalid_params("Parameter 'a' is required and must be a number"))?;
        let b = params["b"]
            .as_f64()
            .ok_or_else(|| JsonRpcErrorObject::invalid_params("Parameter 'b' is required and must be a number"))?;
        Ok((a, b))
    }
}

#[async_trait]
impl JsonRpcHandler for CalculatorHandler {
    type Error = JsonRpcErrorObject;

    async fn handle(
        &self,
        method: &str,
        params: Option<Value>,
        session: &SessionContext,
    ) -> Result<Value, Self::Error> {
        tracing::info!("Processing {} with session: {}", method, session.session_id);

        let (a, b) = Self::operands(params)?;
        match method {
            "add" => Ok(json!({"result": a + b})),
            "subtract" => Ok(json!({"result": a - b})),
            _ => Err(JsonRpcErrorObject::method_not_found(method)),
        }
    }

    async fn handle_notification(
        &self,
        method: &str,
        params: Option<Value>,
        _session: &SessionContext,
    ) -> Result<(), Self::Error> {
        tracing::info!("Notification {} with params {:?}", method, params);
        Ok(())
    }

    fn supported_methods(&self) -> Vec<String> {
        vec!["add".to_string(), "subtract".to_string(), "log".to_string()]
    }
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let mut dispatcher: JsonRpcDispatcher<JsonRpcErrorObject> = JsonRpcDispatcher::new();
    dispatcher.register_handler(CalculatorHandler);

    let registry = InMemorySessionRegistry::new();
    if let Err(err) = registry.register_default(dispatcher).await {
        eprintln!("Failed to register calculator session: {}", err);
        return;
    }
    let processor = JsonRpcProcessor::new(registry);

    let payloads = [
        r#"{"jsonrpc":"2.0","id":1,"method":"add","params":{"a":2,"b":3}}"#,
        r#"[
            {"jsonrpc":"2.0","id":2,"method":"subtract","params":{"a":10,"b":4}},
            42,
            {"jsonrpc":"2.0","method":"log","params":{"a":0,"b":0}},
            {"jsonrpc":"2.0","id":4,"method":"multiply","params":{"a":1,"b":1}},
            {"jsonrpc":"2.0","id":5}
        ]"#,
        r#"[{"jsonrpc":"2.0","method":"log"}]"#,
        "[]",
    ];

    for payload in payloads {
        let output = processor.process(None, payload, None).await;
        if output.is_empty() {
            println!("<no response>");
        } else {
            println!("{}", output);
        }
    }

    let completion = std::sync::Arc::new(JsonRpcCompletion::new(
        r#"{"jsonrpc":"2.0","id":"cb","method":"add","params":{"a":0.5,"b":0.25}}"#,
    ));
    let _ = processor.process_completion(None, completion.clone(), None);
    println!("{}", completion.wait().await);
}
