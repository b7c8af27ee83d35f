//! Batch processing pipeline.
//!
//! raw text → envelope detection → array parse → per-entry classification and
//! dispatch (in request order) → notification suppression → single object,
//! array, or no output.

use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures::FutureExt;
use serde_json::Value;
use tracing::{debug, error, warn};

use crate::envelope::Envelope;
use crate::error::JsonRpcErrorObject;
use crate::request::JsonRpcRequest;
use crate::response::JsonRpcResponse;
use crate::session::{RpcContext, SessionContext, SessionHandle, SessionRegistry};

/// Last-resort text used only if a synthesised error cannot be serialized
const FALLBACK_RESPONSE: &str = r#"{"error":{"code":-32603,"message":"Internal error"}}"#;

/// JSON-RPC request processor bound to a session registry.
///
/// Cloning is cheap; clones share the registry.
#[derive(Clone)]
pub struct JsonRpcProcessor {
    registry: Arc<dyn SessionRegistry>,
}

impl JsonRpcProcessor {
    pub fn new<R>(registry: R) -> Self
    where
        R: SessionRegistry + 'static,
    {
        Self::from_arc(Arc::new(registry))
    }

    /// Build from a registry that is shared with other owners
    pub fn from_arc(registry: Arc<dyn SessionRegistry>) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &Arc<dyn SessionRegistry> {
        &self.registry
    }

    /// Process a payload on the current task and return the response text.
    ///
    /// Never fails: every path yields serialized response text. The empty
    /// string means "no response" (only notifications were processed).
    pub async fn process_inline(
        &self,
        session_id: Option<&str>,
        payload: &str,
        context: Option<RpcContext>,
    ) -> String {
        let session_id = match session_id {
            Some(id) => id.to_string(),
            None => self.registry.default_session_id(),
        };

        let handle = match self.registry.resolve(&session_id).await {
            Ok(handle) => handle,
            Err(err) => {
                error!(session_id = %session_id, "Session resolution failed: {}", err);
                return render(&JsonRpcResponse::error(
                    None,
                    JsonRpcErrorObject::internal_error(Some(err.to_string())),
                ));
            }
        };

        let session = SessionContext::new(session_id, context);
        match process_payload(handle.as_ref(), &session, payload).await {
            Ok(output) => output,
            Err(err) => {
                warn!(session_id = %session.session_id, "Rejecting unparseable payload: {}", err);
                let error = handle.classify_parse_failure(
                    payload,
                    JsonRpcErrorObject::parse_error(err.to_string()),
                );
                render(&JsonRpcResponse::error(None, error))
            }
        }
    }
}

/// Everything inside the outer parse-error boundary
async fn process_payload(
    handle: &dyn SessionHandle,
    session: &SessionContext,
    payload: &str,
) -> Result<String, serde_json::Error> {
    let envelope = Envelope::detect(payload);
    debug!(envelope = ?envelope, "Classified JSON-RPC payload");

    let entries: Vec<Value> = serde_json::from_str(&envelope.normalize(payload))?;

    if entries.is_empty() {
        debug!("Received empty batch");
        let error = handle.classify_parse_failure(payload, JsonRpcErrorObject::empty_batch());
        return serde_json::to_string(&JsonRpcResponse::error(None, error));
    }

    let mut responses = Vec::with_capacity(entries.len());
    for entry in entries {
        let request = JsonRpcRequest::from_entry(entry);
        if let Some(response) = process_entry(handle, session, payload, request).await {
            responses.push(response);
        }
    }

    assemble(responses)
}

/// Classify and dispatch one batch entry.
///
/// `None` means the dispatcher asked for the response to be suppressed.
async fn process_entry(
    handle: &dyn SessionHandle,
    session: &SessionContext,
    payload: &str,
    request: Option<JsonRpcRequest>,
) -> Option<JsonRpcResponse> {
    let mut response = JsonRpcResponse::default();

    let Some(request) = request else {
        response.error = Some(handle.classify_parse_failure(payload, JsonRpcErrorObject::malformed_entry()));
        return Some(response);
    };

    response.version = request.version.clone();
    response.id = request.id.clone();

    let Some(method) = request.method_name() else {
        response.error = Some(handle.classify_parse_failure(payload, JsonRpcErrorObject::missing_method()));
        return Some(response);
    };

    debug!(session_id = %session.session_id, method = %method, "Dispatching request");
    match AssertUnwindSafe(handle.dispatch(&request, session))
        .catch_unwind()
        .await
    {
        Ok(Some(outcome)) => response.absorb(outcome),
        Ok(None) => {
            debug!(method = %method, "Dispatcher suppressed response");
            return None;
        }
        Err(panic) => {
            let detail = panic_message(panic.as_ref());
            error!(session_id = %session.session_id, method = %method, "Handler panicked: {}", detail);
            response.error = Some(JsonRpcErrorObject::internal_error(Some(detail)));
        }
    }

    Some(response)
}

/// Drop suppressed notifications and pick the output shape
fn assemble(responses: Vec<JsonRpcResponse>) -> Result<String, serde_json::Error> {
    let retained: Vec<JsonRpcResponse> = responses
        .into_iter()
        .filter(JsonRpcResponse::is_emitted)
        .collect();

    match retained.as_slice() {
        [] => Ok(String::new()),
        [single] => serde_json::to_string(single),
        batch => serde_json::to_string(batch),
    }
}

pub(crate) fn render(response: &JsonRpcResponse) -> String {
    serde_json::to_string(response).unwrap_or_else(|_| FALLBACK_RESPONSE.to_string())
}

fn panic_message(panic: &(dyn std::any::Any + Send)) -> String {
    if let Some(message) = panic.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message.clone()
    } else {
        "handler panicked".to_string()
    }
}
