use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::types::RequestId;

/// A JSON-RPC request as it appears inside a batch.
///
/// Every member is optional on the wire so that a structurally valid object
/// with a missing `method` can still be answered with its own `id`. A missing
/// (or `null`) `id` marks a notification.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JsonRpcRequest {
    /// Version tag, passed through to the response without interpretation
    #[serde(rename = "jsonrpc", default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<RequestId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub params: Option<Value>,
}

impl JsonRpcRequest {
    pub fn new(id: Option<RequestId>, method: impl Into<String>, params: Option<Value>) -> Self {
        Self {
            version: Some(crate::JSONRPC_VERSION.to_string()),
            id,
            method: Some(method.into()),
            params,
        }
    }

    /// Create a notification (no id)
    pub fn notification(method: impl Into<String>, params: Option<Value>) -> Self {
        Self::new(None, method, params)
    }

    /// Decode one batch entry, yielding `None` when the entry is not a
    /// well-formed request object.
    pub fn from_entry(entry: Value) -> Option<Self> {
        match serde_json::from_value(entry) {
            Ok(request) => Some(request),
            Err(err) => {
                debug!("Malformed batch entry: {}", err);
                None
            }
        }
    }

    pub fn is_notification(&self) -> bool {
        self.id.is_none()
    }

    /// Method name, `None` when absent or empty
    pub fn method_name(&self) -> Option<&str> {
        self.method.as_deref().filter(|m| !m.is_empty())
    }

    /// Get a parameter by name (if params are an object)
    pub fn get_param(&self, name: &str) -> Option<&Value> {
        self.params.as_ref()?.as_object()?.get(name)
    }

    /// Get a parameter by index (if params are an array)
    pub fn get_param_index(&self, index: usize) -> Option<&Value> {
        self.params.as_ref()?.as_array()?.get(index)
    }
}
