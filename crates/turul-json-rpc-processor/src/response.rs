use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::JsonRpcErrorObject;
use crate::types::RequestId;

/// A JSON-RPC response paired with one batch entry.
///
/// Absent members are omitted on the wire. Dispatchers fill `result` or
/// `error`; the processor owns `version` and `id`, which it copies from the
/// originating request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JsonRpcResponse {
    #[serde(rename = "jsonrpc", default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<RequestId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<JsonRpcErrorObject>,
}

impl JsonRpcResponse {
    /// Successful response
    pub fn success(id: Option<RequestId>, result: Value) -> Self {
        Self {
            id,
            result: Some(result),
            ..Self::default()
        }
    }

    /// Error response
    pub fn error(id: Option<RequestId>, error: JsonRpcErrorObject) -> Self {
        Self {
            id,
            error: Some(error),
            ..Self::default()
        }
    }

    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }

    /// Whether this response survives notification suppression
    pub fn is_emitted(&self) -> bool {
        self.id.is_some() || self.error.is_some()
    }

    /// Copy a dispatcher outcome onto this response.
    ///
    /// An outcome with neither member becomes `"result": null`.
    pub(crate) fn absorb(&mut self, outcome: JsonRpcResponse) {
        match outcome.error {
            Some(error) => {
                self.error = Some(error);
                self.result = None;
            }
            None => {
                self.result = Some(outcome.result.unwrap_or(Value::Null));
            }
        }
    }
}
