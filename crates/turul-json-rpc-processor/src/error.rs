use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use thiserror::Error;

use crate::error_codes;

/// Detail attached to a per-entry parse error
pub const PARSE_ERROR_DETAIL: &str = "Invalid JSON was received by the server. An error occurred on the server while parsing the JSON text.";
/// Detail attached when a request has no method
pub const MISSING_METHOD_DETAIL: &str = "Missing property 'method'";
/// Detail attached when a batch array has no entries
pub const EMPTY_BATCH_DETAIL: &str = "Batch of calls was empty.";

/// JSON-RPC error codes produced by the processor and its dispatchers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JsonRpcErrorCode {
    ParseError,
    InvalidRequest,
    /// An array envelope with zero entries
    EmptyBatch,
    MethodNotFound,
    InvalidParams,
    InternalError,
    ServerError(i64), // -32099 to -32000
}

impl JsonRpcErrorCode {
    pub fn code(&self) -> i64 {
        match self {
            JsonRpcErrorCode::ParseError => error_codes::PARSE_ERROR,
            JsonRpcErrorCode::InvalidRequest => error_codes::INVALID_REQUEST,
            JsonRpcErrorCode::EmptyBatch => error_codes::EMPTY_BATCH,
            JsonRpcErrorCode::MethodNotFound => error_codes::METHOD_NOT_FOUND,
            JsonRpcErrorCode::InvalidParams => error_codes::INVALID_PARAMS,
            JsonRpcErrorCode::InternalError => error_codes::INTERNAL_ERROR,
            JsonRpcErrorCode::ServerError(code) => *code,
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            JsonRpcErrorCode::ParseError => "Parse error",
            JsonRpcErrorCode::InvalidRequest | JsonRpcErrorCode::EmptyBatch => "Invalid Request",
            JsonRpcErrorCode::MethodNotFound => "Method not found",
            JsonRpcErrorCode::InvalidParams => "Invalid params",
            JsonRpcErrorCode::InternalError => "Internal error",
            JsonRpcErrorCode::ServerError(_) => "Server error",
        }
    }
}

impl fmt::Display for JsonRpcErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code(), self.message())
    }
}

/// JSON-RPC error object, the `error` member of a response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonRpcErrorObject {
    pub code: i64,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl JsonRpcErrorObject {
    pub fn new(code: JsonRpcErrorCode, message: Option<String>, data: Option<Value>) -> Self {
        Self {
            code: code.code(),
            message: message.unwrap_or_else(|| code.message().to_string()),
            data,
        }
    }

    /// `-32700` carrying a free-form detail string
    pub fn parse_error(detail: impl Into<String>) -> Self {
        Self::new(
            JsonRpcErrorCode::ParseError,
            None,
            Some(Value::String(detail.into())),
        )
    }

    /// `-32700` for a batch entry that is not a well-formed request
    pub fn malformed_entry() -> Self {
        Self::parse_error(PARSE_ERROR_DETAIL)
    }

    /// `-32600` for a request without a method
    pub fn missing_method() -> Self {
        Self::new(
            JsonRpcErrorCode::InvalidRequest,
            None,
            Some(Value::String(MISSING_METHOD_DETAIL.to_string())),
        )
    }

    /// `3200` for an array envelope with no entries
    pub fn empty_batch() -> Self {
        Self::new(
            JsonRpcErrorCode::EmptyBatch,
            None,
            Some(Value::String(EMPTY_BATCH_DETAIL.to_string())),
        )
    }

    pub fn method_not_found(method: &str) -> Self {
        Self::new(
            JsonRpcErrorCode::MethodNotFound,
            Some(format!("Method '{}' not found", method)),
            None,
        )
    }

    pub fn invalid_params(message: &str) -> Self {
        Self::new(
            JsonRpcErrorCode::InvalidParams,
            Some(message.to_string()),
            None,
        )
    }

    /// `-32603` with the failure description in `data`
    pub fn internal_error(detail: Option<String>) -> Self {
        Self::new(
            JsonRpcErrorCode::InternalError,
            None,
            detail.map(Value::String),
        )
    }

    pub fn server_error(code: i64, message: &str, data: Option<Value>) -> Self {
        assert!(
            (error_codes::SERVER_ERROR_START..=error_codes::SERVER_ERROR_END).contains(&code),
            "Server error code must be in range -32099 to -32000"
        );
        Self::new(
            JsonRpcErrorCode::ServerError(code),
            Some(message.to_string()),
            data,
        )
    }
}

impl fmt::Display for JsonRpcErrorObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "JSON-RPC Error {}: {}", self.code, self.message)
    }
}

impl std::error::Error for JsonRpcErrorObject {}

/// Failures reported by a session registry
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("Session not found: {0}")]
    NotFound(String),
    #[error("Maximum sessions limit reached: {0}")]
    LimitReached(usize),
    #[error("Session backend unavailable: {0}")]
    Unavailable(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(JsonRpcErrorCode::ParseError.code(), -32700);
        assert_eq!(JsonRpcErrorCode::InvalidRequest.code(), -32600);
        assert_eq!(JsonRpcErrorCode::EmptyBatch.code(), 3200);
        assert_eq!(JsonRpcErrorCode::MethodNotFound.code(), -32601);
    }

    #[test]
    fn test_empty_batch_shares_invalid_request_message() {
        assert_eq!(
            JsonRpcErrorCode::EmptyBatch.message(),
            JsonRpcErrorCode::InvalidRequest.message()
        );
    }

    #[test]
    fn test_missing_method_serialization() {
        let json = serde_json::to_string(&JsonRpcErrorObject::missing_method()).unwrap();
        assert_eq!(
            json,
            r#"{"code":-32600,"message":"Invalid Request","data":"Missing property 'method'"}"#
        );
    }

    #[test]
    fn test_data_omitted_when_absent() {
        let json = serde_json::to_string(&JsonRpcErrorObject::method_not_found("test")).unwrap();
        assert!(json.contains("Method 'test' not found"));
        assert!(!json.contains("data"));
    }

    #[test]
    #[should_panic(expected = "Server error code must be in range")]
    fn test_server_error_range_enforced() {
        let _ = JsonRpcErrorObject::server_error(-1, "nope", None);
    }
}
