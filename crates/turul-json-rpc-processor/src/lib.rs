//! # JSON-RPC 2.0 Batch Processor
//!
//! Turns a raw JSON-RPC payload into raw response text. A payload may be a
//! single request object or a batch array; each entry is classified and
//! dispatched in order to the handle of the caller's session, and the
//! responses are re-assembled following notification semantics.
//!
//! ## Features
//! - Envelope detection without a full parse
//! - Per-entry failure isolation inside a batch
//! - Notification suppression (no output for id-less requests)
//! - Pluggable sessions through [`SessionRegistry`] / [`SessionHandle`]
//! - Future-based and completion-signal invocation on Tokio workers
//!
//! ```rust,no_run
//! use turul_json_rpc_processor::prelude::*;
//!
//! # async fn run(processor: JsonRpcProcessor) {
//! let output = processor
//!     .process(None, r#"[{"jsonrpc":"2.0","id":1,"method":"ping"}]"#, None)
//!     .await;
//! println!("{}", output);
//! # }
//! ```

pub mod error;
pub mod types;
pub mod request;
pub mod response;
pub mod envelope;
pub mod session;
pub mod registry;
pub mod dispatch;
pub mod processor;
pub mod r#async;
pub mod prelude;

// Re-export main types
pub use envelope::Envelope;
pub use error::{JsonRpcErrorCode, JsonRpcErrorObject, SessionError};
pub use request::JsonRpcRequest;
pub use response::JsonRpcResponse;
pub use types::RequestId;
pub use session::{RpcContext, SessionContext, SessionHandle, SessionRegistry};
pub use registry::{InMemorySessionRegistry, RegistryConfig};
pub use dispatch::{JsonRpcDispatcher, JsonRpcHandler, ToJsonRpcError};
pub use processor::JsonRpcProcessor;
pub use r#async::{JsonRpcCompletion, ProcessFuture};

/// JSON-RPC 2.0 version constant
pub const JSONRPC_VERSION: &str = "2.0";

/// Error codes produced by the processor
pub mod error_codes {
    pub const PARSE_ERROR: i64 = -32700;
    pub const INVALID_REQUEST: i64 = -32600;
    pub const METHOD_NOT_FOUND: i64 = -32601;
    pub const INVALID_PARAMS: i64 = -32602;
    pub const INTERNAL_ERROR: i64 = -32603;

    /// Batch array present but empty
    pub const EMPTY_BATCH: i64 = 3200;

    // Server error range: -32099 to -32000
    pub const SERVER_ERROR_START: i64 = -32099;
    pub const SERVER_ERROR_END: i64 = -32000;
}
