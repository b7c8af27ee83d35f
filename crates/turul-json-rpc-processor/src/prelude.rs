//! # JSON-RPC Processor Prelude
//!
//! Convenient re-exports of the most commonly used types.
//!
//! ```rust
//! use turul_json_rpc_processor::prelude::*;
//! ```

pub use crate::dispatch::{JsonRpcDispatcher, JsonRpcHandler, ToJsonRpcError};
pub use crate::error::{JsonRpcErrorCode, JsonRpcErrorObject, SessionError};
pub use crate::processor::JsonRpcProcessor;
pub use crate::r#async::{JsonRpcCompletion, ProcessFuture};
pub use crate::registry::{InMemorySessionRegistry, RegistryConfig};
pub use crate::request::JsonRpcRequest;
pub use crate::response::JsonRpcResponse;
pub use crate::session::{RpcContext, SessionContext, SessionHandle, SessionRegistry};
pub use crate::types::RequestId;

// Standard error codes
pub use crate::error_codes::*;
