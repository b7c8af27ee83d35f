//! Session collaborator seams.
//!
//! The processor never knows how methods are bound or where sessions live.
//! It resolves a [`SessionHandle`] through an injected [`SessionRegistry`]
//! for every call and only borrows it for the duration of that call.

use std::any::Any;
use std::sync::Arc;

use async_trait::async_trait;

use crate::error::{JsonRpcErrorObject, SessionError};
use crate::request::JsonRpcRequest;
use crate::response::JsonRpcResponse;

/// Opaque caller state threaded unchanged into dispatch (auth, connection info, ...)
pub type RpcContext = Arc<dyn Any + Send + Sync>;

/// Per-call context handed to the dispatch bridge
#[derive(Debug, Clone)]
pub struct SessionContext {
    /// Session the call was resolved against
    pub session_id: String,
    /// Caller-supplied context, if any
    pub context: Option<RpcContext>,
}

impl SessionContext {
    pub fn new(session_id: impl Into<String>, context: Option<RpcContext>) -> Self {
        Self {
            session_id: session_id.into(),
            context,
        }
    }

    /// Downcast the caller context to a concrete type
    pub fn context_as<T: Any + Send + Sync>(&self) -> Option<&T> {
        self.context.as_deref()?.downcast_ref::<T>()
    }
}

/// Capability that turns a validated request into a response
#[async_trait]
pub trait SessionHandle: Send + Sync {
    /// Dispatch one request.
    ///
    /// Returns `None` when no response must be produced (a handled
    /// notification, or a handler that declines to answer). Only `result`
    /// and `error` of the returned response are used.
    async fn dispatch(
        &self,
        request: &JsonRpcRequest,
        session: &SessionContext,
    ) -> Option<JsonRpcResponse>;

    /// Hook for protocol errors the processor synthesises.
    ///
    /// Receives the raw payload and the classified error; the default returns
    /// the error unchanged.
    fn classify_parse_failure(&self, payload: &str, error: JsonRpcErrorObject) -> JsonRpcErrorObject {
        let _ = payload;
        error
    }
}

/// Lookup of session handles by session id
#[async_trait]
pub trait SessionRegistry: Send + Sync {
    /// Resolve the handle for a session
    async fn resolve(&self, session_id: &str) -> Result<Arc<dyn SessionHandle>, SessionError>;

    /// Session used when the caller does not name one
    fn default_session_id(&self) -> String;
}
