use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use tracing::{debug, warn};

use crate::{
    error::JsonRpcErrorObject,
    request::JsonRpcRequest,
    response::JsonRpcResponse,
    session::{SessionContext, SessionHandle},
};

/// Trait for handling JSON-RPC method calls
#[async_trait]
pub trait JsonRpcHandler: Send + Sync {
    /// The error type returned by this handler
    type Error: ToJsonRpcError;

    /// Handle a JSON-RPC method call
    /// Returns domain errors only - dispatcher handles conversion to JSON-RPC errors
    async fn handle(
        &self,
        method: &str,
        params: Option<Value>,
        session: &SessionContext,
    ) -> Result<Value, Self::Error>;

    /// Handle a JSON-RPC notification (optional - default does nothing)
    async fn handle_notification(
        &self,
        method: &str,
        params: Option<Value>,
        session: &SessionContext,
    ) -> Result<(), Self::Error> {
        let _ = (method, params, session);
        Ok(())
    }

    /// List supported methods (optional - used for introspection)
    fn supported_methods(&self) -> Vec<String> {
        vec![]
    }
}

/// Trait for errors that can be converted to JSON-RPC error objects
pub trait ToJsonRpcError: std::error::Error + Send + Sync + 'static {
    /// Convert this error to a JSON-RPC error object
    fn to_error_object(&self) -> JsonRpcErrorObject;
}

impl ToJsonRpcError for JsonRpcErrorObject {
    fn to_error_object(&self) -> JsonRpcErrorObject {
        self.clone()
    }
}

/// Method table for one session.
///
/// Implements [`SessionHandle`] so it can be registered directly with a
/// session registry.
pub struct JsonRpcDispatcher<E>
where
    E: ToJsonRpcError,
{
    handlers: HashMap<String, Arc<dyn JsonRpcHandler<Error = E>>>,
    default_handler: Option<Arc<dyn JsonRpcHandler<Error = E>>>,
}

impl<E> JsonRpcDispatcher<E>
where
    E: ToJsonRpcError,
{
    pub fn new() -> Self {
        Self {
            handlers: HashMap::new(),
            default_handler: None,
        }
    }

    /// Register a handler for a specific method
    pub fn register_method<H>(&mut self, method: impl Into<String>, handler: H)
    where
        H: JsonRpcHandler<Error = E> + 'static,
    {
        self.handlers.insert(method.into(), Arc::new(handler));
    }

    /// Register a handler for every method it reports in `supported_methods`
    pub fn register_handler<H>(&mut self, handler: H)
    where
        H: JsonRpcHandler<Error = E> + 'static,
    {
        let handler: Arc<dyn JsonRpcHandler<Error = E>> = Arc::new(handler);
        for method in handler.supported_methods() {
            self.handlers.insert(method, handler.clone());
        }
    }

    /// Set a default handler for unregistered methods
    pub fn set_default_handler<H>(&mut self, handler: H)
    where
        H: JsonRpcHandler<Error = E> + 'static,
    {
        self.default_handler = Some(Arc::new(handler));
    }

    /// Get all registered methods
    pub fn registered_methods(&self) -> Vec<String> {
        self.handlers.keys().cloned().collect()
    }

    fn handler_for(&self, method: &str) -> Option<&Arc<dyn JsonRpcHandler<Error = E>>> {
        self.handlers.get(method).or(self.default_handler.as_ref())
    }

    /// Run a method call and build its response
    pub async fn handle_request(&self, method: &str, params: Option<Value>, session: &SessionContext) -> JsonRpcResponse {
        match self.handler_for(method) {
            Some(handler) => match handler.handle(method, params, session).await {
                Ok(result) => JsonRpcResponse::success(None, result),
                Err(domain_error) => JsonRpcResponse::error(None, domain_error.to_error_object()),
            },
            None => {
                debug!("Method not found: {}", method);
                JsonRpcResponse::error(None, JsonRpcErrorObject::method_not_found(method))
            }
        }
    }

    /// Run a notification; errors are logged, never answered
    pub async fn handle_notification(&self, method: &str, params: Option<Value>, session: &SessionContext) {
        let Some(handler) = self.handler_for(method) else {
            debug!("Ignoring notification for unknown method: {}", method);
            return;
        };

        if let Err(err) = handler.handle_notification(method, params, session).await {
            warn!(
                session_id = %session.session_id,
                method = %method,
                "Notification handler failed: {}",
                err
            );
        }
    }
}

impl<E> Default for JsonRpcDispatcher<E>
where
    E: ToJsonRpcError,
{
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<E> SessionHandle for JsonRpcDispatcher<E>
where
    E: ToJsonRpcError,
{
    async fn dispatch(
        &self,
        request: &JsonRpcRequest,
        session: &SessionContext,
    ) -> Option<JsonRpcResponse> {
        let method = request.method_name()?;

        if request.is_notification() {
            self.handle_notification(method, request.params.clone(), session)
                .await;
            return None;
        }

        Some(
            self.handle_request(method, request.params.clone(), session)
                .await,
        )
    }
}
