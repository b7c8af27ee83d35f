//! Off-thread execution of the processing pipeline.
//!
//! [`JsonRpcProcessor::process`] spawns the pipeline on the Tokio runtime and
//! returns a [`ProcessFuture`]. Transports built around completion signals
//! instead of futures use [`JsonRpcProcessor::process_completion`], which
//! writes the output into a shared [`JsonRpcCompletion`] and wakes waiters.
//!
//! Both require a running Tokio runtime.

use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, OnceLock};
use std::task::{Context, Poll};

use parking_lot::Mutex;
use tokio::sync::Notify;
use tokio::task::JoinHandle;
use tracing::{debug, error};

use crate::error::JsonRpcErrorObject;
use crate::processor::{JsonRpcProcessor, render};
use crate::response::JsonRpcResponse;
use crate::session::RpcContext;

/// Invoked once with the response text when a completion is fulfilled
pub type CompletionCallback = Box<dyn FnOnce(&str) + Send>;

/// Pending response text of a spawned processing call.
///
/// Resolves to the same text [`JsonRpcProcessor::process_inline`] would
/// return. If the worker is aborted or dies, it resolves to a single
/// Internal error response instead.
pub struct ProcessFuture {
    handle: JoinHandle<String>,
}

impl ProcessFuture {
    /// Cancel the worker. The future then resolves to an Internal error.
    pub fn abort(&self) {
        self.handle.abort();
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

impl Future for ProcessFuture {
    type Output = String;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        match Pin::new(&mut self.handle).poll(cx) {
            Poll::Ready(Ok(output)) => Poll::Ready(output),
            Poll::Ready(Err(join_error)) => {
                error!("JSON-RPC worker failed: {}", join_error);
                let response = JsonRpcResponse::error(
                    None,
                    JsonRpcErrorObject::internal_error(Some(join_error.to_string())),
                );
                Poll::Ready(render(&response))
            }
            Poll::Pending => Poll::Pending,
        }
    }
}

impl fmt::Debug for ProcessFuture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProcessFuture")
            .field("finished", &self.is_finished())
            .finish()
    }
}

/// Shared state for completion-signal callers.
///
/// Holds the raw request text; once processing finishes the response text is
/// stored, waiters are woken, and the optional callback runs.
pub struct JsonRpcCompletion {
    payload: String,
    result: OnceLock<String>,
    completed: Notify,
    callback: Mutex<Option<CompletionCallback>>,
}

impl JsonRpcCompletion {
    pub fn new(payload: impl Into<String>) -> Self {
        Self {
            payload: payload.into(),
            result: OnceLock::new(),
            completed: Notify::new(),
            callback: Mutex::new(None),
        }
    }

    /// Create a completion that invokes `callback` with the response text
    pub fn with_callback<F>(payload: impl Into<String>, callback: F) -> Self
    where
        F: FnOnce(&str) + Send + 'static,
    {
        let completion = Self::new(payload);
        *completion.callback.lock() = Some(Box::new(callback));
        completion
    }

    /// Raw request text
    pub fn payload(&self) -> &str {
        &self.payload
    }

    /// Response text, once completed
    pub fn result(&self) -> Option<&str> {
        self.result.get().map(String::as_str)
    }

    pub fn is_completed(&self) -> bool {
        self.result.get().is_some()
    }

    /// Wait until the response text is available
    pub async fn wait(&self) -> &str {
        loop {
            let notified = self.completed.notified();
            if let Some(result) = self.result() {
                return result;
            }
            notified.await;
        }
    }

    /// Store the response text and signal completion. Only the first call
    /// has any effect.
    pub(crate) fn complete(&self, output: String) {
        if self.result.set(output).is_err() {
            debug!("Ignoring repeated completion");
            return;
        }
        self.completed.notify_waiters();

        let callback = self.callback.lock().take();
        if let (Some(callback), Some(result)) = (callback, self.result()) {
            callback(result);
        }
    }
}

impl fmt::Debug for JsonRpcCompletion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JsonRpcCompletion")
            .field("payload", &self.payload)
            .field("result", &self.result.get())
            .finish()
    }
}

impl JsonRpcProcessor {
    /// Process a payload on a Tokio worker.
    ///
    /// `session_id` falls back to the registry's default session. `context`
    /// is handed unchanged to the session's dispatch.
    pub fn process(
        &self,
        session_id: Option<String>,
        payload: impl Into<String>,
        context: Option<RpcContext>,
    ) -> ProcessFuture {
        let processor = self.clone();
        let payload = payload.into();
        let handle = tokio::spawn(async move {
            processor
                .process_inline(session_id.as_deref(), &payload, context)
                .await
        });
        ProcessFuture { handle }
    }

    /// Process the payload held by `completion` and complete it in place.
    ///
    /// The returned handle can be ignored; completion is observable through
    /// [`JsonRpcCompletion::wait`], [`JsonRpcCompletion::is_completed`] or the
    /// registered callback.
    pub fn process_completion(
        &self,
        session_id: Option<String>,
        completion: Arc<JsonRpcCompletion>,
        context: Option<RpcContext>,
    ) -> JoinHandle<()> {
        let pending = self.process(session_id, completion.payload(), context);
        tokio::spawn(async move {
            let output = pending.await;
            completion.complete(output);
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};

    #[tokio::test]
    async fn test_completion_wakes_waiters() {
        let completion = Arc::new(JsonRpcCompletion::new("{}"));
        assert!(!completion.is_completed());

        let waiter = {
            let completion = completion.clone();
            tokio::spawn(async move { completion.wait().await.to_string() })
        };
        tokio::task::yield_now().await;

        completion.complete("done".to_string());
        assert_eq!(waiter.await.unwrap(), "done");
        assert_eq!(completion.result(), Some("done"));
    }

    #[tokio::test]
    async fn test_completion_is_write_once() {
        let called = Arc::new(AtomicBool::new(false));
        let flag = called.clone();
        let completion = JsonRpcCompletion::with_callback("{}", move |text| {
            assert_eq!(text, "first");
            flag.store(true, Ordering::SeqCst);
        });

        completion.complete("first".to_string());
        completion.complete("second".to_string());

        assert!(called.load(Ordering::SeqCst));
        assert_eq!(completion.wait().await, "first");
    }
}
