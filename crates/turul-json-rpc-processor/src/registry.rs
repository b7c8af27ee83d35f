//! In-Memory Session Registry
//!
//! Stores session handles in memory using `Arc<RwLock<>>`. Suitable for:
//! - Single-process servers
//! - Tests with fake handles
//!
//! An optional factory creates handles for unknown session ids on first use.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::SessionError;
use crate::session::{SessionHandle, SessionRegistry};

/// Builds a handle for a session id seen for the first time
pub type SessionFactory = Arc<dyn Fn(&str) -> Arc<dyn SessionHandle> + Send + Sync>;

/// Configuration for the in-memory registry
#[derive(Debug, Clone)]
pub struct RegistryConfig {
    /// Session used when a call names none
    pub default_session_id: String,
    /// Maximum sessions to keep (for memory management)
    pub max_sessions: usize,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            default_session_id: Uuid::now_v7().simple().to_string(),
            max_sessions: 100_000,
        }
    }
}

/// In-memory session registry
#[derive(Clone)]
pub struct InMemorySessionRegistry {
    sessions: Arc<RwLock<HashMap<String, Arc<dyn SessionHandle>>>>,
    factory: Option<SessionFactory>,
    config: RegistryConfig,
}

impl InMemorySessionRegistry {
    /// Create a registry with default configuration
    pub fn new() -> Self {
        Self::with_config(RegistryConfig::default())
    }

    /// Create a registry with custom configuration
    pub fn with_config(config: RegistryConfig) -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
            factory: None,
            config,
        }
    }

    /// Create handles on demand for unknown session ids
    pub fn with_factory<F>(mut self, factory: F) -> Self
    where
        F: Fn(&str) -> Arc<dyn SessionHandle> + Send + Sync + 'static,
    {
        self.factory = Some(Arc::new(factory));
        self
    }

    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    /// Register (or replace) the handle for a session
    pub async fn register<H>(&self, session_id: impl Into<String>, handle: H) -> Result<(), SessionError>
    where
        H: SessionHandle + 'static,
    {
        self.insert(session_id.into(), Arc::new(handle)).await
    }

    /// Register the handle for the default session
    pub async fn register_default<H>(&self, handle: H) -> Result<(), SessionError>
    where
        H: SessionHandle + 'static,
    {
        self.register(self.config.default_session_id.clone(), handle)
            .await
    }

    /// Remove a session, returning whether it existed
    pub async fn remove(&self, session_id: &str) -> bool {
        let removed = self.sessions.write().await.remove(session_id).is_some();
        if removed {
            info!("Removed session {}", session_id);
        }
        removed
    }

    pub async fn session_count(&self) -> usize {
        self.sessions.read().await.len()
    }

    async fn insert(&self, session_id: String, handle: Arc<dyn SessionHandle>) -> Result<(), SessionError> {
        let mut sessions = self.sessions.write().await;
        if !sessions.contains_key(&session_id) && sessions.len() >= self.config.max_sessions {
            return Err(SessionError::LimitReached(self.config.max_sessions));
        }
        debug!("Registered session {}", session_id);
        sessions.insert(session_id, handle);
        Ok(())
    }
}

impl Default for InMemorySessionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SessionRegistry for InMemorySessionRegistry {
    async fn resolve(&self, session_id: &str) -> Result<Arc<dyn SessionHandle>, SessionError> {
        if let Some(handle) = self.sessions.read().await.get(session_id) {
            return Ok(handle.clone());
        }

        let Some(factory) = &self.factory else {
            return Err(SessionError::NotFound(session_id.to_string()));
        };

        let mut sessions = self.sessions.write().await;
        // Another caller may have created it between the two locks
        if let Some(handle) = sessions.get(session_id) {
            return Ok(handle.clone());
        }
        if sessions.len() >= self.config.max_sessions {
            return Err(SessionError::LimitReached(self.config.max_sessions));
        }

        let handle = factory(session_id);
        sessions.insert(session_id.to_string(), handle.clone());
        debug!("Created session {} on first use", session_id);
        Ok(handle)
    }

    fn default_session_id(&self) -> String {
        self.config.default_session_id.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::JsonRpcRequest;
    use crate::response::JsonRpcResponse;
    use crate::session::SessionContext;

    struct NullHandle;

    #[async_trait]
    impl SessionHandle for NullHandle {
        async fn dispatch(
            &self,
            _request: &JsonRpcRequest,
            _session: &SessionContext,
        ) -> Option<JsonRpcResponse> {
            None
        }
    }

    #[tokio::test]
    async fn test_register_and_resolve() {
        let registry = InMemorySessionRegistry::new();
        registry.register("s1", NullHandle).await.unwrap();

        assert!(registry.resolve("s1").await.is_ok());
        assert_eq!(
            registry.resolve("s2").await.err(),
            Some(SessionError::NotFound("s2".to_string()))
        );
    }

    #[tokio::test]
    async fn test_default_session() {
        let registry = InMemorySessionRegistry::with_config(RegistryConfig {
            default_session_id: "main".to_string(),
            ..RegistryConfig::default()
        });
        registry.register_default(NullHandle).await.unwrap();

        assert_eq!(registry.default_session_id(), "main");
        assert!(registry.resolve("main").await.is_ok());
    }

    #[test]
    fn test_generated_default_session_ids_differ() {
        let a = RegistryConfig::default();
        let b = RegistryConfig::default();
        assert_eq!(a.default_session_id.len(), 32);
        assert_ne!(a.default_session_id, b.default_session_id);
    }

    #[tokio::test]
    async fn test_factory_creates_once() {
        let registry = InMemorySessionRegistry::new().with_factory(|_| -> Arc<dyn SessionHandle> { Arc::new(NullHandle) });

        let first = registry.resolve("fresh").await.unwrap();
        let second = registry.resolve("fresh").await.unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(registry.session_count().await, 1);
    }

    #[tokio::test]
    async fn test_session_limit() {
        let registry = InMemorySessionRegistry::with_config(RegistryConfig {
            max_sessions: 1,
            ..RegistryConfig::default()
        })
        .with_factory(|_| -> Arc<dyn SessionHandle> { Arc::new(NullHandle) });

        registry.resolve("a").await.unwrap();
        assert_eq!(
            registry.resolve("b").await.err(),
            Some(SessionError::LimitReached(1))
        );
        assert_eq!(
            registry.register("c", NullHandle).await,
            Err(SessionError::LimitReached(1))
        );
        // Replacing an existing session is always allowed
        assert!(registry.register("a", NullHandle).await.is_ok());
    }

    #[tokio::test]
    async fn test_remove() {
        let registry = InMemorySessionRegistry::new();
        registry.register("s1", NullHandle).await.unwrap();

        assert!(registry.remove("s1").await);
        assert!(!registry.remove("s1").await);
        assert_eq!(registry.session_count().await, 0);
    }
}
