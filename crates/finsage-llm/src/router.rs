//! Backend router - selects and fronts the remote backend

use std::sync::Arc;

use crate::providers::*;
use crate::types::*;

/// The backend router selects one remote backend based on configuration
pub struct BackendRouter {
    backend: Arc<dyn ChatBackend>,
    kind: BackendKind,
}

impl BackendRouter {
    /// Create a router fronting a specific backend
    pub fn new(backend: Arc<dyn ChatBackend>) -> Self {
        let kind = backend.kind();
        Self { backend, kind }
    }

    /// Create a router from environment variables
    ///
    /// Reads `FINSAGE_BACKEND` to select the backend:
    /// - `granite` (default): hosted language-model inference endpoint
    /// - `watson`: dialogue-session assistant service
    pub fn from_env() -> Self {
        // Try to load .env file (ignore errors)
        let _ = dotenvy::dotenv();

        let backend_name =
            std::env::var("FINSAGE_BACKEND").unwrap_or_else(|_| "granite".to_string());

        let kind = BackendKind::from_str(&backend_name).unwrap_or(BackendKind::Granite);

        Self::from_kind(kind)
    }

    /// Create a router for a specific backend kind
    pub fn from_kind(kind: BackendKind) -> Self {
        let backend: Arc<dyn ChatBackend> = match kind {
            BackendKind::Granite => Arc::new(GraniteBackend::from_env()),
            BackendKind::Watson => Arc::new(WatsonBackend::from_env()),
        };

        Self { backend, kind }
    }

    /// Get the current backend
    pub fn backend(&self) -> &Arc<dyn ChatBackend> {
        &self.backend
    }

    /// Get the backend kind
    pub fn kind(&self) -> BackendKind {
        self.kind
    }

    /// Whether the selected backend has its credentials in place
    pub fn is_configured(&self) -> bool {
        self.backend.is_configured()
    }

    /// Answer a request using the selected backend
    pub async fn answer(&self, request: AnswerRequest) -> String {
        self.backend.answer(request).await
    }
}

impl Default for BackendRouter {
    fn default() -> Self {
        Self::from_env()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    struct EchoBackend;

    #[async_trait]
    impl ChatBackend for EchoBackend {
        fn name(&self) -> &'static str {
            "Echo"
        }

        fn kind(&self) -> BackendKind {
            BackendKind::Granite
        }

        fn is_configured(&self) -> bool {
            true
        }

        async fn answer(&self, request: AnswerRequest) -> String {
            request.prompt
        }
    }

    #[tokio::test]
    async fn test_router_forwards_to_backend() {
        let router = BackendRouter::new(Arc::new(EchoBackend));
        assert_eq!(router.kind(), BackendKind::Granite);
        assert!(router.is_configured());

        let reply = router.answer(AnswerRequest::new("echo me")).await;
        assert_eq!(reply, "echo me");
    }

    #[test]
    fn test_router_from_kind() {
        assert_eq!(
            BackendRouter::from_kind(BackendKind::Granite).kind(),
            BackendKind::Granite
        );
        assert_eq!(
            BackendRouter::from_kind(BackendKind::Watson).kind(),
            BackendKind::Watson
        );
    }
}
