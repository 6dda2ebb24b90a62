use std::sync::Arc;

use async_trait::async_trait;
use dashmap::DashMap;
use secrecy::ExposeSecret;
use warden_core::{BackendError, GateRequest, IdentityBackend, Principal, bearer_credential};

/// Identity back-end answering from a fixed table of tokens.
///
/// Suited to service-to-service tokens and tests; tokens can be added and
/// revoked at runtime through any clone of the backend.
#[derive(Debug, Clone)]
pub struct StaticTokenBackend {
    header: String,
    tokens: Arc<DashMap<String, Principal>>,
}

impl StaticTokenBackend {
    pub fn new(header: impl Into<String>) -> Self {
        Self {
            header: header.into(),
            tokens: Arc::new(DashMap::new()),
        }
    }

    pub fn with_token(self, token: impl Into<String>, principal: Principal) -> Self {
        self.tokens.insert(token.into(), principal);
        self
    }

    pub fn revoke(&self, token: &str) {
        self.tokens.remove(token);
    }
}

#[async_trait]
impl IdentityBackend for StaticTokenBackend {
    async fn authenticate(
        &self,
        request: &dyn GateRequest,
    ) -> Result<Option<Principal>, BackendError> {
        let Some(token) = bearer_credential(request, &self.header) else {
            return Ok(None);
        };

        Ok(self
            .tokens
            .get(token.expose_secret())
            .map(|entry| entry.value().clone()))
    }
}
