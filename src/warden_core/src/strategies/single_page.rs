use std::sync::Arc;

use async_trait::async_trait;

use super::{AuthPrimitives, Challenge, Grant};
use crate::{
    error::GateError,
    http_abstraction::{GateRequest, SessionCookie},
    ports::IdentityBackend,
    principal::Principal,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SinglePageOptions {
    /// Realm advertised in `WWW-Authenticate`.
    pub realm: String,
    /// Error message in the JSON body of a denial.
    pub message: String,
}

impl Default for SinglePageOptions {
    fn default() -> Self {
        Self {
            realm: "warden".to_string(),
            message: "unauthorized".to_string(),
        }
    }
}

/// Single-page strategy for API and AJAX callers.
///
/// Every request is checked against the back-end; nothing is remembered and
/// nothing redirects.
#[derive(Clone)]
pub struct SinglePageAuth {
    backend: Option<Arc<dyn IdentityBackend>>,
    options: SinglePageOptions,
}

impl SinglePageAuth {
    pub fn new(backend: Option<Arc<dyn IdentityBackend>>, options: SinglePageOptions) -> Self {
        if backend.is_none() {
            tracing::warn!("single page mode without an identity back-end denies every request");
        }
        Self { backend, options }
    }
}

#[async_trait]
impl AuthPrimitives for SinglePageAuth {
    async fn authenticated(&self, request: &dyn GateRequest) -> Result<Option<Grant>, GateError> {
        let Some(backend) = &self.backend else {
            return Ok(None);
        };

        Ok(backend.authenticate(request).await?.map(Grant::new))
    }

    async fn pass(&self, _request: &dyn GateRequest) -> Challenge {
        Challenge::unauthorized(self.options.realm.clone(), self.options.message.clone())
    }

    async fn set_user(
        &self,
        _request: &dyn GateRequest,
        _principal: &Principal,
    ) -> Result<Option<SessionCookie>, GateError> {
        Ok(None)
    }
}
