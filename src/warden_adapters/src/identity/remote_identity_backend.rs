use std::time::Duration;

use async_trait::async_trait;
use reqwest::{
    Client, StatusCode,
    header::{ACCEPT, AUTHORIZATION},
};
use secrecy::ExposeSecret;
use serde::Deserialize;
use warden_core::{BackendError, GateRequest, IdentityBackend, Principal, bearer_credential};

#[derive(Debug, Clone)]
pub struct RemoteBackendConfig {
    /// Endpoint answering `GET` with the identity owning the token.
    pub verify_url: String,
    /// Request header the caller presents its token in.
    pub token_header: String,
    pub timeout: Duration,
}

/// Identity back-end delegating to a remote authentication service.
///
/// The caller's token is forwarded as `Authorization: token <token>`. A
/// success response carries the identity; 401 and 403 mean the token is not
/// valid. Anything else is an error for the host to handle, never retried here.
#[derive(Debug, Clone)]
pub struct RemoteIdentityBackend {
    http_client: Client,
    config: RemoteBackendConfig,
}

impl RemoteIdentityBackend {
    pub fn new(http_client: Client, config: RemoteBackendConfig) -> Self {
        Self {
            http_client,
            config,
        }
    }

    pub fn from_config(config: RemoteBackendConfig) -> Result<Self, BackendError> {
        let http_client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| BackendError::UnexpectedError(e.to_string()))?;

        Ok(Self::new(http_client, config))
    }
}

#[derive(Debug, Deserialize)]
struct VerifiedIdentity {
    id: serde_json::Value,
    #[serde(default)]
    login: Option<String>,
}

impl From<VerifiedIdentity> for Principal {
    fn from(identity: VerifiedIdentity) -> Self {
        let id = match identity.id {
            serde_json::Value::String(id) => id,
            other => other.to_string(),
        };

        match identity.login {
            Some(login) => Principal::new(id).with_login(login),
            None => Principal::new(id),
        }
    }
}

#[async_trait]
impl IdentityBackend for RemoteIdentityBackend {
    #[tracing::instrument(name = "RemoteIdentityBackend::authenticate", skip_all)]
    async fn authenticate(
        &self,
        request: &dyn GateRequest,
    ) -> Result<Option<Principal>, BackendError> {
        let Some(token) = bearer_credential(request, &self.config.token_header) else {
            tracing::debug!("no credential presented");
            return Ok(None);
        };

        let response = self
            .http_client
            .get(&self.config.verify_url)
            .header(AUTHORIZATION, format!("token {}", token.expose_secret()))
            .header(ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| BackendError::Transport(e.to_string()))?;

        match response.status() {
            status if status.is_success() => {
                let identity: VerifiedIdentity = response
                    .json()
                    .await
                    .map_err(|e| BackendError::MalformedResponse(e.to_string()))?;
                Ok(Some(identity.into()))
            }
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                tracing::debug!("credential rejected by identity provider");
                Ok(None)
            }
            status => Err(BackendError::UnexpectedStatus(status.as_u16())),
        }
    }
}
