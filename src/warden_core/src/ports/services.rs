use async_trait::async_trait;
use secrecy::Secret;
use thiserror::Error;

use crate::{http_abstraction::GateRequest, principal::Principal};

#[derive(Debug, Error)]
pub enum BackendError {
    #[error("Transport error: {0}")]
    Transport(String),
    #[error("Unexpected status {0} from identity provider")]
    UnexpectedStatus(u16),
    #[error("Malformed response: {0}")]
    MalformedResponse(String),
    #[error("Unexpected error: {0}")]
    UnexpectedError(String),
}

/// The identity provider behind the gate.
///
/// Answers whether the credential presented on a request identifies a
/// principal. `Ok(None)` means the caller is not authenticated; `Err` means
/// the provider could not answer and is propagated to the host untouched.
#[async_trait]
pub trait IdentityBackend: Send + Sync {
    async fn authenticate(
        &self,
        request: &dyn GateRequest,
    ) -> Result<Option<Principal>, BackendError>;
}

/// Read a credential from `header`, dropping a `Bearer` or `token` scheme.
pub fn bearer_credential(request: &dyn GateRequest, header: &str) -> Option<Secret<String>> {
    let raw = request.header(header)?.trim();
    let credential = ["Bearer ", "bearer ", "token ", "Token "]
        .iter()
        .find_map(|scheme| raw.strip_prefix(scheme))
        .unwrap_or(raw)
        .trim();

    if credential.is_empty() {
        return None;
    }

    Some(Secret::new(credential.to_owned()))
}
