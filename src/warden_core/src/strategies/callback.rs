use std::{fmt, future::Future, pin::Pin, sync::Arc};

use async_trait::async_trait;

use super::{AuthPrimitives, Challenge, Grant};
use crate::{
    error::{ConfigurationError, GateError},
    http_abstraction::{GateRequest, SessionCookie},
    ports::BackendError,
    principal::Principal,
};

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

pub type AuthenticatedFn = Arc<
    dyn for<'a> Fn(&'a dyn GateRequest) -> BoxFuture<'a, Result<Option<Principal>, BackendError>>
        + Send
        + Sync,
>;
pub type PassFn = Arc<dyn for<'a> Fn(&'a dyn GateRequest) -> BoxFuture<'a, Challenge> + Send + Sync>;
pub type SetUserFn = Arc<
    dyn for<'a> Fn(&'a dyn GateRequest, Principal) -> BoxFuture<'a, Result<(), BackendError>>
        + Send
        + Sync,
>;

/// Application-supplied decision primitives, possibly incomplete.
///
/// Completeness is checked once, when the gate is built.
#[derive(Clone, Default)]
pub struct Callbacks {
    pass: Option<PassFn>,
    set_user: Option<SetUserFn>,
    authenticated: Option<AuthenticatedFn>,
}

impl fmt::Debug for Callbacks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Callbacks")
            .field("pass", &self.pass.is_some())
            .field("set_user", &self.set_user.is_some())
            .field("authenticated", &self.authenticated.is_some())
            .finish()
    }
}

impl Callbacks {
    /// Challenge hook, called once for every unauthenticated request.
    pub fn with_pass<F>(mut self, pass: F) -> Self
    where
        F: for<'a> Fn(&'a dyn GateRequest) -> BoxFuture<'a, Challenge> + Send + Sync + 'static,
    {
        self.pass = Some(Arc::new(pass));
        self
    }

    /// Principal-recording hook, exposed through `Strategy::record_principal`.
    pub fn with_set_user<F>(mut self, set_user: F) -> Self
    where
        F: for<'a> Fn(&'a dyn GateRequest, Principal) -> BoxFuture<'a, Result<(), BackendError>>
            + Send
            + Sync
            + 'static,
    {
        self.set_user = Some(Arc::new(set_user));
        self
    }

    /// Authentication check; `Some` means the request is authenticated.
    pub fn with_authenticated<F>(mut self, authenticated: F) -> Self
    where
        F: for<'a> Fn(&'a dyn GateRequest) -> BoxFuture<'a, Result<Option<Principal>, BackendError>>
            + Send
            + Sync
            + 'static,
    {
        self.authenticated = Some(Arc::new(authenticated));
        self
    }

    pub fn is_complete(&self) -> bool {
        self.pass.is_some() && self.set_user.is_some() && self.authenticated.is_some()
    }
}

/// The callback strategy: every primitive is delegated to the application.
#[derive(Clone)]
pub struct CallbackAuth {
    pass: PassFn,
    set_user: SetUserFn,
    authenticated: AuthenticatedFn,
}

impl TryFrom<Callbacks> for CallbackAuth {
    type Error = ConfigurationError;

    fn try_from(callbacks: Callbacks) -> Result<Self, Self::Error> {
        Ok(Self {
            pass: callbacks
                .pass
                .ok_or(ConfigurationError::MissingCallback("pass"))?,
            set_user: callbacks
                .set_user
                .ok_or(ConfigurationError::MissingCallback("set_user"))?,
            authenticated: callbacks
                .authenticated
                .ok_or(ConfigurationError::MissingCallback("authenticated"))?,
        })
    }
}

#[async_trait]
impl AuthPrimitives for CallbackAuth {
    async fn authenticated(&self, request: &dyn GateRequest) -> Result<Option<Grant>, GateError> {
        let principal = (self.authenticated)(request).await?;
        Ok(principal.map(Grant::new))
    }

    async fn pass(&self, request: &dyn GateRequest) -> Challenge {
        (self.pass)(request).await
    }

    async fn set_user(
        &self,
        request: &dyn GateRequest,
        principal: &Principal,
    ) -> Result<Option<SessionCookie>, GateError> {
        (self.set_user)(request, principal.clone()).await?;
        Ok(None)
    }
}
