//! Authentication strategies.
//!
//! Every strategy is the same orchestration ([`Strategy::decide`]) over a
//! different triple of primitives ([`AuthPrimitives`]): the callback strategy
//! takes them from the embedding application, the session and single-page
//! strategies supply fixed implementations.

pub mod callback;
pub mod session;
pub mod single_page;

use std::{fmt, sync::Arc};

use async_trait::async_trait;

use crate::{
    error::GateError,
    http_abstraction::{GateRequest, ResponseBuilder, ResponseHelpers, SessionCookie},
    principal::Principal,
};

pub use callback::{BoxFuture, CallbackAuth, Callbacks};
pub use session::{SessionAuth, SessionOptions};
pub use single_page::{SinglePageAuth, SinglePageOptions};

/// Which strategy governs a gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StrategyKind {
    Session,
    SinglePage,
    Callback,
}

/// Outcome of a strategy decision. Denial is a normal outcome, not an error.
#[derive(Debug, Clone, PartialEq)]
pub enum Decision {
    Allow(Grant),
    Deny(Challenge),
}

/// An allowed request: who the caller is, and the session created for them
/// on this request, if any.
#[derive(Debug, Clone, PartialEq)]
pub struct Grant {
    pub principal: Principal,
    pub session_cookie: Option<SessionCookie>,
}

impl Grant {
    pub fn new(principal: Principal) -> Self {
        Self {
            principal,
            session_cookie: None,
        }
    }
}

/// What a denied caller receives.
#[derive(Debug, Clone, PartialEq)]
pub enum Challenge {
    /// Send the caller through a login flow.
    Redirect { location: String },
    /// Machine-readable denial for callers that cannot follow redirects.
    Unauthorized { realm: String, message: String },
    /// A response assembled by an application callback.
    Custom {
        status: u16,
        headers: Vec<(String, String)>,
        body: Option<serde_json::Value>,
    },
}

impl Challenge {
    pub fn redirect(location: impl Into<String>) -> Self {
        Self::Redirect {
            location: location.into(),
        }
    }

    pub fn unauthorized(realm: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Unauthorized {
            realm: realm.into(),
            message: message.into(),
        }
    }

    pub fn status(&self) -> u16 {
        match self {
            Self::Redirect { .. } => 303,
            Self::Unauthorized { .. } => 401,
            Self::Custom { status, .. } => *status,
        }
    }

    /// Render the challenge with the host framework's response builder.
    pub fn render<B: ResponseBuilder>(self, builder: B) -> B::Response {
        match self {
            Self::Redirect { location } => builder.redirect(&location),
            Self::Unauthorized { realm, message } => builder.unauthorized(&realm, &message),
            Self::Custom {
                status,
                headers,
                body,
            } => {
                let builder = headers
                    .iter()
                    .fold(builder.status(status), |builder, (name, value)| {
                        builder.header(name, value)
                    });
                match body {
                    Some(body) => builder.json_body(body).build(),
                    None => builder.build(),
                }
            }
        }
    }
}

/// The three decision primitives a strategy is made of.
#[async_trait]
pub trait AuthPrimitives: Send + Sync {
    /// Resolve the caller, or `None` when the request is not authenticated.
    async fn authenticated(&self, request: &dyn GateRequest) -> Result<Option<Grant>, GateError>;

    /// Produce the challenge for an unauthenticated request.
    async fn pass(&self, request: &dyn GateRequest) -> Challenge;

    /// Remember `principal` for the caller behind `request`.
    ///
    /// Returns the session cookie to hand to the client when a new session
    /// had to be created.
    async fn set_user(
        &self,
        request: &dyn GateRequest,
        principal: &Principal,
    ) -> Result<Option<SessionCookie>, GateError>;

    /// Answer a request before any decision is made, e.g. a logout path.
    async fn intercept(&self, _request: &dyn GateRequest) -> Result<Option<Challenge>, GateError> {
        Ok(None)
    }
}

/// A resolved strategy: a kind tag and the primitives it runs.
#[derive(Clone)]
pub struct Strategy {
    kind: StrategyKind,
    primitives: Arc<dyn AuthPrimitives>,
}

impl fmt::Debug for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Strategy").field("kind", &self.kind).finish()
    }
}

impl Strategy {
    pub fn new(kind: StrategyKind, primitives: impl AuthPrimitives + 'static) -> Self {
        Self {
            kind,
            primitives: Arc::new(primitives),
        }
    }

    pub fn kind(&self) -> StrategyKind {
        self.kind
    }

    /// Allow an authenticated request, otherwise challenge it exactly once.
    #[tracing::instrument(name = "Strategy::decide", skip_all, fields(kind = ?self.kind))]
    pub async fn decide(&self, request: &dyn GateRequest) -> Result<Decision, GateError> {
        match self.primitives.authenticated(request).await? {
            Some(grant) => {
                tracing::debug!(principal = grant.principal.id(), "request authenticated");
                Ok(Decision::Allow(grant))
            }
            None => {
                let challenge = self.primitives.pass(request).await;
                tracing::info!(status = challenge.status(), "request challenged");
                Ok(Decision::Deny(challenge))
            }
        }
    }

    pub async fn intercept(
        &self,
        request: &dyn GateRequest,
    ) -> Result<Option<Challenge>, GateError> {
        self.primitives.intercept(request).await
    }

    /// Record `principal` as the caller behind `request`.
    ///
    /// Used by host code that authenticates callers itself (a login route).
    pub async fn record_principal(
        &self,
        request: &dyn GateRequest,
        principal: &Principal,
    ) -> Result<Option<SessionCookie>, GateError> {
        self.primitives.set_user(request, principal).await
    }
}
