//! The per-request entry point.

use std::future::Future;

use crate::{
    error::{ConfigurationError, GateError},
    http_abstraction::{GateRequest, ResponseBuilder},
    options::GateOptions,
    registry,
    strategies::{Decision, Grant, Strategy, StrategyKind},
    whitelist::{self, Whitelist},
};

/// A configured gate: the whitelist and the one strategy resolved for it.
///
/// Built once at startup and shared between concurrently handled requests;
/// nothing in it changes after construction.
#[derive(Debug, Clone)]
pub struct Gate {
    whitelist: Option<Whitelist>,
    strategy: Strategy,
}

impl Gate {
    /// Resolve `options` into a gate, failing fast on invalid configuration.
    pub fn new(options: GateOptions) -> Result<Self, ConfigurationError> {
        let strategy = registry::resolve(&options)?;

        // Whitelisted requests never reach the strategy, logout included.
        if strategy.kind() == StrategyKind::Session {
            if let Some(logout_path) = options.session.logout_path.as_deref() {
                if whitelist::matches(options.whitelist.as_ref(), logout_path) {
                    return Err(ConfigurationError::WhitelistedLogoutPath(
                        logout_path.to_owned(),
                    ));
                }
            }
        }

        tracing::info!(kind = ?strategy.kind(), "gate configured");

        Ok(Self {
            whitelist: options.whitelist,
            strategy,
        })
    }

    pub fn strategy(&self) -> &Strategy {
        &self.strategy
    }

    pub fn is_whitelisted(&self, path: &str) -> bool {
        whitelist::matches(self.whitelist.as_ref(), path)
    }

    /// Run one request through the gate.
    ///
    /// Whitelisted paths go straight to `downstream`. Everything else is
    /// decided by the strategy: allowed requests reach `downstream` exactly
    /// once with the principal attached, denied requests receive the
    /// strategy's challenge and never reach `downstream`.
    ///
    /// Back-end and session store failures are returned as-is; the host
    /// decides how to report them.
    #[tracing::instrument(
        name = "Gate::run",
        skip_all,
        fields(method = %request.method(), path = %request.path())
    )]
    pub async fn run<R, B, F, Fut>(
        &self,
        mut request: R,
        builder: B,
        downstream: F,
    ) -> Result<B::Response, GateError>
    where
        R: GateRequest,
        B: ResponseBuilder,
        F: FnOnce(R) -> Fut,
        Fut: Future<Output = B::Response>,
    {
        if self.is_whitelisted(request.path()) {
            tracing::debug!("whitelisted path, bypassing strategy");
            return Ok(downstream(request).await);
        }

        if let Some(challenge) = self.strategy.intercept(&request).await? {
            return Ok(challenge.render(builder));
        }

        match self.strategy.decide(&request).await? {
            Decision::Allow(Grant {
                principal,
                session_cookie,
            }) => {
                request.set_principal(principal);
                let mut response = downstream(request).await;
                if let Some(cookie) = session_cookie {
                    B::append_session_cookie(&mut response, &cookie);
                }
                Ok(response)
            }
            Decision::Deny(challenge) => Ok(challenge.render(builder)),
        }
    }
}
