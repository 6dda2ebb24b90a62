use std::sync::Arc;

use axum::{
    Router,
    http::{HeaderName, HeaderValue, Method, request},
    routing::get,
};
use thiserror::Error;
use tokio::net::TcpListener;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};
use warden_adapters::{GateSettings, SettingsError};
use warden_axum::{WardenExtension, protect};
use warden_core::{ConfigurationError, Gate};

use crate::{
    routes,
    telemetry::{REQUEST_ID_HEADER, make_span_with_request_id, on_request, on_response},
};

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error(transparent)]
    Settings(#[from] SettingsError),
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),
}

/// Origins allowed to call the service with credentials.
#[derive(Debug, Clone, Default)]
pub struct AllowedOrigins(Vec<HeaderValue>);

impl AllowedOrigins {
    pub fn contains(&self, origin: &HeaderValue) -> bool {
        self.0.contains(origin)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<S: AsRef<str>> FromIterator<S> for AllowedOrigins {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .filter_map(|origin| HeaderValue::from_str(origin.as_ref()).ok())
                .collect(),
        )
    }
}

/// An application router with every request passing through the gate.
pub struct GatedService {
    router: Router,
}

impl GatedService {
    /// Protect `router` with an already configured gate.
    pub fn new(router: Router, gate: Arc<Gate>) -> Self {
        Self {
            router: protect(router, gate),
        }
    }

    /// The built-in routes: `/health` and `/whoami`.
    pub fn default_router() -> Router {
        Router::new()
            .route("/health", get(routes::health))
            .route("/whoami", get(routes::whoami))
    }

    /// Build the gate from settings and protect `router` with it.
    ///
    /// The service always carries a session store, so an unset mode
    /// defaults to session mode.
    pub fn from_settings(router: Router, settings: GateSettings) -> Result<Self, ServiceError> {
        let options = settings.into_options()?;
        let gate = WardenExtension::new(true).gate(options)?;

        Ok(Self::new(router, Arc::new(gate)))
    }

    fn with_trace_layer(mut self) -> Self {
        let request_id = HeaderName::from_static(REQUEST_ID_HEADER);

        self.router = self
            .router
            .layer(
                TraceLayer::new_for_http()
                    .make_span_with(make_span_with_request_id)
                    .on_request(on_request)
                    .on_response(on_response),
            )
            .layer(PropagateRequestIdLayer::new(request_id.clone()))
            .layer(SetRequestIdLayer::new(request_id, MakeRequestUuid));
        self
    }

    /// Convert the service into a router that can be mounted on another router.
    pub fn as_nested_router(mut self, allowed_origins: Option<AllowedOrigins>) -> Router {
        if let Some(allowed_origins) = allowed_origins.filter(|origins| !origins.is_empty()) {
            let cors = CorsLayer::new()
                .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
                .allow_credentials(true)
                .allow_origin(AllowOrigin::predicate(
                    move |origin: &HeaderValue, _request_parts: &request::Parts| {
                        allowed_origins.contains(origin)
                    },
                ));

            self.router = self.router.layer(cors);
        }
        self.with_trace_layer().router
    }

    pub async fn run_standalone(
        self,
        listener: TcpListener,
        allowed_origins: Option<AllowedOrigins>,
    ) -> Result<(), std::io::Error> {
        let router = self.as_nested_router(allowed_origins);

        tracing::info!("Gated service listening on {}", listener.local_addr()?);

        axum_server::Server::<std::net::SocketAddr>::from_listener(listener)
            .serve(router.into_make_service())
            .await
    }
}
