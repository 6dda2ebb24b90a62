use std::sync::Arc;

use axum::{
    Router,
    extract::{Request, State},
    middleware::{self, Next},
    response::{IntoResponse, Response},
};
use warden_core::Gate;

use crate::{adapters::AxumRequest, error::GateRejection, response_builder};

/// Run every request through `gate` before it reaches the router's handlers.
pub fn protect<S>(router: Router<S>, gate: Arc<Gate>) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    router.layer(middleware::from_fn_with_state(gate, gate_middleware))
}

/// Middleware wrapping the downstream service in the gate.
///
/// Gate failures become a 500 response; challenges are returned as the
/// gate renders them.
pub async fn gate_middleware(
    State(gate): State<Arc<Gate>>,
    request: Request,
    next: Next,
) -> Response {
    let (parts, body) = request.into_parts();

    let result = gate
        .run(
            AxumRequest(parts),
            response_builder(),
            move |request: AxumRequest| async move {
                next.run(Request::from_parts(request.0, body)).await
            },
        )
        .await;

    match result {
        Ok(response) => response,
        Err(e) => GateRejection(e).into_response(),
    }
}
