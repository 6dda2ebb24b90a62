use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;
use warden_core::{GateError, ResponseHelpers};

use crate::adapters::response_builder;

/// A gate failure surfaced to the client as a 500.
///
/// The cause is logged, never sent.
#[derive(Debug, Error)]
#[error(transparent)]
pub struct GateRejection(#[from] pub GateError);

impl IntoResponse for GateRejection {
    fn into_response(self) -> Response {
        tracing::error!(error = %self.0, "gate could not decide request");

        response_builder().internal_error("internal server error")
    }
}

/// Rejection for handlers requiring a principal on an unprotected route.
#[derive(Debug, Error)]
#[error("no authenticated principal on request")]
pub struct PrincipalRejection;

impl IntoResponse for PrincipalRejection {
    fn into_response(self) -> Response {
        (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "error": "unauthorized" })),
        )
            .into_response()
    }
}
