use axum::Json;
use serde_json::{Value, json};
use warden_axum::CurrentPrincipal;
use warden_core::Principal;

pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

/// Echo the principal the gate resolved.
pub async fn whoami(CurrentPrincipal(principal): CurrentPrincipal) -> Json<Principal> {
    Json(principal)
}
