pub mod gated_service;
pub mod routes;
pub mod telemetry;

pub use gated_service::{AllowedOrigins, GatedService, ServiceError};
