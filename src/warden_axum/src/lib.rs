//! Axum integration for the warden gate.
//!
//! This crate provides Axum adapters for the framework-agnostic gate
//! defined in `warden_core`.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────┐
//! │  warden_core: Gate, HTTP trait defs      │
//! └──────────────┬───────────────────────────┘
//!                │
//!                ▼
//! ┌──────────────────────────────────────────┐
//! │  warden_axum: Axum implementations       │
//! │  - AxumRequest newtype wrapper           │
//! │  - AxumResponseBuilder                   │
//! │  - gate middleware and extractors        │
//! └──────────────────────────────────────────┘
//! ```
//!
//! # Usage
//!
//! ```ignore
//! use warden_axum::{CurrentPrincipal, WardenExtension};
//!
//! async fn repos(CurrentPrincipal(principal): CurrentPrincipal) -> String {
//!     principal.id().to_string()
//! }
//!
//! let router = Router::new().route("/repos", get(repos));
//! let app = WardenExtension::new(true).protect(router, options)?;
//! ```

pub mod adapters;
pub mod error;
pub mod extension;
pub mod extractors;
pub mod middleware;

// Re-export for convenience
pub use adapters::{AxumRequest, AxumResponseBuilder, response_builder};
pub use error::{GateRejection, PrincipalRejection};
pub use extension::WardenExtension;
pub use extractors::{CurrentPrincipal, MaybePrincipal};
pub use middleware::{gate_middleware, protect};
