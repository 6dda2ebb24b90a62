//! # Warden - HTTP authentication gate
//!
//! This is a facade crate that re-exports all public APIs from the warden components.
//! Use this crate to get access to the gate, its adapters and the axum integration in one place.
//!
//! ## Usage
//!
//! Add to your `Cargo.toml`:
//! ```toml
//! [dependencies]
//! warden = { path = "../warden" }
//! ```
//!
//! ## Structure
//!
//! - **Core**: `Gate`, `GateOptions`, `Whitelist`, `Principal`, strategies and modes
//! - **Ports**: `SessionStore`, `IdentityBackend`
//! - **Adapters**: `HashMapSessionStore`, `RedisSessionStore`, `RemoteIdentityBackend`, settings
//! - **Axum**: middleware, extractors and `WardenExtension`
//! - **Service**: `GatedService` - a runnable gated router

// ============================================================================
// Core Domain Types
// ============================================================================

/// Core gate types
pub mod core {
    pub use warden_core::*;
}

// Re-export most commonly used core types at the root level
pub use warden_core::{
    Challenge, ConfigurationError, Decision, Gate, GateError, GateOptions, Grant, Mode, Principal,
    SessionOptions, SinglePageOptions, Strategy, StrategyKind, Whitelist, default_mode,
};

// ============================================================================
// Ports
// ============================================================================

/// Port trait definitions
pub mod ports {
    pub use warden_core::{
        BackendError, IdentityBackend, SessionStore, SessionStoreError, bearer_credential,
    };
}

pub use ports::{BackendError, IdentityBackend, SessionStore, SessionStoreError};

// ============================================================================
// Adapters (Infrastructure)
// ============================================================================

/// Infrastructure adapters
pub mod adapters {
    /// Session store implementations
    pub mod persistence {
        pub use warden_adapters::persistence::*;
    }

    /// Identity back-end implementations
    pub mod identity {
        pub use warden_adapters::identity::*;
    }

    /// Configuration
    pub mod config {
        pub use warden_adapters::config::*;
    }
}

pub use warden_adapters::{
    GateSettings, HashMapSessionStore, RedisSessionStore, RemoteBackendConfig,
    RemoteIdentityBackend, SettingsError, StaticTokenBackend,
};

// ============================================================================
// Axum integration
// ============================================================================

/// Axum middleware, extractors and adapters
pub mod axum_integration {
    pub use warden_axum::*;
}

pub use warden_axum::{CurrentPrincipal, MaybePrincipal, WardenExtension, protect};

// ============================================================================
// Gated Service (Main Entry Point)
// ============================================================================

pub use warden_service::{AllowedOrigins, GatedService};

// ============================================================================
// Re-export common external dependencies
// ============================================================================

/// Re-export async-trait for implementing port traits
pub use async_trait::async_trait;

/// Re-export secrecy for working with secrets
pub use secrecy::{ExposeSecret, Secret};

pub use http;
