pub mod error;
pub mod gate;
pub mod http_abstraction;
pub mod options;
pub mod ports;
pub mod principal;
pub mod registry;
pub mod strategies;
pub mod whitelist;

// Re-export commonly used types for convenience
pub use error::{ConfigurationError, GateError};
pub use gate::Gate;
pub use options::GateOptions;
pub use principal::Principal;
pub use registry::{Mode, default_mode, resolve};
pub use whitelist::Whitelist;

pub use ports::{
    repositories::{SessionStore, SessionStoreError},
    services::{BackendError, IdentityBackend, bearer_credential},
};

pub use strategies::{
    AuthPrimitives, BoxFuture, Callbacks, Challenge, Decision, Grant, SessionOptions,
    SinglePageOptions, Strategy, StrategyKind,
};

pub use http_abstraction::{GateRequest, ResponseBuilder, ResponseHelpers, SessionCookie};
