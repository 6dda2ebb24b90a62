pub mod remote_identity_backend;
pub mod static_token_backend;

pub use remote_identity_backend::{RemoteBackendConfig, RemoteIdentityBackend};
pub use static_token_backend::StaticTokenBackend;
