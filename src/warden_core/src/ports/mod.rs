pub mod repositories;
pub mod services;

pub use repositories::{SessionStore, SessionStoreError};
pub use services::{BackendError, IdentityBackend, bearer_credential};
