pub mod config;
pub mod identity;
pub mod persistence;

#[cfg(test)]
pub(crate) mod test_support;

pub use self::config::{GateSettings, SettingsError};
pub use identity::{RemoteBackendConfig, RemoteIdentityBackend, StaticTokenBackend};
pub use persistence::{HashMapSessionStore, RedisSessionStore};
