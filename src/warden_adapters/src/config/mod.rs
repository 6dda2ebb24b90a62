pub mod constants;
pub mod settings;

pub use constants::*;
pub use settings::{
    BackendSettings, GateSection, GateSettings, RedisSettings, ServerSettings, SessionSettings,
    SettingsError, SinglePageSettings, StaticToken,
};
