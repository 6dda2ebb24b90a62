use std::{sync::Arc, time::Duration};

use ::config::{Config, Environment, File, FileFormat};
use secrecy::{ExposeSecret, Secret};
use serde::Deserialize;
use thiserror::Error;
use tokio::sync::RwLock;
use warden_core::{
    BackendError, ConfigurationError, GateOptions, Mode, Principal, SessionOptions,
    SinglePageOptions, Whitelist,
};

use super::constants::{self, env};
use crate::{
    identity::{RemoteBackendConfig, RemoteIdentityBackend, StaticTokenBackend},
    persistence::{HashMapSessionStore, RedisSessionStore},
};

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("Failed to load settings: {0}")]
    Load(#[from] ::config::ConfigError),
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),
    #[error("Failed to connect to redis: {0}")]
    Redis(#[from] redis::RedisError),
    #[error("Failed to build identity back-end: {0}")]
    Backend(#[from] BackendError),
}

/// Settings for a gate and the service hosting it.
///
/// Loaded from an optional JSON file (`warden.json`, or the path in
/// `WARDEN_CONFIG`) overlaid with `WARDEN_`-prefixed environment variables,
/// using `__` between nested keys, e.g. `WARDEN_GATE__MODE=single_page`.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct GateSettings {
    pub gate: GateSection,
    pub session: SessionSettings,
    pub single_page: SinglePageSettings,
    pub backend: BackendSettings,
    pub redis: Option<RedisSettings>,
    pub server: ServerSettings,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct GateSection {
    pub mode: Option<Mode>,
    /// Literal paths and `*` globs.
    pub whitelist: Vec<String>,
    /// Regular expressions, matched anywhere in the path.
    pub whitelist_regex: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SessionSettings {
    pub login_url: String,
    pub return_param: String,
    pub session_key: String,
    pub cookie_name: String,
    pub logout_path: Option<String>,
    pub after_logout_url: String,
    pub ttl_seconds: u64,
}

impl Default for SessionSettings {
    fn default() -> Self {
        let defaults = SessionOptions::default();
        Self {
            login_url: defaults.login_url,
            return_param: defaults.return_param,
            session_key: defaults.session_key,
            cookie_name: defaults.cookie_name,
            logout_path: defaults.logout_path,
            after_logout_url: defaults.after_logout_url,
            ttl_seconds: constants::DEFAULT_SESSION_TTL_SECONDS,
        }
    }
}

impl From<&SessionSettings> for SessionOptions {
    fn from(settings: &SessionSettings) -> Self {
        Self {
            login_url: settings.login_url.clone(),
            return_param: settings.return_param.clone(),
            session_key: settings.session_key.clone(),
            cookie_name: settings.cookie_name.clone(),
            logout_path: settings.logout_path.clone(),
            after_logout_url: settings.after_logout_url.clone(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SinglePageSettings {
    pub realm: String,
    pub message: String,
}

impl Default for SinglePageSettings {
    fn default() -> Self {
        let defaults = SinglePageOptions::default();
        Self {
            realm: defaults.realm,
            message: defaults.message,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct StaticToken {
    pub token: Secret<String>,
    pub id: String,
    #[serde(default)]
    pub login: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct BackendSettings {
    /// Remote identity endpoint; takes precedence over static tokens.
    pub verify_url: Option<String>,
    pub token_header: String,
    pub timeout_ms: u64,
    pub static_tokens: Vec<StaticToken>,
}

impl Default for BackendSettings {
    fn default() -> Self {
        Self {
            verify_url: None,
            token_header: constants::DEFAULT_TOKEN_HEADER.to_string(),
            timeout_ms: constants::prod::BACKEND_TIMEOUT.as_millis() as u64,
            static_tokens: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct RedisSettings {
    pub host_name: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    pub address: String,
    pub allowed_origins: Vec<String>,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            address: constants::prod::APP_ADDRESS.to_string(),
            allowed_origins: Vec::new(),
        }
    }
}

impl GateSettings {
    /// Load settings from the config file and the environment.
    pub fn load() -> Result<Self, SettingsError> {
        dotenvy::dotenv().ok();

        let file = std::env::var(env::CONFIG_FILE_ENV_VAR)
            .unwrap_or_else(|_| constants::DEFAULT_CONFIG_FILE.to_string());

        let settings = Config::builder()
            .add_source(File::with_name(&file).format(FileFormat::Json).required(false))
            .add_source(environment())
            .build()?
            .try_deserialize()?;

        Ok(settings)
    }

    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let settings = Config::builder()
            .add_source(File::from_str(json, FileFormat::Json))
            .build()?
            .try_deserialize()?;

        Ok(settings)
    }

    /// Compile the whitelist entries, `None` when there are none.
    pub fn whitelist(&self) -> Result<Option<Whitelist>, ConfigurationError> {
        let mut entries = self
            .gate
            .whitelist
            .iter()
            .map(|entry| Whitelist::parse(entry))
            .collect::<Result<Vec<_>, _>>()?;

        for expression in &self.gate.whitelist_regex {
            entries.push(Whitelist::regex(expression)?);
        }

        Ok(match entries.len() {
            0 => None,
            1 => entries.pop(),
            _ => Some(Whitelist::any_of(entries)),
        })
    }

    /// Build gate options with the session store and back-end these
    /// settings select.
    pub fn into_options(self) -> Result<GateOptions, SettingsError> {
        let mut options = GateOptions::new()
            .session(SessionOptions::from(&self.session))
            .single_page(SinglePageOptions {
                realm: self.single_page.realm.clone(),
                message: self.single_page.message.clone(),
            });

        if let Some(mode) = self.gate.mode {
            options = options.mode(mode);
        }

        if let Some(whitelist) = self.whitelist()? {
            options = options.whitelist(whitelist);
        }

        options = match &self.redis {
            Some(redis) => {
                let conn = get_redis_client(&redis.host_name)?.get_connection()?;
                options.session_store(RedisSessionStore::new(
                    Arc::new(RwLock::new(conn)),
                    self.session.ttl_seconds,
                ))
            }
            None => options.session_store(HashMapSessionStore::new()),
        };

        let backend = &self.backend;
        if let Some(verify_url) = &backend.verify_url {
            options = options.backend(RemoteIdentityBackend::from_config(RemoteBackendConfig {
                verify_url: verify_url.clone(),
                token_header: backend.token_header.clone(),
                timeout: Duration::from_millis(backend.timeout_ms),
            })?);
        } else if !backend.static_tokens.is_empty() {
            let tokens = backend.static_tokens.iter().fold(
                StaticTokenBackend::new(backend.token_header.clone()),
                |tokens, entry| {
                    let principal = match &entry.login {
                        Some(login) => Principal::new(entry.id.clone()).with_login(login.clone()),
                        None => Principal::new(entry.id.clone()),
                    };
                    tokens.with_token(entry.token.expose_secret().clone(), principal)
                },
            );
            options = options.backend(tokens);
        } else {
            tracing::warn!("no identity back-end configured");
        }

        Ok(options)
    }
}

fn environment() -> Environment {
    Environment::with_prefix(env::ENV_PREFIX)
        .prefix_separator("_")
        .separator(env::ENV_SEPARATOR)
        .list_separator(",")
        .with_list_parse_key("gate.whitelist")
        .with_list_parse_key("gate.whitelist_regex")
        .with_list_parse_key("server.allowed_origins")
        .try_parsing(true)
}

pub fn get_redis_client(redis_hostname: &str) -> Result<redis::Client, redis::RedisError> {
    let redis_url = format!("redis://{}/", redis_hostname);
    redis::Client::open(redis_url)
}
