//! Mode registry: configuration in, strategy out.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{
    error::ConfigurationError,
    options::GateOptions,
    strategies::{CallbackAuth, SessionAuth, SinglePageAuth, Strategy, StrategyKind},
};

/// Configuration keyword selecting a strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    Session,
    SinglePage,
    Callback,
}

impl FromStr for Mode {
    type Err = ConfigurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "session" => Ok(Self::Session),
            "single_page" => Ok(Self::SinglePage),
            "callback" => Ok(Self::Callback),
            other => Err(ConfigurationError::UnknownMode(other.to_string())),
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Session => "session",
            Self::SinglePage => "single_page",
            Self::Callback => "callback",
        })
    }
}

/// Mode a framework integration picks when the application names none.
pub fn default_mode(sessions_enabled: bool) -> Mode {
    if sessions_enabled {
        Mode::Session
    } else {
        Mode::SinglePage
    }
}

/// Resolve options into exactly one strategy.
///
/// An explicit mode wins. Without one, a complete set of callbacks selects
/// the callback strategy; anything else is a configuration error.
pub fn resolve(options: &GateOptions) -> Result<Strategy, ConfigurationError> {
    match options.mode {
        Some(Mode::Session) => {
            let store = options
                .session_store
                .clone()
                .ok_or(ConfigurationError::MissingSessionStore)?;
            let auth = SessionAuth::new(store, options.backend.clone(), options.session.clone());
            Ok(Strategy::new(StrategyKind::Session, auth))
        }
        Some(Mode::SinglePage) => {
            let auth = SinglePageAuth::new(options.backend.clone(), options.single_page.clone());
            Ok(Strategy::new(StrategyKind::SinglePage, auth))
        }
        Some(Mode::Callback) => callback_strategy(options),
        None if options.callbacks.is_complete() => callback_strategy(options),
        None => Err(ConfigurationError::NoModeOrCallbacks),
    }
}

fn callback_strategy(options: &GateOptions) -> Result<Strategy, ConfigurationError> {
    let auth = CallbackAuth::try_from(options.callbacks.clone())?;
    Ok(Strategy::new(StrategyKind::Callback, auth))
}
