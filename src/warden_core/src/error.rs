use thiserror::Error;

use crate::ports::{BackendError, SessionStoreError};

/// Raised while building a gate. Never deferred to request time.
#[derive(Debug, Error)]
pub enum ConfigurationError {
    #[error("no mode and no callbacks supplied")]
    NoModeOrCallbacks,
    #[error("callback mode requires the `{0}` callback")]
    MissingCallback(&'static str),
    #[error("session mode requires a session store")]
    MissingSessionStore,
    #[error("invalid whitelist pattern `{pattern}`: {source}")]
    InvalidWhitelistPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },
    #[error("unknown mode `{0}`, expected one of session, single_page, callback")]
    UnknownMode(String),
    #[error("logout path `{0}` is whitelisted and would never end a session")]
    WhitelistedLogoutPath(String),
}

/// Failures of the collaborators behind a strategy.
///
/// Denials are not errors; these only surface when the back-end or the
/// session store could not answer at all. The gate does not retry them.
#[derive(Debug, Error)]
pub enum GateError {
    #[error("identity back-end failed: {0}")]
    Backend(#[from] BackendError),
    #[error("session store failed: {0}")]
    SessionStore(#[from] SessionStoreError),
    #[error("principal could not be encoded: {0}")]
    Encoding(#[from] serde_json::Error),
}
