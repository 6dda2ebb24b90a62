use serde::{Deserialize, Serialize};

/// The authenticated identity behind a request.
///
/// The login is carried along for display in downstream handlers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    login: Option<String>,
}

impl Principal {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            login: None,
        }
    }

    pub fn with_login(mut self, login: impl Into<String>) -> Self {
        self.login = Some(login.into());
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn login(&self) -> Option<&str> {
        self.login.as_deref()
    }

    /// Encode the principal for storage in a session value.
    pub fn to_session_value(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Decode a session value written by [`Principal::to_session_value`].
    ///
    /// Values that are not JSON are treated as a bare identifier so that
    /// sessions written by other applications sharing the store still resolve.
    pub fn from_session_value(value: &str) -> Self {
        serde_json::from_str(value).unwrap_or_else(|_| Principal::new(value))
    }
}
