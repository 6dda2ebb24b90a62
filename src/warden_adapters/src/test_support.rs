use std::collections::HashMap;

use warden_core::{GateRequest, Principal};

/// Bare request carrying a path and headers, for exercising back-ends.
#[derive(Debug, Default)]
pub struct HeaderRequest {
    path: String,
    headers: HashMap<String, String>,
    principal: Option<Principal>,
}

impl HeaderRequest {
    pub fn new(path: &str) -> Self {
        Self {
            path: path.to_string(),
            ..Default::default()
        }
    }

    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.headers.insert(name.to_ascii_lowercase(), value.to_string());
        self
    }
}

impl GateRequest for HeaderRequest {
    fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }

    fn cookie(&self, _name: &str) -> Option<&str> {
        None
    }

    fn method(&self) -> &str {
        "GET"
    }

    fn path(&self) -> &str {
        &self.path
    }

    fn query(&self) -> Option<&str> {
        None
    }

    fn principal(&self) -> Option<&Principal> {
        self.principal.as_ref()
    }

    fn set_principal(&mut self, principal: Principal) {
        self.principal = Some(principal);
    }
}
