//! Zero-cost HTTP abstraction traits for the gate.
//!
//! This module defines trait-based HTTP abstractions that frameworks implement directly
//! on their own types (via newtype wrappers), avoiding any allocation or copying overhead.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────┐
//! │  warden_core: Defines HTTP traits        │
//! └──────────────┬───────────────────────────┘
//!                │
//!                ▼
//! ┌──────────────────────────────────────────┐
//! │  warden_axum: Newtype wrappers           │
//! │  struct AxumRequest(request::Parts)      │
//! │  impl GateRequest for AxumRequest { }    │
//! └──────────────┬───────────────────────────┘
//!                │
//!                ▼
//! ┌──────────────────────────────────────────┐
//! │  Gate and strategies use GateRequest     │
//! │  trait methods (generic over framework)  │
//! └──────────────────────────────────────────┘
//! ```
//!
//! Strategies receive requests as `&dyn GateRequest`, so the trait stays
//! object safe and requires `Send + Sync`. Framework adapters wrap the request
//! head rather than the full request, since request bodies are rarely `Sync`.

use crate::principal::Principal;

/// Trait for HTTP requests passing through the gate.
///
/// # Implementation Notes
///
/// - Return `&str` references directly from the framework's data structures
/// - Case-insensitive header lookup should be handled by implementor
/// - The principal slot is the attribute bag downstream handlers read the
///   resolved principal from
pub trait GateRequest: Send + Sync {
    /// Get a header value by name.
    ///
    /// Returns `None` if the header doesn't exist or isn't valid UTF-8.
    fn header(&self, name: &str) -> Option<&str>;

    /// Get a cookie value by name.
    fn cookie(&self, name: &str) -> Option<&str>;

    /// Get the HTTP method (GET, POST, etc.)
    fn method(&self) -> &str;

    /// Get the request path, without the query string.
    fn path(&self) -> &str;

    /// Get the raw query string, if any.
    fn query(&self) -> Option<&str>;

    /// The principal the gate resolved for this request, if any.
    fn principal(&self) -> Option<&Principal>;

    /// Stash the resolved principal for downstream consumers.
    fn set_principal(&mut self, principal: Principal);
}

/// A session identifier the response must hand back to the client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionCookie {
    pub name: String,
    pub value: String,
}

impl SessionCookie {
    /// Cookie header value with the attributes the gate always sets.
    pub fn header_value(&self) -> String {
        format!("{}={}; Path=/; HttpOnly; SameSite=Lax", self.name, self.value)
    }

    /// An empty cookie, used to clear the session on the client.
    pub fn expired(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: String::new(),
        }
    }

    /// Header value telling the client to drop the cookie right away.
    pub fn removal_header_value(&self) -> String {
        format!(
            "{}={}; Path=/; Max-Age=0; HttpOnly; SameSite=Lax",
            self.name, self.value
        )
    }
}

/// Trait for building HTTP responses for the gate.
///
/// This follows the builder pattern, allowing method chaining:
/// ```ignore
/// builder
///     .status(303)
///     .header("location", "/login?origin=%2F")
///     .build()
/// ```
pub trait ResponseBuilder: Sized {
    /// The final response type produced by this builder
    type Response;

    /// Set the HTTP status code
    fn status(self, code: u16) -> Self;

    /// Add an HTTP header
    fn header(self, name: &str, value: &str) -> Self;

    /// Set a JSON body with Content-Type header
    fn json_body(self, body: serde_json::Value) -> Self;

    /// Build the final response
    fn build(self) -> Self::Response;

    /// Append a header to a response produced elsewhere (the downstream handler).
    fn append_header(response: &mut Self::Response, name: &str, value: &str);

    /// Attach a newly created session to a downstream response.
    fn append_session_cookie(response: &mut Self::Response, cookie: &SessionCookie) {
        Self::append_header(response, "set-cookie", &cookie.header_value());
    }
}

/// Helper methods for creating the responses the gate produces.
///
/// Automatically implemented for all types that implement `ResponseBuilder`.
pub trait ResponseHelpers: ResponseBuilder {
    /// Create a 303 See Other redirect
    fn redirect(self, location: &str) -> Self::Response {
        self.status(303).header("location", location).build()
    }

    /// Create a 401 Unauthorized response
    fn unauthorized(self, realm: &str, message: &str) -> Self::Response {
        self.status(401)
            .header("www-authenticate", &format!("Bearer realm=\"{realm}\""))
            .json_body(serde_json::json!({ "error": message }))
            .build()
    }

    /// Create a 500 Internal Server Error response
    fn internal_error(self, message: &str) -> Self::Response {
        self.status(500)
            .json_body(serde_json::json!({ "error": message }))
            .build()
    }
}

// Blanket implementation for all ResponseBuilder types
impl<T: ResponseBuilder> ResponseHelpers for T {}

#[cfg(test)]
pub(crate) mod test_support {
    use std::collections::HashMap;

    use super::*;

    /// In-memory request used by the core's unit tests.
    #[derive(Debug, Default, Clone)]
    pub struct MockRequest {
        pub headers: HashMap<String, String>,
        pub cookies: HashMap<String, String>,
        pub method: String,
        pub path: String,
        pub query: Option<String>,
        pub principal: Option<Principal>,
    }

    impl MockRequest {
        pub fn get(path: &str) -> Self {
            Self {
                method: "GET".to_string(),
                path: path.to_string(),
                ..Default::default()
            }
        }

        pub fn with_header(mut self, name: &str, value: &str) -> Self {
            self.headers.insert(name.to_string(), value.to_string());
            self
        }

        pub fn with_cookie(mut self, name: &str, value: &str) -> Self {
            self.cookies.insert(name.to_string(), value.to_string());
            self
        }

        pub fn with_query(mut self, query: &str) -> Self {
            self.query = Some(query.to_string());
            self
        }
    }

    impl GateRequest for MockRequest {
        fn header(&self, name: &str) -> Option<&str> {
            let name_lower = name.to_lowercase();
            self.headers
                .iter()
                .find(|(k, _)| k.to_lowercase() == name_lower)
                .map(|(_, v)| v.as_str())
        }

        fn cookie(&self, name: &str) -> Option<&str> {
            self.cookies.get(name).map(|s| s.as_str())
        }

        fn method(&self) -> &str {
            &self.method
        }

        fn path(&self) -> &str {
            &self.path
        }

        fn query(&self) -> Option<&str> {
            self.query.as_deref()
        }

        fn principal(&self) -> Option<&Principal> {
            self.principal.as_ref()
        }

        fn set_principal(&mut self, principal: Principal) {
            self.principal = Some(principal);
        }
    }

    /// Response captured by [`MockResponseBuilder`].
    #[derive(Debug, Default, Clone, PartialEq)]
    pub struct MockResponse {
        pub status: u16,
        pub headers: Vec<(String, String)>,
        pub body: Option<serde_json::Value>,
    }

    impl MockResponse {
        pub fn ok(body: &str) -> Self {
            Self {
                status: 200,
                headers: Vec::new(),
                body: Some(serde_json::json!(body)),
            }
        }

        pub fn header(&self, name: &str) -> Option<&str> {
            self.headers
                .iter()
                .find(|(k, _)| k.eq_ignore_ascii_case(name))
                .map(|(_, v)| v.as_str())
        }
    }

    #[derive(Debug, Default)]
    pub struct MockResponseBuilder(MockResponse);

    impl ResponseBuilder for MockResponseBuilder {
        type Response = MockResponse;

        fn status(mut self, code: u16) -> Self {
            self.0.status = code;
            self
        }

        fn header(mut self, name: &str, value: &str) -> Self {
            self.0.headers.push((name.to_string(), value.to_string()));
            self
        }

        fn json_body(mut self, body: serde_json::Value) -> Self {
            self.0.body = Some(body);
            self.header("content-type", "application/json")
        }

        fn build(self) -> Self::Response {
            self.0
        }

        fn append_header(response: &mut Self::Response, name: &str, value: &str) {
            response.headers.push((name.to_string(), value.to_string()));
        }
    }
}
