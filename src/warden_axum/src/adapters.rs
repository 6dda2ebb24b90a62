//! Axum adapters for the gate's HTTP traits.
//!
//! The traits are defined in `warden_core`, and we implement them here using
//! newtype wrappers:
//!
//! ```text
//! ┌────────────────────────────────────────────┐
//! │  warden_core::GateRequest (trait)          │
//! └────────────────┬───────────────────────────┘
//!                  │
//!                  ▼
//! ┌────────────────────────────────────────────┐
//! │  AxumRequest(request::Parts)               │
//! │  impl GateRequest for AxumRequest { }      │
//! └────────────────────────────────────────────┘
//! ```
//!
//! Only the request head is wrapped. The body stays with the middleware and
//! is reattached before the request is handed downstream.

use axum::{
    body::Body,
    http::{HeaderName, HeaderValue, Response, StatusCode, header::SET_COOKIE, request::Parts},
};
use axum_extra::extract::cookie::{Cookie, SameSite};
use warden_core::{GateRequest, Principal, ResponseBuilder, SessionCookie};

/// Newtype wrapper around the head of an Axum request.
///
/// The resolved principal is kept in the request extensions, where the
/// extractors in this crate read it back.
#[repr(transparent)]
#[derive(Debug)]
pub struct AxumRequest(pub Parts);

impl From<Parts> for AxumRequest {
    fn from(parts: Parts) -> Self {
        AxumRequest(parts)
    }
}

impl From<AxumRequest> for Parts {
    fn from(wrapper: AxumRequest) -> Self {
        wrapper.0
    }
}

impl GateRequest for AxumRequest {
    fn header(&self, name: &str) -> Option<&str> {
        self.0.headers.get(name)?.to_str().ok()
    }

    fn cookie(&self, name: &str) -> Option<&str> {
        self.0
            .headers
            .get_all(axum::http::header::COOKIE)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .flat_map(|header| header.split(';'))
            .filter_map(|pair| pair.trim().split_once('='))
            .find(|(key, _)| *key == name)
            .map(|(_, value)| value)
    }

    fn method(&self) -> &str {
        self.0.method.as_str()
    }

    fn path(&self) -> &str {
        self.0.uri.path()
    }

    fn query(&self) -> Option<&str> {
        self.0.uri.query()
    }

    fn principal(&self) -> Option<&Principal> {
        self.0.extensions.get::<Principal>()
    }

    fn set_principal(&mut self, principal: Principal) {
        self.0.extensions.insert(principal);
    }
}

/// Response builder producing `axum` responses for gate challenges.
pub struct AxumResponseBuilder {
    builder: axum::http::response::Builder,
    body: Option<String>,
}

impl AxumResponseBuilder {
    pub fn new() -> Self {
        Self {
            builder: Response::builder(),
            body: None,
        }
    }
}

impl Default for AxumResponseBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ResponseBuilder for AxumResponseBuilder {
    type Response = Response<Body>;

    fn status(mut self, code: u16) -> Self {
        self.builder = self.builder.status(code);
        self
    }

    fn header(mut self, name: &str, value: &str) -> Self {
        self.builder = self.builder.header(name, value);
        self
    }

    fn json_body(mut self, body: serde_json::Value) -> Self {
        self.builder = self.builder.header("content-type", "application/json");
        self.body = Some(body.to_string());
        self
    }

    fn build(self) -> Self::Response {
        let body = self.body.unwrap_or_default();
        self.builder.body(Body::from(body)).unwrap_or_else(|e| {
            tracing::error!(error = %e, "failed to build gate response");
            let mut response = Response::new(Body::empty());
            *response.status_mut() = StatusCode::INTERNAL_SERVER_ERROR;
            response
        })
    }

    fn append_header(response: &mut Self::Response, name: &str, value: &str) {
        match (
            HeaderName::try_from(name),
            HeaderValue::from_str(value),
        ) {
            (Ok(name), Ok(value)) => {
                response.headers_mut().append(name, value);
            }
            _ => tracing::warn!(header = name, "dropping invalid response header"),
        }
    }

    fn append_session_cookie(response: &mut Self::Response, cookie: &SessionCookie) {
        let cookie = Cookie::build((cookie.name.clone(), cookie.value.clone()))
            .path("/")
            .http_only(true)
            .same_site(SameSite::Lax)
            .build();

        Self::append_header(response, SET_COOKIE.as_str(), &cookie.to_string());
    }
}

pub fn response_builder() -> AxumResponseBuilder {
    AxumResponseBuilder::new()
}
