use std::sync::Arc;

use async_trait::async_trait;
use url::form_urlencoded;

use super::{AuthPrimitives, Challenge, Grant};
use crate::{
    error::GateError,
    http_abstraction::{GateRequest, SessionCookie},
    ports::{IdentityBackend, SessionStore},
    principal::Principal,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionOptions {
    /// Where unauthenticated callers are redirected.
    pub login_url: String,
    /// Query parameter carrying the original path back from the login flow.
    pub return_param: String,
    /// Session key the principal is recorded under.
    pub session_key: String,
    /// Cookie holding the session identifier.
    pub cookie_name: String,
    /// Requests to this path end the session.
    pub logout_path: Option<String>,
    pub after_logout_url: String,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            login_url: "/auth/login".to_string(),
            return_param: "origin".to_string(),
            session_key: "user".to_string(),
            cookie_name: "warden.session".to_string(),
            logout_path: None,
            after_logout_url: "/".to_string(),
        }
    }
}

/// Session strategy: authenticate once, then trust the session.
///
/// A principal found in the session allows the request without consulting
/// the back-end. Otherwise the back-end may authenticate the request, and the
/// principal is written to the session so later requests skip the check.
#[derive(Clone)]
pub struct SessionAuth {
    store: Arc<dyn SessionStore>,
    backend: Option<Arc<dyn IdentityBackend>>,
    options: SessionOptions,
}

impl SessionAuth {
    pub fn new(
        store: Arc<dyn SessionStore>,
        backend: Option<Arc<dyn IdentityBackend>>,
        options: SessionOptions,
    ) -> Self {
        Self {
            store,
            backend,
            options,
        }
    }

    fn session_id<'r>(&self, request: &'r dyn GateRequest) -> Option<&'r str> {
        request
            .cookie(&self.options.cookie_name)
            .filter(|id| !id.is_empty())
    }

    fn login_location(&self, request: &dyn GateRequest) -> String {
        let origin = match request.query() {
            Some(query) if !query.is_empty() => format!("{}?{}", request.path(), query),
            _ => request.path().to_string(),
        };
        let query = form_urlencoded::Serializer::new(String::new())
            .append_pair(&self.options.return_param, &origin)
            .finish();
        let separator = if self.options.login_url.contains('?') {
            '&'
        } else {
            '?'
        };

        format!("{}{}{}", self.options.login_url, separator, query)
    }
}

#[async_trait]
impl AuthPrimitives for SessionAuth {
    async fn authenticated(&self, request: &dyn GateRequest) -> Result<Option<Grant>, GateError> {
        if let Some(session_id) = self.session_id(request) {
            if let Some(value) = self
                .store
                .load(session_id, &self.options.session_key)
                .await?
            {
                return Ok(Some(Grant::new(Principal::from_session_value(&value))));
            }
        }

        let Some(backend) = &self.backend else {
            return Ok(None);
        };

        match backend.authenticate(request).await? {
            Some(principal) => {
                let session_cookie = self.set_user(request, &principal).await?;
                Ok(Some(Grant {
                    principal,
                    session_cookie,
                }))
            }
            None => Ok(None),
        }
    }

    async fn pass(&self, request: &dyn GateRequest) -> Challenge {
        Challenge::redirect(self.login_location(request))
    }

    async fn set_user(
        &self,
        request: &dyn GateRequest,
        principal: &Principal,
    ) -> Result<Option<SessionCookie>, GateError> {
        // Client-supplied ids are never promoted; each login gets a new one.
        if let Some(previous) = self.session_id(request) {
            self.store
                .remove(previous, &self.options.session_key)
                .await?;
        }
        let session_id = uuid::Uuid::new_v4().to_string();

        self.store
            .store(
                &session_id,
                &self.options.session_key,
                principal.to_session_value()?,
            )
            .await?;

        Ok(Some(SessionCookie {
            name: self.options.cookie_name.clone(),
            value: session_id,
        }))
    }

    async fn intercept(&self, request: &dyn GateRequest) -> Result<Option<Challenge>, GateError> {
        if self.options.logout_path.as_deref() != Some(request.path()) {
            return Ok(None);
        }

        if let Some(session_id) = self.session_id(request) {
            self.store
                .remove(session_id, &self.options.session_key)
                .await?;
            tracing::info!("session signed out");
        }

        let expired = SessionCookie::expired(self.options.cookie_name.clone());
        Ok(Some(Challenge::Custom {
            status: 303,
            headers: vec![
                ("location".to_string(), self.options.after_logout_url.clone()),
                ("set-cookie".to_string(), expired.removal_header_value()),
            ],
            body: None,
        }))
    }
}

#[cfg(test)]
mod tests {
    use std::{
        collections::HashMap,
        sync::atomic::{AtomicUsize, Ordering},
    };

    use tokio::sync::RwLock;

    use super::*;
    use crate::{
        http_abstraction::test_support::{MockRequest, MockResponseBuilder},
        ports::{BackendError, SessionStoreError},
    };

    #[derive(Default)]
    struct MockSessionStore {
        values: RwLock<HashMap<(String, String), String>>,
        writes: AtomicUsize,
    }

    #[async_trait]
    impl SessionStore for MockSessionStore {
        async fn load(
            &self,
            session_id: &str,
            key: &str,
        ) -> Result<Option<String>, SessionStoreError> {
            let values = self.values.read().await;
            Ok(values
                .get(&(session_id.to_string(), key.to_string()))
                .cloned())
        }

        async fn store(
            &self,
            session_id: &str,
            key: &str,
            value: String,
        ) -> Result<(), SessionStoreError> {
            self.writes.fetch_add(1, Ordering::SeqCst);
            let mut values = self.values.write().await;
            values.insert((session_id.to_string(), key.to_string()), value);
            Ok(())
        }

        async fn remove(&self, session_id: &str, key: &str) -> Result<(), SessionStoreError> {
            let mut values = self.values.write().await;
            values.remove(&(session_id.to_string(), key.to_string()));
            Ok(())
        }
    }

    /// Authenticates any request bearing `X-Auth: valid`.
    #[derive(Default)]
    struct HeaderBackend {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl IdentityBackend for HeaderBackend {
        async fn authenticate(
            &self,
            request: &dyn GateRequest,
        ) -> Result<Option<Principal>, BackendError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok((request.header("x-auth") == Some("valid")).then(|| Principal::new("42")))
        }
    }

    fn session_auth(
        store: Arc<MockSessionStore>,
        backend: Arc<HeaderBackend>,
        options: SessionOptions,
    ) -> SessionAuth {
        SessionAuth::new(store, Some(backend), options)
    }

    #[tokio::test]
    async fn test_recorded_session_skips_backend() {
        let store = Arc::new(MockSessionStore::default());
        let backend = Arc::new(HeaderBackend::default());
        let auth = session_auth(store.clone(), backend.clone(), SessionOptions::default());
        store
            .store("s1", "user", Principal::new("42").to_session_value().unwrap())
            .await
            .unwrap();
        let request = MockRequest::get("/repos").with_cookie("warden.session", "s1");

        let grant = auth.authenticated(&request).await.unwrap();

        assert_eq!(grant, Some(Grant::new(Principal::new("42"))));
        assert_eq!(backend.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_backend_success_creates_session() {
        let store = Arc::new(MockSessionStore::default());
        let backend = Arc::new(HeaderBackend::default());
        let auth = session_auth(store.clone(), backend, SessionOptions::default());
        let request = MockRequest::get("/repos").with_header("X-Auth", "valid");

        let grant = auth.authenticated(&request).await.unwrap().unwrap();

        let cookie = grant.session_cookie.expect("new session cookie");
        assert_eq!(cookie.name, "warden.session");
        assert_eq!(
            store.load(&cookie.value, "user").await.unwrap(),
            Some(Principal::new("42").to_session_value().unwrap())
        );
    }

    #[tokio::test]
    async fn test_presented_session_id_is_rotated_on_login() {
        let store = Arc::new(MockSessionStore::default());
        let backend = Arc::new(HeaderBackend::default());
        let auth = session_auth(store.clone(), backend, SessionOptions::default());
        let login = MockRequest::get("/repos")
            .with_cookie("warden.session", "planted")
            .with_header("X-Auth", "valid");

        let grant = auth.authenticated(&login).await.unwrap().unwrap();

        let cookie = grant.session_cookie.expect("fresh session cookie");
        assert_ne!(cookie.value, "planted");
        assert_eq!(store.load("planted", "user").await.unwrap(), None);

        let replay = MockRequest::get("/repos").with_cookie("warden.session", "planted");
        assert_eq!(auth.authenticated(&replay).await.unwrap(), None);

        let owner = MockRequest::get("/repos").with_cookie("warden.session", &cookie.value);
        assert_eq!(
            auth.authenticated(&owner).await.unwrap(),
            Some(Grant::new(Principal::new("42")))
        );
    }

    #[tokio::test]
    async fn test_record_principal_replaces_previous_session() {
        let store = Arc::new(MockSessionStore::default());
        let auth = SessionAuth::new(store.clone(), None, SessionOptions::default());
        store
            .store("s2", "user", Principal::new("1").to_session_value().unwrap())
            .await
            .unwrap();
        let request = MockRequest::get("/").with_cookie("warden.session", "s2");

        let cookie = auth
            .set_user(&request, &Principal::new("7"))
            .await
            .unwrap()
            .expect("fresh session cookie");

        assert_eq!(store.load("s2", "user").await.unwrap(), None);
        assert_eq!(
            store.load(&cookie.value, "user").await.unwrap(),
            Some(Principal::new("7").to_session_value().unwrap())
        );
    }

    #[tokio::test]
    async fn test_unauthenticated_request_is_not_written() {
        let store = Arc::new(MockSessionStore::default());
        let backend = Arc::new(HeaderBackend::default());
        let auth = session_auth(store.clone(), backend, SessionOptions::default());

        let grant = auth
            .authenticated(&MockRequest::get("/repos"))
            .await
            .unwrap();

        assert_eq!(grant, None);
        assert_eq!(store.writes.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_pass_redirects_with_origin() {
        let auth = SessionAuth::new(
            Arc::new(MockSessionStore::default()),
            None,
            SessionOptions::default(),
        );
        let request = MockRequest::get("/repos/1").with_query("tab=builds");

        let challenge = auth.pass(&request).await;

        assert_eq!(
            challenge,
            Challenge::redirect("/auth/login?origin=%2Frepos%2F1%3Ftab%3Dbuilds")
        );
    }

    #[tokio::test]
    async fn test_pass_appends_to_existing_login_query() {
        let options = SessionOptions {
            login_url: "https://sso.example.com/login?app=ci".to_string(),
            return_param: "return_to".to_string(),
            ..SessionOptions::default()
        };
        let auth = SessionAuth::new(Arc::new(MockSessionStore::default()), None, options);

        let challenge = auth.pass(&MockRequest::get("/")).await;

        assert_eq!(
            challenge,
            Challenge::redirect("https://sso.example.com/login?app=ci&return_to=%2F")
        );
    }

    #[tokio::test]
    async fn test_logout_path_clears_session() {
        let store = Arc::new(MockSessionStore::default());
        let options = SessionOptions {
            logout_path: Some("/logout".to_string()),
            ..SessionOptions::default()
        };
        let auth = SessionAuth::new(store.clone(), None, options);
        store
            .store("s3", "user", "42".to_string())
            .await
            .unwrap();
        let request = MockRequest::get("/logout").with_cookie("warden.session", "s3");

        let challenge = auth.intercept(&request).await.unwrap().unwrap();

        let response = challenge.render(MockResponseBuilder::default());
        assert_eq!(response.status, 303);
        assert_eq!(response.header("location"), Some("/"));
        assert_eq!(
            response.header("set-cookie"),
            Some("warden.session=; Path=/; Max-Age=0; HttpOnly; SameSite=Lax")
        );
        assert_eq!(store.load("s3", "user").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_other_paths_are_not_intercepted() {
        let options = SessionOptions {
            logout_path: Some("/logout".to_string()),
            ..SessionOptions::default()
        };
        let auth = SessionAuth::new(Arc::new(MockSessionStore::default()), None, options);

        let challenge = auth.intercept(&MockRequest::get("/repos")).await.unwrap();

        assert_eq!(challenge, None);
    }
}
