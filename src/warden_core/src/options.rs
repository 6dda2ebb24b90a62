use std::{fmt, sync::Arc};

use crate::{
    http_abstraction::GateRequest,
    ports::{BackendError, IdentityBackend, SessionStore},
    principal::Principal,
    registry::Mode,
    strategies::{BoxFuture, Callbacks, Challenge, SessionOptions, SinglePageOptions},
    whitelist::Whitelist,
};

/// Everything a gate is built from.
///
/// Options are assembled once at startup, either in code or from
/// configuration files via the adapters crate, and consumed by
/// [`Gate::new`](crate::Gate::new).
#[derive(Clone, Default)]
pub struct GateOptions {
    pub mode: Option<Mode>,
    pub whitelist: Option<Whitelist>,
    pub callbacks: Callbacks,
    pub session: SessionOptions,
    pub single_page: SinglePageOptions,
    pub session_store: Option<Arc<dyn SessionStore>>,
    pub backend: Option<Arc<dyn IdentityBackend>>,
}

impl fmt::Debug for GateOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GateOptions")
            .field("mode", &self.mode)
            .field("whitelist", &self.whitelist)
            .field("callbacks", &self.callbacks)
            .field("session", &self.session)
            .field("single_page", &self.single_page)
            .field("session_store", &self.session_store.is_some())
            .field("backend", &self.backend.is_some())
            .finish()
    }
}

impl GateOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mode(mut self, mode: Mode) -> Self {
        self.mode = Some(mode);
        self
    }

    pub fn whitelist(mut self, whitelist: Whitelist) -> Self {
        self.whitelist = Some(whitelist);
        self
    }

    pub fn pass<F>(mut self, pass: F) -> Self
    where
        F: for<'a> Fn(&'a dyn GateRequest) -> BoxFuture<'a, Challenge> + Send + Sync + 'static,
    {
        self.callbacks = self.callbacks.with_pass(pass);
        self
    }

    pub fn set_user<F>(mut self, set_user: F) -> Self
    where
        F: for<'a> Fn(&'a dyn GateRequest, Principal) -> BoxFuture<'a, Result<(), BackendError>>
            + Send
            + Sync
            + 'static,
    {
        self.callbacks = self.callbacks.with_set_user(set_user);
        self
    }

    pub fn authenticated<F>(mut self, authenticated: F) -> Self
    where
        F: for<'a> Fn(&'a dyn GateRequest) -> BoxFuture<'a, Result<Option<Principal>, BackendError>>
            + Send
            + Sync
            + 'static,
    {
        self.callbacks = self.callbacks.with_authenticated(authenticated);
        self
    }

    pub fn session(mut self, session: SessionOptions) -> Self {
        self.session = session;
        self
    }

    pub fn single_page(mut self, single_page: SinglePageOptions) -> Self {
        self.single_page = single_page;
        self
    }

    pub fn session_store(mut self, store: impl SessionStore + 'static) -> Self {
        self.session_store = Some(Arc::new(store));
        self
    }

    pub fn backend(mut self, backend: impl IdentityBackend + 'static) -> Self {
        self.backend = Some(Arc::new(backend));
        self
    }
}
