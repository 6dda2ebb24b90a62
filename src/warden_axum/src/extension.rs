use std::sync::Arc;

use axum::Router;
use warden_core::{ConfigurationError, Gate, GateOptions, default_mode};

use crate::middleware;

/// Installs the gate into an axum application.
///
/// When the options name no mode and carry no complete callback set, the
/// mode follows the host: session mode if the application has session
/// support, single page mode otherwise.
#[derive(Debug, Clone, Copy, Default)]
pub struct WardenExtension {
    pub sessions_enabled: bool,
}

impl WardenExtension {
    pub fn new(sessions_enabled: bool) -> Self {
        Self { sessions_enabled }
    }

    /// Build the gate, filling in the default mode where needed.
    pub fn gate(&self, mut options: GateOptions) -> Result<Gate, ConfigurationError> {
        if options.mode.is_none() && !options.callbacks.is_complete() {
            let mode = default_mode(self.sessions_enabled);
            tracing::debug!(%mode, "no mode configured, using default");
            options.mode = Some(mode);
        }

        Gate::new(options)
    }

    pub fn protect<S>(
        &self,
        router: Router<S>,
        options: GateOptions,
    ) -> Result<Router<S>, ConfigurationError>
    where
        S: Clone + Send + Sync + 'static,
    {
        let gate = self.gate(options)?;
        Ok(middleware::protect(router, Arc::new(gate)))
    }
}

#[cfg(test)]
mod tests {
    use warden_adapters::HashMapSessionStore;
    use warden_core::{Mode, StrategyKind};

    use super::*;

    #[test]
    fn test_sessions_enabled_defaults_to_session_mode() {
        let gate = WardenExtension::new(true)
            .gate(GateOptions::new().session_store(HashMapSessionStore::new()))
            .unwrap();

        assert_eq!(gate.strategy().kind(), StrategyKind::Session);
    }

    #[test]
    fn test_sessions_disabled_defaults_to_single_page_mode() {
        let gate = WardenExtension::new(false).gate(GateOptions::new()).unwrap();

        assert_eq!(gate.strategy().kind(), StrategyKind::SinglePage);
    }

    #[test]
    fn test_explicit_mode_is_kept() {
        let gate = WardenExtension::new(true)
            .gate(GateOptions::new().mode(Mode::SinglePage))
            .unwrap();

        assert_eq!(gate.strategy().kind(), StrategyKind::SinglePage);
    }

    #[test]
    fn test_session_default_still_needs_a_store() {
        let result = WardenExtension::new(true).gate(GateOptions::new());

        assert!(matches!(result, Err(ConfigurationError::MissingSessionStore)));
    }
}
