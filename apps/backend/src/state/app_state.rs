use std::sync::Arc;

use super::security_config::SecurityConfig;
use crate::services::identities::{IdentityProvider, InMemoryIdentities};

/// Application state containing shared resources
#[derive(Clone)]
pub struct AppState {
    /// Token and cookie signing configuration, fixed at startup
    pub security: SecurityConfig,
    /// Credential check used by the login and signup routes
    pub identities: Arc<dyn IdentityProvider>,
}

impl AppState {
    pub fn new(security: SecurityConfig, identities: Arc<dyn IdentityProvider>) -> Self {
        Self {
            security,
            identities,
        }
    }

    /// State backed by an empty in-memory identity store.
    pub fn in_memory(security: SecurityConfig) -> Self {
        Self::new(security, Arc::new(InMemoryIdentities::new()))
    }
}
