use std::sync::Arc;

use session_trust::{AccountStore, SessionTrust};

use crate::config::GateConfig;

/// Shared state for the middleware and auth routes.
///
/// Everything inside is read-only after startup; cloning only bumps the
/// reference counts.
#[derive(Clone)]
pub struct AuthState {
    trust: Arc<SessionTrust>,
    accounts: Arc<dyn AccountStore>,
    gate: Arc<GateConfig>,
}

impl AuthState {
    pub fn new(trust: SessionTrust, accounts: Arc<dyn AccountStore>, gate: GateConfig) -> Self {
        Self {
            trust: Arc::new(trust),
            accounts,
            gate: Arc::new(gate),
        }
    }

    pub fn trust(&self) -> &SessionTrust {
        &self.trust
    }

    pub fn accounts(&self) -> &dyn AccountStore {
        self.accounts.as_ref()
    }

    pub fn gate(&self) -> &GateConfig {
        &self.gate
    }
}
