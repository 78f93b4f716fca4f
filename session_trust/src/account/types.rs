use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::errors::AccountError;

/// Coarse account state carried alongside an identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AccountState {
    /// Signup finished; the account may use the whole application.
    #[serde(rename = "registered")]
    Registered,
    /// Signup in progress; only the signup flow accepts this identity.
    #[serde(rename = "temporary")]
    TemporarySignup,
}

/// Stable reference to a user account.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Identity {
    /// Unique user identifier
    pub id: String,
    /// Registration state at the time the identity was resolved
    pub state: AccountState,
}

impl Identity {
    pub fn registered(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            state: AccountState::Registered,
        }
    }

    pub fn temporary(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            state: AccountState::TemporarySignup,
        }
    }

    pub fn is_registered(&self) -> bool {
        self.state == AccountState::Registered
    }
}

/// The account subsystem as seen by the trust core.
///
/// Verifiers only read from it. The mutating methods exist for the login and
/// signup endpoints that sit in front of the core.
#[async_trait]
pub trait AccountStore: Send + Sync + 'static {
    /// Look up the current identity for a user id.
    async fn get_identity(&self, id: &str) -> Result<Option<Identity>, AccountError>;

    /// Check an account name and password, returning the identity on success.
    async fn authenticate(
        &self,
        account: &str,
        password: &str,
    ) -> Result<Option<Identity>, AccountError>;

    /// Check the password of an already identified user.
    async fn check_password(&self, id: &str, password: &str) -> Result<bool, AccountError>;

    /// Create an account in the temporary signup state.
    async fn create_temporary(&self, account: &str, password: &str)
    -> Result<Identity, AccountError>;

    /// Move a temporary account to the registered state.
    async fn promote(&self, id: &str) -> Result<Identity, AccountError>;
}
