use std::collections::HashMap;

use argon2::password_hash::{PasswordHash, SaltString};
use argon2::{Argon2, PasswordHasher, PasswordVerifier};
use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::utils::gen_random_bytes;

use super::errors::AccountError;
use super::types::{AccountState, AccountStore, Identity};

struct AccountRecord {
    id: String,
    account: String,
    /// Argon2id hash in PHC string format; salt and parameters included
    password_hash: String,
    state: AccountState,
}

impl AccountRecord {
    fn identity(&self) -> Identity {
        Identity {
            id: self.id.clone(),
            state: self.state,
        }
    }

    fn password_matches(&self, password: &str) -> bool {
        match PasswordHash::new(&self.password_hash) {
            Ok(parsed) => Argon2::default()
                .verify_password(password.as_bytes(), &parsed)
                .is_ok(),
            Err(e) => {
                tracing::error!(user_id = %self.id, "Stored password hash is unreadable: {e}");
                false
            }
        }
    }
}

/// Account directory kept in process memory.
///
/// Suitable for tests and the demo application. Records are keyed by user id.
#[derive(Default)]
pub struct InMemoryAccountStore {
    accounts: RwLock<HashMap<String, AccountRecord>>,
}

impl InMemoryAccountStore {
    pub fn new() -> Self {
        tracing::info!("Creating new in-memory account store");
        Self::default()
    }

    /// Insert a fully registered account.
    pub async fn insert_registered(
        &self,
        account: &str,
        password: &str,
    ) -> Result<Identity, AccountError> {
        self.insert(account, password, AccountState::Registered).await
    }

    async fn insert(
        &self,
        account: &str,
        password: &str,
        state: AccountState,
    ) -> Result<Identity, AccountError> {
        // Hash outside the write lock
        let password_hash = hash_password(password)?;

        let mut accounts = self.accounts.write().await;
        if accounts.values().any(|record| record.account == account) {
            return Err(AccountError::AlreadyExists(account.to_string()));
        }

        let record = AccountRecord {
            id: uuid::Uuid::new_v4().to_string(),
            account: account.to_string(),
            password_hash,
            state,
        };
        let identity = record.identity();
        accounts.insert(record.id.clone(), record);

        tracing::debug!(user_id = %identity.id, ?state, "Account created");
        Ok(identity)
    }
}

fn hash_password(password: &str) -> Result<String, AccountError> {
    let salt_bytes = gen_random_bytes(16).map_err(|e| AccountError::Storage(e.to_string()))?;
    let salt =
        SaltString::encode_b64(&salt_bytes).map_err(|e| AccountError::Storage(e.to_string()))?;
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AccountError::Storage(e.to_string()))
}

#[async_trait]
impl AccountStore for InMemoryAccountStore {
    async fn get_identity(&self, id: &str) -> Result<Option<Identity>, AccountError> {
        let accounts = self.accounts.read().await;
        Ok(accounts.get(id).map(AccountRecord::identity))
    }

    async fn authenticate(
        &self,
        account: &str,
        password: &str,
    ) -> Result<Option<Identity>, AccountError> {
        let accounts = self.accounts.read().await;
        let identity = accounts
            .values()
            .find(|record| record.account == account)
            .filter(|record| record.password_matches(password))
            .map(AccountRecord::identity);
        Ok(identity)
    }

    async fn check_password(&self, id: &str, password: &str) -> Result<bool, AccountError> {
        let accounts = self.accounts.read().await;
        Ok(accounts
            .get(id)
            .is_some_and(|record| record.password_matches(password)))
    }

    async fn create_temporary(
        &self,
        account: &str,
        password: &str,
    ) -> Result<Identity, AccountError> {
        self.insert(account, password, AccountState::TemporarySignup)
            .await
    }

    async fn promote(&self, id: &str) -> Result<Identity, AccountError> {
        let mut accounts = self.accounts.write().await;
        let record = accounts
            .get_mut(id)
            .ok_or_else(|| AccountError::NotFound(id.to_string()))?;
        record.state = AccountState::Registered;
        Ok(record.identity())
    }
}
