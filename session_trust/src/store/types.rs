use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("Invalid token value for cookie {0}")]
    InvalidValue(String),
}

/// Client-side persistence for the session and settings tokens.
///
/// Writes must be http-only so page script can never read a token. Removal
/// is idempotent: removing an absent token is a no-op, never an error.
pub trait SessionStore {
    fn set_session(&mut self, token: &str, ttl_secs: u64) -> Result<(), StoreError>;
    fn get_session(&self) -> Option<&str>;
    fn remove_session(&mut self);

    fn set_settings_token(&mut self, token: &str, ttl_secs: u64) -> Result<(), StoreError>;
    fn get_settings_token(&self) -> Option<&str>;
    fn remove_settings_token(&mut self);
}
