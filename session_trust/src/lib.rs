//! session_trust - Session and settings re-authentication tokens
//!
//! This crate holds the trust core shared by every layer that needs to know
//! who is logged in: the signed token codec, the cookie-backed store adapter,
//! the session verifier and the settings re-auth verifier. Framework glue
//! lives in `session-trust-axum`.

mod account;
mod config;
mod errors;
mod session;
mod store;
mod token;
mod utils;

#[cfg(test)]
mod test_utils;

pub use account::{AccountError, AccountState, AccountStore, Identity, InMemoryAccountStore};
pub use config::{ConfigError, SecretBytes, TrustConfig};
pub use errors::{ErrorCode, TrustError};
pub use session::{
    SessionTrust, SettingsAuth, authorize_connection, complete_settings, end_session,
    grant_settings_token, start_session, verify_session, verify_settings_token,
};
pub use store::{CookieJar, SessionStore, StoreError};
pub use token::{TokenCodec, TokenError, TokenKind, UnauthenticatedReason, VerificationResult};
pub use utils::UtilError;
