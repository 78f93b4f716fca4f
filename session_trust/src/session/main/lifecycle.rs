use crate::account::Identity;
use crate::config::TrustConfig;
use crate::errors::TrustError;
use crate::store::SessionStore;
use crate::token::{TokenCodec, TokenKind, VerificationResult};

/// Issue a fresh session token for `identity` and store it.
///
/// Used at login and whenever the signup flow advances (renewal replaces the
/// old token). Any settings token already in the store is dropped: it belongs
/// to whatever session came before.
#[tracing::instrument(skip_all, fields(user_id = %identity.id))]
pub fn start_session<S: SessionStore + ?Sized>(
    codec: &TokenCodec,
    config: &TrustConfig,
    store: &mut S,
    identity: &Identity,
) -> Result<(), TrustError> {
    let token = codec.issue(identity, TokenKind::Session, config.session_ttl())?;
    store.set_session(&token, config.session_ttl())?;
    store.remove_settings_token();

    tracing::info!(state = ?identity.state, "Session started");
    Ok(())
}

/// Record a successful password re-entry for `identity`.
///
/// The caller must already have checked the password and resolved `identity`
/// from the current session.
#[tracing::instrument(skip_all, fields(user_id = %identity.id))]
pub fn grant_settings_token<S: SessionStore + ?Sized>(
    codec: &TokenCodec,
    config: &TrustConfig,
    store: &mut S,
    identity: &Identity,
) -> Result<(), TrustError> {
    let token = codec.issue(identity, TokenKind::Settings, config.settings_ttl())?;
    store.set_settings_token(&token, config.settings_ttl())?;

    tracing::debug!(ttl = config.settings_ttl(), "Settings token granted");
    Ok(())
}

/// Drop the settings token once the sensitive change is done.
pub fn complete_settings<S: SessionStore + ?Sized>(store: &mut S) {
    store.remove_settings_token();
}

/// Log out: remove both tokens. Safe to call without an active session.
pub fn end_session<S: SessionStore + ?Sized>(store: &mut S) {
    store.remove_session();
    store.remove_settings_token();
    tracing::info!("Session ended");
}

/// Resolve the identity a real-time connection may act as.
///
/// Only fully registered identities may open a connection.
pub fn authorize_connection(codec: &TokenCodec, token: &str) -> Option<Identity> {
    match codec.verify(token, TokenKind::Session) {
        VerificationResult::Authenticated(identity) if identity.is_registered() => Some(identity),
        VerificationResult::Authenticated(identity) => {
            tracing::debug!(user_id = %identity.id, "Temporary identity refused for connection");
            None
        }
        VerificationResult::Unauthenticated(_) => None,
    }
}
