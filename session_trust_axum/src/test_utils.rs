//! Fixtures shared by the router and middleware tests.

use std::sync::Arc;

use axum::body::{Body, to_bytes};
use axum::response::Response;
use http::HeaderMap;
use http::header::SET_COOKIE;
use session_trust::{
    AccountStore, Identity, InMemoryAccountStore, SessionTrust, TokenKind, TrustConfig,
};

use crate::config::GateConfig;
use crate::state::AuthState;

pub(crate) const TEST_SECRET: &str = "axum-test-secret-axum-test-secret!!";
pub(crate) const ALICE_PASSWORD: &str = "correct horse battery staple";
pub(crate) const PENDING_PASSWORD: &str = "halfway-there";

/// Accounts seeded into the store returned by [`test_state`].
pub(crate) struct Seeded {
    pub(crate) alice: Identity,
    pub(crate) pending: Identity,
}

/// Trust core with a fixed secret and non-secure cookies.
pub(crate) fn test_trust() -> SessionTrust {
    let config = TrustConfig::new(TEST_SECRET)
        .expect("test secret is long enough")
        .with_cookie_secure(false);
    SessionTrust::new(config)
}

/// State with non-secure cookies, default gate paths and two accounts:
/// a registered `alice` and a `pending` signup.
pub(crate) async fn test_state() -> (AuthState, Seeded) {
    let accounts = InMemoryAccountStore::new();
    let alice = accounts
        .insert_registered("alice", ALICE_PASSWORD)
        .await
        .unwrap();
    let pending = accounts
        .create_temporary("pending", PENDING_PASSWORD)
        .await
        .unwrap();

    let state = AuthState::new(test_trust(), Arc::new(accounts), GateConfig::default());
    (state, Seeded { alice, pending })
}

pub(crate) fn session_token_for(state: &AuthState, identity: &Identity) -> String {
    state
        .trust()
        .codec()
        .issue(identity, TokenKind::Session, 3600)
        .unwrap()
}

pub(crate) fn settings_token_for(state: &AuthState, identity: &Identity) -> String {
    state
        .trust()
        .codec()
        .issue(identity, TokenKind::Settings, 600)
        .unwrap()
}

/// A `Cookie` header value carrying a fresh session token.
pub(crate) fn session_cookie_for(state: &AuthState, identity: &Identity) -> String {
    format!(
        "{}={}",
        state.trust().config().session_cookie_name(),
        session_token_for(state, identity)
    )
}

pub(crate) fn set_cookie_lines(headers: &HeaderMap) -> Vec<String> {
    headers
        .get_all(SET_COOKIE)
        .iter()
        .map(|value| value.to_str().unwrap().to_string())
        .collect()
}

/// The value a response sets for `name`, if any.
pub(crate) fn set_cookie_value(headers: &HeaderMap, name: &str) -> Option<String> {
    let prefix = format!("{name}=");
    set_cookie_lines(headers).into_iter().find_map(|line| {
        line.strip_prefix(&prefix)
            .and_then(|rest| rest.split(';').next())
            .map(str::to_string)
    })
}

pub(crate) async fn body_string(response: Response) -> String {
    let bytes = to_bytes(response.into_body(), 64 * 1024).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

pub(crate) fn json_body(value: serde_json::Value) -> Body {
    Body::from(value.to_string())
}
