//! session_trust_axum - Axum integration for session-trust
//!
//! Provides the two request stages built on the shared session verifier:
//! the redirect-only [`edge_gate`] and the authentication layer
//! ([`require_session`], [`require_signup_session`],
//! [`require_settings_reauth`]), plus the [`auth_router`] with login, logout,
//! settings re-auth and signup-session endpoints.

mod config;
mod edge_gate;
mod error;
mod handlers;
mod middleware;
mod router;
mod session;
mod state;

#[cfg(test)]
mod test_utils;

pub use config::GateConfig;
pub use edge_gate::{RouteClass, edge_gate};
pub use error::AuthRejection;
pub use middleware::{require_session, require_settings_reauth, require_signup_session};
pub use router::auth_router;
pub use session::AuthIdentity;
pub use state::AuthState;

// Re-export the core types handlers need alongside the middleware
pub use session_trust::{
    AccountState, AccountStore, CookieJar, Identity, InMemoryAccountStore, SessionStore,
    SessionTrust, SettingsAuth, TrustConfig,
};
