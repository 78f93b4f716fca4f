//! Router for the authentication endpoints

use axum::{
    Router,
    middleware::from_fn_with_state,
    routing::{get, post},
};

use super::handlers::{
    login, logout, settings_complete, settings_reauth, settings_status, signup_complete,
    signup_start,
};
use super::middleware::{require_session, require_signup_session};
use super::state::AuthState;

/// Create the router for login, logout, settings re-auth and signup.
///
/// Routes carry no prefix; mount the router with `nest("/auth", ...)`:
/// - `POST /login`, `POST /logout`
/// - `GET /settings`, `POST /settings/reauth`, `DELETE /settings` (session required)
/// - `POST /signup/start`, `POST /signup/complete` (signup session required)
pub fn auth_router(state: AuthState) -> Router {
    let settings = Router::new()
        .route("/settings", get(settings_status).delete(settings_complete))
        .route("/settings/reauth", post(settings_reauth))
        .route_layer(from_fn_with_state(state.clone(), require_session));

    let signup = Router::new()
        .route("/signup/complete", post(signup_complete))
        .route_layer(from_fn_with_state(state.clone(), require_signup_session));

    Router::new()
        .route("/login", post(login))
        .route("/logout", post(logout))
        .route("/signup/start", post(signup_start))
        .merge(settings)
        .merge(signup)
        .with_state(state)
}
