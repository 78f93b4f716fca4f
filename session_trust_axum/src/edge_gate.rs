use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};

use session_trust::SessionStore;

use crate::state::AuthState;

/// How the edge gate treats a request path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteClass {
    /// Login and signup pages: pointless for someone already logged in.
    PublicOnly,
    /// Everything else. The gate never blocks these.
    Other,
}

/// Pre-routing gate that bounces logged-in users away from public-only pages.
///
/// Only the session cookie is consulted. The gate never writes cookies or
/// issues tokens, and it never denies a request: an invalid or missing
/// session just passes through so the page (or the API layer) can decide.
///
/// ```no_run
/// use axum::{Router, middleware::from_fn_with_state, routing::get};
/// use session_trust_axum::{AuthState, edge_gate};
///
/// fn app(state: AuthState) -> Router {
///     Router::new()
///         .route("/login", get(|| async { "login" }))
///         .layer(from_fn_with_state(state, edge_gate))
/// }
/// ```
pub async fn edge_gate(State(state): State<AuthState>, req: Request, next: Next) -> Response {
    if state.gate().classify(req.uri().path()) != RouteClass::PublicOnly {
        return next.run(req).await;
    }

    let jar = state.trust().cookie_jar(req.headers());
    match state.trust().verify_session(jar.get_session()).identity() {
        Some(identity) => {
            tracing::debug!(
                user_id = %identity.id,
                path = %req.uri().path(),
                "Logged-in user on public-only page, redirecting to {}",
                state.gate().root_path()
            );
            Redirect::to(state.gate().root_path()).into_response()
        }
        None => next.run(req).await,
    }
}
