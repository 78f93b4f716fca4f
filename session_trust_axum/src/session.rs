use axum::extract::{FromRequestParts, OptionalFromRequestParts};
use http::request::Parts;

use session_trust::Identity;

use super::error::AuthRejection;

/// The identity resolved by the authentication layer, as an extractor.
///
/// Only usable on routes behind [`require_session`](crate::require_session)
/// or [`require_signup_session`](crate::require_signup_session); the extractor
/// reads what the middleware stored and never verifies tokens itself.
///
/// ```no_run
/// use axum::{Router, middleware::from_fn_with_state, routing::get};
/// use session_trust_axum::{AuthIdentity, AuthState, require_session};
///
/// async fn me(AuthIdentity(identity): AuthIdentity) -> String {
///     identity.id
/// }
///
/// fn app(state: AuthState) -> Router {
///     Router::new()
///         .route("/me", get(me))
///         .route_layer(from_fn_with_state(state, require_session))
/// }
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuthIdentity(pub Identity);

impl<S> FromRequestParts<S> for AuthIdentity
where
    S: Send + Sync,
{
    type Rejection = AuthRejection;

    async fn from_request_parts(parts: &mut Parts, _: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Identity>()
            .cloned()
            .map(AuthIdentity)
            .ok_or_else(|| {
                tracing::debug!("No authenticated identity in request extensions");
                AuthRejection::Unauthorized
            })
    }
}

impl<S> OptionalFromRequestParts<S> for AuthIdentity
where
    S: Send + Sync,
{
    type Rejection = AuthRejection;

    async fn from_request_parts(
        parts: &mut Parts,
        _: &S,
    ) -> Result<Option<Self>, Self::Rejection> {
        Ok(parts.extensions.get::<Identity>().cloned().map(AuthIdentity))
    }
}
