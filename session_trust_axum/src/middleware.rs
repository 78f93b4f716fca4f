use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use axum_extra::headers::{Authorization, HeaderMapExt, authorization::Bearer};
use http::HeaderMap;

use session_trust::{
    AccountState, CookieJar, Identity, SessionStore, UnauthenticatedReason, VerificationResult,
};

use super::error::AuthRejection;
use super::state::AuthState;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TokenSource {
    Bearer,
    Cookie,
}

// A bearer token wins over the cookie when both are present
fn session_token(headers: &HeaderMap, jar: &CookieJar) -> Option<(String, TokenSource)> {
    headers
        .typed_get::<Authorization<Bearer>>()
        .map(|auth| (auth.token().to_string(), TokenSource::Bearer))
        .or_else(|| {
            jar.get_session()
                .map(|token| (token.to_string(), TokenSource::Cookie))
        })
}

/// Verify the request's session token and confirm the identity with the
/// account directory. The directory's current state is authoritative, so a
/// promoted or removed account is seen immediately.
///
/// A rejected session cookie is removed through `jar`; the caller sends the
/// jar's `Set-Cookie` headers with the rejection.
pub(crate) async fn resolve_identity(
    state: &AuthState,
    headers: &HeaderMap,
    jar: &mut CookieJar,
    required: AccountState,
) -> Result<Identity, AuthRejection> {
    let token = session_token(headers, jar);
    let source = token.as_ref().map(|(_, source)| *source);

    let claimed = match state
        .trust()
        .verify_session(token.as_ref().map(|(token, _)| token.as_str()))
    {
        VerificationResult::Authenticated(identity) => identity,
        VerificationResult::Unauthenticated(UnauthenticatedReason::Internal) => {
            tracing::warn!("Session verification failed internally");
            return Err(AuthRejection::Internal);
        }
        VerificationResult::Unauthenticated(UnauthenticatedReason::Rejected) => {
            tracing::debug!(?source, "Session token rejected");
            if source == Some(TokenSource::Cookie) {
                jar.remove_session();
            }
            return Err(AuthRejection::Unauthorized);
        }
        VerificationResult::Unauthenticated(UnauthenticatedReason::Missing) => {
            tracing::debug!("No session token presented");
            return Err(AuthRejection::Unauthorized);
        }
    };

    let identity = match state.accounts().get_identity(&claimed.id).await {
        Ok(Some(identity)) => identity,
        Ok(None) => {
            tracing::debug!(user_id = %claimed.id, "Session for unknown account");
            return Err(AuthRejection::Unauthorized);
        }
        Err(e) => {
            tracing::warn!(user_id = %claimed.id, "Account lookup failed: {e}");
            return Err(AuthRejection::Internal);
        }
    };

    if identity.state != required {
        tracing::debug!(
            user_id = %identity.id,
            state = ?identity.state,
            required = ?required,
            "Identity state not accepted here"
        );
        return Err(AuthRejection::Unauthorized);
    }

    Ok(identity)
}

async fn authenticate(
    state: AuthState,
    mut req: Request,
    next: Next,
    required: AccountState,
) -> Response {
    let mut jar = state.trust().cookie_jar(req.headers());
    let result = resolve_identity(&state, req.headers(), &mut jar, required).await;
    match result {
        Ok(identity) => {
            tracing::trace!(user_id = %identity.id, "Request authenticated");
            req.extensions_mut().insert(identity);
            next.run(req).await
        }
        Err(rejection) => {
            let mut response = rejection.into_response();
            jar.apply_to(response.headers_mut());
            response
        }
    }
}

/// Authentication layer for routes that need a fully registered user.
///
/// The session token is read from `Authorization: Bearer` first, then from
/// the session cookie. On success the [`Identity`] is stored in the request
/// extensions (see [`AuthIdentity`](crate::AuthIdentity)); on failure the
/// request ends here with `401` (or `500` if the verifier itself failed).
pub async fn require_session(State(state): State<AuthState>, req: Request, next: Next) -> Response {
    authenticate(state, req, next, AccountState::Registered).await
}

/// Same as [`require_session`] but only admits identities that are still in
/// the temporary signup state.
pub async fn require_signup_session(
    State(state): State<AuthState>,
    req: Request,
    next: Next,
) -> Response {
    authenticate(state, req, next, AccountState::TemporarySignup).await
}

/// Gate for sensitive settings changes. Must run after [`require_session`].
///
/// Without a settings token bound to the session's identity the request is
/// answered with `403 {"isAuth": false}` and the client should ask for the
/// password again.
pub async fn require_settings_reauth(
    State(state): State<AuthState>,
    req: Request,
    next: Next,
) -> Response {
    let Some(identity) = req.extensions().get::<Identity>().cloned() else {
        tracing::error!("Settings gate reached without an authenticated identity");
        return AuthRejection::Unauthorized.into_response();
    };

    let jar = state.trust().cookie_jar(req.headers());
    let auth = state
        .trust()
        .verify_settings_token(jar.get_settings_token(), &identity);
    if !auth.is_auth {
        tracing::debug!(user_id = %identity.id, "Settings change needs re-authentication");
        return AuthRejection::ReauthRequired.into_response();
    }

    next.run(req).await
}
