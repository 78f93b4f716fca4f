use axum::{
    Json,
    extract::State,
    response::{IntoResponse, Response},
};
use http::{HeaderMap, StatusCode};
use serde::Deserialize;

use session_trust::{Identity, SessionStore, SettingsAuth, complete_settings, end_session};

use super::error::IntoResponseError;
use super::session::AuthIdentity;
use super::state::AuthState;

#[derive(Deserialize)]
pub(crate) struct Credentials {
    account: String,
    password: String,
}

#[derive(Deserialize)]
pub(crate) struct ReauthRequest {
    password: String,
}

/// Check credentials and start a session.
pub(crate) async fn login(
    State(state): State<AuthState>,
    headers: HeaderMap,
    Json(credentials): Json<Credentials>,
) -> Result<(HeaderMap, Json<Identity>), (StatusCode, String)> {
    let identity = state
        .accounts()
        .authenticate(&credentials.account, &credentials.password)
        .await
        .into_response_error()?
        .ok_or_else(|| {
            tracing::debug!("Login failed");
            (StatusCode::UNAUTHORIZED, "Invalid credentials".to_string())
        })?;

    let mut jar = state.trust().cookie_jar(&headers);
    state
        .trust()
        .start_session(&mut jar, &identity)
        .into_response_error()?;

    Ok((jar.into_headers(), Json(identity)))
}

/// Remove both trust cookies. Works with or without a live session.
pub(crate) async fn logout(
    State(state): State<AuthState>,
    headers: HeaderMap,
) -> impl IntoResponse {
    let mut jar = state.trust().cookie_jar(&headers);
    end_session(&mut jar);
    (StatusCode::NO_CONTENT, jar.into_headers())
}

/// Whether the current session may change settings without a password prompt.
pub(crate) async fn settings_status(
    State(state): State<AuthState>,
    AuthIdentity(identity): AuthIdentity,
    headers: HeaderMap,
) -> Json<SettingsAuth> {
    let jar = state.trust().cookie_jar(&headers);
    Json(
        state
            .trust()
            .verify_settings_token(jar.get_settings_token(), &identity),
    )
}

/// Password re-entry for the logged-in user.
pub(crate) async fn settings_reauth(
    State(state): State<AuthState>,
    AuthIdentity(identity): AuthIdentity,
    headers: HeaderMap,
    Json(request): Json<ReauthRequest>,
) -> Result<Response, (StatusCode, String)> {
    let valid = state
        .accounts()
        .check_password(&identity.id, &request.password)
        .await
        .into_response_error()?;
    if !valid {
        tracing::debug!(user_id = %identity.id, "Settings re-auth refused");
        return Ok((StatusCode::FORBIDDEN, Json(SettingsAuth::denied())).into_response());
    }

    let mut jar = state.trust().cookie_jar(&headers);
    state
        .trust()
        .grant_settings_token(&mut jar, &identity)
        .into_response_error()?;

    Ok((jar.into_headers(), Json(SettingsAuth::granted())).into_response())
}

/// Close the settings window once the sensitive change is done.
pub(crate) async fn settings_complete(
    State(state): State<AuthState>,
    AuthIdentity(identity): AuthIdentity,
    headers: HeaderMap,
) -> impl IntoResponse {
    let mut jar = state.trust().cookie_jar(&headers);
    complete_settings(&mut jar);
    tracing::debug!(user_id = %identity.id, "Settings window closed");
    (StatusCode::NO_CONTENT, jar.into_headers())
}

/// Create a temporary account and give it a signup session.
pub(crate) async fn signup_start(
    State(state): State<AuthState>,
    headers: HeaderMap,
    Json(credentials): Json<Credentials>,
) -> Result<(StatusCode, HeaderMap, Json<Identity>), (StatusCode, String)> {
    let identity = state
        .accounts()
        .create_temporary(&credentials.account, &credentials.password)
        .await
        .into_response_error()?;

    let mut jar = state.trust().cookie_jar(&headers);
    state
        .trust()
        .start_session(&mut jar, &identity)
        .into_response_error()?;

    Ok((StatusCode::CREATED, jar.into_headers(), Json(identity)))
}

/// Finish signup: promote the account and replace the signup session with a
/// regular one.
pub(crate) async fn signup_complete(
    State(state): State<AuthState>,
    AuthIdentity(identity): AuthIdentity,
    headers: HeaderMap,
) -> Result<(HeaderMap, Json<Identity>), (StatusCode, String)> {
    let registered = state
        .accounts()
        .promote(&identity.id)
        .await
        .into_response_error()?;

    let mut jar = state.trust().cookie_jar(&headers);
    state
        .trust()
        .start_session(&mut jar, &registered)
        .into_response_error()?;

    tracing::info!(user_id = %registered.id, "Signup completed");
    Ok((jar.into_headers(), Json(registered)))
}
