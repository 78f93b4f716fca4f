use axum::{
    Json,
    response::{IntoResponse, Response},
};
use http::StatusCode;
use session_trust::{AccountError, SettingsAuth, TrustError};

/// Terminal outcome of an authentication stage.
///
/// Bodies are deliberately generic: the client never learns whether a token
/// was missing, expired or forged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthRejection {
    /// 401 with a generic message.
    Unauthorized,
    /// 403 with `{"isAuth": false}`; the client should prompt for the password.
    ReauthRequired,
    /// 500; the verifier itself failed.
    Internal,
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        match self {
            AuthRejection::Unauthorized => {
                (StatusCode::UNAUTHORIZED, "Unauthorized").into_response()
            }
            AuthRejection::ReauthRequired => {
                (StatusCode::FORBIDDEN, Json(SettingsAuth::denied())).into_response()
            }
            AuthRejection::Internal => {
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error").into_response()
            }
        }
    }
}

/// Helper trait for converting errors to a standard response error format
pub(crate) trait IntoResponseError<T> {
    fn into_response_error(self) -> Result<T, (StatusCode, String)>;
}

impl<T, E> IntoResponseError<T> for Result<T, E>
where
    E: Into<TrustError>,
{
    fn into_response_error(self) -> Result<T, (StatusCode, String)> {
        self.map_err(|e| {
            let err: TrustError = e.into();
            match err {
                TrustError::Account(AccountError::AlreadyExists(_)) => {
                    (StatusCode::CONFLICT, "Account already exists".to_string())
                }
                TrustError::Account(AccountError::NotFound(_)) => {
                    (StatusCode::UNAUTHORIZED, "Unauthorized".to_string())
                }
                _ => {
                    tracing::error!("Request failed: {err}");
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "Internal Server Error".to_string(),
                    )
                }
            }
        })
    }
}
