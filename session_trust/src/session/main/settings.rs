use crate::account::Identity;
use crate::errors::ErrorCode;
use crate::session::types::SettingsAuth;
use crate::token::{TokenCodec, TokenKind, VerificationResult};

/// Decide whether `current` may perform a sensitive settings change without
/// re-entering its password in this request.
///
/// `current` must be the identity resolved from the session token of the same
/// request. A settings token bound to any other identity is refused, so a
/// token left behind by a previous login on the same device is worthless.
/// Every refusal looks the same to the caller. Nothing is renewed or revoked.
pub fn verify_settings_token(
    codec: &TokenCodec,
    token: Option<&str>,
    current: &Identity,
) -> SettingsAuth {
    let Some(token) = token else {
        tracing::debug!(
            code = %ErrorCode::TokenMissing,
            user_id = %current.id,
            "No settings token"
        );
        return SettingsAuth::denied();
    };

    match codec.verify(token, TokenKind::Settings) {
        VerificationResult::Authenticated(bound) if bound.id == current.id => {
            SettingsAuth::granted()
        }
        VerificationResult::Authenticated(_) => {
            tracing::debug!(
                code = %ErrorCode::IdentityMismatch,
                user_id = %current.id,
                "Settings token bound to another identity"
            );
            SettingsAuth::denied()
        }
        VerificationResult::Unauthenticated(reason) => {
            tracing::debug!(%reason, user_id = %current.id, "Settings token not accepted");
            SettingsAuth::denied()
        }
    }
}
