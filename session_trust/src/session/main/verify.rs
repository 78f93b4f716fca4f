use crate::errors::ErrorCode;
use crate::token::{TokenCodec, TokenKind, UnauthenticatedReason, VerificationResult};

/// Check a session token and resolve the identity it was issued to.
///
/// Pure: an invalid token is reported, not removed. Callers that want to
/// clear a dead cookie call [`SessionStore::remove_session`] themselves, so
/// the edge gate can run this on every navigation without writing cookies.
///
/// Expired and tampered tokens produce the same
/// [`UnauthenticatedReason::Rejected`].
///
/// [`SessionStore::remove_session`]: crate::SessionStore::remove_session
pub fn verify_session(codec: &TokenCodec, token: Option<&str>) -> VerificationResult {
    let Some(token) = token else {
        tracing::trace!(code = %ErrorCode::TokenMissing, "No session token presented");
        return VerificationResult::Unauthenticated(UnauthenticatedReason::Missing);
    };

    codec.verify(token, TokenKind::Session)
}
