use std::fmt;

use thiserror::Error;

use crate::account::AccountError;
use crate::store::StoreError;
use crate::token::TokenError;

/// Stable codes for the failure taxonomy, used in logs.
///
/// Callers outside the codec never branch on these: expired and
/// bad-signature tokens are both reported as a plain rejection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    TokenMissing,
    TokenExpired,
    TokenInvalidSignature,
    IdentityMismatch,
    InternalVerificationError,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::TokenMissing => "TOKEN_MISSING",
            ErrorCode::TokenExpired => "TOKEN_EXPIRED",
            ErrorCode::TokenInvalidSignature => "TOKEN_INVALID_SIGNATURE",
            ErrorCode::IdentityMismatch => "IDENTITY_MISMATCH",
            ErrorCode::InternalVerificationError => "INTERNAL_VERIFICATION_ERROR",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors returned by the session lifecycle operations (issuing, storing).
///
/// Verification never returns this type; it yields a
/// [`VerificationResult`](crate::VerificationResult) instead.
#[derive(Debug, Error, Clone)]
pub enum TrustError {
    #[error("Token error: {0}")]
    Token(#[from] TokenError),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Account error: {0}")]
    Account(#[from] AccountError),
}
