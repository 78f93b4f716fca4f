use thiserror::Error;

use crate::errors::ErrorCode;

use super::types::TokenKind;

/// Detailed codec failure.
///
/// This type stays inside the codec for logging. Verifiers hand callers a
/// [`VerificationResult`](super::VerificationResult) where expiry and
/// signature failures look the same.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TokenError {
    #[error("Token missing")]
    Missing,

    #[error("Token expired")]
    Expired,

    #[error("Token issued in the future")]
    NotYetValid,

    #[error("Token signature invalid")]
    InvalidSignature,

    #[error("Token kind mismatch: expected {expected}, found {found}")]
    WrongKind {
        expected: TokenKind,
        found: TokenKind,
    },

    #[error("Malformed token: {0}")]
    Malformed(String),

    #[error("Invalid token ttl: {0}")]
    InvalidTtl(u64),

    #[error("Token internal error: {0}")]
    Internal(String),
}

impl TokenError {
    pub fn code(&self) -> ErrorCode {
        match self {
            TokenError::Missing => ErrorCode::TokenMissing,
            TokenError::Expired | TokenError::NotYetValid => ErrorCode::TokenExpired,
            TokenError::InvalidSignature
            | TokenError::WrongKind { .. }
            | TokenError::Malformed(_) => ErrorCode::TokenInvalidSignature,
            TokenError::InvalidTtl(_) | TokenError::Internal(_) => {
                ErrorCode::InternalVerificationError
            }
        }
    }
}

impl From<jsonwebtoken::errors::Error> for TokenError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        use jsonwebtoken::errors::ErrorKind;

        match err.kind() {
            ErrorKind::InvalidSignature => TokenError::InvalidSignature,
            ErrorKind::ExpiredSignature => TokenError::Expired,
            ErrorKind::ImmatureSignature => TokenError::NotYetValid,
            ErrorKind::InvalidEcdsaKey
            | ErrorKind::InvalidRsaKey(_)
            | ErrorKind::InvalidKeyFormat
            | ErrorKind::Crypto(_) => TokenError::Internal(err.to_string()),
            _ => TokenError::Malformed(err.to_string()),
        }
    }
}
