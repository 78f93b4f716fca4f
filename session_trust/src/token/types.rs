use std::fmt;

use serde::{Deserialize, Serialize};

use crate::account::{AccountState, Identity};
use crate::errors::ErrorCode;

use super::errors::TokenError;

/// Discriminates the two token kinds so one can never stand in for the other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    Session,
    Settings,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::Session => f.write_str("session"),
            TokenKind::Settings => f.write_str("settings"),
        }
    }
}

/// Claims embedded in every signed token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct TokenClaims {
    pub(crate) sub: String,
    pub(crate) state: AccountState,
    pub(crate) kind: TokenKind,
    pub(crate) iat: i64,
    pub(crate) exp: i64,
    pub(crate) jti: String,
}

impl TokenClaims {
    pub(crate) fn identity(&self) -> Identity {
        Identity {
            id: self.sub.clone(),
            state: self.state,
        }
    }
}

/// Why a token check did not authenticate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnauthenticatedReason {
    /// No token was presented.
    Missing,
    /// The token was presented but is expired, tampered, malformed or of the wrong kind.
    Rejected,
    /// The codec itself failed. The only case treated as a server fault.
    Internal,
}

impl UnauthenticatedReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            UnauthenticatedReason::Missing => "missing",
            UnauthenticatedReason::Rejected => "rejected",
            UnauthenticatedReason::Internal => "internal",
        }
    }
}

impl fmt::Display for UnauthenticatedReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&TokenError> for UnauthenticatedReason {
    fn from(err: &TokenError) -> Self {
        match err.code() {
            ErrorCode::TokenMissing => UnauthenticatedReason::Missing,
            ErrorCode::InternalVerificationError => UnauthenticatedReason::Internal,
            _ => UnauthenticatedReason::Rejected,
        }
    }
}

/// Outcome of checking a token. Always a value, never an error.
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use]
pub enum VerificationResult {
    Authenticated(Identity),
    Unauthenticated(UnauthenticatedReason),
}

impl VerificationResult {
    pub fn is_authenticated(&self) -> bool {
        matches!(self, VerificationResult::Authenticated(_))
    }

    pub fn identity(&self) -> Option<&Identity> {
        match self {
            VerificationResult::Authenticated(identity) => Some(identity),
            VerificationResult::Unauthenticated(_) => None,
        }
    }

    pub fn into_identity(self) -> Option<Identity> {
        match self {
            VerificationResult::Authenticated(identity) => Some(identity),
            VerificationResult::Unauthenticated(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_kind_serde() {
        assert_eq!(
            serde_json::to_string(&TokenKind::Session).unwrap(),
            "\"session\""
        );
        assert_eq!(
            serde_json::to_string(&TokenKind::Settings).unwrap(),
            "\"settings\""
        );
        assert_eq!(TokenKind::Settings.to_string(), "settings");
    }

    #[test]
    fn test_reason_collapses_expiry_and_signature() {
        assert_eq!(
            UnauthenticatedReason::from(&TokenError::Expired),
            UnauthenticatedReason::Rejected
        );
        assert_eq!(
            UnauthenticatedReason::from(&TokenError::InvalidSignature),
            UnauthenticatedReason::Rejected
        );
        assert_eq!(
            UnauthenticatedReason::from(&TokenError::Missing),
            UnauthenticatedReason::Missing
        );
        assert_eq!(
            UnauthenticatedReason::from(&TokenError::Internal("x".to_string())),
            UnauthenticatedReason::Internal
        );
    }

    #[test]
    fn test_verification_result_accessors() {
        let ok = VerificationResult::Authenticated(Identity::registered("u1"));
        assert!(ok.is_authenticated());
        assert_eq!(ok.identity().map(|i| i.id.as_str()), Some("u1"));
        assert_eq!(ok.into_identity(), Some(Identity::registered("u1")));

        let missing = VerificationResult::Unauthenticated(UnauthenticatedReason::Missing);
        assert!(!missing.is_authenticated());
        assert_eq!(missing.identity(), None);
    }
}
