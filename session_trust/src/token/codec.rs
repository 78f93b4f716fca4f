use std::fmt;

use chrono::{DateTime, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};

use crate::account::Identity;
use crate::config::TrustConfig;
use crate::utils::gen_random_string;

use super::errors::TokenError;
use super::types::{TokenClaims, TokenKind, UnauthenticatedReason, VerificationResult};

const NONCE_LEN: usize = 16;

/// Issues and verifies HS256-signed session and settings tokens.
///
/// This is the only holder of the signing secret. Build one at startup and
/// share it (behind an `Arc`) between the edge gate and the API layer.
pub struct TokenCodec {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    header: Header,
    validation: Validation,
    clock_skew: i64,
}

impl fmt::Debug for TokenCodec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenCodec")
            .field("algorithm", &self.header.alg)
            .field("clock_skew", &self.clock_skew)
            .finish_non_exhaustive()
    }
}

impl TokenCodec {
    pub fn new(config: &TrustConfig) -> Self {
        let secret = config.secret().expose();

        let mut validation = Validation::new(Algorithm::HS256);
        // Expiry is checked in `decode_at` against the caller's clock.
        validation.validate_exp = false;
        validation.validate_aud = false;
        validation.set_required_spec_claims(&["exp", "sub"]);

        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            header: Header::new(Algorithm::HS256),
            validation,
            clock_skew: i64::try_from(config.clock_skew()).unwrap_or(i64::MAX),
        }
    }

    /// Issue a token of `kind` for `identity`, valid for `ttl_secs` from now.
    pub fn issue(
        &self,
        identity: &Identity,
        kind: TokenKind,
        ttl_secs: u64,
    ) -> Result<String, TokenError> {
        self.issue_at(identity, kind, ttl_secs, Utc::now())
    }

    /// Issue a token as if the current time were `now`.
    pub fn issue_at(
        &self,
        identity: &Identity,
        kind: TokenKind,
        ttl_secs: u64,
        now: DateTime<Utc>,
    ) -> Result<String, TokenError> {
        if identity.id.is_empty() {
            return Err(TokenError::Malformed("empty subject".to_string()));
        }

        let ttl = i64::try_from(ttl_secs)
            .ok()
            .filter(|ttl| *ttl > 0)
            .ok_or(TokenError::InvalidTtl(ttl_secs))?;
        let iat = now.timestamp();
        let exp = iat
            .checked_add(ttl)
            .ok_or(TokenError::InvalidTtl(ttl_secs))?;
        let jti = gen_random_string(NONCE_LEN).map_err(|e| TokenError::Internal(e.to_string()))?;

        let claims = TokenClaims {
            sub: identity.id.clone(),
            state: identity.state,
            kind,
            iat,
            exp,
            jti,
        };

        jsonwebtoken::encode(&self.header, &claims, &self.encoding_key)
            .map_err(|e| TokenError::Internal(e.to_string()))
    }

    /// Verify a token of the expected kind against the current time.
    pub fn verify(&self, token: &str, expected: TokenKind) -> VerificationResult {
        self.verify_at(token, expected, Utc::now())
    }

    /// Verify a token as if the current time were `now`.
    ///
    /// Every failure is folded into [`VerificationResult::Unauthenticated`];
    /// the detailed cause is only logged.
    pub fn verify_at(
        &self,
        token: &str,
        expected: TokenKind,
        now: DateTime<Utc>,
    ) -> VerificationResult {
        match self.decode_at(token, expected, now) {
            Ok(claims) => VerificationResult::Authenticated(claims.identity()),
            Err(err) => {
                let reason = UnauthenticatedReason::from(&err);
                if reason == UnauthenticatedReason::Internal {
                    tracing::warn!(
                        code = %err.code(),
                        %expected,
                        "Token verification failed: {err}"
                    );
                } else {
                    tracing::debug!(code = %err.code(), %expected, "Token rejected: {err}");
                }
                VerificationResult::Unauthenticated(reason)
            }
        }
    }

    pub(crate) fn decode_at(
        &self,
        token: &str,
        expected: TokenKind,
        now: DateTime<Utc>,
    ) -> Result<TokenClaims, TokenError> {
        if token.trim().is_empty() {
            return Err(TokenError::Missing);
        }

        let claims =
            jsonwebtoken::decode::<TokenClaims>(token, &self.decoding_key, &self.validation)?
                .claims;

        if claims.kind != expected {
            return Err(TokenError::WrongKind {
                expected,
                found: claims.kind,
            });
        }
        if claims.exp <= claims.iat {
            return Err(TokenError::Malformed("expiry precedes issue time".to_string()));
        }

        let now = now.timestamp();
        if now >= claims.exp {
            return Err(TokenError::Expired);
        }
        if claims.iat > now.saturating_add(self.clock_skew) {
            return Err(TokenError::NotYetValid);
        }

        Ok(claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{TEST_SECRET, test_codec, test_config};
    use chrono::Duration;
    use proptest::prelude::*;

    fn fixed_now() -> DateTime<Utc> {
        DateTime::from_timestamp(1_700_000_000, 0).unwrap()
    }

    fn rejected() -> VerificationResult {
        VerificationResult::Unauthenticated(UnauthenticatedReason::Rejected)
    }

    /// Replace the character at `index` of the signature segment.
    fn tamper_signature(token: &str, index: usize) -> String {
        let (head, sig) = token.rsplit_once('.').unwrap();
        let mut chars: Vec<char> = sig.chars().collect();
        let i = index % chars.len();
        chars[i] = if chars[i] == 'A' { 'B' } else { 'A' };
        format!("{head}.{}", chars.into_iter().collect::<String>())
    }

    #[test]
    fn test_issue_then_verify_session() {
        // Given a codec and a registered identity
        let codec = test_codec();
        let alice = Identity::registered("alice");

        // When a session token is issued and verified right away
        let token = codec.issue(&alice, TokenKind::Session, 3600).unwrap();
        let result = codec.verify(&token, TokenKind::Session);

        // Then the same identity is authenticated
        assert_eq!(result, VerificationResult::Authenticated(alice));
    }

    #[test]
    fn test_temporary_state_survives_round_trip() {
        let codec = test_codec();
        let pending = Identity::temporary("pending-user");

        let token = codec.issue(&pending, TokenKind::Session, 60).unwrap();

        assert_eq!(
            codec.verify(&token, TokenKind::Session),
            VerificationResult::Authenticated(pending)
        );
    }

    #[test]
    fn test_token_has_three_segments() {
        let codec = test_codec();
        let token = codec
            .issue(&Identity::registered("alice"), TokenKind::Session, 60)
            .unwrap();
        assert_eq!(token.split('.').count(), 3);
    }

    #[test]
    fn test_issuance_includes_nonce() {
        let codec = test_codec();
        let alice = Identity::registered("alice");
        let now = fixed_now();

        let a = codec.issue_at(&alice, TokenKind::Session, 60, now).unwrap();
        let b = codec.issue_at(&alice, TokenKind::Session, 60, now).unwrap();

        assert_ne!(a, b);
        let claims_a = codec.decode_at(&a, TokenKind::Session, now).unwrap();
        let claims_b = codec.decode_at(&b, TokenKind::Session, now).unwrap();
        assert_eq!(claims_a.iat, claims_b.iat);
        assert_eq!(claims_a.exp, claims_b.exp);
        assert_ne!(claims_a.jti, claims_b.jti);
    }

    #[test]
    fn test_zero_ttl_rejected() {
        let codec = test_codec();
        let result = codec.issue(&Identity::registered("alice"), TokenKind::Session, 0);
        assert_eq!(result.unwrap_err(), TokenError::InvalidTtl(0));
    }

    #[test]
    fn test_huge_ttl_rejected() {
        let codec = test_codec();
        let result = codec.issue(&Identity::registered("alice"), TokenKind::Session, u64::MAX);
        assert_eq!(result.unwrap_err(), TokenError::InvalidTtl(u64::MAX));
    }

    #[test]
    fn test_empty_subject_rejected() {
        let codec = test_codec();
        let result = codec.issue(&Identity::registered(""), TokenKind::Session, 60);
        assert!(matches!(result, Err(TokenError::Malformed(_))));
    }

    #[test]
    fn test_expiry_boundary() {
        // Given a token issued at a fixed time with a 60 second ttl
        let codec = test_codec();
        let alice = Identity::registered("alice");
        let now = fixed_now();
        let token = codec.issue_at(&alice, TokenKind::Session, 60, now).unwrap();

        // Then it is accepted one second before expiry
        assert!(
            codec
                .verify_at(&token, TokenKind::Session, now + Duration::seconds(59))
                .is_authenticated()
        );

        // And rejected at and after expiry, regardless of clock skew
        assert_eq!(
            codec.verify_at(&token, TokenKind::Session, now + Duration::seconds(60)),
            rejected()
        );
        assert_eq!(
            codec.verify_at(&token, TokenKind::Session, now + Duration::days(30)),
            rejected()
        );
        assert_eq!(
            codec.decode_at(&token, TokenKind::Session, now + Duration::seconds(60)),
            Err(TokenError::Expired)
        );
    }

    #[test]
    fn test_future_issue_time_within_skew() {
        let codec = TokenCodec::new(&test_config().with_clock_skew(5));
        let alice = Identity::registered("alice");
        let now = fixed_now();
        let token = codec
            .issue_at(&alice, TokenKind::Session, 600, now + Duration::seconds(5))
            .unwrap();

        assert!(codec.verify_at(&token, TokenKind::Session, now).is_authenticated());
    }

    #[test]
    fn test_future_issue_time_beyond_skew() {
        let codec = TokenCodec::new(&test_config().with_clock_skew(5));
        let alice = Identity::registered("alice");
        let now = fixed_now();
        let token = codec
            .issue_at(&alice, TokenKind::Session, 600, now + Duration::seconds(6))
            .unwrap();

        assert_eq!(
            codec.decode_at(&token, TokenKind::Session, now),
            Err(TokenError::NotYetValid)
        );
        assert_eq!(codec.verify_at(&token, TokenKind::Session, now), rejected());
    }

    #[test]
    fn test_wrong_kind_rejected() {
        // Given a settings token
        let codec = test_codec();
        let alice = Identity::registered("alice");
        let settings = codec.issue(&alice, TokenKind::Settings, 60).unwrap();

        // When it is presented as a session token
        let result = codec.verify(&settings, TokenKind::Session);

        // Then it is rejected
        assert_eq!(result, rejected());
        assert!(matches!(
            codec.decode_at(&settings, TokenKind::Session, Utc::now()),
            Err(TokenError::WrongKind {
                expected: TokenKind::Session,
                found: TokenKind::Settings
            })
        ));

        // And the opposite direction is rejected too
        let session = codec.issue(&alice, TokenKind::Session, 60).unwrap();
        assert_eq!(codec.verify(&session, TokenKind::Settings), rejected());
    }

    #[test]
    fn test_other_secret_rejected() {
        let codec = test_codec();
        let other = TokenCodec::new(
            &TrustConfig::new("another-secret-another-secret-0123").unwrap(),
        );
        let token = other
            .issue(&Identity::registered("alice"), TokenKind::Session, 60)
            .unwrap();

        assert_eq!(codec.verify(&token, TokenKind::Session), rejected());
        assert_eq!(
            codec.decode_at(&token, TokenKind::Session, Utc::now()),
            Err(TokenError::InvalidSignature)
        );
    }

    #[test]
    fn test_tampered_payload_rejected() {
        // Given a token for alice whose payload is swapped for one naming bob
        let codec = test_codec();
        let token = codec
            .issue(&Identity::registered("alice"), TokenKind::Session, 60)
            .unwrap();
        let forged_for_bob = codec
            .issue(&Identity::registered("bob"), TokenKind::Session, 60)
            .unwrap();
        let parts: Vec<&str> = token.split('.').collect();
        let bob_parts: Vec<&str> = forged_for_bob.split('.').collect();
        let spliced = format!("{}.{}.{}", parts[0], bob_parts[1], parts[2]);

        // Then the signature no longer matches
        assert_eq!(codec.verify(&spliced, TokenKind::Session), rejected());
    }

    #[test]
    fn test_unsigned_token_rejected() {
        use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};

        let codec = test_codec();
        let header = URL_SAFE_NO_PAD.encode(r#"{"alg":"none","typ":"JWT"}"#);
        let payload = URL_SAFE_NO_PAD.encode(
            r#"{"sub":"alice","state":"registered","kind":"session","iat":1,"exp":99999999999,"jti":"x"}"#,
        );
        let token = format!("{header}.{payload}.");

        assert_eq!(codec.verify(&token, TokenKind::Session), rejected());
    }

    #[test]
    fn test_garbage_and_empty_input() {
        let codec = test_codec();
        assert_eq!(codec.verify("not-a-token", TokenKind::Session), rejected());
        assert_eq!(codec.verify("a.b.c", TokenKind::Session), rejected());
        assert_eq!(
            codec.verify("", TokenKind::Session),
            VerificationResult::Unauthenticated(UnauthenticatedReason::Missing)
        );
    }

    #[test]
    fn test_debug_hides_keys() {
        let printed = format!("{:?}", test_codec());
        assert!(printed.contains("TokenCodec"));
        assert!(!printed.contains(TEST_SECRET));
    }

    proptest! {
        /// verify(issue(identity, kind, ttl)) authenticates the same identity.
        #[test]
        fn prop_round_trip(
            id in "[a-zA-Z0-9_-]{1,64}",
            temporary in proptest::bool::ANY,
            settings in proptest::bool::ANY,
            ttl in 1u64..=(365 * 24 * 3600)
        ) {
            let codec = test_codec();
            let identity = if temporary {
                Identity::temporary(id)
            } else {
                Identity::registered(id)
            };
            let kind = if settings { TokenKind::Settings } else { TokenKind::Session };
            let now = fixed_now();

            let token = codec.issue_at(&identity, kind, ttl, now).unwrap();

            prop_assert_eq!(
                codec.verify_at(&token, kind, now),
                VerificationResult::Authenticated(identity)
            );
        }

        /// Once iat + ttl is reached the token never verifies again.
        #[test]
        fn prop_monotonic_expiry(
            ttl in 1u64..=86_400,
            after in 0i64..=10_000_000
        ) {
            let codec = test_codec();
            let now = fixed_now();
            let token = codec
                .issue_at(&Identity::registered("alice"), TokenKind::Session, ttl, now)
                .unwrap();

            let later = now + Duration::seconds(ttl as i64 + after);
            prop_assert_eq!(codec.verify_at(&token, TokenKind::Session, later), rejected());
        }

        /// Changing any character of the signature segment breaks verification.
        #[test]
        fn prop_signature_tamper_evident(index in 0usize..64) {
            let codec = test_codec();
            let token = codec
                .issue(&Identity::registered("alice"), TokenKind::Session, 3600)
                .unwrap();

            let tampered = tamper_signature(&token, index);
            prop_assert_ne!(&tampered, &token);
            prop_assert_eq!(codec.verify(&tampered, TokenKind::Session), rejected());
        }
    }
}
