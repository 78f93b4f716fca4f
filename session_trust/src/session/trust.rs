use http::HeaderMap;

use crate::account::Identity;
use crate::config::{ConfigError, TrustConfig};
use crate::errors::TrustError;
use crate::store::{CookieJar, SessionStore};
use crate::token::{TokenCodec, VerificationResult};

use super::main;
use super::types::SettingsAuth;

/// Configuration and codec built together once at startup.
///
/// Both the edge gate and the API layer hold the same instance, so the two
/// never disagree about what a valid token is.
#[derive(Debug)]
pub struct SessionTrust {
    config: TrustConfig,
    codec: TokenCodec,
}

impl SessionTrust {
    pub fn new(config: TrustConfig) -> Self {
        let codec = TokenCodec::new(&config);
        Self { config, codec }
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        TrustConfig::from_env().map(Self::new)
    }

    pub fn config(&self) -> &TrustConfig {
        &self.config
    }

    pub fn codec(&self) -> &TokenCodec {
        &self.codec
    }

    /// A cookie jar over the trust cookies of an incoming request.
    pub fn cookie_jar(&self, headers: &HeaderMap) -> CookieJar {
        CookieJar::from_headers(&self.config, headers)
    }

    pub fn verify_session(&self, token: Option<&str>) -> VerificationResult {
        main::verify_session(&self.codec, token)
    }

    pub fn verify_settings_token(&self, token: Option<&str>, current: &Identity) -> SettingsAuth {
        main::verify_settings_token(&self.codec, token, current)
    }

    pub fn start_session<S: SessionStore + ?Sized>(
        &self,
        store: &mut S,
        identity: &Identity,
    ) -> Result<(), TrustError> {
        main::start_session(&self.codec, &self.config, store, identity)
    }

    pub fn grant_settings_token<S: SessionStore + ?Sized>(
        &self,
        store: &mut S,
        identity: &Identity,
    ) -> Result<(), TrustError> {
        main::grant_settings_token(&self.codec, &self.config, store, identity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{request_with_cookies, test_config};

    #[test]
    fn test_login_then_reauth_flow() {
        // Given a trust instance and a fresh jar
        let trust = SessionTrust::new(test_config());
        let alice = Identity::registered("alice");
        let mut jar = CookieJar::new(trust.config());

        // When alice logs in
        trust.start_session(&mut jar, &alice).unwrap();
        let session = jar.get_session().unwrap().to_string();

        // Then the next request sees her session but no re-auth
        let next = trust.cookie_jar(&request_with_cookies(&[("session", session.as_str())]));
        let identity = trust
            .verify_session(next.get_session())
            .into_identity()
            .unwrap();
        assert_eq!(identity, alice);
        assert!(
            !trust
                .verify_settings_token(next.get_settings_token(), &identity)
                .is_auth
        );

        // And after re-entering her password the settings token is honored
        let mut next = next;
        trust.grant_settings_token(&mut next, &identity).unwrap();
        assert!(
            trust
                .verify_settings_token(next.get_settings_token(), &identity)
                .is_auth
        );
    }
}
