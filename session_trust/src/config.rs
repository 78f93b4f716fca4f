//! Startup configuration for the trust core.
//!
//! The signing secret is loaded once into a [`TrustConfig`] and handed to the
//! codec. Nothing in the crate reads the environment at verification time.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

const DEFAULT_SESSION_TTL_SECS: u64 = 7 * 24 * 60 * 60;
const DEFAULT_SETTINGS_TTL_SECS: u64 = 10 * 60;
const DEFAULT_CLOCK_SKEW_SECS: u64 = 5;
const DEFAULT_SESSION_COOKIE_NAME: &str = "session";
const DEFAULT_SETTINGS_COOKIE_NAME: &str = "settings_token";

/// Minimum length of the HS256 signing secret.
pub const MIN_SECRET_LEN: usize = 32;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Missing required setting: {0}")]
    Missing(&'static str),

    #[error("Invalid value for {key}: {reason}")]
    Invalid { key: &'static str, reason: String },
}

/// Signing secret bytes. `Debug` never prints the contents.
#[derive(Clone, PartialEq, Eq)]
pub struct SecretBytes(Vec<u8>);

impl SecretBytes {
    pub fn new(bytes: impl Into<Vec<u8>>) -> Result<Self, ConfigError> {
        let bytes = bytes.into();
        if bytes.len() < MIN_SECRET_LEN {
            return Err(ConfigError::Invalid {
                key: "SESSION_TRUST_SECRET",
                reason: format!("must be at least {MIN_SECRET_LEN} bytes"),
            });
        }
        Ok(Self(bytes))
    }

    pub(crate) fn expose(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Debug for SecretBytes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SecretBytes([REDACTED; {}])", self.0.len())
    }
}

/// Process-wide trust configuration.
///
/// Build it with [`TrustConfig::new`] and the `with_*` methods, or from the
/// environment with [`TrustConfig::from_env`]:
///
/// | variable | default |
/// |----------|---------|
/// | `SESSION_TRUST_SECRET` | required, at least 32 bytes |
/// | `SESSION_TTL_SECS` | 604800 (7 days) |
/// | `SETTINGS_TOKEN_TTL_SECS` | 600 (10 minutes) |
/// | `SESSION_COOKIE_NAME` | `session` |
/// | `SETTINGS_COOKIE_NAME` | `settings_token` |
/// | `SESSION_COOKIE_SECURE` | `true` |
/// | `TOKEN_CLOCK_SKEW_SECS` | 5 |
#[derive(Debug, Clone)]
pub struct TrustConfig {
    secret: SecretBytes,
    session_ttl: u64,
    settings_ttl: u64,
    session_cookie_name: String,
    settings_cookie_name: String,
    cookie_secure: bool,
    clock_skew: u64,
}

impl TrustConfig {
    pub fn new(secret: impl Into<Vec<u8>>) -> Result<Self, ConfigError> {
        Ok(Self {
            secret: SecretBytes::new(secret)?,
            session_ttl: DEFAULT_SESSION_TTL_SECS,
            settings_ttl: DEFAULT_SETTINGS_TTL_SECS,
            session_cookie_name: DEFAULT_SESSION_COOKIE_NAME.to_string(),
            settings_cookie_name: DEFAULT_SETTINGS_COOKIE_NAME.to_string(),
            cookie_secure: true,
            clock_skew: DEFAULT_CLOCK_SKEW_SECS,
        })
    }

    /// Load the configuration from the process environment (and `.env`, if present).
    pub fn from_env() -> Result<Self, ConfigError> {
        let secret = dotenvy::var("SESSION_TRUST_SECRET")
            .map_err(|_| ConfigError::Missing("SESSION_TRUST_SECRET"))?;

        let config = Self::new(secret)?
            .with_session_ttl(env_or("SESSION_TTL_SECS", DEFAULT_SESSION_TTL_SECS)?)?
            .with_settings_ttl(env_or("SETTINGS_TOKEN_TTL_SECS", DEFAULT_SETTINGS_TTL_SECS)?)?
            .with_cookie_names(
                env_or("SESSION_COOKIE_NAME", DEFAULT_SESSION_COOKIE_NAME.to_string())?,
                env_or("SETTINGS_COOKIE_NAME", DEFAULT_SETTINGS_COOKIE_NAME.to_string())?,
            )?
            .with_cookie_secure(env_or("SESSION_COOKIE_SECURE", true)?)
            .with_clock_skew(env_or("TOKEN_CLOCK_SKEW_SECS", DEFAULT_CLOCK_SKEW_SECS)?);

        tracing::debug!(
            session_ttl = config.session_ttl,
            settings_ttl = config.settings_ttl,
            "Loaded trust configuration"
        );
        Ok(config)
    }

    pub fn with_session_ttl(mut self, secs: u64) -> Result<Self, ConfigError> {
        self.session_ttl = validate_ttl("SESSION_TTL_SECS", secs)?;
        Ok(self)
    }

    pub fn with_settings_ttl(mut self, secs: u64) -> Result<Self, ConfigError> {
        self.settings_ttl = validate_ttl("SETTINGS_TOKEN_TTL_SECS", secs)?;
        Ok(self)
    }

    pub fn with_cookie_names(
        mut self,
        session: impl Into<String>,
        settings: impl Into<String>,
    ) -> Result<Self, ConfigError> {
        let session = validate_cookie_name("SESSION_COOKIE_NAME", session.into())?;
        let settings = validate_cookie_name("SETTINGS_COOKIE_NAME", settings.into())?;
        if session == settings {
            return Err(ConfigError::Invalid {
                key: "SETTINGS_COOKIE_NAME",
                reason: "must differ from the session cookie name".to_string(),
            });
        }
        self.session_cookie_name = session;
        self.settings_cookie_name = settings;
        Ok(self)
    }

    pub fn with_cookie_secure(mut self, secure: bool) -> Self {
        self.cookie_secure = secure;
        self
    }

    pub fn with_clock_skew(mut self, secs: u64) -> Self {
        self.clock_skew = secs;
        self
    }

    pub(crate) fn secret(&self) -> &SecretBytes {
        &self.secret
    }

    pub fn session_ttl(&self) -> u64 {
        self.session_ttl
    }

    pub fn settings_ttl(&self) -> u64 {
        self.settings_ttl
    }

    pub fn session_cookie_name(&self) -> &str {
        &self.session_cookie_name
    }

    pub fn settings_cookie_name(&self) -> &str {
        &self.settings_cookie_name
    }

    pub fn cookie_secure(&self) -> bool {
        self.cookie_secure
    }

    pub fn clock_skew(&self) -> u64 {
        self.clock_skew
    }
}

fn env_or<T: FromStr>(key: &'static str, default: T) -> Result<T, ConfigError> {
    match dotenvy::var(key) {
        Ok(raw) => raw.trim().parse().map_err(|_| ConfigError::Invalid {
            key,
            reason: format!("cannot parse {raw:?}"),
        }),
        Err(_) => Ok(default),
    }
}

fn validate_ttl(key: &'static str, secs: u64) -> Result<u64, ConfigError> {
    // Expiry is computed in i64 unix seconds.
    if secs == 0 || secs > i32::MAX as u64 {
        return Err(ConfigError::Invalid {
            key,
            reason: format!("{secs} is out of range"),
        });
    }
    Ok(secs)
}

fn validate_cookie_name(key: &'static str, name: String) -> Result<String, ConfigError> {
    let valid = !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'));
    if !valid {
        return Err(ConfigError::Invalid {
            key,
            reason: format!("{name:?} is not a valid cookie name"),
        });
    }
    Ok(name)
}
