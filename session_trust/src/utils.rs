use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
use ring::rand::SecureRandom;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum UtilError {
    #[error("Crypto error: {0}")]
    Crypto(String),

    #[error("Cookie error: {0}")]
    Cookie(String),
}

pub(crate) fn gen_random_bytes(len: usize) -> Result<Vec<u8>, UtilError> {
    let rng = ring::rand::SystemRandom::new();
    let mut bytes = vec![0u8; len];
    rng.fill(&mut bytes)
        .map_err(|_| UtilError::Crypto("Failed to generate random bytes".to_string()))?;
    Ok(bytes)
}

pub(crate) fn gen_random_string(len: usize) -> Result<String, UtilError> {
    gen_random_bytes(len).map(|bytes| URL_SAFE_NO_PAD.encode(bytes))
}

/// Build a `Set-Cookie` line for an http-only, site-scoped cookie.
pub(crate) fn build_cookie(name: &str, value: &str, max_age: u64, secure: bool) -> String {
    let mut cookie = format!("{name}={value}; HttpOnly; SameSite=Lax; Path=/; Max-Age={max_age}");
    if secure {
        cookie.push_str("; Secure");
    }
    cookie
}

/// Build a `Set-Cookie` line that deletes the named cookie.
pub(crate) fn build_clear_cookie(name: &str, secure: bool) -> String {
    build_cookie(name, "", 0, secure)
}

/// Check that a value only contains RFC 6265 cookie-octets.
pub(crate) fn validate_cookie_value(value: &str) -> Result<(), UtilError> {
    let valid = !value.is_empty()
        && value.bytes().all(|b| {
            matches!(b, 0x21 | 0x23..=0x2B | 0x2D..=0x3A | 0x3C..=0x5B | 0x5D..=0x7E)
        });
    if valid {
        Ok(())
    } else {
        Err(UtilError::Cookie("Invalid cookie value".to_string()))
    }
}
