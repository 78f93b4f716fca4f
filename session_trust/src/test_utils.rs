//! Shared fixtures for unit tests across the crate.

use http::HeaderMap;
use http::header::{COOKIE, HeaderValue, SET_COOKIE};

use crate::config::TrustConfig;
use crate::token::TokenCodec;

pub(crate) const TEST_SECRET: &str = "test-secret-test-secret-test-secret!";

/// Configuration with a fixed secret and non-secure cookies.
pub(crate) fn test_config() -> TrustConfig {
    TrustConfig::new(TEST_SECRET)
        .expect("test secret is long enough")
        .with_cookie_secure(false)
}

pub(crate) fn test_codec() -> TokenCodec {
    TokenCodec::new(&test_config())
}

/// Request headers carrying a single `Cookie` header.
pub(crate) fn request_with_cookies(cookies: &[(&str, &str)]) -> HeaderMap {
    let value = cookies
        .iter()
        .map(|(name, value)| format!("{name}={value}"))
        .collect::<Vec<_>>()
        .join("; ");
    let mut headers = HeaderMap::new();
    headers.insert(COOKIE, HeaderValue::from_str(&value).unwrap());
    headers
}

/// All `Set-Cookie` lines of a response as strings.
pub(crate) fn set_cookie_lines(headers: &HeaderMap) -> Vec<String> {
    headers
        .get_all(SET_COOKIE)
        .iter()
        .map(|value| value.to_str().unwrap().to_string())
        .collect()
}
