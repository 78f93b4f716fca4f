use std::collections::{BTreeMap, HashMap};

use headers::{Cookie, HeaderMapExt};
use http::HeaderMap;
use http::header::{HeaderValue, SET_COOKIE};

use crate::config::TrustConfig;
use crate::utils::{build_clear_cookie, build_cookie, validate_cookie_value};

use super::types::{SessionStore, StoreError};

/// Cookie-backed [`SessionStore`] for a single request/response exchange.
///
/// Reads come from the request's `Cookie` header (and from writes made during
/// this exchange). Writes are collected as `Set-Cookie` lines, one per cookie
/// name with the last write winning, and are only emitted when the caller
/// copies [`CookieJar::headers`] into the response.
#[derive(Debug, Clone)]
pub struct CookieJar {
    session_cookie: String,
    settings_cookie: String,
    secure: bool,
    values: HashMap<String, String>,
    pending: BTreeMap<String, String>,
}

impl CookieJar {
    /// An empty jar, as for a request without cookies.
    pub fn new(config: &TrustConfig) -> Self {
        Self {
            session_cookie: config.session_cookie_name().to_string(),
            settings_cookie: config.settings_cookie_name().to_string(),
            secure: config.cookie_secure(),
            values: HashMap::new(),
            pending: BTreeMap::new(),
        }
    }

    /// A jar holding the trust cookies found in the request headers.
    pub fn from_headers(config: &TrustConfig, headers: &HeaderMap) -> Self {
        let mut jar = Self::new(config);
        let Some(cookies) = headers.typed_get::<Cookie>() else {
            tracing::trace!("No cookie header found");
            return jar;
        };

        for name in [jar.session_cookie.clone(), jar.settings_cookie.clone()] {
            if let Some(value) = cookies.get(&name).filter(|value| !value.is_empty()) {
                jar.values.insert(name, value.to_string());
            }
        }
        jar
    }

    /// `Set-Cookie` headers for every write made through this jar.
    pub fn headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        self.apply_to(&mut headers);
        headers
    }

    /// Consume the jar, keeping only its `Set-Cookie` headers.
    pub fn into_headers(self) -> HeaderMap {
        self.headers()
    }

    /// Append the pending `Set-Cookie` lines to an existing header map.
    pub fn apply_to(&self, headers: &mut HeaderMap) {
        for (name, line) in &self.pending {
            match HeaderValue::from_str(line) {
                Ok(value) => {
                    headers.append(SET_COOKIE, value);
                }
                Err(_) => tracing::error!("Failed to build Set-Cookie header for {name}"),
            }
        }
    }

    fn set(&mut self, name: String, token: &str, ttl_secs: u64) -> Result<(), StoreError> {
        validate_cookie_value(token).map_err(|_| StoreError::InvalidValue(name.clone()))?;
        let line = build_cookie(&name, token, ttl_secs, self.secure);
        self.values.insert(name.clone(), token.to_string());
        self.pending.insert(name, line);
        Ok(())
    }

    fn remove(&mut self, name: String) {
        self.values.remove(&name);
        let line = build_clear_cookie(&name, self.secure);
        self.pending.insert(name, line);
    }
}

impl SessionStore for CookieJar {
    fn set_session(&mut self, token: &str, ttl_secs: u64) -> Result<(), StoreError> {
        self.set(self.session_cookie.clone(), token, ttl_secs)
    }

    fn get_session(&self) -> Option<&str> {
        self.values.get(&self.session_cookie).map(String::as_str)
    }

    fn remove_session(&mut self) {
        self.remove(self.session_cookie.clone());
    }

    fn set_settings_token(&mut self, token: &str, ttl_secs: u64) -> Result<(), StoreError> {
        self.set(self.settings_cookie.clone(), token, ttl_secs)
    }

    fn get_settings_token(&self) -> Option<&str> {
        self.values.get(&self.settings_cookie).map(String::as_str)
    }

    fn remove_settings_token(&mut self) {
        self.remove(self.settings_cookie.clone());
    }
}
