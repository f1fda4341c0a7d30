//! Session cookies for server side requests to the backend.
//!
//! A `SessionContext` is created per inbound request from the request's
//! cookies. It forwards them, along with the Supabase anon key, on
//! every backend call and stores any refreshed cookies the backend sends
//! back so they reach the browser.

use axum_extra::extract::cookie::{Cookie, CookieJar};
use reqwest::RequestBuilder;
use reqwest::header::{COOKIE, HeaderMap, SET_COOKIE};
use thiserror::Error;

use crate::core::AppConfig;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Missing configuration: {0}")]
    MissingConfig(&'static str),
    #[error("Invalid Supabase URL: {0}")]
    InvalidUrl(String),
    #[error("Cookies can't be set from this context")]
    ReadOnly,
}

/// Where session cookies are read from and written to
pub trait CookieStore {
    fn get_all(&self) -> Vec<Cookie<'static>>;
    fn set(&mut self, cookie: Cookie<'static>) -> Result<(), SessionError>;
}

/// The inbound request's jar. Anything set here is sent back to the
/// browser as `Set-Cookie` when the jar is returned from a handler.
impl CookieStore for CookieJar {
    fn get_all(&self) -> Vec<Cookie<'static>> {
        self.iter().cloned().collect()
    }

    fn set(&mut self, cookie: Cookie<'static>) -> Result<(), SessionError> {
        *self = self.clone().add(cookie);
        Ok(())
    }
}

/// Cookies with nowhere to write updates to, e.g. when running from
/// the command line
#[derive(Debug, Clone, Default)]
pub struct ReadOnlyCookies(Vec<Cookie<'static>>);

impl ReadOnlyCookies {
    /// Parse a `Cookie` request header value (`a=1; b=2`). Malformed
    /// pairs are skipped.
    pub fn from_header(header: &str) -> Self {
        let cookies = header
            .split(';')
            .map(str::trim)
            .filter(|pair| !pair.is_empty())
            .filter_map(|pair| match Cookie::parse(pair.to_string()) {
                Ok(cookie) => Some(cookie),
                Err(e) => {
                    tracing::warn!("Skipping malformed cookie {:?}: {}", pair, e);
                    None
                }
            })
            .collect();
        Self(cookies)
    }
}

impl CookieStore for ReadOnlyCookies {
    fn get_all(&self) -> Vec<Cookie<'static>> {
        self.0.clone()
    }

    fn set(&mut self, _cookie: Cookie<'static>) -> Result<(), SessionError> {
        Err(SessionError::ReadOnly)
    }
}

pub struct SessionContext<S> {
    anon_key: String,
    project_ref: String,
    store: S,
}

impl<S: CookieStore> SessionContext<S> {
    pub fn new(config: &AppConfig, store: S) -> Result<Self, SessionError> {
        let result = Self::from_config(config, store);
        if let Err(e) = &result {
            tracing::error!("Failed to create session context: {}", e);
        }
        result
    }

    fn from_config(config: &AppConfig, store: S) -> Result<Self, SessionError> {
        let supabase_url = config
            .supabase_url
            .as_deref()
            .ok_or(SessionError::MissingConfig("SALON_SUPABASE_URL"))?;
        let anon_key = config
            .supabase_anon_key
            .clone()
            .ok_or(SessionError::MissingConfig("SALON_SUPABASE_ANON_KEY"))?;

        let project_ref = reqwest::Url::parse(supabase_url)
            .ok()
            .and_then(|url| url.host_str().map(|h| h.to_string()))
            .and_then(|host| host.split('.').next().map(|s| s.to_string()))
            .filter(|s| !s.is_empty())
            .ok_or_else(|| SessionError::InvalidUrl(supabase_url.to_string()))?;

        Ok(Self {
            anon_key,
            project_ref,
            store,
        })
    }

    pub fn get_all(&self) -> Vec<Cookie<'static>> {
        self.store.get_all()
    }

    /// Store refreshed cookies. Failing to write one is logged and
    /// skipped since the session is refreshed again on the next request.
    pub fn set_all(&mut self, cookies: Vec<Cookie<'static>>) {
        for cookie in cookies {
            let name = cookie.name().to_string();
            if let Err(e) = self.store.set(cookie) {
                tracing::error!("Failed to set cookie {}: {}", name, e);
            }
        }
    }

    /// Name of the cookie Supabase keeps the auth token in
    pub fn auth_cookie_name(&self) -> String {
        format!("sb-{}-auth-token", self.project_ref)
    }

    /// Whether the request carries a Supabase auth token. Large tokens
    /// are split over `<name>.0`, `<name>.1`, ...
    pub fn has_auth_session(&self) -> bool {
        let name = self.auth_cookie_name();
        let chunk_prefix = format!("{}.", name);
        self.get_all()
            .iter()
            .any(|c| c.name() == name || c.name().starts_with(&chunk_prefix))
    }

    /// Value for a `Cookie` request header carrying every session cookie
    pub fn cookie_header(&self) -> Option<String> {
        let cookies = self.get_all();
        if cookies.is_empty() {
            return None;
        }
        let header = cookies
            .iter()
            .map(|c| format!("{}={}", c.name(), c.value()))
            .collect::<Vec<_>>()
            .join("; ");
        Some(header)
    }

    /// Attach the session to an outgoing backend request
    pub fn forward(&self, request: RequestBuilder) -> RequestBuilder {
        let request = request.header("apikey", &self.anon_key);
        match self.cookie_header() {
            Some(cookies) => request.header(COOKIE, cookies),
            None => request,
        }
    }

    /// Pick up `Set-Cookie` headers from a backend response
    pub fn absorb(&mut self, headers: &HeaderMap) {
        let cookies = headers
            .get_all(SET_COOKIE)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .filter_map(|value| Cookie::parse(value.to_string()).ok())
            .collect::<Vec<_>>();

        if !cookies.is_empty() {
            tracing::debug!("Backend refreshed {} session cookie(s)", cookies.len());
            self.set_all(cookies);
        }
    }

    pub fn into_store(self) -> S {
        self.store
    }
}
