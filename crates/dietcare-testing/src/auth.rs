//! Credential helpers for tests.
//!
//! `MockCredentials` builds the exact headers a browser or API client would send, so
//! tests exercise the same credential collection the principal middleware runs.

use http::header::COOKIE;
use http::{HeaderMap, HeaderName, HeaderValue};
use uuid::Uuid;

use dietcare_auth_types::cookie::{OAUTH_TOKEN_COOKIE, SESSION_COOKIE};
use dietcare_auth_types::credential::{X_PATIENT_SESSION, X_PROFESSIONAL_CODE};
use dietcare_auth_types::token::issue_oauth_token;
use dietcare_domain::id::UserId;

/// Secret used by [`MockCredentials::oauth_token`] unless overridden.
pub const TEST_JWT_SECRET: &str = "dietcare-test-secret";

/// Accumulates credentials and renders them as request headers.
#[derive(Debug, Default, Clone)]
pub struct MockCredentials {
    cookies: Vec<(String, String)>,
    headers: Vec<(&'static str, String)>,
}

impl MockCredentials {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn session(mut self, session_id: &str) -> Self {
        self.cookies
            .push((SESSION_COOKIE.to_owned(), session_id.to_owned()));
        self
    }

    pub fn patient_code(mut self, code: &str) -> Self {
        self.headers.push((X_PATIENT_SESSION, code.to_owned()));
        self
    }

    pub fn professional_code(mut self, code: &str) -> Self {
        self.headers.push((X_PROFESSIONAL_CODE, code.to_owned()));
        self
    }

    /// Attach a freshly signed OAuth token cookie valid for one hour.
    pub fn oauth(self, user_id: Uuid, secret: &str) -> Self {
        let token = Self::oauth_token(user_id, secret);
        self.raw_oauth(&token)
    }

    /// Attach an arbitrary OAuth cookie value (expired or forged tokens).
    pub fn raw_oauth(mut self, token: &str) -> Self {
        self.cookies
            .push((OAUTH_TOKEN_COOKIE.to_owned(), token.to_owned()));
        self
    }

    /// Sign an OAuth token for `user_id` expiring in one hour.
    pub fn oauth_token(user_id: Uuid, secret: &str) -> String {
        Self::oauth_token_with_exp(user_id, now_secs() + 3600, secret)
    }

    pub fn oauth_token_with_exp(user_id: Uuid, exp: u64, secret: &str) -> String {
        issue_oauth_token(UserId(user_id), None, exp, secret).expect("sign test oauth token")
    }

    pub fn headers(&self) -> HeaderMap {
        let mut map = HeaderMap::new();
        if !self.cookies.is_empty() {
            let cookie = self
                .cookies
                .iter()
                .map(|(k, v)| format!("{k}={v}"))
                .collect::<Vec<_>>()
                .join("; ");
            map.insert(COOKIE, HeaderValue::from_str(&cookie).unwrap());
        }
        for (name, value) in &self.headers {
            map.insert(
                HeaderName::from_static(*name),
                HeaderValue::from_str(value).unwrap(),
            );
        }
        map
    }
}

fn now_secs() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default()
}
