//! Credentials a request can present, in the order they are resolved.

use axum_extra::extract::cookie::CookieJar;
use http::HeaderMap;
use sha2::{Digest, Sha256};

use dietcare_domain::access_code;

use crate::cookie::{OAUTH_TOKEN_COOKIE, SESSION_COOKIE};

/// Stateless patient credential: the patient's access code.
pub const X_PATIENT_SESSION: &str = "x-patient-session";

/// Stateless professional credential: the professional's access code.
pub const X_PROFESSIONAL_CODE: &str = "x-professional-code";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Credential {
    /// Opaque id of a server-side session (cookie).
    Session(String),
    /// Patient access code sent in `x-patient-session`.
    PatientCode(String),
    /// Professional access code sent in `x-professional-code`.
    ProfessionalCode(String),
    /// OAuth provider access token (cookie).
    OAuthToken(String),
}

impl Credential {
    /// Short label for logs. Never includes the secret itself.
    pub fn source(&self) -> &'static str {
        match self {
            Self::Session(_) => "session_cookie",
            Self::PatientCode(_) => "patient_header",
            Self::ProfessionalCode(_) => "professional_header",
            Self::OAuthToken(_) => "oauth_cookie",
        }
    }
}

/// Every credential present on the request, highest priority first:
/// session cookie, patient header, professional header, OAuth cookie.
/// Empty values are ignored; header codes are normalized.
pub fn collect(headers: &HeaderMap) -> Vec<Credential> {
    let jar = CookieJar::from_headers(headers);
    let mut out = Vec::new();

    if let Some(c) = jar.get(SESSION_COOKIE).filter(|c| !c.value().is_empty()) {
        out.push(Credential::Session(c.value().to_owned()));
    }
    if let Some(code) = header_code(headers, X_PATIENT_SESSION) {
        out.push(Credential::PatientCode(code));
    }
    if let Some(code) = header_code(headers, X_PROFESSIONAL_CODE) {
        out.push(Credential::ProfessionalCode(code));
    }
    if let Some(c) = jar.get(OAUTH_TOKEN_COOKIE).filter(|c| !c.value().is_empty()) {
        out.push(Credential::OAuthToken(c.value().to_owned()));
    }
    out
}

fn header_code(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(access_code::normalize)
        .filter(|s| !s.is_empty())
}

/// SHA-256 hex digest of an access code. Sessions keep this instead of the code.
pub fn fingerprint(code: &str) -> String {
    format!("{:x}", Sha256::digest(code.as_bytes()))
}
