//! OAuth access-token validation.
//!
//! The identity provider signs HS256 tokens with a secret shared with the API. The API
//! only validates them; it never mints tokens outside tests.

use jsonwebtoken::{DecodingKey, Validation, decode};
use serde::Deserialize;
#[cfg(any(feature = "issue-tokens", test))]
use serde::Serialize;
use uuid::Uuid;

use dietcare_domain::id::UserId;

/// OAuth account identity carried by a validated token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OAuthIdentity {
    pub user_id: UserId,
    pub email: Option<String>,
    pub exp: u64,
}

#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    #[error("invalid signature")]
    InvalidSignature,
    #[error("token expired")]
    Expired,
    #[error("malformed token")]
    Malformed,
}

/// JWT claims payload.
///
/// | Claim | Meaning |
/// |-------|---------|
/// | `sub` | OAuth account id (UUID string) |
/// | `email` | account email, if the provider shares it |
/// | `exp` | expiry, seconds since UNIX epoch |
#[derive(Debug, Deserialize)]
#[cfg_attr(any(feature = "issue-tokens", test), derive(Serialize))]
pub struct OAuthClaims {
    pub sub: String,
    #[serde(default)]
    pub email: Option<String>,
    pub exp: u64,
}

/// Validate an OAuth token (HS256, `exp` + `sub` required, default 60 s leeway).
pub fn validate_oauth_token(token: &str, secret: &str) -> Result<OAuthIdentity, TokenError> {
    let mut validation = Validation::new(jsonwebtoken::Algorithm::HS256);
    validation.validate_exp = true;
    validation.required_spec_claims.clear();
    validation.set_required_spec_claims(&["exp", "sub"]);

    let data = decode::<OAuthClaims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map_err(|e| match e.kind() {
        jsonwebtoken::errors::ErrorKind::ExpiredSignature => TokenError::Expired,
        jsonwebtoken::errors::ErrorKind::InvalidSignature => TokenError::InvalidSignature,
        _ => TokenError::Malformed,
    })?;

    let user_id = data
        .claims
        .sub
        .parse::<Uuid>()
        .map_err(|_| TokenError::Malformed)?;
    Ok(OAuthIdentity {
        user_id: UserId(user_id),
        email: data.claims.email,
        exp: data.claims.exp,
    })
}

/// Sign an OAuth token the way the identity provider does.
#[cfg(any(feature = "issue-tokens", test))]
pub fn issue_oauth_token(
    user_id: UserId,
    email: Option<&str>,
    exp: u64,
    secret: &str,
) -> Result<String, jsonwebtoken::errors::Error> {
    use jsonwebtoken::{EncodingKey, Header, encode};

    let claims = OAuthClaims {
        sub: user_id.to_string(),
        email: email.map(str::to_owned),
        exp,
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
}
