//! The resolved caller of a request and the extractors routes use to require one.
//!
//! The API's principal middleware resolves credentials once and stores the result in
//! request extensions. Handlers then declare what they accept by extractor type:
//!
//! - [`Principal`]: anyone, including anonymous callers
//! - [`AuthenticatedPrincipal`]: a patient or a professional
//! - [`PatientPrincipal`] / [`ProfessionalPrincipal`]: that kind only
//! - [`OAuthUser`]: a valid OAuth token, linked or not

use axum::Json;
use axum::extract::FromRequestParts;
use axum::response::{IntoResponse, Response};
use http::StatusCode;
use http::request::Parts;

use dietcare_domain::id::{PatientId, ProfessionalId};

use crate::token::OAuthIdentity;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Principal {
    Patient(PatientId),
    Professional(ProfessionalId),
    #[default]
    Anonymous,
}

impl Principal {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Patient(_) => "patient",
            Self::Professional(_) => "professional",
            Self::Anonymous => "anonymous",
        }
    }
}

/// Why a route refused the request's principal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum PrincipalRejection {
    #[error("unauthenticated")]
    Unauthenticated,
    #[error("forbidden")]
    Forbidden,
}

impl PrincipalRejection {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Unauthenticated => "UNAUTHENTICATED",
            Self::Forbidden => "FORBIDDEN",
        }
    }
}

impl IntoResponse for PrincipalRejection {
    fn into_response(self) -> Response {
        let status = match self {
            Self::Unauthenticated => StatusCode::UNAUTHORIZED,
            Self::Forbidden => StatusCode::FORBIDDEN,
        };
        let body = serde_json::json!({
            "kind": self.kind(),
            "message": self.to_string(),
        });
        (status, Json(body)).into_response()
    }
}

fn principal_of(parts: &Parts) -> Principal {
    parts
        .extensions
        .get::<Principal>()
        .copied()
        .unwrap_or_default()
}

// axum-core 0.5 declares `from_request_parts` as `fn -> impl Future + Send`. Values are
// read synchronously and moved into a 'static block to avoid capturing `parts`.

impl<S> FromRequestParts<S> for Principal
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    fn from_request_parts(
        parts: &mut Parts,
        _state: &S,
    ) -> impl std::future::Future<Output = Result<Self, Self::Rejection>> + Send {
        let principal = principal_of(parts);
        async move { Ok(principal) }
    }
}

/// Any signed-in patient or professional.
#[derive(Debug, Clone, Copy)]
pub struct AuthenticatedPrincipal(pub Principal);

impl<S> FromRequestParts<S> for AuthenticatedPrincipal
where
    S: Send + Sync,
{
    type Rejection = PrincipalRejection;

    fn from_request_parts(
        parts: &mut Parts,
        _state: &S,
    ) -> impl std::future::Future<Output = Result<Self, Self::Rejection>> + Send {
        let principal = principal_of(parts);
        async move {
            match principal {
                Principal::Anonymous => Err(PrincipalRejection::Unauthenticated),
                other => Ok(Self(other)),
            }
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct PatientPrincipal(pub PatientId);

impl<S> FromRequestParts<S> for PatientPrincipal
where
    S: Send + Sync,
{
    type Rejection = PrincipalRejection;

    fn from_request_parts(
        parts: &mut Parts,
        _state: &S,
    ) -> impl std::future::Future<Output = Result<Self, Self::Rejection>> + Send {
        let principal = principal_of(parts);
        async move {
            match principal {
                Principal::Patient(id) => Ok(Self(id)),
                Principal::Professional(_) => Err(PrincipalRejection::Forbidden),
                Principal::Anonymous => Err(PrincipalRejection::Unauthenticated),
            }
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ProfessionalPrincipal(pub ProfessionalId);

impl<S> FromRequestParts<S> for ProfessionalPrincipal
where
    S: Send + Sync,
{
    type Rejection = PrincipalRejection;

    fn from_request_parts(
        parts: &mut Parts,
        _state: &S,
    ) -> impl std::future::Future<Output = Result<Self, Self::Rejection>> + Send {
        let principal = principal_of(parts);
        async move {
            match principal {
                Principal::Professional(id) => Ok(Self(id)),
                Principal::Patient(_) => Err(PrincipalRejection::Forbidden),
                Principal::Anonymous => Err(PrincipalRejection::Unauthenticated),
            }
        }
    }
}

/// The OAuth account behind the request, whether or not it is linked to a patient or
/// professional yet.
#[derive(Debug, Clone)]
pub struct OAuthUser(pub OAuthIdentity);

impl<S> FromRequestParts<S> for OAuthUser
where
    S: Send + Sync,
{
    type Rejection = PrincipalRejection;

    fn from_request_parts(
        parts: &mut Parts,
        _state: &S,
    ) -> impl std::future::Future<Output = Result<Self, Self::Rejection>> + Send {
        let identity = parts.extensions.get::<OAuthIdentity>().cloned();
        async move {
            identity
                .map(Self)
                .ok_or(PrincipalRejection::Unauthenticated)
        }
    }
}
