//! Principal middleware: resolves the caller once per request.

use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::Response;

use dietcare_auth_types::credential;

use crate::domain::repository::{PatientRepository, ProfessionalRepository, SessionStore};
use crate::error::ApiError;
use crate::infra::cache::RedisSessionStore;
use crate::infra::db::{DbPatientRepository, DbProfessionalRepository};
use crate::state::AppState;
use crate::usecase::session::ResolvePrincipalUseCase;

/// Router state that knows where principals are looked up.
pub trait PrincipalSource: Clone + Send + Sync + 'static {
    type Patients: PatientRepository;
    type Professionals: ProfessionalRepository;
    type Sessions: SessionStore;

    fn principal_resolver(
        &self,
    ) -> ResolvePrincipalUseCase<'_, Self::Patients, Self::Professionals, Self::Sessions>;
}

impl PrincipalSource for AppState {
    type Patients = DbPatientRepository;
    type Professionals = DbProfessionalRepository;
    type Sessions = RedisSessionStore;

    fn principal_resolver(
        &self,
    ) -> ResolvePrincipalUseCase<'_, Self::Patients, Self::Professionals, Self::Sessions> {
        ResolvePrincipalUseCase {
            patients: self.patient_repo(),
            professionals: self.professional_repo(),
            sessions: self.session_store(),
            jwt_secret: &self.jwt_secret,
        }
    }
}

/// Collect credentials, resolve them to a [`Principal`] and store it (and the OAuth
/// identity, when a valid token was sent) in request extensions for the extractors.
///
/// A request without credentials passes through untouched, so extractors see
/// `Anonymous`.
///
/// [`Principal`]: dietcare_auth_types::principal::Principal
pub async fn resolve_principal<S: PrincipalSource>(
    State(state): State<S>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let credentials = credential::collect(request.headers());
    if !credentials.is_empty() {
        let resolution = state.principal_resolver().execute(&credentials).await?;
        request.extensions_mut().insert(resolution.principal);
        if let Some(identity) = resolution.oauth {
            request.extensions_mut().insert(identity);
        }
    }
    Ok(next.run(request).await)
}
