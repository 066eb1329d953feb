use chrono::Utc;
use tracing::{debug, info};

use dietcare_auth_types::credential::{Credential, fingerprint};
use dietcare_auth_types::principal::Principal;
use dietcare_auth_types::token::{OAuthIdentity, validate_oauth_token};
use dietcare_domain::access_code;

use crate::domain::repository::{PatientRepository, ProfessionalRepository, SessionStore};
use crate::domain::types::{Patient, Professional, SessionRecord};
use crate::error::ApiError;
use crate::usecase::access_code::generate_session_id;

// ── Patient code validation ──────────────────────────────────────────────────

pub struct ValidatePatientCodeUseCase<P, S>
where
    P: PatientRepository,
    S: SessionStore,
{
    pub patients: P,
    pub sessions: S,
    pub session_ttl_secs: u64,
}

pub struct ValidatedSession<T> {
    pub session_id: String,
    pub subject: T,
}

impl<P, S> ValidatePatientCodeUseCase<P, S>
where
    P: PatientRepository,
    S: SessionStore,
{
    /// Exchange a patient access code for a new session. `previous_session` is deleted
    /// so a browser never holds two principals.
    pub async fn execute(
        &self,
        code: &str,
        previous_session: Option<&str>,
    ) -> Result<ValidatedSession<Patient>, ApiError> {
        let code = access_code::normalize(code);
        if code.is_empty() {
            return Err(ApiError::MissingData("accessCode"));
        }
        if !access_code::is_well_formed(&code) {
            return Err(ApiError::CodeNotFound);
        }

        let patient = self
            .patients
            .find_by_code(&code)
            .await?
            .filter(|p| p.is_active)
            .ok_or(ApiError::CodeNotFound)?;
        if !patient.code_is_live(Utc::now()) {
            return Err(ApiError::CodeExpired);
        }

        if let Some(previous) = previous_session {
            self.sessions.delete(previous).await?;
        }
        let session_id = generate_session_id();
        let record = SessionRecord::Patient {
            patient_id: patient.id,
            fingerprint: fingerprint(&patient.access_code),
        };
        self.sessions
            .put(&session_id, &record, self.session_ttl_secs)
            .await?;
        info!(patient_id = %patient.id, "patient session created");

        Ok(ValidatedSession {
            session_id,
            subject: patient,
        })
    }
}

// ── Professional code validation ─────────────────────────────────────────────

pub struct ValidateProfessionalCodeUseCase<R, S>
where
    R: ProfessionalRepository,
    S: SessionStore,
{
    pub professionals: R,
    pub sessions: S,
    pub session_ttl_secs: u64,
}

impl<R, S> ValidateProfessionalCodeUseCase<R, S>
where
    R: ProfessionalRepository,
    S: SessionStore,
{
    pub async fn execute(
        &self,
        code: &str,
        previous_session: Option<&str>,
    ) -> Result<ValidatedSession<Professional>, ApiError> {
        let code = access_code::normalize(code);
        if code.is_empty() {
            return Err(ApiError::MissingData("accessCode"));
        }
        if !access_code::is_well_formed(&code) {
            return Err(ApiError::CodeNotFound);
        }

        let professional = self
            .professionals
            .find_by_code(&code)
            .await?
            .filter(|p| p.is_active)
            .ok_or(ApiError::CodeNotFound)?;

        if let Some(previous) = previous_session {
            self.sessions.delete(previous).await?;
        }
        let session_id = generate_session_id();
        let record = SessionRecord::Professional {
            professional_id: professional.id,
            fingerprint: fingerprint(&professional.access_code),
        };
        self.sessions
            .put(&session_id, &record, self.session_ttl_secs)
            .await?;
        info!(professional_id = %professional.id, "professional session created");

        Ok(ValidatedSession {
            session_id,
            subject: professional,
        })
    }
}

// ── Logout ───────────────────────────────────────────────────────────────────

pub struct LogoutUseCase<S>
where
    S: SessionStore,
{
    pub sessions: S,
}

impl<S> LogoutUseCase<S>
where
    S: SessionStore,
{
    /// Idempotent: a missing or unknown session is not an error.
    pub async fn execute(&self, session_id: Option<&str>) -> Result<(), ApiError> {
        if let Some(id) = session_id {
            self.sessions.delete(id).await?;
            info!("session ended");
        }
        Ok(())
    }
}

// ── Principal resolution ─────────────────────────────────────────────────────

#[derive(Debug, Clone, Default)]
pub struct Resolution {
    pub principal: Principal,
    /// Set whenever a valid OAuth token was presented, linked to a profile or not.
    pub oauth: Option<OAuthIdentity>,
}

pub struct ResolvePrincipalUseCase<'a, P, R, S>
where
    P: PatientRepository,
    R: ProfessionalRepository,
    S: SessionStore,
{
    pub patients: P,
    pub professionals: R,
    pub sessions: S,
    pub jwt_secret: &'a str,
}

impl<P, R, S> ResolvePrincipalUseCase<'_, P, R, S>
where
    P: PatientRepository,
    R: ProfessionalRepository,
    S: SessionStore,
{
    /// Try credentials in priority order; the first one that identifies an active
    /// patient or professional wins. Invalid credentials fall through to the next one
    /// and, when none is left, to `Anonymous`. Storage failures are errors.
    pub async fn execute(&self, credentials: &[Credential]) -> Result<Resolution, ApiError> {
        // The OAuth identity is reported even when a higher-priority credential wins.
        let oauth = credentials.iter().find_map(|c| match c {
            Credential::OAuthToken(token) => match validate_oauth_token(token, self.jwt_secret) {
                Ok(identity) => Some(identity),
                Err(e) => {
                    debug!(error = %e, "rejected oauth token");
                    None
                }
            },
            _ => None,
        });

        let mut principal = Principal::Anonymous;
        for credential in credentials {
            principal = match credential {
                Credential::Session(id) => self.from_session(id).await?,
                Credential::PatientCode(code) => self.from_patient_code(code).await?,
                Credential::ProfessionalCode(code) => self.from_professional_code(code).await?,
                Credential::OAuthToken(_) => match &oauth {
                    Some(identity) => self.from_oauth(identity).await?,
                    None => Principal::Anonymous,
                },
            };
            if principal != Principal::Anonymous {
                debug!(source = credential.source(), kind = principal.kind(), "principal resolved");
                break;
            }
        }
        Ok(Resolution { principal, oauth })
    }

    async fn from_session(&self, session_id: &str) -> Result<Principal, ApiError> {
        let Some(record) = self.sessions.get(session_id).await? else {
            return Ok(Principal::Anonymous);
        };
        let principal = match &record {
            SessionRecord::Patient {
                patient_id,
                fingerprint: fp,
            } => self
                .patients
                .find_by_id(*patient_id)
                .await?
                .filter(|p| patient_can_sign_in(p) && fingerprint(&p.access_code) == *fp)
                .map(|p| Principal::Patient(p.id)),
            SessionRecord::Professional {
                professional_id,
                fingerprint: fp,
            } => self
                .professionals
                .find_by_id(*professional_id)
                .await?
                .filter(|p| p.is_active && fingerprint(&p.access_code) == *fp)
                .map(|p| Principal::Professional(p.id)),
        };
        match principal {
            Some(principal) => Ok(principal),
            None => {
                // Code rotated or revoked, or the profile was deactivated.
                self.sessions.delete(session_id).await?;
                info!("stale session discarded");
                Ok(Principal::Anonymous)
            }
        }
    }

    async fn from_patient_code(&self, code: &str) -> Result<Principal, ApiError> {
        if !access_code::is_well_formed(code) {
            return Ok(Principal::Anonymous);
        }
        Ok(self
            .patients
            .find_by_code(code)
            .await?
            .filter(patient_can_sign_in)
            .map_or(Principal::Anonymous, |p| Principal::Patient(p.id)))
    }

    async fn from_professional_code(&self, code: &str) -> Result<Principal, ApiError> {
        if !access_code::is_well_formed(code) {
            return Ok(Principal::Anonymous);
        }
        Ok(self
            .professionals
            .find_by_code(code)
            .await?
            .filter(|p| p.is_active)
            .map_or(Principal::Anonymous, |p| Principal::Professional(p.id)))
    }

    async fn from_oauth(&self, identity: &OAuthIdentity) -> Result<Principal, ApiError> {
        if let Some(professional) = self
            .professionals
            .find_by_user(identity.user_id)
            .await?
            .filter(|p| p.is_active)
        {
            return Ok(Principal::Professional(professional.id));
        }
        Ok(self
            .patients
            .find_by_user(identity.user_id)
            .await?
            .filter(|p| p.is_active)
            .map_or(Principal::Anonymous, |p| Principal::Patient(p.id)))
    }
}

fn patient_can_sign_in(patient: &Patient) -> bool {
    patient.is_active && patient.code_is_live(Utc::now())
}
