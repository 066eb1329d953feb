use axum::{Json, extract::State, http::StatusCode};
use axum_extra::extract::{CookieJar, WithRejection};
use serde::{Deserialize, Serialize};

use dietcare_auth_types::cookie::{SESSION_COOKIE, clear_session_cookie, set_session_cookie};

use crate::error::ApiError;
use crate::handlers::patient::PatientResponse;
use crate::handlers::professional::ProfessionalResponse;
use crate::state::AppState;
use crate::usecase::session::{
    LogoutUseCase, ValidatePatientCodeUseCase, ValidateProfessionalCodeUseCase,
};

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidateCodeRequest {
    #[serde(default)]
    pub access_code: String,
}

/// Validate responses carry the session kind so clients can model the session as a
/// tagged union.
#[derive(Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum SessionResponse {
    Patient { patient: PatientResponse },
    Professional { professional: ProfessionalResponse },
}

fn current_session(jar: &CookieJar) -> Option<String> {
    jar.get(SESSION_COOKIE).map(|c| c.value().to_owned())
}

// ── POST /api/patient/validate ───────────────────────────────────────────────

pub async fn validate_patient_code(
    State(state): State<AppState>,
    jar: CookieJar,
    WithRejection(Json(body), _): WithRejection<Json<ValidateCodeRequest>, ApiError>,
) -> Result<(CookieJar, Json<SessionResponse>), ApiError> {
    let usecase = ValidatePatientCodeUseCase {
        patients: state.patient_repo(),
        sessions: state.session_store(),
        session_ttl_secs: state.session_ttl_secs,
    };
    let previous = current_session(&jar);
    let validated = usecase
        .execute(&body.access_code, previous.as_deref())
        .await?;

    let jar = set_session_cookie(
        jar,
        validated.session_id,
        state.session_ttl_secs,
        state.cookie_secure,
    );
    let body = SessionResponse::Patient {
        patient: validated.subject.into(),
    };
    Ok((jar, Json(body)))
}

// ── POST /api/professional/validate ──────────────────────────────────────────

pub async fn validate_professional_code(
    State(state): State<AppState>,
    jar: CookieJar,
    WithRejection(Json(body), _): WithRejection<Json<ValidateCodeRequest>, ApiError>,
) -> Result<(CookieJar, Json<SessionResponse>), ApiError> {
    let usecase = ValidateProfessionalCodeUseCase {
        professionals: state.professional_repo(),
        sessions: state.session_store(),
        session_ttl_secs: state.session_ttl_secs,
    };
    let previous = current_session(&jar);
    let validated = usecase
        .execute(&body.access_code, previous.as_deref())
        .await?;

    let jar = set_session_cookie(
        jar,
        validated.session_id,
        state.session_ttl_secs,
        state.cookie_secure,
    );
    let body = SessionResponse::Professional {
        professional: validated.subject.into(),
    };
    Ok((jar, Json(body)))
}

// ── POST /api/patient/logout, POST /api/professional/logout ──────────────────

pub async fn logout(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<(CookieJar, StatusCode), ApiError> {
    let usecase = LogoutUseCase {
        sessions: state.session_store(),
    };
    usecase.execute(current_session(&jar).as_deref()).await?;
    Ok((
        clear_session_cookie(jar, state.cookie_secure),
        StatusCode::NO_CONTENT,
    ))
}
