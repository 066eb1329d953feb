use axum::{Json, extract::State, http::StatusCode};
use axum_extra::extract::WithRejection;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use dietcare_auth_types::principal::{OAuthUser, ProfessionalPrincipal};
use dietcare_core::serde::to_rfc3339_ms;
use dietcare_domain::id::ProfessionalId;

use crate::domain::types::Professional;
use crate::error::ApiError;
use crate::state::AppState;
use crate::usecase::professional::{
    ProfessionalProfileUseCase, RegisterProfessionalInput, RegisterProfessionalUseCase,
};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfessionalResponse {
    pub id: ProfessionalId,
    pub first_name: String,
    pub last_name: String,
    pub email: Option<String>,
    pub specialty: Option<String>,
    pub access_code: String,
    pub is_active: bool,
    #[serde(serialize_with = "to_rfc3339_ms")]
    pub created_at: DateTime<Utc>,
}

impl From<Professional> for ProfessionalResponse {
    fn from(p: Professional) -> Self {
        Self {
            id: p.id,
            first_name: p.first_name,
            last_name: p.last_name,
            email: p.email,
            specialty: p.specialty,
            access_code: p.access_code,
            is_active: p.is_active,
            created_at: p.created_at,
        }
    }
}

// ── POST /api/professional/register ──────────────────────────────────────────

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterProfessionalRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub specialty: Option<String>,
}

pub async fn register_professional(
    OAuthUser(identity): OAuthUser,
    State(state): State<AppState>,
    WithRejection(Json(body), _): WithRejection<Json<RegisterProfessionalRequest>, ApiError>,
) -> Result<(StatusCode, Json<ProfessionalResponse>), ApiError> {
    let usecase = RegisterProfessionalUseCase {
        professionals: state.professional_repo(),
        users: state.user_repo(),
    };
    let professional = usecase
        .execute(
            &identity,
            RegisterProfessionalInput {
                first_name: body.first_name,
                last_name: body.last_name,
                email: body.email,
                specialty: body.specialty,
            },
        )
        .await?;
    Ok((StatusCode::CREATED, Json(professional.into())))
}

// ── GET /api/professional/profile ────────────────────────────────────────────

pub async fn professional_profile(
    ProfessionalPrincipal(professional_id): ProfessionalPrincipal,
    State(state): State<AppState>,
) -> Result<Json<ProfessionalResponse>, ApiError> {
    let usecase = ProfessionalProfileUseCase {
        professionals: state.professional_repo(),
    };
    let professional = usecase.get(professional_id).await?;
    Ok(Json(professional.into()))
}

// ── POST /api/professional/access-code ───────────────────────────────────────

pub async fn rotate_professional_code(
    ProfessionalPrincipal(professional_id): ProfessionalPrincipal,
    State(state): State<AppState>,
) -> Result<Json<ProfessionalResponse>, ApiError> {
    let usecase = ProfessionalProfileUseCase {
        professionals: state.professional_repo(),
    };
    let professional = usecase.rotate_code(professional_id).await?;
    Ok(Json(professional.into()))
}
