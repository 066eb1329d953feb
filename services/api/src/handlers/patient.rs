use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use axum_extra::extract::WithRejection;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use dietcare_auth_types::principal::{PatientPrincipal, ProfessionalPrincipal};
use dietcare_core::serde::to_rfc3339_ms;
use dietcare_domain::diet_level::DietLevel;
use dietcare_domain::id::{PatientId, ProfessionalId};

use crate::domain::types::Patient;
use crate::error::ApiError;
use crate::state::AppState;
use crate::usecase::patient::{
    CreatePatientInput, CreatePatientUseCase, GetPatientUseCase, PatientCodeUseCase,
    UpdatePatientInput, UpdatePatientUseCase,
};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PatientResponse {
    pub id: PatientId,
    pub professional_id: ProfessionalId,
    pub first_name: String,
    pub last_name: String,
    pub email: Option<String>,
    pub diet_level: DietLevel,
    pub initial_weight: f64,
    pub current_weight: f64,
    pub target_weight: Option<f64>,
    pub access_code: String,
    #[serde(serialize_with = "to_rfc3339_ms")]
    pub code_expiry: DateTime<Utc>,
    pub is_active: bool,
    #[serde(serialize_with = "to_rfc3339_ms")]
    pub created_at: DateTime<Utc>,
    #[serde(serialize_with = "to_rfc3339_ms")]
    pub updated_at: DateTime<Utc>,
}

impl From<Patient> for PatientResponse {
    fn from(p: Patient) -> Self {
        Self {
            id: p.id,
            professional_id: p.professional_id,
            first_name: p.first_name,
            last_name: p.last_name,
            email: p.email,
            diet_level: p.diet_level,
            initial_weight: p.initial_weight,
            current_weight: p.current_weight,
            target_weight: p.target_weight,
            access_code: p.access_code,
            code_expiry: p.code_expiry,
            is_active: p.is_active,
            created_at: p.created_at,
            updated_at: p.updated_at,
        }
    }
}

// ── GET /api/patient/current ─────────────────────────────────────────────────

pub async fn current_patient(
    PatientPrincipal(patient_id): PatientPrincipal,
    State(state): State<AppState>,
) -> Result<Json<PatientResponse>, ApiError> {
    let usecase = GetPatientUseCase {
        patients: state.patient_repo(),
    };
    let patient = usecase.current(patient_id).await?;
    Ok(Json(patient.into()))
}

// ── GET /api/professional/patients ───────────────────────────────────────────

#[derive(Deserialize)]
pub struct ListPatientsQuery {
    #[serde(default, rename = "include-inactive")]
    pub include_inactive: bool,
}

pub async fn list_patients(
    ProfessionalPrincipal(professional_id): ProfessionalPrincipal,
    State(state): State<AppState>,
    WithRejection(Query(query), _): WithRejection<Query<ListPatientsQuery>, ApiError>,
) -> Result<Json<Vec<PatientResponse>>, ApiError> {
    let usecase = GetPatientUseCase {
        patients: state.patient_repo(),
    };
    let patients = usecase
        .list(professional_id, query.include_inactive)
        .await?;
    Ok(Json(patients.into_iter().map(Into::into).collect()))
}

// ── POST /api/professional/patients ──────────────────────────────────────────

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePatientRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub diet_level: Option<i64>,
    pub weight: Option<f64>,
    pub target_weight: Option<f64>,
}

pub async fn create_patient(
    ProfessionalPrincipal(professional_id): ProfessionalPrincipal,
    State(state): State<AppState>,
    WithRejection(Json(body), _): WithRejection<Json<CreatePatientRequest>, ApiError>,
) -> Result<(StatusCode, Json<PatientResponse>), ApiError> {
    let usecase = CreatePatientUseCase {
        patients: state.patient_repo(),
    };
    let patient = usecase
        .execute(
            professional_id,
            CreatePatientInput {
                first_name: body.first_name,
                last_name: body.last_name,
                email: body.email,
                diet_level: body.diet_level,
                weight: body.weight,
                target_weight: body.target_weight,
            },
        )
        .await?;
    Ok((StatusCode::CREATED, Json(patient.into())))
}

// ── GET /api/professional/patients/{id} ──────────────────────────────────────

pub async fn get_patient(
    ProfessionalPrincipal(professional_id): ProfessionalPrincipal,
    State(state): State<AppState>,
    WithRejection(Path(patient_id), _): WithRejection<Path<PatientId>, ApiError>,
) -> Result<Json<PatientResponse>, ApiError> {
    let usecase = GetPatientUseCase {
        patients: state.patient_repo(),
    };
    let patient = usecase.owned(professional_id, patient_id).await?;
    Ok(Json(patient.into()))
}

// ── PATCH /api/professional/patients/{id} ────────────────────────────────────

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePatientRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub diet_level: Option<i64>,
    pub target_weight: Option<f64>,
    pub is_active: Option<bool>,
}

pub async fn update_patient(
    ProfessionalPrincipal(professional_id): ProfessionalPrincipal,
    State(state): State<AppState>,
    WithRejection(Path(patient_id), _): WithRejection<Path<PatientId>, ApiError>,
    WithRejection(Json(body), _): WithRejection<Json<UpdatePatientRequest>, ApiError>,
) -> Result<Json<PatientResponse>, ApiError> {
    let usecase = UpdatePatientUseCase {
        patients: state.patient_repo(),
    };
    let patient = usecase
        .execute(
            professional_id,
            patient_id,
            UpdatePatientInput {
                first_name: body.first_name,
                last_name: body.last_name,
                email: body.email,
                diet_level: body.diet_level,
                target_weight: body.target_weight,
                is_active: body.is_active,
            },
        )
        .await?;
    Ok(Json(patient.into()))
}

// ── DELETE /api/professional/patients/{id} ───────────────────────────────────

pub async fn deactivate_patient(
    ProfessionalPrincipal(professional_id): ProfessionalPrincipal,
    State(state): State<AppState>,
    WithRejection(Path(patient_id), _): WithRejection<Path<PatientId>, ApiError>,
) -> Result<StatusCode, ApiError> {
    let usecase = UpdatePatientUseCase {
        patients: state.patient_repo(),
    };
    usecase.deactivate(professional_id, patient_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ── POST /api/professional/patients/{id}/access-code ─────────────────────────

pub async fn rotate_patient_code(
    ProfessionalPrincipal(professional_id): ProfessionalPrincipal,
    State(state): State<AppState>,
    WithRejection(Path(patient_id), _): WithRejection<Path<PatientId>, ApiError>,
) -> Result<Json<PatientResponse>, ApiError> {
    let usecase = PatientCodeUseCase {
        patients: state.patient_repo(),
    };
    let patient = usecase.rotate(professional_id, patient_id).await?;
    Ok(Json(patient.into()))
}

// ── DELETE /api/professional/patients/{id}/access-code ───────────────────────

pub async fn revoke_patient_code(
    ProfessionalPrincipal(professional_id): ProfessionalPrincipal,
    State(state): State<AppState>,
    WithRejection(Path(patient_id), _): WithRejection<Path<PatientId>, ApiError>,
) -> Result<StatusCode, ApiError> {
    let usecase = PatientCodeUseCase {
        patients: state.patient_repo(),
    };
    usecase.revoke(professional_id, patient_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
