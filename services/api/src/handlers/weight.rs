use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use axum_extra::extract::WithRejection;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use dietcare_auth_types::principal::{PatientPrincipal, ProfessionalPrincipal};
use dietcare_core::serde::to_rfc3339_ms;
use dietcare_domain::id::{PatientId, ProfessionalId};
use dietcare_domain::pagination::{PageRequest, Sort};

use crate::domain::types::WeightRecord;
use crate::error::ApiError;
use crate::state::AppState;
use crate::usecase::weight::{ListWeightUseCase, RecordWeightInput, RecordWeightUseCase};

/// `?per-page=&page=&sort=` on history endpoints.
#[derive(Deserialize, Default)]
pub struct HistoryQuery {
    #[serde(rename = "per-page")]
    pub per_page: Option<u32>,
    pub page: Option<u32>,
    pub sort: Option<Sort>,
}

impl HistoryQuery {
    pub fn page(&self) -> PageRequest {
        let default = PageRequest::default();
        PageRequest {
            per_page: self.per_page.unwrap_or(default.per_page),
            page: self.page.unwrap_or(default.page),
        }
    }

    pub fn sort(&self) -> Sort {
        self.sort.unwrap_or_default()
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WeightRecordResponse {
    pub id: Uuid,
    pub patient_id: PatientId,
    pub weight: f64,
    pub note: Option<String>,
    pub recorded_by: Option<ProfessionalId>,
    #[serde(serialize_with = "to_rfc3339_ms")]
    pub recorded_at: DateTime<Utc>,
}

impl From<WeightRecord> for WeightRecordResponse {
    fn from(r: WeightRecord) -> Self {
        Self {
            id: r.id,
            patient_id: r.patient_id,
            weight: r.weight,
            note: r.note,
            recorded_by: r.recorded_by,
            recorded_at: r.recorded_at,
        }
    }
}

// ── GET /api/patient/weight ──────────────────────────────────────────────────

pub async fn own_weight_history(
    PatientPrincipal(patient_id): PatientPrincipal,
    State(state): State<AppState>,
    WithRejection(Query(query), _): WithRejection<Query<HistoryQuery>, ApiError>,
) -> Result<Json<Vec<WeightRecordResponse>>, ApiError> {
    let usecase = ListWeightUseCase {
        patients: state.patient_repo(),
        weights: state.weight_repo(),
    };
    let records = usecase.own(patient_id, query.sort(), query.page()).await?;
    Ok(Json(records.into_iter().map(Into::into).collect()))
}

// ── GET /api/professional/patients/{id}/weight ───────────────────────────────

pub async fn patient_weight_history(
    ProfessionalPrincipal(professional_id): ProfessionalPrincipal,
    State(state): State<AppState>,
    WithRejection(Path(patient_id), _): WithRejection<Path<PatientId>, ApiError>,
    WithRejection(Query(query), _): WithRejection<Query<HistoryQuery>, ApiError>,
) -> Result<Json<Vec<WeightRecordResponse>>, ApiError> {
    let usecase = ListWeightUseCase {
        patients: state.patient_repo(),
        weights: state.weight_repo(),
    };
    let records = usecase
        .owned(professional_id, patient_id, query.sort(), query.page())
        .await?;
    Ok(Json(records.into_iter().map(Into::into).collect()))
}

// ── POST /api/professional/patients/{id}/weight ──────────────────────────────

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordWeightRequest {
    pub weight: Option<f64>,
    pub note: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordWeightResponse {
    pub weight_record: WeightRecordResponse,
    pub current_weight: f64,
    pub access_code: String,
    #[serde(serialize_with = "to_rfc3339_ms")]
    pub code_expiry: DateTime<Utc>,
    pub code_rotated: bool,
}

pub async fn record_weight(
    ProfessionalPrincipal(professional_id): ProfessionalPrincipal,
    State(state): State<AppState>,
    WithRejection(Path(patient_id), _): WithRejection<Path<PatientId>, ApiError>,
    WithRejection(Json(body), _): WithRejection<Json<RecordWeightRequest>, ApiError>,
) -> Result<(StatusCode, Json<RecordWeightResponse>), ApiError> {
    let usecase = RecordWeightUseCase {
        patients: state.patient_repo(),
        weights: state.weight_repo(),
        rotate_code: state.rotate_code_on_weight,
    };
    let recorded = usecase
        .execute(
            professional_id,
            patient_id,
            RecordWeightInput {
                weight: body.weight,
                note: body.note,
            },
        )
        .await?;
    let body = RecordWeightResponse {
        weight_record: recorded.record.into(),
        current_weight: recorded.patient.current_weight,
        access_code: recorded.patient.access_code,
        code_expiry: recorded.patient.code_expiry,
        code_rotated: recorded.code_rotated,
    };
    Ok((StatusCode::CREATED, Json(body)))
}
