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
use dietcare_domain::id::PatientId;

use crate::domain::types::MoodEntry;
use crate::error::ApiError;
use crate::handlers::weight::HistoryQuery;
use crate::state::AppState;
use crate::usecase::mood::{CreateMoodEntryUseCase, CreateMoodInput, ListMoodUseCase};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MoodEntryResponse {
    pub id: Uuid,
    pub patient_id: PatientId,
    pub mood: i16,
    pub energy: i16,
    pub motivation: i16,
    pub note: Option<String>,
    pub tags: Vec<String>,
    #[serde(serialize_with = "to_rfc3339_ms")]
    pub created_at: DateTime<Utc>,
}

impl From<MoodEntry> for MoodEntryResponse {
    fn from(e: MoodEntry) -> Self {
        Self {
            id: e.id,
            patient_id: e.patient_id,
            mood: e.mood,
            energy: e.energy,
            motivation: e.motivation,
            note: e.note,
            tags: e.tags,
            created_at: e.created_at,
        }
    }
}

// ── POST /api/patient/mood ───────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct CreateMoodRequest {
    pub mood: Option<i16>,
    pub energy: Option<i16>,
    pub motivation: Option<i16>,
    pub note: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
}

pub async fn create_mood_entry(
    PatientPrincipal(patient_id): PatientPrincipal,
    State(state): State<AppState>,
    WithRejection(Json(body), _): WithRejection<Json<CreateMoodRequest>, ApiError>,
) -> Result<(StatusCode, Json<MoodEntryResponse>), ApiError> {
    let usecase = CreateMoodEntryUseCase {
        moods: state.mood_repo(),
    };
    let entry = usecase
        .execute(
            patient_id,
            CreateMoodInput {
                mood: body.mood,
                energy: body.energy,
                motivation: body.motivation,
                note: body.note,
                tags: body.tags,
            },
        )
        .await?;
    Ok((StatusCode::CREATED, Json(entry.into())))
}

// ── GET /api/patient/mood ────────────────────────────────────────────────────

pub async fn own_mood_entries(
    PatientPrincipal(patient_id): PatientPrincipal,
    State(state): State<AppState>,
    WithRejection(Query(query), _): WithRejection<Query<HistoryQuery>, ApiError>,
) -> Result<Json<Vec<MoodEntryResponse>>, ApiError> {
    let usecase = ListMoodUseCase {
        patients: state.patient_repo(),
        moods: state.mood_repo(),
    };
    let entries = usecase.own(patient_id, query.sort(), query.page()).await?;
    Ok(Json(entries.into_iter().map(Into::into).collect()))
}

// ── GET /api/professional/patients/{id}/mood ─────────────────────────────────

pub async fn patient_mood_entries(
    ProfessionalPrincipal(professional_id): ProfessionalPrincipal,
    State(state): State<AppState>,
    WithRejection(Path(patient_id), _): WithRejection<Path<PatientId>, ApiError>,
    WithRejection(Query(query), _): WithRejection<Query<HistoryQuery>, ApiError>,
) -> Result<Json<Vec<MoodEntryResponse>>, ApiError> {
    let usecase = ListMoodUseCase {
        patients: state.patient_repo(),
        moods: state.mood_repo(),
    };
    let entries = usecase
        .owned(professional_id, patient_id, query.sort(), query.page())
        .await?;
    Ok(Json(entries.into_iter().map(Into::into).collect()))
}
