use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use dietcare_domain::diet_level::InvalidDietLevel;

/// API error variants. Principal rejections (401/403) come from the extractors in
/// `dietcare_auth_types::principal` and share this JSON shape.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("access code not found")]
    CodeNotFound,
    #[error("access code expired")]
    CodeExpired,
    #[error("patient not found")]
    PatientNotFound,
    #[error("professional not found")]
    ProfessionalNotFound,
    #[error("recipe not found")]
    RecipeNotFound,
    #[error("diet level not found")]
    DietLevelNotFound,
    #[error("professional already registered")]
    ProfessionalAlreadyRegistered,
    #[error(transparent)]
    InvalidDietLevel(#[from] InvalidDietLevel),
    #[error("invalid weight")]
    InvalidWeight,
    #[error("invalid mood entry")]
    InvalidMood,
    #[error("invalid meal plan")]
    InvalidMealPlan,
    #[error("missing data: {0}")]
    MissingData(&'static str),
    #[error("{0}")]
    InvalidBody(String),
    #[error("access code conflict")]
    CodeConflict,
    #[error("internal error")]
    Internal(#[from] anyhow::Error),
}

impl ApiError {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::CodeNotFound => "CODE_NOT_FOUND",
            Self::CodeExpired => "CODE_EXPIRED",
            Self::PatientNotFound => "PATIENT_NOT_FOUND",
            Self::ProfessionalNotFound => "PROFESSIONAL_NOT_FOUND",
            Self::RecipeNotFound => "RECIPE_NOT_FOUND",
            Self::DietLevelNotFound => "DIET_LEVEL_NOT_FOUND",
            Self::ProfessionalAlreadyRegistered => "PROFESSIONAL_ALREADY_REGISTERED",
            Self::InvalidDietLevel(_) => "INVALID_DIET_LEVEL",
            Self::InvalidWeight => "INVALID_WEIGHT",
            Self::InvalidMood => "INVALID_MOOD",
            Self::InvalidMealPlan => "INVALID_MEAL_PLAN",
            Self::MissingData(_) => "MISSING_DATA",
            Self::InvalidBody(_) => "INVALID_BODY",
            // A conflict that escapes the issuance loop is a server fault.
            Self::CodeConflict | Self::Internal(_) => "INTERNAL",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            Self::CodeNotFound
            | Self::PatientNotFound
            | Self::ProfessionalNotFound
            | Self::RecipeNotFound
            | Self::DietLevelNotFound => StatusCode::NOT_FOUND,
            Self::CodeExpired => StatusCode::GONE,
            Self::ProfessionalAlreadyRegistered => StatusCode::CONFLICT,
            Self::InvalidDietLevel(_)
            | Self::InvalidWeight
            | Self::InvalidMood
            | Self::InvalidMealPlan
            | Self::MissingData(_)
            | Self::InvalidBody(_) => StatusCode::BAD_REQUEST,
            Self::CodeConflict | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        // TraceLayer already records status for every request; only 500s carry a cause
        // worth logging here.
        let message = match &self {
            Self::Internal(e) => {
                tracing::error!(error = %e, kind = "INTERNAL", "internal error");
                "internal error".to_owned()
            }
            Self::CodeConflict => {
                tracing::error!(kind = "INTERNAL", "access code issuance exhausted retries");
                "internal error".to_owned()
            }
            other => other.to_string(),
        };
        let body = serde_json::json!({
            "kind": self.kind(),
            "message": message,
        });
        (status, axum::Json(body)).into_response()
    }
}

// Extractor rejections are client faults; the rejection text names the offending field.
impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::InvalidBody(rejection.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        Self::InvalidBody(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        Self::InvalidBody(rejection.body_text())
    }
}
