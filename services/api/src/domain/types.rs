use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use dietcare_domain::diet_level::DietLevel;
use dietcare_domain::id::{PatientId, ProfessionalId, UserId};

/// OAuth account mirrored from the identity provider.
#[derive(Debug, Clone)]
pub struct UserAccount {
    pub id: UserId,
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub profile_image_url: Option<String>,
}

#[derive(Debug, Clone)]
pub struct Professional {
    pub id: ProfessionalId,
    pub user_id: Option<UserId>,
    pub first_name: String,
    pub last_name: String,
    pub email: Option<String>,
    pub specialty: Option<String>,
    pub access_code: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct Patient {
    pub id: PatientId,
    pub user_id: Option<UserId>,
    pub professional_id: ProfessionalId,
    pub first_name: String,
    pub last_name: String,
    pub email: Option<String>,
    pub diet_level: DietLevel,
    pub initial_weight: f64,
    pub current_weight: f64,
    pub target_weight: Option<f64>,
    pub access_code: String,
    pub code_expiry: DateTime<Utc>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Patient {
    /// Expiry is checked against the clock on every call, never cached.
    pub fn code_is_live(&self, now: DateTime<Utc>) -> bool {
        self.code_expiry > now
    }

    pub fn is_owned_by(&self, professional_id: ProfessionalId) -> bool {
        self.professional_id == professional_id
    }
}

/// Partial update applied by `PATCH /api/professional/patients/{id}`.
#[derive(Debug, Clone, Default)]
pub struct PatientUpdate {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub diet_level: Option<DietLevel>,
    pub target_weight: Option<f64>,
    pub is_active: Option<bool>,
}

impl PatientUpdate {
    pub fn is_empty(&self) -> bool {
        self.first_name.is_none()
            && self.last_name.is_none()
            && self.email.is_none()
            && self.diet_level.is_none()
            && self.target_weight.is_none()
            && self.is_active.is_none()
    }

    pub fn apply(&self, patient: &mut Patient) {
        if let Some(v) = &self.first_name {
            patient.first_name = v.clone();
        }
        if let Some(v) = &self.last_name {
            patient.last_name = v.clone();
        }
        if let Some(v) = &self.email {
            patient.email = Some(v.clone());
        }
        if let Some(v) = self.diet_level {
            patient.diet_level = v;
        }
        if let Some(v) = self.target_weight {
            patient.target_weight = Some(v);
        }
        if let Some(v) = self.is_active {
            patient.is_active = v;
        }
    }
}

/// New access code and expiry written together.
#[derive(Debug, Clone)]
pub struct CodeRotation {
    pub code: String,
    pub expiry: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct WeightRecord {
    pub id: Uuid,
    pub patient_id: PatientId,
    pub weight: f64,
    pub note: Option<String>,
    pub recorded_by: Option<ProfessionalId>,
    pub recorded_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct MoodEntry {
    pub id: Uuid,
    pub patient_id: PatientId,
    pub mood: i16,
    pub energy: i16,
    pub motivation: i16,
    pub note: Option<String>,
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct DietLevelInfo {
    pub level: DietLevel,
    pub name: String,
    pub description: String,
    pub daily_calories: Option<i32>,
}

/// Meal slot, in the order meals happen during a day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MealType {
    Breakfast,
    Lunch,
    Snack,
    Dinner,
}

impl MealType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Breakfast => "breakfast",
            Self::Lunch => "lunch",
            Self::Snack => "snack",
            Self::Dinner => "dinner",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "breakfast" => Some(Self::Breakfast),
            "lunch" => Some(Self::Lunch),
            "snack" => Some(Self::Snack),
            "dinner" => Some(Self::Dinner),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct MealPlan {
    pub id: Uuid,
    pub diet_level: DietLevel,
    pub day_of_week: i16,
    pub meal_type: MealType,
    pub title: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct Recipe {
    pub id: Uuid,
    pub diet_level: DietLevel,
    pub title: String,
    pub ingredients: Vec<String>,
    pub instructions: String,
    pub prep_minutes: Option<i32>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct FoodItem {
    pub id: Uuid,
    pub diet_level: DietLevel,
    pub name: String,
    pub category: String,
    pub is_allowed: bool,
    pub portion: Option<String>,
}

#[derive(Debug, Clone)]
pub struct FastingProgram {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub fasting_hours: i16,
    pub eating_hours: i16,
    pub min_diet_level: DietLevel,
}

/// Server-side session record. Holds identity and the fingerprint of the code used to
/// sign in, never a copy of the patient or professional row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SessionRecord {
    Patient {
        patient_id: PatientId,
        fingerprint: String,
    },
    Professional {
        professional_id: ProfessionalId,
        fingerprint: String,
    },
}

/// Fresh codes tried before issuance gives up on unique-constraint collisions.
pub const MAX_CODE_ATTEMPTS: usize = 5;

/// Length of the opaque session id stored in the session cookie.
pub const SESSION_ID_LEN: usize = 48;

/// Upper bound for free-text notes on weight and mood entries.
pub const MAX_NOTE_LEN: usize = 1000;
