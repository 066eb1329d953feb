#![allow(async_fn_in_trait)]

use chrono::{DateTime, Utc};
use uuid::Uuid;

use dietcare_domain::diet_level::DietLevel;
use dietcare_domain::id::{PatientId, ProfessionalId, UserId};
use dietcare_domain::pagination::{PageRequest, Sort};

use crate::domain::types::{
    CodeRotation, DietLevelInfo, FastingProgram, FoodItem, MealPlan, MoodEntry, Patient,
    PatientUpdate, Professional, Recipe, SessionRecord, UserAccount, WeightRecord,
};
use crate::error::ApiError;

/// Mirror of OAuth accounts that signed in.
pub trait UserRepository: Send + Sync {
    /// Insert or refresh the account row keyed by its OAuth id.
    async fn upsert(&self, account: &UserAccount) -> Result<(), ApiError>;
}

pub trait ProfessionalRepository: Send + Sync {
    async fn find_by_id(&self, id: ProfessionalId) -> Result<Option<Professional>, ApiError>;

    /// Exact match on the stored code. Callers normalize first.
    async fn find_by_code(&self, code: &str) -> Result<Option<Professional>, ApiError>;

    async fn find_by_user(&self, user_id: UserId) -> Result<Option<Professional>, ApiError>;

    /// Insert a professional.
    ///
    /// Returns `CodeConflict` when the access code collides and
    /// `ProfessionalAlreadyRegistered` when the OAuth user is already linked.
    async fn create(&self, professional: &Professional) -> Result<(), ApiError>;

    /// Replace the access code. Returns `CodeConflict` on collision.
    async fn set_access_code(&self, id: ProfessionalId, code: &str) -> Result<(), ApiError>;
}

pub trait PatientRepository: Send + Sync {
    async fn find_by_id(&self, id: PatientId) -> Result<Option<Patient>, ApiError>;

    /// Exact match on the stored code. Callers normalize first.
    async fn find_by_code(&self, code: &str) -> Result<Option<Patient>, ApiError>;

    async fn find_by_user(&self, user_id: UserId) -> Result<Option<Patient>, ApiError>;

    /// Patients owned by a professional, newest first.
    async fn list_by_professional(
        &self,
        professional_id: ProfessionalId,
        include_inactive: bool,
    ) -> Result<Vec<Patient>, ApiError>;

    /// Insert the patient and its initial weight record in one transaction.
    /// Returns `CodeConflict` when the access code collides.
    async fn create_with_weight(
        &self,
        patient: &Patient,
        initial: &WeightRecord,
    ) -> Result<(), ApiError>;

    async fn update(&self, id: PatientId, update: &PatientUpdate) -> Result<(), ApiError>;

    /// Replace code and expiry. Returns `CodeConflict` on collision.
    async fn set_access_code(
        &self,
        id: PatientId,
        code: &str,
        expiry: DateTime<Utc>,
    ) -> Result<(), ApiError>;
}

pub trait WeightRepository: Send + Sync {
    /// Insert the record and set the patient's current weight in one transaction. When
    /// `rotation` is given, the patient's code and expiry are replaced in the same
    /// transaction; a collision returns `CodeConflict` and nothing is written.
    async fn append(
        &self,
        record: &WeightRecord,
        rotation: Option<&CodeRotation>,
    ) -> Result<(), ApiError>;

    async fn list(
        &self,
        patient_id: PatientId,
        sort: Sort,
        page: PageRequest,
    ) -> Result<Vec<WeightRecord>, ApiError>;
}

pub trait MoodRepository: Send + Sync {
    async fn create(&self, entry: &MoodEntry) -> Result<(), ApiError>;

    async fn list(
        &self,
        patient_id: PatientId,
        sort: Sort,
        page: PageRequest,
    ) -> Result<Vec<MoodEntry>, ApiError>;
}

/// Read side of the diet catalogue, plus meal-plan authoring.
pub trait DietContentRepository: Send + Sync {
    async fn list_levels(&self) -> Result<Vec<DietLevelInfo>, ApiError>;

    async fn find_level(&self, level: DietLevel) -> Result<Option<DietLevelInfo>, ApiError>;

    /// Ordered by day of week, then meal type.
    async fn list_meal_plans(&self, level: DietLevel) -> Result<Vec<MealPlan>, ApiError>;

    async fn create_meal_plan(&self, plan: &MealPlan) -> Result<(), ApiError>;

    async fn list_recipes(&self, level: Option<DietLevel>) -> Result<Vec<Recipe>, ApiError>;

    async fn find_recipe(&self, id: Uuid) -> Result<Option<Recipe>, ApiError>;

    async fn list_food_items(
        &self,
        level: Option<DietLevel>,
        category: Option<&str>,
    ) -> Result<Vec<FoodItem>, ApiError>;

    /// Programs whose `min_diet_level` is at most `level` (all when `None`).
    async fn list_fasting_programs(
        &self,
        level: Option<DietLevel>,
    ) -> Result<Vec<FastingProgram>, ApiError>;
}

/// Server-side session storage (Redis, TTL-evicted).
pub trait SessionStore: Send + Sync {
    async fn put(
        &self,
        session_id: &str,
        record: &SessionRecord,
        ttl_secs: u64,
    ) -> Result<(), ApiError>;

    async fn get(&self, session_id: &str) -> Result<Option<SessionRecord>, ApiError>;

    async fn delete(&self, session_id: &str) -> Result<(), ApiError>;
}
