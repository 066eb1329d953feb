use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

use dietcare_api::domain::repository::{
    DietContentRepository, MoodRepository, PatientRepository, ProfessionalRepository,
    SessionStore, UserRepository, WeightRepository,
};
use dietcare_api::domain::types::{
    CodeRotation, DietLevelInfo, FastingProgram, FoodItem, MealPlan, MoodEntry, Patient,
    PatientUpdate, Professional, Recipe, SessionRecord, UserAccount, WeightRecord,
};
use dietcare_api::error::ApiError;
use dietcare_domain::diet_level::DietLevel;
use dietcare_domain::id::{PatientId, ProfessionalId, UserId};
use dietcare_domain::pagination::{PageRequest, Sort};

// ── MemoryDb ─────────────────────────────────────────────────────────────────

#[derive(Default)]
pub struct Tables {
    pub users: Vec<UserAccount>,
    pub professionals: Vec<Professional>,
    pub patients: Vec<Patient>,
    pub weights: Vec<WeightRecord>,
    pub moods: Vec<MoodEntry>,
    pub levels: Vec<DietLevelInfo>,
    pub meal_plans: Vec<MealPlan>,
    pub recipes: Vec<Recipe>,
    pub food_items: Vec<FoodItem>,
    pub fasting_programs: Vec<FastingProgram>,
}

/// In-memory stand-in for every repository port. Clones share the same tables, so a
/// write through one port is visible through the others, as with a real database.
#[derive(Clone, Default)]
pub struct MemoryDb {
    pub tables: Arc<Mutex<Tables>>,
    /// Number of upcoming code writes to reject with `CodeConflict`.
    pub forced_conflicts: Arc<Mutex<usize>>,
}

impl MemoryDb {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_levels() -> Self {
        let db = Self::new();
        {
            let mut t = db.tables.lock().unwrap();
            for level in DietLevel::all() {
                t.levels.push(DietLevelInfo {
                    level,
                    name: format!("Level {}", level.get()),
                    description: String::new(),
                    daily_calories: None,
                });
            }
        }
        db
    }

    pub fn force_conflicts(&self, n: usize) {
        *self.forced_conflicts.lock().unwrap() = n;
    }

    pub fn insert_professional(&self, p: Professional) {
        self.tables.lock().unwrap().professionals.push(p);
    }

    pub fn insert_patient(&self, p: Patient) {
        self.tables.lock().unwrap().patients.push(p);
    }

    pub fn patient(&self, id: PatientId) -> Patient {
        self.tables
            .lock()
            .unwrap()
            .patients
            .iter()
            .find(|p| p.id == id)
            .cloned()
            .expect("patient exists")
    }

    pub fn weight_count(&self, id: PatientId) -> usize {
        self.tables
            .lock()
            .unwrap()
            .weights
            .iter()
            .filter(|w| w.patient_id == id)
            .count()
    }

    fn take_forced_conflict(&self) -> bool {
        let mut n = self.forced_conflicts.lock().unwrap();
        if *n > 0 {
            *n -= 1;
            true
        } else {
            false
        }
    }

    fn patient_code_taken(t: &Tables, code: &str, except: Option<PatientId>) -> bool {
        t.patients
            .iter()
            .any(|p| p.access_code == code && Some(p.id) != except)
    }
}

impl UserRepository for MemoryDb {
    async fn upsert(&self, account: &UserAccount) -> Result<(), ApiError> {
        let mut t = self.tables.lock().unwrap();
        t.users.retain(|u| u.id != account.id);
        t.users.push(account.clone());
        Ok(())
    }
}

impl ProfessionalRepository for MemoryDb {
    async fn find_by_id(&self, id: ProfessionalId) -> Result<Option<Professional>, ApiError> {
        let t = self.tables.lock().unwrap();
        Ok(t.professionals.iter().find(|p| p.id == id).cloned())
    }

    async fn find_by_code(&self, code: &str) -> Result<Option<Professional>, ApiError> {
        let t = self.tables.lock().unwrap();
        Ok(t.professionals
            .iter()
            .find(|p| p.access_code == code)
            .cloned())
    }

    async fn find_by_user(&self, user_id: UserId) -> Result<Option<Professional>, ApiError> {
        let t = self.tables.lock().unwrap();
        Ok(t.professionals
            .iter()
            .find(|p| p.user_id == Some(user_id))
            .cloned())
    }

    async fn create(&self, professional: &Professional) -> Result<(), ApiError> {
        if self.take_forced_conflict() {
            return Err(ApiError::CodeConflict);
        }
        let mut t = self.tables.lock().unwrap();
        if t.professionals
            .iter()
            .any(|p| p.access_code == professional.access_code)
        {
            return Err(ApiError::CodeConflict);
        }
        if professional.user_id.is_some()
            && t.professionals
                .iter()
                .any(|p| p.user_id == professional.user_id)
        {
            return Err(ApiError::ProfessionalAlreadyRegistered);
        }
        t.professionals.push(professional.clone());
        Ok(())
    }

    async fn set_access_code(&self, id: ProfessionalId, code: &str) -> Result<(), ApiError> {
        if self.take_forced_conflict() {
            return Err(ApiError::CodeConflict);
        }
        let mut t = self.tables.lock().unwrap();
        if t.professionals
            .iter()
            .any(|p| p.access_code == code && p.id != id)
        {
            return Err(ApiError::CodeConflict);
        }
        if let Some(p) = t.professionals.iter_mut().find(|p| p.id == id) {
            p.access_code = code.to_owned();
        }
        Ok(())
    }
}

impl PatientRepository for MemoryDb {
    async fn find_by_id(&self, id: PatientId) -> Result<Option<Patient>, ApiError> {
        let t = self.tables.lock().unwrap();
        Ok(t.patients.iter().find(|p| p.id == id).cloned())
    }

    async fn find_by_code(&self, code: &str) -> Result<Option<Patient>, ApiError> {
        let t = self.tables.lock().unwrap();
        Ok(t.patients.iter().find(|p| p.access_code == code).cloned())
    }

    async fn find_by_user(&self, user_id: UserId) -> Result<Option<Patient>, ApiError> {
        let t = self.tables.lock().unwrap();
        Ok(t.patients
            .iter()
            .find(|p| p.user_id == Some(user_id))
            .cloned())
    }

    async fn list_by_professional(
        &self,
        professional_id: ProfessionalId,
        include_inactive: bool,
    ) -> Result<Vec<Patient>, ApiError> {
        let t = self.tables.lock().unwrap();
        Ok(t.patients
            .iter()
            .filter(|p| p.professional_id == professional_id)
            .filter(|p| include_inactive || p.is_active)
            .cloned()
            .collect())
    }

    async fn create_with_weight(
        &self,
        patient: &Patient,
        initial: &WeightRecord,
    ) -> Result<(), ApiError> {
        if self.take_forced_conflict() {
            return Err(ApiError::CodeConflict);
        }
        let mut t = self.tables.lock().unwrap();
        if Self::patient_code_taken(&t, &patient.access_code, None) {
            return Err(ApiError::CodeConflict);
        }
        t.patients.push(patient.clone());
        t.weights.push(initial.clone());
        Ok(())
    }

    async fn update(&self, id: PatientId, update: &PatientUpdate) -> Result<(), ApiError> {
        let mut t = self.tables.lock().unwrap();
        if let Some(p) = t.patients.iter_mut().find(|p| p.id == id) {
            update.apply(p);
            p.updated_at = Utc::now();
        }
        Ok(())
    }

    async fn set_access_code(
        &self,
        id: PatientId,
        code: &str,
        expiry: DateTime<Utc>,
    ) -> Result<(), ApiError> {
        if self.take_forced_conflict() {
            return Err(ApiError::CodeConflict);
        }
        let mut t = self.tables.lock().unwrap();
        if Self::patient_code_taken(&t, code, Some(id)) {
            return Err(ApiError::CodeConflict);
        }
        if let Some(p) = t.patients.iter_mut().find(|p| p.id == id) {
            p.access_code = code.to_owned();
            p.code_expiry = expiry;
        }
        Ok(())
    }
}

impl WeightRepository for MemoryDb {
    async fn append(
        &self,
        record: &WeightRecord,
        rotation: Option<&CodeRotation>,
    ) -> Result<(), ApiError> {
        if rotation.is_some() && self.take_forced_conflict() {
            return Err(ApiError::CodeConflict);
        }
        let mut t = self.tables.lock().unwrap();
        if let Some(r) = rotation {
            if Self::patient_code_taken(&t, &r.code, Some(record.patient_id)) {
                return Err(ApiError::CodeConflict);
            }
        }
        t.weights.push(record.clone());
        if let Some(p) = t.patients.iter_mut().find(|p| p.id == record.patient_id) {
            p.current_weight = record.weight;
            if let Some(r) = rotation {
                p.access_code = r.code.clone();
                p.code_expiry = r.expiry;
            }
        }
        Ok(())
    }

    async fn list(
        &self,
        patient_id: PatientId,
        sort: Sort,
        page: PageRequest,
    ) -> Result<Vec<WeightRecord>, ApiError> {
        let t = self.tables.lock().unwrap();
        let mut rows: Vec<_> = t
            .weights
            .iter()
            .filter(|w| w.patient_id == patient_id)
            .cloned()
            .collect();
        rows.sort_by_key(|w| w.recorded_at);
        if sort == Sort::Desc {
            rows.reverse();
        }
        Ok(rows
            .into_iter()
            .skip(page.offset() as usize)
            .take(page.per_page as usize)
            .collect())
    }
}

impl MoodRepository for MemoryDb {
    async fn create(&self, entry: &MoodEntry) -> Result<(), ApiError> {
        self.tables.lock().unwrap().moods.push(entry.clone());
        Ok(())
    }

    async fn list(
        &self,
        patient_id: PatientId,
        sort: Sort,
        page: PageRequest,
    ) -> Result<Vec<MoodEntry>, ApiError> {
        let t = self.tables.lock().unwrap();
        let mut rows: Vec<_> = t
            .moods
            .iter()
            .filter(|m| m.patient_id == patient_id)
            .cloned()
            .collect();
        rows.sort_by_key(|m| m.created_at);
        if sort == Sort::Desc {
            rows.reverse();
        }
        Ok(rows
            .into_iter()
            .skip(page.offset() as usize)
            .take(page.per_page as usize)
            .collect())
    }
}

impl DietContentRepository for MemoryDb {
    async fn list_levels(&self) -> Result<Vec<DietLevelInfo>, ApiError> {
        Ok(self.tables.lock().unwrap().levels.clone())
    }

    async fn find_level(&self, level: DietLevel) -> Result<Option<DietLevelInfo>, ApiError> {
        let t = self.tables.lock().unwrap();
        Ok(t.levels.iter().find(|l| l.level == level).cloned())
    }

    async fn list_meal_plans(&self, level: DietLevel) -> Result<Vec<MealPlan>, ApiError> {
        let t = self.tables.lock().unwrap();
        let mut plans: Vec<_> = t
            .meal_plans
            .iter()
            .filter(|m| m.diet_level == level)
            .cloned()
            .collect();
        plans.sort_by_key(|p| (p.day_of_week, p.meal_type));
        Ok(plans)
    }

    async fn create_meal_plan(&self, plan: &MealPlan) -> Result<(), ApiError> {
        self.tables.lock().unwrap().meal_plans.push(plan.clone());
        Ok(())
    }

    async fn list_recipes(&self, level: Option<DietLevel>) -> Result<Vec<Recipe>, ApiError> {
        let t = self.tables.lock().unwrap();
        Ok(t.recipes
            .iter()
            .filter(|r| level.is_none_or(|l| r.diet_level == l))
            .cloned()
            .collect())
    }

    async fn find_recipe(&self, id: Uuid) -> Result<Option<Recipe>, ApiError> {
        let t = self.tables.lock().unwrap();
        Ok(t.recipes.iter().find(|r| r.id == id).cloned())
    }

    async fn list_food_items(
        &self,
        level: Option<DietLevel>,
        category: Option<&str>,
    ) -> Result<Vec<FoodItem>, ApiError> {
        let t = self.tables.lock().unwrap();
        Ok(t.food_items
            .iter()
            .filter(|f| level.is_none_or(|l| f.diet_level == l))
            .filter(|f| category.is_none_or(|c| f.category == c))
            .cloned()
            .collect())
    }

    async fn list_fasting_programs(
        &self,
        level: Option<DietLevel>,
    ) -> Result<Vec<FastingProgram>, ApiError> {
        let t = self.tables.lock().unwrap();
        Ok(t.fasting_programs
            .iter()
            .filter(|f| level.is_none_or(|l| f.min_diet_level <= l))
            .cloned()
            .collect())
    }
}

// ── MemorySessions ───────────────────────────────────────────────────────────

#[derive(Clone, Default)]
pub struct MemorySessions {
    pub records: Arc<Mutex<HashMap<String, SessionRecord>>>,
}

impl MemorySessions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, session_id: &str) -> bool {
        self.records.lock().unwrap().contains_key(session_id)
    }

    pub fn len(&self) -> usize {
        self.records.lock().unwrap().len()
    }
}

impl SessionStore for MemorySessions {
    async fn put(
        &self,
        session_id: &str,
        record: &SessionRecord,
        _ttl_secs: u64,
    ) -> Result<(), ApiError> {
        self.records
            .lock()
            .unwrap()
            .insert(session_id.to_owned(), record.clone());
        Ok(())
    }

    async fn get(&self, session_id: &str) -> Result<Option<SessionRecord>, ApiError> {
        Ok(self.records.lock().unwrap().get(session_id).cloned())
    }

    async fn delete(&self, session_id: &str) -> Result<(), ApiError> {
        self.records.lock().unwrap().remove(session_id);
        Ok(())
    }
}

// ── Fixtures ─────────────────────────────────────────────────────────────────

pub const TTL_SECS: u64 = 3600;

pub fn test_professional(code: &str) -> Professional {
    let now = Utc::now();
    Professional {
        id: ProfessionalId(Uuid::new_v4()),
        user_id: None,
        first_name: "Ana".into(),
        last_name: "Souza".into(),
        email: Some("ana@clinic.example".into()),
        specialty: Some("nutrition".into()),
        access_code: code.to_owned(),
        is_active: true,
        created_at: now,
        updated_at: now,
    }
}

pub fn test_patient(owner: ProfessionalId, code: &str) -> Patient {
    let now = Utc::now();
    Patient {
        id: PatientId(Uuid::new_v4()),
        user_id: None,
        professional_id: owner,
        first_name: "Joao".into(),
        last_name: "Silva".into(),
        email: None,
        diet_level: DietLevel::new(3).unwrap(),
        initial_weight: 90.0,
        current_weight: 90.0,
        target_weight: Some(75.0),
        access_code: code.to_owned(),
        code_expiry: now + Duration::days(10),
        is_active: true,
        created_at: now,
        updated_at: now,
    }
}
