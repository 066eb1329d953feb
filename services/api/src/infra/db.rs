use anyhow::Context as _;
use chrono::{DateTime, Utc};
use sea_orm::sea_query::OnConflict;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection, DatabaseTransaction,
    DbErr, EntityTrait, Order, QueryFilter, QueryOrder, QuerySelect, SqlErr, TransactionError,
    TransactionTrait,
};
use uuid::Uuid;

use dietcare_domain::diet_level::DietLevel;
use dietcare_domain::id::{PatientId, ProfessionalId, UserId};
use dietcare_domain::pagination::{PageRequest, Sort};
use dietcare_schema::{
    diet_levels, fasting_programs, food_items, meal_plans, mood_entries, patients, professionals,
    recipes, users, weight_records,
};

use crate::domain::repository::{
    DietContentRepository, MoodRepository, PatientRepository, ProfessionalRepository,
    UserRepository, WeightRepository,
};
use crate::domain::types::{
    CodeRotation, DietLevelInfo, FastingProgram, FoodItem, MealPlan, MealType, MoodEntry,
    Patient, PatientUpdate, Professional, Recipe, UserAccount, WeightRecord,
};
use crate::error::ApiError;

// ── Error mapping ─────────────────────────────────────────────────────────────

fn unique_violation(err: &DbErr) -> Option<String> {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(detail)) => Some(detail),
        _ => None,
    }
}

/// A write that may collide on an access code: the collision becomes `CodeConflict`
/// so the issuance loop can retry; anything else is internal.
fn code_write_error(err: DbErr, what: &'static str) -> ApiError {
    match unique_violation(&err) {
        Some(detail) if detail.contains("access_code") => ApiError::CodeConflict,
        _ => ApiError::Internal(anyhow::Error::new(err).context(what)),
    }
}

fn code_txn_error(err: TransactionError<DbErr>, what: &'static str) -> ApiError {
    match err {
        TransactionError::Connection(e) | TransactionError::Transaction(e) => {
            code_write_error(e, what)
        }
    }
}

fn order(sort: Sort) -> Order {
    match sort {
        Sort::Desc => Order::Desc,
        Sort::Asc => Order::Asc,
    }
}

fn level_of(value: i16, what: &'static str) -> anyhow::Result<DietLevel> {
    DietLevel::try_from(value).context(what)
}

// ── User repository ───────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbUserRepository {
    pub db: DatabaseConnection,
}

impl UserRepository for DbUserRepository {
    async fn upsert(&self, account: &UserAccount) -> Result<(), ApiError> {
        let now = Utc::now();
        let model = users::ActiveModel {
            id: Set(account.id.0),
            email: Set(account.email.clone()),
            first_name: Set(account.first_name.clone()),
            last_name: Set(account.last_name.clone()),
            profile_image_url: Set(account.profile_image_url.clone()),
            created_at: Set(now),
            updated_at: Set(now),
        };
        users::Entity::insert(model)
            .on_conflict(
                OnConflict::column(users::Column::Id)
                    .update_columns([
                        users::Column::Email,
                        users::Column::FirstName,
                        users::Column::LastName,
                        users::Column::UpdatedAt,
                    ])
                    .to_owned(),
            )
            .exec(&self.db)
            .await
            .context("upsert user")?;
        Ok(())
    }
}

// ── Professional repository ──────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbProfessionalRepository {
    pub db: DatabaseConnection,
}

impl ProfessionalRepository for DbProfessionalRepository {
    async fn find_by_id(&self, id: ProfessionalId) -> Result<Option<Professional>, ApiError> {
        let model = professionals::Entity::find_by_id(id.0)
            .one(&self.db)
            .await
            .context("find professional by id")?;
        Ok(model.map(professional_from_model))
    }

    async fn find_by_code(&self, code: &str) -> Result<Option<Professional>, ApiError> {
        let model = professionals::Entity::find()
            .filter(professionals::Column::AccessCode.eq(code))
            .one(&self.db)
            .await
            .context("find professional by code")?;
        Ok(model.map(professional_from_model))
    }

    async fn find_by_user(&self, user_id: UserId) -> Result<Option<Professional>, ApiError> {
        let model = professionals::Entity::find()
            .filter(professionals::Column::UserId.eq(user_id.0))
            .one(&self.db)
            .await
            .context("find professional by user")?;
        Ok(model.map(professional_from_model))
    }

    async fn create(&self, p: &Professional) -> Result<(), ApiError> {
        let result = professionals::ActiveModel {
            id: Set(p.id.0),
            user_id: Set(p.user_id.map(|u| u.0)),
            first_name: Set(p.first_name.clone()),
            last_name: Set(p.last_name.clone()),
            email: Set(p.email.clone()),
            specialty: Set(p.specialty.clone()),
            access_code: Set(p.access_code.clone()),
            is_active: Set(p.is_active),
            created_at: Set(p.created_at),
            updated_at: Set(p.updated_at),
        }
        .insert(&self.db)
        .await;
        match result {
            Ok(_) => Ok(()),
            Err(e) if unique_violation(&e).is_some_and(|d| d.contains("user_id")) => {
                Err(ApiError::ProfessionalAlreadyRegistered)
            }
            Err(e) => Err(code_write_error(e, "insert professional")),
        }
    }

    async fn set_access_code(&self, id: ProfessionalId, code: &str) -> Result<(), ApiError> {
        professionals::ActiveModel {
            id: Set(id.0),
            access_code: Set(code.to_owned()),
            updated_at: Set(Utc::now()),
            ..Default::default()
        }
        .update(&self.db)
        .await
        .map_err(|e| code_write_error(e, "set professional access code"))?;
        Ok(())
    }
}

fn professional_from_model(model: professionals::Model) -> Professional {
    Professional {
        id: ProfessionalId(model.id),
        user_id: model.user_id.map(UserId),
        first_name: model.first_name,
        last_name: model.last_name,
        email: model.email,
        specialty: model.specialty,
        access_code: model.access_code,
        is_active: model.is_active,
        created_at: model.created_at,
        updated_at: model.updated_at,
    }
}

// ── Patient repository ────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbPatientRepository {
    pub db: DatabaseConnection,
}

impl PatientRepository for DbPatientRepository {
    async fn find_by_id(&self, id: PatientId) -> Result<Option<Patient>, ApiError> {
        let model = patients::Entity::find_by_id(id.0)
            .one(&self.db)
            .await
            .context("find patient by id")?;
        Ok(model.map(patient_from_model).transpose()?)
    }

    async fn find_by_code(&self, code: &str) -> Result<Option<Patient>, ApiError> {
        let model = patients::Entity::find()
            .filter(patients::Column::AccessCode.eq(code))
            .one(&self.db)
            .await
            .context("find patient by code")?;
        Ok(model.map(patient_from_model).transpose()?)
    }

    async fn find_by_user(&self, user_id: UserId) -> Result<Option<Patient>, ApiError> {
        let model = patients::Entity::find()
            .filter(patients::Column::UserId.eq(user_id.0))
            .order_by_desc(patients::Column::CreatedAt)
            .one(&self.db)
            .await
            .context("find patient by user")?;
        Ok(model.map(patient_from_model).transpose()?)
    }

    async fn list_by_professional(
        &self,
        professional_id: ProfessionalId,
        include_inactive: bool,
    ) -> Result<Vec<Patient>, ApiError> {
        let mut query =
            patients::Entity::find().filter(patients::Column::ProfessionalId.eq(professional_id.0));
        if !include_inactive {
            query = query.filter(patients::Column::IsActive.eq(true));
        }
        let models = query
            .order_by_desc(patients::Column::CreatedAt)
            .all(&self.db)
            .await
            .context("list patients by professional")?;
        Ok(models
            .into_iter()
            .map(patient_from_model)
            .collect::<anyhow::Result<Vec<_>>>()?)
    }

    async fn create_with_weight(
        &self,
        patient: &Patient,
        initial: &WeightRecord,
    ) -> Result<(), ApiError> {
        self.db
            .transaction::<_, (), DbErr>(|txn| {
                let patient = patient.clone();
                let initial = initial.clone();
                Box::pin(async move {
                    insert_patient(txn, &patient).await?;
                    insert_weight_record(txn, &initial).await?;
                    Ok(())
                })
            })
            .await
            .map_err(|e| code_txn_error(e, "create patient with weight"))?;
        Ok(())
    }

    async fn update(&self, id: PatientId, update: &PatientUpdate) -> Result<(), ApiError> {
        let mut model = patients::ActiveModel {
            id: Set(id.0),
            updated_at: Set(Utc::now()),
            ..Default::default()
        };
        if let Some(v) = &update.first_name {
            model.first_name = Set(v.clone());
        }
        if let Some(v) = &update.last_name {
            model.last_name = Set(v.clone());
        }
        if let Some(v) = &update.email {
            model.email = Set(Some(v.clone()));
        }
        if let Some(v) = update.diet_level {
            model.diet_level = Set(v.into());
        }
        if let Some(v) = update.target_weight {
            model.target_weight = Set(Some(v));
        }
        if let Some(v) = update.is_active {
            model.is_active = Set(v);
        }
        model.update(&self.db).await.context("update patient")?;
        Ok(())
    }

    async fn set_access_code(
        &self,
        id: PatientId,
        code: &str,
        expiry: DateTime<Utc>,
    ) -> Result<(), ApiError> {
        patients::ActiveModel {
            id: Set(id.0),
            access_code: Set(code.to_owned()),
            code_expiry: Set(expiry),
            updated_at: Set(Utc::now()),
            ..Default::default()
        }
        .update(&self.db)
        .await
        .map_err(|e| code_write_error(e, "set patient access code"))?;
        Ok(())
    }
}

async fn insert_patient(txn: &DatabaseTransaction, p: &Patient) -> Result<(), DbErr> {
    patients::ActiveModel {
        id: Set(p.id.0),
        user_id: Set(p.user_id.map(|u| u.0)),
        professional_id: Set(p.professional_id.0),
        first_name: Set(p.first_name.clone()),
        last_name: Set(p.last_name.clone()),
        email: Set(p.email.clone()),
        diet_level: Set(p.diet_level.into()),
        initial_weight: Set(p.initial_weight),
        current_weight: Set(p.current_weight),
        target_weight: Set(p.target_weight),
        access_code: Set(p.access_code.clone()),
        code_expiry: Set(p.code_expiry),
        is_active: Set(p.is_active),
        created_at: Set(p.created_at),
        updated_at: Set(p.updated_at),
    }
    .insert(txn)
    .await?;
    Ok(())
}

fn patient_from_model(model: patients::Model) -> anyhow::Result<Patient> {
    Ok(Patient {
        id: PatientId(model.id),
        user_id: model.user_id.map(UserId),
        professional_id: ProfessionalId(model.professional_id),
        first_name: model.first_name,
        last_name: model.last_name,
        email: model.email,
        diet_level: level_of(model.diet_level, "patient diet level out of range")?,
        initial_weight: model.initial_weight,
        current_weight: model.current_weight,
        target_weight: model.target_weight,
        access_code: model.access_code,
        code_expiry: model.code_expiry,
        is_active: model.is_active,
        created_at: model.created_at,
        updated_at: model.updated_at,
    })
}

// ── Weight repository ─────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbWeightRepository {
    pub db: DatabaseConnection,
}

impl WeightRepository for DbWeightRepository {
    async fn append(
        &self,
        record: &WeightRecord,
        rotation: Option<&CodeRotation>,
    ) -> Result<(), ApiError> {
        self.db
            .transaction::<_, (), DbErr>(|txn| {
                let record = record.clone();
                let rotation = rotation.cloned();
                Box::pin(async move {
                    insert_weight_record(txn, &record).await?;
                    let mut patient = patients::ActiveModel {
                        id: Set(record.patient_id.0),
                        current_weight: Set(record.weight),
                        updated_at: Set(record.recorded_at),
                        ..Default::default()
                    };
                    if let Some(rotation) = rotation {
                        patient.access_code = Set(rotation.code);
                        patient.code_expiry = Set(rotation.expiry);
                    }
                    patient.update(txn).await?;
                    Ok(())
                })
            })
            .await
            .map_err(|e| code_txn_error(e, "append weight record"))?;
        Ok(())
    }

    async fn list(
        &self,
        patient_id: PatientId,
        sort: Sort,
        page: PageRequest,
    ) -> Result<Vec<WeightRecord>, ApiError> {
        let models = weight_records::Entity::find()
            .filter(weight_records::Column::PatientId.eq(patient_id.0))
            .order_by(weight_records::Column::RecordedAt, order(sort))
            .offset(page.offset())
            .limit(page.per_page as u64)
            .all(&self.db)
            .await
            .context("list weight records")?;
        Ok(models.into_iter().map(weight_from_model).collect())
    }
}

async fn insert_weight_record(txn: &DatabaseTransaction, r: &WeightRecord) -> Result<(), DbErr> {
    weight_records::ActiveModel {
        id: Set(r.id),
        patient_id: Set(r.patient_id.0),
        weight: Set(r.weight),
        note: Set(r.note.clone()),
        recorded_by: Set(r.recorded_by.map(|p| p.0)),
        recorded_at: Set(r.recorded_at),
    }
    .insert(txn)
    .await?;
    Ok(())
}

fn weight_from_model(model: weight_records::Model) -> WeightRecord {
    WeightRecord {
        id: model.id,
        patient_id: PatientId(model.patient_id),
        weight: model.weight,
        note: model.note,
        recorded_by: model.recorded_by.map(ProfessionalId),
        recorded_at: model.recorded_at,
    }
}

// ── Mood repository ───────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbMoodRepository {
    pub db: DatabaseConnection,
}

impl MoodRepository for DbMoodRepository {
    async fn create(&self, entry: &MoodEntry) -> Result<(), ApiError> {
        mood_entries::ActiveModel {
            id: Set(entry.id),
            patient_id: Set(entry.patient_id.0),
            mood: Set(entry.mood),
            energy: Set(entry.energy),
            motivation: Set(entry.motivation),
            note: Set(entry.note.clone()),
            tags: Set(serde_json::json!(entry.tags)),
            created_at: Set(entry.created_at),
        }
        .insert(&self.db)
        .await
        .context("insert mood entry")?;
        Ok(())
    }

    async fn list(
        &self,
        patient_id: PatientId,
        sort: Sort,
        page: PageRequest,
    ) -> Result<Vec<MoodEntry>, ApiError> {
        let models = mood_entries::Entity::find()
            .filter(mood_entries::Column::PatientId.eq(patient_id.0))
            .order_by(mood_entries::Column::CreatedAt, order(sort))
            .offset(page.offset())
            .limit(page.per_page as u64)
            .all(&self.db)
            .await
            .context("list mood entries")?;
        Ok(models
            .into_iter()
            .map(mood_from_model)
            .collect::<anyhow::Result<Vec<_>>>()?)
    }
}

fn mood_from_model(model: mood_entries::Model) -> anyhow::Result<MoodEntry> {
    Ok(MoodEntry {
        id: model.id,
        patient_id: PatientId(model.patient_id),
        mood: model.mood,
        energy: model.energy,
        motivation: model.motivation,
        note: model.note,
        tags: serde_json::from_value(model.tags)
            .with_context(|| format!("mood entry {} tags are not a string array", model.id))?,
        created_at: model.created_at,
    })
}

// ── Diet content repository ──────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbDietContentRepository {
    pub db: DatabaseConnection,
}

impl DietContentRepository for DbDietContentRepository {
    async fn list_levels(&self) -> Result<Vec<DietLevelInfo>, ApiError> {
        let models = diet_levels::Entity::find()
            .order_by_asc(diet_levels::Column::Level)
            .all(&self.db)
            .await
            .context("list diet levels")?;
        Ok(models
            .into_iter()
            .map(level_from_model)
            .collect::<anyhow::Result<Vec<_>>>()?)
    }

    async fn find_level(&self, level: DietLevel) -> Result<Option<DietLevelInfo>, ApiError> {
        let model = diet_levels::Entity::find_by_id(i16::from(level))
            .one(&self.db)
            .await
            .context("find diet level")?;
        Ok(model.map(level_from_model).transpose()?)
    }

    async fn list_meal_plans(&self, level: DietLevel) -> Result<Vec<MealPlan>, ApiError> {
        let models = meal_plans::Entity::find()
            .filter(meal_plans::Column::DietLevel.eq(i16::from(level)))
            .order_by_asc(meal_plans::Column::DayOfWeek)
            .all(&self.db)
            .await
            .context("list meal plans")?;
        let mut plans = models
            .into_iter()
            .map(meal_plan_from_model)
            .collect::<anyhow::Result<Vec<_>>>()?;
        plans.sort_by_key(|p| (p.day_of_week, p.meal_type));
        Ok(plans)
    }

    async fn create_meal_plan(&self, plan: &MealPlan) -> Result<(), ApiError> {
        meal_plans::ActiveModel {
            id: Set(plan.id),
            diet_level: Set(plan.diet_level.into()),
            day_of_week: Set(plan.day_of_week),
            meal_type: Set(plan.meal_type.as_str().to_owned()),
            title: Set(plan.title.clone()),
            description: Set(plan.description.clone()),
            created_at: Set(plan.created_at),
        }
        .insert(&self.db)
        .await
        .context("insert meal plan")?;
        Ok(())
    }

    async fn list_recipes(&self, level: Option<DietLevel>) -> Result<Vec<Recipe>, ApiError> {
        let mut query = recipes::Entity::find();
        if let Some(level) = level {
            query = query.filter(recipes::Column::DietLevel.eq(i16::from(level)));
        }
        let models = query
            .order_by_asc(recipes::Column::Title)
            .all(&self.db)
            .await
            .context("list recipes")?;
        Ok(models
            .into_iter()
            .map(recipe_from_model)
            .collect::<anyhow::Result<Vec<_>>>()?)
    }

    async fn find_recipe(&self, id: Uuid) -> Result<Option<Recipe>, ApiError> {
        let model = recipes::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .context("find recipe")?;
        Ok(model.map(recipe_from_model).transpose()?)
    }

    async fn list_food_items(
        &self,
        level: Option<DietLevel>,
        category: Option<&str>,
    ) -> Result<Vec<FoodItem>, ApiError> {
        let mut query = food_items::Entity::find();
        if let Some(level) = level {
            query = query.filter(food_items::Column::DietLevel.eq(i16::from(level)));
        }
        if let Some(category) = category {
            query = query.filter(food_items::Column::Category.eq(category));
        }
        let models = query
            .order_by_asc(food_items::Column::Category)
            .order_by_asc(food_items::Column::Name)
            .all(&self.db)
            .await
            .context("list food items")?;
        Ok(models
            .into_iter()
            .map(|m| {
                Ok(FoodItem {
                    id: m.id,
                    diet_level: level_of(m.diet_level, "food item diet level out of range")?,
                    name: m.name,
                    category: m.category,
                    is_allowed: m.is_allowed,
                    portion: m.portion,
                })
            })
            .collect::<anyhow::Result<Vec<_>>>()?)
    }

    async fn list_fasting_programs(
        &self,
        level: Option<DietLevel>,
    ) -> Result<Vec<FastingProgram>, ApiError> {
        let mut query = fasting_programs::Entity::find();
        if let Some(level) = level {
            query = query.filter(fasting_programs::Column::MinDietLevel.lte(i16::from(level)));
        }
        let models = query
            .order_by_asc(fasting_programs::Column::FastingHours)
            .all(&self.db)
            .await
            .context("list fasting programs")?;
        Ok(models
            .into_iter()
            .map(|m| {
                Ok(FastingProgram {
                    id: m.id,
                    name: m.name,
                    description: m.description,
                    fasting_hours: m.fasting_hours,
                    eating_hours: m.eating_hours,
                    min_diet_level: level_of(m.min_diet_level, "fasting program level out of range")?,
                })
            })
            .collect::<anyhow::Result<Vec<_>>>()?)
    }
}

fn level_from_model(model: diet_levels::Model) -> anyhow::Result<DietLevelInfo> {
    Ok(DietLevelInfo {
        level: level_of(model.level, "diet level out of range")?,
        name: model.name,
        description: model.description,
        daily_calories: model.daily_calories,
    })
}

fn meal_plan_from_model(model: meal_plans::Model) -> anyhow::Result<MealPlan> {
    Ok(MealPlan {
        id: model.id,
        diet_level: level_of(model.diet_level, "meal plan diet level out of range")?,
        day_of_week: model.day_of_week,
        meal_type: MealType::parse(&model.meal_type)
            .with_context(|| format!("unknown meal type {:?}", model.meal_type))?,
        title: model.title,
        description: model.description,
        created_at: model.created_at,
    })
}

fn recipe_from_model(model: recipes::Model) -> anyhow::Result<Recipe> {
    Ok(Recipe {
        id: model.id,
        diet_level: level_of(model.diet_level, "recipe diet level out of range")?,
        title: model.title,
        ingredients: serde_json::from_value(model.ingredients)
            .context("recipe ingredients are not a string array")?,
        instructions: model.instructions,
        prep_minutes: model.prep_minutes,
        created_at: model.created_at,
    })
}
