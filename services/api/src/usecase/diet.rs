use chrono::Utc;
use uuid::Uuid;

use dietcare_domain::diet_level::DietLevel;
use dietcare_domain::id::PatientId;

use crate::domain::repository::{DietContentRepository, PatientRepository};
use crate::domain::types::{
    DietLevelInfo, FastingProgram, FoodItem, MealPlan, MealType, Recipe,
};
use crate::error::ApiError;

/// Read access to the diet catalogue for any signed-in caller.
pub struct DietCatalogUseCase<D>
where
    D: DietContentRepository,
{
    pub diet: D,
}

impl<D> DietCatalogUseCase<D>
where
    D: DietContentRepository,
{
    pub async fn levels(&self) -> Result<Vec<DietLevelInfo>, ApiError> {
        self.diet.list_levels().await
    }

    pub async fn meal_plans(&self, level: i64) -> Result<Vec<MealPlan>, ApiError> {
        let level = DietLevel::new(level)?;
        self.diet
            .find_level(level)
            .await?
            .ok_or(ApiError::DietLevelNotFound)?;
        self.diet.list_meal_plans(level).await
    }

    pub async fn recipes(&self, level: Option<i64>) -> Result<Vec<Recipe>, ApiError> {
        let level = level.map(DietLevel::new).transpose()?;
        self.diet.list_recipes(level).await
    }

    pub async fn recipe(&self, id: Uuid) -> Result<Recipe, ApiError> {
        self.diet
            .find_recipe(id)
            .await?
            .ok_or(ApiError::RecipeNotFound)
    }

    pub async fn food_items(
        &self,
        level: Option<i64>,
        category: Option<&str>,
    ) -> Result<Vec<FoodItem>, ApiError> {
        let level = level.map(DietLevel::new).transpose()?;
        let category = category.map(str::trim).filter(|c| !c.is_empty());
        self.diet.list_food_items(level, category).await
    }

    pub async fn fasting_programs(
        &self,
        level: Option<i64>,
    ) -> Result<Vec<FastingProgram>, ApiError> {
        let level = level.map(DietLevel::new).transpose()?;
        self.diet.list_fasting_programs(level).await
    }
}

/// Meal plans for the signed-in patient's current level.
pub struct PatientMealPlansUseCase<P, D>
where
    P: PatientRepository,
    D: DietContentRepository,
{
    pub patients: P,
    pub diet: D,
}

impl<P, D> PatientMealPlansUseCase<P, D>
where
    P: PatientRepository,
    D: DietContentRepository,
{
    /// The level is re-read from the patient row so a reassignment shows up on the
    /// next request.
    pub async fn execute(&self, patient_id: PatientId) -> Result<(DietLevel, Vec<MealPlan>), ApiError> {
        let patient = self
            .patients
            .find_by_id(patient_id)
            .await?
            .ok_or(ApiError::PatientNotFound)?;
        let plans = self.diet.list_meal_plans(patient.diet_level).await?;
        Ok((patient.diet_level, plans))
    }
}

pub struct CreateMealPlanInput {
    pub day_of_week: Option<i16>,
    pub meal_type: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
}

pub struct CreateMealPlanUseCase<D>
where
    D: DietContentRepository,
{
    pub diet: D,
}

impl<D> CreateMealPlanUseCase<D>
where
    D: DietContentRepository,
{
    pub async fn execute(&self, level: i64, input: CreateMealPlanInput) -> Result<MealPlan, ApiError> {
        let level = DietLevel::new(level)?;
        let day_of_week = input.day_of_week.ok_or(ApiError::MissingData("dayOfWeek"))?;
        if !(1..=7).contains(&day_of_week) {
            return Err(ApiError::InvalidMealPlan);
        }
        let meal_type = input
            .meal_type
            .ok_or(ApiError::MissingData("mealType"))
            .and_then(|m| MealType::parse(m.trim()).ok_or(ApiError::InvalidMealPlan))?;
        let title = input
            .title
            .map(|t| t.trim().to_owned())
            .filter(|t| !t.is_empty())
            .ok_or(ApiError::MissingData("title"))?;

        self.diet
            .find_level(level)
            .await?
            .ok_or(ApiError::DietLevelNotFound)?;

        let plan = MealPlan {
            id: Uuid::now_v7(),
            diet_level: level,
            day_of_week,
            meal_type,
            title,
            description: input.description.unwrap_or_default().trim().to_owned(),
            created_at: Utc::now(),
        };
        self.diet.create_meal_plan(&plan).await?;
        Ok(plan)
    }
}
