use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use axum_extra::extract::WithRejection;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use dietcare_auth_types::principal::{
    AuthenticatedPrincipal, PatientPrincipal, ProfessionalPrincipal,
};
use dietcare_core::serde::to_rfc3339_ms;
use dietcare_domain::diet_level::DietLevel;

use crate::domain::types::{DietLevelInfo, FastingProgram, FoodItem, MealPlan, MealType, Recipe};
use crate::error::ApiError;
use crate::infra::db::DbDietContentRepository;
use crate::state::AppState;
use crate::usecase::diet::{
    CreateMealPlanInput, CreateMealPlanUseCase, DietCatalogUseCase, PatientMealPlansUseCase,
};

// ── Responses ────────────────────────────────────────────────────────────────

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DietLevelResponse {
    pub level: DietLevel,
    pub name: String,
    pub description: String,
    pub daily_calories: Option<i32>,
}

impl From<DietLevelInfo> for DietLevelResponse {
    fn from(l: DietLevelInfo) -> Self {
        Self {
            level: l.level,
            name: l.name,
            description: l.description,
            daily_calories: l.daily_calories,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MealPlanResponse {
    pub id: Uuid,
    pub diet_level: DietLevel,
    pub day_of_week: i16,
    pub meal_type: MealType,
    pub title: String,
    pub description: String,
    #[serde(serialize_with = "to_rfc3339_ms")]
    pub created_at: DateTime<Utc>,
}

impl From<MealPlan> for MealPlanResponse {
    fn from(m: MealPlan) -> Self {
        Self {
            id: m.id,
            diet_level: m.diet_level,
            day_of_week: m.day_of_week,
            meal_type: m.meal_type,
            title: m.title,
            description: m.description,
            created_at: m.created_at,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecipeResponse {
    pub id: Uuid,
    pub diet_level: DietLevel,
    pub title: String,
    pub ingredients: Vec<String>,
    pub instructions: String,
    pub prep_minutes: Option<i32>,
    #[serde(serialize_with = "to_rfc3339_ms")]
    pub created_at: DateTime<Utc>,
}

impl From<Recipe> for RecipeResponse {
    fn from(r: Recipe) -> Self {
        Self {
            id: r.id,
            diet_level: r.diet_level,
            title: r.title,
            ingredients: r.ingredients,
            instructions: r.instructions,
            prep_minutes: r.prep_minutes,
            created_at: r.created_at,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FoodItemResponse {
    pub id: Uuid,
    pub diet_level: DietLevel,
    pub name: String,
    pub category: String,
    pub is_allowed: bool,
    pub portion: Option<String>,
}

impl From<FoodItem> for FoodItemResponse {
    fn from(f: FoodItem) -> Self {
        Self {
            id: f.id,
            diet_level: f.diet_level,
            name: f.name,
            category: f.category,
            is_allowed: f.is_allowed,
            portion: f.portion,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FastingProgramResponse {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub fasting_hours: i16,
    pub eating_hours: i16,
    pub min_diet_level: DietLevel,
}

impl From<FastingProgram> for FastingProgramResponse {
    fn from(f: FastingProgram) -> Self {
        Self {
            id: f.id,
            name: f.name,
            description: f.description,
            fasting_hours: f.fasting_hours,
            eating_hours: f.eating_hours,
            min_diet_level: f.min_diet_level,
        }
    }
}

#[derive(Deserialize)]
pub struct CatalogQuery {
    #[serde(rename = "diet-level")]
    pub diet_level: Option<i64>,
    pub category: Option<String>,
}

fn catalog(state: &AppState) -> DietCatalogUseCase<DbDietContentRepository> {
    DietCatalogUseCase {
        diet: state.diet_repo(),
    }
}

// ── GET /api/diet-levels ─────────────────────────────────────────────────────

pub async fn list_diet_levels(
    _principal: AuthenticatedPrincipal,
    State(state): State<AppState>,
) -> Result<Json<Vec<DietLevelResponse>>, ApiError> {
    let levels = catalog(&state).levels().await?;
    Ok(Json(levels.into_iter().map(Into::into).collect()))
}

// ── GET /api/diet-levels/{level}/meal-plans ──────────────────────────────────

pub async fn level_meal_plans(
    _principal: AuthenticatedPrincipal,
    State(state): State<AppState>,
    WithRejection(Path(level), _): WithRejection<Path<i64>, ApiError>,
) -> Result<Json<Vec<MealPlanResponse>>, ApiError> {
    let plans = catalog(&state).meal_plans(level).await?;
    Ok(Json(plans.into_iter().map(Into::into).collect()))
}

// ── POST /api/diet-levels/{level}/meal-plans ─────────────────────────────────

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateMealPlanRequest {
    pub day_of_week: Option<i16>,
    pub meal_type: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
}

pub async fn create_meal_plan(
    _professional: ProfessionalPrincipal,
    State(state): State<AppState>,
    WithRejection(Path(level), _): WithRejection<Path<i64>, ApiError>,
    WithRejection(Json(body), _): WithRejection<Json<CreateMealPlanRequest>, ApiError>,
) -> Result<(StatusCode, Json<MealPlanResponse>), ApiError> {
    let usecase = CreateMealPlanUseCase {
        diet: state.diet_repo(),
    };
    let plan = usecase
        .execute(
            level,
            CreateMealPlanInput {
                day_of_week: body.day_of_week,
                meal_type: body.meal_type,
                title: body.title,
                description: body.description,
            },
        )
        .await?;
    Ok((StatusCode::CREATED, Json(plan.into())))
}

// ── GET /api/patient/meal-plans ──────────────────────────────────────────────

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PatientMealPlansResponse {
    pub diet_level: DietLevel,
    pub meal_plans: Vec<MealPlanResponse>,
}

pub async fn patient_meal_plans(
    PatientPrincipal(patient_id): PatientPrincipal,
    State(state): State<AppState>,
) -> Result<Json<PatientMealPlansResponse>, ApiError> {
    let usecase = PatientMealPlansUseCase {
        patients: state.patient_repo(),
        diet: state.diet_repo(),
    };
    let (diet_level, plans) = usecase.execute(patient_id).await?;
    Ok(Json(PatientMealPlansResponse {
        diet_level,
        meal_plans: plans.into_iter().map(Into::into).collect(),
    }))
}

// ── GET /api/recipes ─────────────────────────────────────────────────────────

pub async fn list_recipes(
    _principal: AuthenticatedPrincipal,
    State(state): State<AppState>,
    WithRejection(Query(query), _): WithRejection<Query<CatalogQuery>, ApiError>,
) -> Result<Json<Vec<RecipeResponse>>, ApiError> {
    let recipes = catalog(&state).recipes(query.diet_level).await?;
    Ok(Json(recipes.into_iter().map(Into::into).collect()))
}

// ── GET /api/recipes/{id} ────────────────────────────────────────────────────

pub async fn get_recipe(
    _principal: AuthenticatedPrincipal,
    State(state): State<AppState>,
    WithRejection(Path(id), _): WithRejection<Path<Uuid>, ApiError>,
) -> Result<Json<RecipeResponse>, ApiError> {
    let recipe = catalog(&state).recipe(id).await?;
    Ok(Json(recipe.into()))
}

// ── GET /api/food-items ──────────────────────────────────────────────────────

pub async fn list_food_items(
    _principal: AuthenticatedPrincipal,
    State(state): State<AppState>,
    WithRejection(Query(query), _): WithRejection<Query<CatalogQuery>, ApiError>,
) -> Result<Json<Vec<FoodItemResponse>>, ApiError> {
    let items = catalog(&state)
        .food_items(query.diet_level, query.category.as_deref())
        .await?;
    Ok(Json(items.into_iter().map(Into::into).collect()))
}

// ── GET /api/fasting-programs ────────────────────────────────────────────────

pub async fn list_fasting_programs(
    _principal: AuthenticatedPrincipal,
    State(state): State<AppState>,
    WithRejection(Query(query), _): WithRejection<Query<CatalogQuery>, ApiError>,
) -> Result<Json<Vec<FastingProgramResponse>>, ApiError> {
    let programs = catalog(&state).fasting_programs(query.diet_level).await?;
    Ok(Json(programs.into_iter().map(Into::into).collect()))
}
