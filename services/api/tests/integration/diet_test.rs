use chrono::Utc;
use uuid::Uuid;

use dietcare_api::domain::types::{FastingProgram, MealType, Recipe};
use dietcare_api::error::ApiError;
use dietcare_api::usecase::diet::{
    CreateMealPlanInput, CreateMealPlanUseCase, DietCatalogUseCase, PatientMealPlansUseCase,
};
use dietcare_api::usecase::patient::{UpdatePatientInput, UpdatePatientUseCase};
use dietcare_domain::diet_level::DietLevel;

use crate::helpers::{MemoryDb, test_patient, test_professional};

fn plan(day: i16, meal: &str, title: &str) -> CreateMealPlanInput {
    CreateMealPlanInput {
        day_of_week: Some(day),
        meal_type: Some(meal.into()),
        title: Some(title.into()),
        description: None,
    }
}

fn level(n: i64) -> DietLevel {
    DietLevel::new(n).unwrap()
}

#[tokio::test]
async fn should_list_meal_plans_for_level_in_day_and_meal_order() {
    let db = MemoryDb::with_levels();
    let create = CreateMealPlanUseCase { diet: db.clone() };
    create.execute(2, plan(1, "dinner", "Soup")).await.unwrap();
    create.execute(1, plan(1, "lunch", "Rice")).await.unwrap();
    create.execute(2, plan(1, "breakfast", "Oats")).await.unwrap();

    let catalog = DietCatalogUseCase { diet: db.clone() };
    let plans = catalog.meal_plans(2).await.unwrap();
    let titles: Vec<_> = plans.iter().map(|p| p.title.as_str()).collect();
    assert_eq!(titles, vec!["Oats", "Soup"]);
    assert_eq!(plans[0].meal_type, MealType::Breakfast);
    assert_eq!(catalog.levels().await.unwrap().len(), 5);
}

#[tokio::test]
async fn should_reject_invalid_and_unknown_levels() {
    let catalog = DietCatalogUseCase {
        diet: MemoryDb::with_levels(),
    };
    assert!(matches!(
        catalog.meal_plans(0).await,
        Err(ApiError::InvalidDietLevel(_))
    ));
    assert!(matches!(
        catalog.meal_plans(6).await,
        Err(ApiError::InvalidDietLevel(_))
    ));

    let empty = DietCatalogUseCase {
        diet: MemoryDb::new(),
    };
    assert!(matches!(
        empty.meal_plans(3).await,
        Err(ApiError::DietLevelNotFound)
    ));
}

#[tokio::test]
async fn should_validate_meal_plan_fields() {
    let db = MemoryDb::with_levels();
    let create = CreateMealPlanUseCase { diet: db.clone() };

    assert!(matches!(
        create.execute(1, plan(8, "lunch", "Rice")).await,
        Err(ApiError::InvalidMealPlan)
    ));
    assert!(matches!(
        create.execute(1, plan(3, "brunch", "Rice")).await,
        Err(ApiError::InvalidMealPlan)
    ));
    assert!(matches!(
        create.execute(1, plan(3, "lunch", "   ")).await,
        Err(ApiError::MissingData("title"))
    ));
    assert!(matches!(
        create.execute(9, plan(3, "lunch", "Rice")).await,
        Err(ApiError::InvalidDietLevel(_))
    ));
    assert!(db.tables.lock().unwrap().meal_plans.is_empty());
}

#[tokio::test]
async fn should_follow_patient_level_reassignment() {
    let db = MemoryDb::with_levels();
    let pro = test_professional("PRO00001");
    let patient = test_patient(pro.id, "AB12CD34");
    db.insert_patient(patient.clone());
    let create = CreateMealPlanUseCase { diet: db.clone() };
    create.execute(3, plan(1, "lunch", "Level three")).await.unwrap();
    create.execute(4, plan(1, "lunch", "Level four")).await.unwrap();

    let meals = PatientMealPlansUseCase {
        patients: db.clone(),
        diet: db.clone(),
    };
    let (current, plans) = meals.execute(patient.id).await.unwrap();
    assert_eq!(current, level(3));
    assert_eq!(plans[0].title, "Level three");

    UpdatePatientUseCase {
        patients: db.clone(),
    }
    .execute(
        pro.id,
        patient.id,
        UpdatePatientInput {
            diet_level: Some(4),
            ..Default::default()
        },
    )
    .await
    .unwrap();

    let (current, plans) = meals.execute(patient.id).await.unwrap();
    assert_eq!(current, level(4));
    assert_eq!(plans.len(), 1);
    assert_eq!(plans[0].title, "Level four");
}

#[tokio::test]
async fn should_find_recipes_and_filter_fasting_programs() {
    let db = MemoryDb::with_levels();
    let recipe = Recipe {
        id: Uuid::new_v4(),
        diet_level: level(2),
        title: "Lentil stew".into(),
        ingredients: vec!["lentils".into(), "carrot".into()],
        instructions: "Simmer.".into(),
        prep_minutes: Some(40),
        created_at: Utc::now(),
    };
    {
        let mut t = db.tables.lock().unwrap();
        t.recipes.push(recipe.clone());
        for (name, min) in [("12:12", 1), ("16:8", 3), ("20:4", 5)] {
            t.fasting_programs.push(FastingProgram {
                id: Uuid::new_v4(),
                name: name.into(),
                description: String::new(),
                fasting_hours: 0,
                eating_hours: 0,
                min_diet_level: level(min),
            });
        }
    }

    let catalog = DietCatalogUseCase { diet: db.clone() };
    assert_eq!(catalog.recipe(recipe.id).await.unwrap().title, "Lentil stew");
    assert!(matches!(
        catalog.recipe(Uuid::new_v4()).await,
        Err(ApiError::RecipeNotFound)
    ));
    assert_eq!(catalog.recipes(Some(2)).await.unwrap().len(), 1);
    assert!(catalog.recipes(Some(1)).await.unwrap().is_empty());

    let names: Vec<_> = catalog
        .fasting_programs(Some(3))
        .await
        .unwrap()
        .into_iter()
        .map(|f| f.name)
        .collect();
    assert_eq!(names, vec!["12:12".to_string(), "16:8".to_string()]);
    assert_eq!(catalog.fasting_programs(None).await.unwrap().len(), 3);
}
