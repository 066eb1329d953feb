use axum::{
    Router, middleware,
    routing::{get, post},
};

use dietcare_core::health::healthz;
use dietcare_core::middleware::{propagate_request_id_layer, request_id_layer, trace_layer};

use crate::auth::resolve_principal;
use crate::handlers::{
    diet::{
        create_meal_plan, get_recipe, level_meal_plans, list_diet_levels, list_fasting_programs,
        list_food_items, list_recipes, patient_meal_plans,
    },
    health::readyz,
    mood::{create_mood_entry, own_mood_entries, patient_mood_entries},
    patient::{
        create_patient, current_patient, deactivate_patient, get_patient, list_patients,
        revoke_patient_code, rotate_patient_code, update_patient,
    },
    professional::{professional_profile, register_professional, rotate_professional_code},
    session::{logout, validate_patient_code, validate_professional_code},
    weight::{own_weight_history, patient_weight_history, record_weight},
};
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let api = Router::new()
        // Patient session
        .route("/api/patient/validate", post(validate_patient_code))
        .route("/api/patient/logout", post(logout))
        .route("/api/patient/current", get(current_patient))
        .route("/api/patient/weight", get(own_weight_history))
        .route(
            "/api/patient/mood",
            get(own_mood_entries).post(create_mood_entry),
        )
        .route("/api/patient/meal-plans", get(patient_meal_plans))
        // Professional session and profile
        .route("/api/professional/validate", post(validate_professional_code))
        .route("/api/professional/logout", post(logout))
        .route("/api/professional/register", post(register_professional))
        .route("/api/professional/profile", get(professional_profile))
        .route("/api/professional/access-code", post(rotate_professional_code))
        // Patient management
        .route(
            "/api/professional/patients",
            get(list_patients).post(create_patient),
        )
        .route(
            "/api/professional/patients/{id}",
            get(get_patient)
                .patch(update_patient)
                .delete(deactivate_patient),
        )
        .route(
            "/api/professional/patients/{id}/access-code",
            post(rotate_patient_code).delete(revoke_patient_code),
        )
        .route(
            "/api/professional/patients/{id}/weight",
            get(patient_weight_history).post(record_weight),
        )
        .route("/api/professional/patients/{id}/mood", get(patient_mood_entries))
        // Diet catalogue
        .route("/api/diet-levels", get(list_diet_levels))
        .route(
            "/api/diet-levels/{level}/meal-plans",
            get(level_meal_plans).post(create_meal_plan),
        )
        .route("/api/recipes", get(list_recipes))
        .route("/api/recipes/{id}", get(get_recipe))
        .route("/api/food-items", get(list_food_items))
        .route("/api/fasting-programs", get(list_fasting_programs))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            resolve_principal::<AppState>,
        ));

    Router::new()
        // Health
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        .merge(api)
        .layer(propagate_request_id_layer())
        .layer(trace_layer())
        .layer(request_id_layer())
        .with_state(state)
}
