//! sea-orm entities for the DietCare database.

pub mod diet_levels;
pub mod fasting_programs;
pub mod food_items;
pub mod meal_plans;
pub mod mood_entries;
pub mod patients;
pub mod professionals;
pub mod recipes;
pub mod users;
pub mod weight_records;
