use sea_orm_migration::prelude::*;

mod m20260901_000001_create_users;
mod m20260901_000002_create_professionals;
mod m20260901_000003_create_patients;
mod m20260901_000004_create_weight_records;
mod m20260901_000005_create_mood_entries;
mod m20260901_000006_create_diet_content;
mod m20260901_000007_seed_diet_levels;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20260901_000001_create_users::Migration),
            Box::new(m20260901_000002_create_professionals::Migration),
            Box::new(m20260901_000003_create_patients::Migration),
            Box::new(m20260901_000004_create_weight_records::Migration),
            Box::new(m20260901_000005_create_mood_entries::Migration),
            Box::new(m20260901_000006_create_diet_content::Migration),
            Box::new(m20260901_000007_seed_diet_levels::Migration),
        ]
    }
}
