use sea_orm::entity::prelude::*;

/// Patient record. `access_code`/`code_expiry` rotate on weight logging and are
/// overwritten with a past-dated sentinel on revocation. Soft-deleted via `is_active`.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "patients")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub user_id: Option<Uuid>,
    pub professional_id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: Option<String>,
    pub diet_level: i16,
    pub initial_weight: f64,
    pub current_weight: f64,
    pub target_weight: Option<f64>,
    #[sea_orm(unique)]
    pub access_code: String,
    pub code_expiry: chrono::DateTime<chrono::Utc>,
    pub is_active: bool,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::UserId",
        to = "super::users::Column::Id"
    )]
    User,
    #[sea_orm(
        belongs_to = "super::professionals::Entity",
        from = "Column::ProfessionalId",
        to = "super::professionals::Column::Id"
    )]
    Professional,
    #[sea_orm(has_many = "super::weight_records::Entity")]
    WeightRecords,
    #[sea_orm(has_many = "super::mood_entries::Entity")]
    MoodEntries,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<super::professionals::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Professional.def()
    }
}

impl Related<super::weight_records::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::WeightRecords.def()
    }
}

impl Related<super::mood_entries::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::MoodEntries.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
