use sea_orm::entity::prelude::*;

/// Food allowed (or explicitly disallowed) at a diet level.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "food_items")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub diet_level: i16,
    pub name: String,
    pub category: String,
    pub is_allowed: bool,
    pub portion: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
