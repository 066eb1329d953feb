use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(DietLevels::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(DietLevels::Level)
                            .small_integer()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(DietLevels::Name).string().not_null())
                    .col(ColumnDef::new(DietLevels::Description).text().not_null())
                    .col(ColumnDef::new(DietLevels::DailyCalories).integer())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(MealPlans::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(MealPlans::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(MealPlans::DietLevel).small_integer().not_null())
                    .col(ColumnDef::new(MealPlans::DayOfWeek).small_integer().not_null())
                    .col(ColumnDef::new(MealPlans::MealType).string().not_null())
                    .col(ColumnDef::new(MealPlans::Title).string().not_null())
                    .col(ColumnDef::new(MealPlans::Description).text().not_null())
                    .col(
                        ColumnDef::new(MealPlans::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(MealPlans::Table, MealPlans::DietLevel)
                            .to(DietLevels::Table, DietLevels::Level),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Recipes::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Recipes::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Recipes::DietLevel).small_integer().not_null())
                    .col(ColumnDef::new(Recipes::Title).string().not_null())
                    .col(ColumnDef::new(Recipes::Ingredients).json_binary().not_null())
                    .col(ColumnDef::new(Recipes::Instructions).text().not_null())
                    .col(ColumnDef::new(Recipes::PrepMinutes).integer())
                    .col(
                        ColumnDef::new(Recipes::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Recipes::Table, Recipes::DietLevel)
                            .to(DietLevels::Table, DietLevels::Level),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(FoodItems::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(FoodItems::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(FoodItems::DietLevel).small_integer().not_null())
                    .col(ColumnDef::new(FoodItems::Name).string().not_null())
                    .col(ColumnDef::new(FoodItems::Category).string().not_null())
                    .col(ColumnDef::new(FoodItems::IsAllowed).boolean().not_null())
                    .col(ColumnDef::new(FoodItems::Portion).string())
                    .foreign_key(
                        ForeignKey::create()
                            .from(FoodItems::Table, FoodItems::DietLevel)
                            .to(DietLevels::Table, DietLevels::Level),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(FastingPrograms::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(FastingPrograms::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(FastingPrograms::Name).string().not_null())
                    .col(ColumnDef::new(FastingPrograms::Description).text().not_null())
                    .col(
                        ColumnDef::new(FastingPrograms::FastingHours)
                            .small_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(FastingPrograms::EatingHours)
                            .small_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(FastingPrograms::MinDietLevel)
                            .small_integer()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .table(MealPlans::Table)
                    .col(MealPlans::DietLevel)
                    .name("idx_meal_plans_diet_level")
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .table(Recipes::Table)
                    .col(Recipes::DietLevel)
                    .name("idx_recipes_diet_level")
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .table(FoodItems::Table)
                    .col(FoodItems::DietLevel)
                    .col(FoodItems::Category)
                    .name("idx_food_items_diet_level_category")
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(FastingPrograms::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(FoodItems::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Recipes::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(MealPlans::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(DietLevels::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum DietLevels {
    Table,
    Level,
    Name,
    Description,
    DailyCalories,
}

#[derive(Iden)]
enum MealPlans {
    Table,
    Id,
    DietLevel,
    DayOfWeek,
    MealType,
    Title,
    Description,
    CreatedAt,
}

#[derive(Iden)]
enum Recipes {
    Table,
    Id,
    DietLevel,
    Title,
    Ingredients,
    Instructions,
    PrepMinutes,
    CreatedAt,
}

#[derive(Iden)]
enum FoodItems {
    Table,
    Id,
    DietLevel,
    Name,
    Category,
    IsAllowed,
    Portion,
}

#[derive(Iden)]
enum FastingPrograms {
    Table,
    Id,
    Name,
    Description,
    FastingHours,
    EatingHours,
    MinDietLevel,
}
