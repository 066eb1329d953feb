use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

const LEVELS: [(i16, &str, &str, Option<i32>); 5] = [
    (1, "Gentle start", "Balanced meals with portion awareness.", Some(2200)),
    (2, "Moderate", "Reduced refined sugar and processed food.", Some(1900)),
    (3, "Structured", "Fixed meal times, controlled carbohydrates.", Some(1700)),
    (4, "Strict", "Low carbohydrate, high protein plan.", Some(1500)),
    (5, "Intensive", "Clinically supervised intensive plan.", Some(1200)),
];

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let mut insert = Query::insert()
            .into_table(DietLevels::Table)
            .columns([
                DietLevels::Level,
                DietLevels::Name,
                DietLevels::Description,
                DietLevels::DailyCalories,
            ])
            .on_conflict(OnConflict::column(DietLevels::Level).do_nothing().to_owned())
            .to_owned();
        for (level, name, description, calories) in LEVELS {
            insert.values_panic([
                level.into(),
                name.into(),
                description.into(),
                calories.into(),
            ]);
        }
        manager.exec_stmt(insert).await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .exec_stmt(
                Query::delete()
                    .from_table(DietLevels::Table)
                    .and_where(Expr::col(DietLevels::Level).between(1, 5))
                    .to_owned(),
            )
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
