use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(MoodEntries::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(MoodEntries::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(MoodEntries::PatientId).uuid().not_null())
                    .col(ColumnDef::new(MoodEntries::Mood).small_integer().not_null())
                    .col(ColumnDef::new(MoodEntries::Energy).small_integer().not_null())
                    .col(
                        ColumnDef::new(MoodEntries::Motivation)
                            .small_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(MoodEntries::Note).text())
                    .col(
                        ColumnDef::new(MoodEntries::Tags)
                            .json_binary()
                            .not_null()
                            .default(Expr::cust("'[]'::jsonb")),
                    )
                    .col(
                        ColumnDef::new(MoodEntries::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(MoodEntries::Table, MoodEntries::PatientId)
                            .to(Patients::Table, Patients::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .table(MoodEntries::Table)
                    .col(MoodEntries::PatientId)
                    .col(MoodEntries::CreatedAt)
                    .name("idx_mood_entries_patient_id_created_at")
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(MoodEntries::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum MoodEntries {
    Table,
    Id,
    PatientId,
    Mood,
    Energy,
    Motivation,
    Note,
    Tags,
    CreatedAt,
}

#[derive(Iden)]
enum Patients {
    Table,
    Id,
}
