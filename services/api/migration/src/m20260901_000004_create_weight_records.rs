use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(WeightRecords::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(WeightRecords::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(WeightRecords::PatientId).uuid().not_null())
                    .col(ColumnDef::new(WeightRecords::Weight).double().not_null())
                    .col(ColumnDef::new(WeightRecords::Note).text())
                    .col(ColumnDef::new(WeightRecords::RecordedBy).uuid())
                    .col(
                        ColumnDef::new(WeightRecords::RecordedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(WeightRecords::Table, WeightRecords::PatientId)
                            .to(Patients::Table, Patients::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .table(WeightRecords::Table)
                    .col(WeightRecords::PatientId)
                    .col(WeightRecords::RecordedAt)
                    .name("idx_weight_records_patient_id_recorded_at")
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(WeightRecords::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum WeightRecords {
    Table,
    Id,
    PatientId,
    Weight,
    Note,
    RecordedBy,
    RecordedAt,
}

#[derive(Iden)]
enum Patients {
    Table,
    Id,
}
