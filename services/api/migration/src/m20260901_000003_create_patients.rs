use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Patients::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Patients::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Patients::UserId).uuid())
                    .col(ColumnDef::new(Patients::ProfessionalId).uuid().not_null())
                    .col(ColumnDef::new(Patients::FirstName).string().not_null())
                    .col(ColumnDef::new(Patients::LastName).string().not_null())
                    .col(ColumnDef::new(Patients::Email).string())
                    .col(
                        ColumnDef::new(Patients::DietLevel)
                            .small_integer()
                            .not_null()
                            .check(Expr::col(Patients::DietLevel).between(1, 5)),
                    )
                    .col(ColumnDef::new(Patients::InitialWeight).double().not_null())
                    .col(ColumnDef::new(Patients::CurrentWeight).double().not_null())
                    .col(ColumnDef::new(Patients::TargetWeight).double())
                    .col(
                        ColumnDef::new(Patients::AccessCode)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(Patients::CodeExpiry)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Patients::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(Patients::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Patients::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Patients::Table, Patients::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Patients::Table, Patients::ProfessionalId)
                            .to(Professionals::Table, Professionals::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .table(Patients::Table)
                    .col(Patients::ProfessionalId)
                    .name("idx_patients_professional_id")
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Patients::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Patients {
    Table,
    Id,
    UserId,
    ProfessionalId,
    FirstName,
    LastName,
    Email,
    DietLevel,
    InitialWeight,
    CurrentWeight,
    TargetWeight,
    AccessCode,
    CodeExpiry,
    IsActive,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Users {
    Table,
    Id,
}

#[derive(Iden)]
enum Professionals {
    Table,
    Id,
}
