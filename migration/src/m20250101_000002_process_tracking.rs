use sea_orm_migration::prelude::*;

use crate::m20250101_000001_people_and_positions::Employee;

#[derive(DeriveIden)]
enum Task {
    Table,
    Id,
    EmployeeId,
    Name,
    Owner,
    Status,
    DueDate,
    Comments,
    Category,
    Year,
    SchemaVersion,
}

#[derive(DeriveIden)]
enum HrRequest {
    Table,
    Id,
    EmployeeId,
    RequestType,
    Status,
    Description,
    AssignedTo,
    CreatedAt,
    UpdatedAt,
    SchemaVersion,
}

#[derive(DeriveIden)]
enum OnboardingRecord {
    Table,
    Id,
    EmployeeId,
    AssignedHrName,
    Comments,
    InitiatedAt,
    SchemaVersion,
}

#[derive(DeriveIden)]
enum SeparationRecord {
    Table,
    Id,
    EmployeeId,
    AssignedHrName,
    FinalSettlementReceived,
    InitiatedAt,
    SchemaVersion,
}

#[derive(DeriveIden)]
enum PerformanceRecord {
    Table,
    Id,
    EmployeeId,
    Year,
    AssignedReviewer,
    InitiatedAt,
    Comments,
    SchemaVersion,
}

fn employee_fk<T: IntoIden + 'static>(name: &str, table: T, column: T) -> ForeignKeyCreateStatement {
    ForeignKey::create()
        .name(name)
        .from(table, column)
        .to(Employee::Table, Employee::Id)
        .on_delete(ForeignKeyAction::Restrict)
        .on_update(ForeignKeyAction::Cascade)
        .to_owned()
}

fn id_col<T: IntoIden>(column: T) -> ColumnDef {
    ColumnDef::new(column)
        .integer()
        .not_null()
        .auto_increment()
        .primary_key()
        .to_owned()
}

fn schema_version_col<T: IntoIden>(column: T) -> ColumnDef {
    ColumnDef::new(column)
        .small_integer()
        .not_null()
        .default(1)
        .to_owned()
}

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Task::Table)
                    .if_not_exists()
                    .col(&mut id_col(Task::Id))
                    .col(ColumnDef::new(Task::EmployeeId).integer().not_null())
                    .col(ColumnDef::new(Task::Name).string_len(256).not_null())
                    .col(ColumnDef::new(Task::Owner).string_len(256).not_null())
                    .col(
                        ColumnDef::new(Task::Status)
                            .string_len(32)
                            .not_null()
                            .default("Not Started"),
                    )
                    .col(ColumnDef::new(Task::DueDate).date())
                    .col(ColumnDef::new(Task::Comments).text())
                    .col(
                        ColumnDef::new(Task::Category)
                            .string_len(32)
                            .not_null()
                            .default("Onboarding"),
                    )
                    .col(ColumnDef::new(Task::Year).integer())
                    .col(&mut schema_version_col(Task::SchemaVersion))
                    .foreign_key(&mut employee_fk("fk_task_employee", Task::Table, Task::EmployeeId))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_task_employee_category")
                    .table(Task::Table)
                    .col(Task::EmployeeId)
                    .col(Task::Category)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_task_category")
                    .table(Task::Table)
                    .col(Task::Category)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(HrRequest::Table)
                    .if_not_exists()
                    .col(&mut id_col(HrRequest::Id))
                    .col(ColumnDef::new(HrRequest::EmployeeId).integer().not_null())
                    .col(
                        ColumnDef::new(HrRequest::RequestType)
                            .string_len(256)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(HrRequest::Status)
                            .string_len(32)
                            .not_null()
                            .default("New"),
                    )
                    .col(ColumnDef::new(HrRequest::Description).text())
                    .col(ColumnDef::new(HrRequest::AssignedTo).string_len(256))
                    .col(
                        ColumnDef::new(HrRequest::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(HrRequest::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(&mut schema_version_col(HrRequest::SchemaVersion))
                    .foreign_key(&mut employee_fk(
                        "fk_hr_request_employee",
                        HrRequest::Table,
                        HrRequest::EmployeeId,
                    ))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_hr_request_employee")
                    .table(HrRequest::Table)
                    .col(HrRequest::EmployeeId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(OnboardingRecord::Table)
                    .if_not_exists()
                    .col(&mut id_col(OnboardingRecord::Id))
                    .col(
                        ColumnDef::new(OnboardingRecord::EmployeeId)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(OnboardingRecord::AssignedHrName)
                            .string_len(256)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(OnboardingRecord::Comments)
                            .text()
                            .not_null()
                            .default(""),
                    )
                    .col(
                        ColumnDef::new(OnboardingRecord::InitiatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(&mut schema_version_col(OnboardingRecord::SchemaVersion))
                    .foreign_key(&mut employee_fk(
                        "fk_onboarding_record_employee",
                        OnboardingRecord::Table,
                        OnboardingRecord::EmployeeId,
                    ))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("uq_onboarding_record_employee")
                    .table(OnboardingRecord::Table)
                    .col(OnboardingRecord::EmployeeId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(SeparationRecord::Table)
                    .if_not_exists()
                    .col(&mut id_col(SeparationRecord::Id))
                    .col(
                        ColumnDef::new(SeparationRecord::EmployeeId)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(SeparationRecord::AssignedHrName)
                            .string_len(256)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(SeparationRecord::FinalSettlementReceived)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(SeparationRecord::InitiatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(&mut schema_version_col(SeparationRecord::SchemaVersion))
                    .foreign_key(&mut employee_fk(
                        "fk_separation_record_employee",
                        SeparationRecord::Table,
                        SeparationRecord::EmployeeId,
                    ))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("uq_separation_record_employee")
                    .table(SeparationRecord::Table)
                    .col(SeparationRecord::EmployeeId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(PerformanceRecord::Table)
                    .if_not_exists()
                    .col(&mut id_col(PerformanceRecord::Id))
                    .col(
                        ColumnDef::new(PerformanceRecord::EmployeeId)
                            .integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(PerformanceRecord::Year).integer().not_null())
                    .col(
                        ColumnDef::new(PerformanceRecord::AssignedReviewer)
                            .string_len(256)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(PerformanceRecord::InitiatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(PerformanceRecord::Comments).text())
                    .col(&mut schema_version_col(PerformanceRecord::SchemaVersion))
                    .foreign_key(&mut employee_fk(
                        "fk_performance_record_employee",
                        PerformanceRecord::Table,
                        PerformanceRecord::EmployeeId,
                    ))
                    .to_owned(),
            )
            .await?;

        // One review cycle per employee and year.
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("uq_performance_record_employee_year")
                    .table(PerformanceRecord::Table)
                    .col(PerformanceRecord::EmployeeId)
                    .col(PerformanceRecord::Year)
                    .unique()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(
                Table::drop()
                    .table(PerformanceRecord::Table)
                    .if_exists()
                    .to_owned(),
            )
            .await?;
        manager
            .drop_table(
                Table::drop()
                    .table(SeparationRecord::Table)
                    .if_exists()
                    .to_owned(),
            )
            .await?;
        manager
            .drop_table(
                Table::drop()
                    .table(OnboardingRecord::Table)
                    .if_exists()
                    .to_owned(),
            )
            .await?;
        manager
            .drop_table(Table::drop().table(HrRequest::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Task::Table).if_exists().to_owned())
            .await
    }
}
