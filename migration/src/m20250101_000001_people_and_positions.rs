use sea_orm_migration::prelude::*;

#[derive(DeriveIden)]
pub(crate) enum Employee {
    Table,
    Id,
    Name,
    Operator,
    Department,
    Position,
    Grade,
    DateJoined,
    SchemaVersion,
}

#[derive(DeriveIden)]
enum Position {
    Table,
    Id,
    Title,
    Operator,
    Department,
    Grade,
    Status,
    Description,
    HiringManager,
    TargetHireDate,
    Justification,
    RequestDate,
    FilledBy,
    SchemaVersion,
}

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Employee::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Employee::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Employee::Name).string_len(256).not_null())
                    .col(ColumnDef::new(Employee::Operator).string_len(32).not_null())
                    .col(
                        ColumnDef::new(Employee::Department)
                            .string_len(256)
                            .not_null(),
                    )
                    .col(ColumnDef::new(Employee::Position).string_len(256).not_null())
                    .col(ColumnDef::new(Employee::Grade).string_len(64))
                    .col(ColumnDef::new(Employee::DateJoined).date())
                    .col(
                        ColumnDef::new(Employee::SchemaVersion)
                            .small_integer()
                            .not_null()
                            .default(1),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_employee_operator")
                    .table(Employee::Table)
                    .col(Employee::Operator)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_employee_department")
                    .table(Employee::Table)
                    .col(Employee::Department)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Position::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Position::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Position::Title).string_len(256).not_null())
                    .col(ColumnDef::new(Position::Operator).string_len(32).not_null())
                    .col(
                        ColumnDef::new(Position::Department)
                            .string_len(256)
                            .not_null(),
                    )
                    .col(ColumnDef::new(Position::Grade).string_len(64))
                    .col(
                        ColumnDef::new(Position::Status)
                            .string_len(32)
                            .not_null()
                            .default("Pending Approval"),
                    )
                    .col(ColumnDef::new(Position::Description).text())
                    .col(ColumnDef::new(Position::HiringManager).string_len(256))
                    .col(ColumnDef::new(Position::TargetHireDate).date())
                    .col(ColumnDef::new(Position::Justification).text())
                    .col(ColumnDef::new(Position::RequestDate).date())
                    .col(ColumnDef::new(Position::FilledBy).string_len(256))
                    .col(
                        ColumnDef::new(Position::SchemaVersion)
                            .small_integer()
                            .not_null()
                            .default(1),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_position_status")
                    .table(Position::Table)
                    .col(Position::Status)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Position::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Employee::Table).if_exists().to_owned())
            .await
    }
}
