use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// One checklist item of an onboarding, separation or performance episode.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "task")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(indexed)]
    pub employee_id: i32,
    pub name: String,
    pub owner: String,
    pub status: Status,
    pub due_date: Option<Date>,
    pub comments: Option<String>,
    #[sea_orm(indexed)]
    pub category: Category,
    /// Review year; only set for performance tasks.
    pub year: Option<i32>,
    pub schema_version: i16,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::employee::Entity",
        from = "Column::EmployeeId",
        to = "super::employee::Column::Id"
    )]
    Employee,
}

impl Related<super::employee::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Employee.def()
    }
}

#[derive(
    Copy, Clone, Debug, EnumIter, DeriveActiveEnum, Eq, PartialEq, Hash, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(Some(32))")]
pub enum Status {
    #[sea_orm(string_value = "Not Started")]
    #[serde(rename = "Not Started")]
    NotStarted,
    #[sea_orm(string_value = "In Progress")]
    #[serde(rename = "In Progress")]
    InProgress,
    #[sea_orm(string_value = "Done")]
    Done,
}

impl Status {
    /// Quick-toggle order: Not Started -> In Progress -> Done -> Not Started.
    pub fn next(self) -> Status {
        match self {
            Status::NotStarted => Status::InProgress,
            Status::InProgress => Status::Done,
            Status::Done => Status::NotStarted,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Status::NotStarted => "Not Started",
            Status::InProgress => "In Progress",
            Status::Done => "Done",
        }
    }
}

/// Which process a task belongs to. Rows written before the column existed
/// are onboarding tasks.
#[derive(
    Copy,
    Clone,
    Debug,
    Default,
    EnumIter,
    DeriveActiveEnum,
    Eq,
    PartialEq,
    Hash,
    Serialize,
    Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(Some(32))")]
pub enum Category {
    #[default]
    #[sea_orm(string_value = "Onboarding")]
    Onboarding,
    #[sea_orm(string_value = "Separation")]
    Separation,
    #[sea_orm(string_value = "Performance")]
    Performance,
}

impl Category {
    pub fn as_str(self) -> &'static str {
        match self {
            Category::Onboarding => "Onboarding",
            Category::Separation => "Separation",
            Category::Performance => "Performance",
        }
    }
}

impl ActiveModelBehavior for ActiveModel {}
