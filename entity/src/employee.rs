use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "employee")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    #[sea_orm(indexed)]
    pub operator: Operator,
    #[sea_orm(indexed)]
    pub department: String,
    pub position: String,
    pub grade: Option<String>,
    pub date_joined: Option<Date>,
    pub schema_version: i16,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::task::Entity")]
    Task,
    #[sea_orm(has_many = "super::hr_request::Entity")]
    HrRequest,
    #[sea_orm(has_one = "super::onboarding_record::Entity")]
    OnboardingRecord,
    #[sea_orm(has_one = "super::separation_record::Entity")]
    SeparationRecord,
    #[sea_orm(has_many = "super::performance_record::Entity")]
    PerformanceRecord,
}

impl Related<super::task::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Task.def()
    }
}

impl Related<super::hr_request::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::HrRequest.def()
    }
}

impl Related<super::onboarding_record::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::OnboardingRecord.def()
    }
}

impl Related<super::separation_record::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::SeparationRecord.def()
    }
}

impl Related<super::performance_record::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PerformanceRecord.def()
    }
}

/// Organisation an employee or position belongs to. Used as a filter, not a
/// security boundary.
#[derive(
    Copy, Clone, Debug, EnumIter, DeriveActiveEnum, Eq, PartialEq, Hash, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(Some(32))")]
pub enum Operator {
    #[sea_orm(string_value = "Doha Oasis")]
    #[serde(rename = "Doha Oasis")]
    DohaOasis,
    #[sea_orm(string_value = "Kien")]
    #[serde(rename = "Kien")]
    Kien,
}

impl Operator {
    pub fn as_str(self) -> &'static str {
        match self {
            Operator::DohaOasis => "Doha Oasis",
            Operator::Kien => "Kien",
        }
    }
}

impl std::fmt::Display for Operator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl ActiveModelBehavior for ActiveModel {}
