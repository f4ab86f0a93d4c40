use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::employee::Operator;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "position")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub title: String,
    pub operator: Operator,
    pub department: String,
    pub grade: Option<String>,
    #[sea_orm(indexed)]
    pub status: Status,
    pub description: Option<String>,
    pub hiring_manager: Option<String>,
    pub target_hire_date: Option<Date>,
    pub justification: Option<String>,
    pub request_date: Option<Date>,
    pub filled_by: Option<String>,
    pub schema_version: i16,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

/// Approval lifecycle of a requested position.
///
/// `PendingApproval -> Open | Rejected`, `Open -> Filled`. `Closed` is a
/// valid stored value but nothing transitions into it.
#[derive(
    Copy, Clone, Debug, EnumIter, DeriveActiveEnum, Eq, PartialEq, Hash, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(Some(32))")]
pub enum Status {
    #[sea_orm(string_value = "Pending Approval")]
    #[serde(rename = "Pending Approval")]
    PendingApproval,
    #[sea_orm(string_value = "Open")]
    Open,
    #[sea_orm(string_value = "Filled")]
    Filled,
    #[sea_orm(string_value = "Closed")]
    Closed,
    #[sea_orm(string_value = "Rejected")]
    Rejected,
}

impl Status {
    pub fn as_str(self) -> &'static str {
        match self {
            Status::PendingApproval => "Pending Approval",
            Status::Open => "Open",
            Status::Filled => "Filled",
            Status::Closed => "Closed",
            Status::Rejected => "Rejected",
        }
    }

    pub fn can_transition_to(self, next: Status) -> bool {
        matches!(
            (self, next),
            (Status::PendingApproval, Status::Open)
                | (Status::PendingApproval, Status::Rejected)
                | (Status::Open, Status::Filled)
        )
    }
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl ActiveModelBehavior for ActiveModel {}
