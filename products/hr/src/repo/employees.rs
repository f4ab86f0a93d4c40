use chrono::NaiveDate;
use entity::{SCHEMA_VERSION, employee, employee::Operator};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder,
};
use tracing::debug;

use super::{MAX_NAME_LEN, optional_text, required_text};
use crate::error::{HrError, HrResult};

pub const HR_DEPARTMENT: &str = "Human Resources";
const EXCLUDED_HR_POSITION: &str = "Driver";

#[derive(Clone, Debug)]
pub struct NewEmployee {
    pub name: String,
    pub operator: Operator,
    pub department: String,
    pub position: String,
    pub grade: Option<String>,
    pub date_joined: Option<NaiveDate>,
}

impl NewEmployee {
    pub(crate) fn into_active_model(self) -> HrResult<employee::ActiveModel> {
        Ok(employee::ActiveModel {
            name: Set(required_text("name", &self.name)?),
            operator: Set(self.operator),
            department: Set(required_text("department", &self.department)?),
            position: Set(required_text("position", &self.position)?),
            grade: Set(optional_text("grade", self.grade, MAX_NAME_LEN)?),
            date_joined: Set(self.date_joined),
            schema_version: Set(SCHEMA_VERSION),
            ..Default::default()
        })
    }
}

pub async fn all<C>(db: &C) -> HrResult<Vec<employee::Model>>
where
    C: ConnectionTrait,
{
    Ok(employee::Entity::find()
        .order_by_asc(employee::Column::Id)
        .all(db)
        .await?)
}

pub async fn by_id<C>(db: &C, id: i32) -> HrResult<Option<employee::Model>>
where
    C: ConnectionTrait,
{
    Ok(employee::Entity::find_by_id(id).one(db).await?)
}

/// Like [`by_id`] but a missing employee is an error.
pub async fn require<C>(db: &C, id: i32) -> HrResult<employee::Model>
where
    C: ConnectionTrait,
{
    by_id(db, id)
        .await?
        .ok_or_else(|| HrError::not_found("employee", id))
}

pub async fn add<C>(db: &C, input: NewEmployee) -> HrResult<employee::Model>
where
    C: ConnectionTrait,
{
    let model = input.into_active_model()?.insert(db).await?;
    debug!(employee_id = model.id, "employee added");
    Ok(model)
}

pub async fn count<C>(db: &C) -> HrResult<u64>
where
    C: ConnectionTrait,
{
    Ok(employee::Entity::find().count(db).await?)
}

/// Members of Human Resources who can own process checklists (drivers excluded).
pub async fn hr_team<C>(db: &C) -> HrResult<Vec<employee::Model>>
where
    C: ConnectionTrait,
{
    Ok(employee::Entity::find()
        .filter(employee::Column::Department.eq(HR_DEPARTMENT))
        .filter(employee::Column::Position.ne(EXCLUDED_HR_POSITION))
        .order_by_asc(employee::Column::Id)
        .all(db)
        .await?)
}
