use entity::{SCHEMA_VERSION, performance_record};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, ConnectionTrait, EntityTrait, IntoActiveModel,
    QueryFilter, QueryOrder,
};

use super::{MAX_COMMENT_LEN, employees, now, optional_text, required_text};
use crate::error::{HrError, HrResult};

pub const MIN_REVIEW_YEAR: i32 = 2000;
pub const MAX_REVIEW_YEAR: i32 = 2100;

#[derive(Clone, Debug)]
pub struct NewPerformanceRecord {
    pub employee_id: i32,
    pub year: i32,
    pub assigned_reviewer: String,
    pub comments: Option<String>,
}

pub(crate) fn check_year(year: i32) -> HrResult<i32> {
    if (MIN_REVIEW_YEAR..=MAX_REVIEW_YEAR).contains(&year) {
        Ok(year)
    } else {
        Err(HrError::validation(format!(
            "review year must be between {MIN_REVIEW_YEAR} and {MAX_REVIEW_YEAR}"
        )))
    }
}

pub async fn all<C>(db: &C) -> HrResult<Vec<performance_record::Model>>
where
    C: ConnectionTrait,
{
    Ok(performance_record::Entity::find()
        .order_by_asc(performance_record::Column::Id)
        .all(db)
        .await?)
}

pub async fn by_id<C>(db: &C, id: i32) -> HrResult<Option<performance_record::Model>>
where
    C: ConnectionTrait,
{
    Ok(performance_record::Entity::find_by_id(id).one(db).await?)
}

/// Every review cycle of one employee, oldest year first.
pub async fn by_employee<C>(db: &C, employee_id: i32) -> HrResult<Vec<performance_record::Model>>
where
    C: ConnectionTrait,
{
    Ok(performance_record::Entity::find()
        .filter(performance_record::Column::EmployeeId.eq(employee_id))
        .order_by_asc(performance_record::Column::Year)
        .all(db)
        .await?)
}

pub async fn by_employee_and_year<C>(
    db: &C,
    employee_id: i32,
    year: i32,
) -> HrResult<Option<performance_record::Model>>
where
    C: ConnectionTrait,
{
    Ok(performance_record::Entity::find()
        .filter(performance_record::Column::EmployeeId.eq(employee_id))
        .filter(performance_record::Column::Year.eq(year))
        .one(db)
        .await?)
}

pub async fn add<C>(db: &C, input: NewPerformanceRecord) -> HrResult<performance_record::Model>
where
    C: ConnectionTrait,
{
    employees::require(db, input.employee_id).await?;
    Ok(performance_record::ActiveModel {
        employee_id: Set(input.employee_id),
        year: Set(check_year(input.year)?),
        assigned_reviewer: Set(required_text("reviewer", &input.assigned_reviewer)?),
        initiated_at: Set(now()),
        comments: Set(optional_text("comments", input.comments, MAX_COMMENT_LEN)?),
        schema_version: Set(SCHEMA_VERSION),
        ..Default::default()
    }
    .insert(db)
    .await?)
}

/// Edits reviewer and comments; employee and year are the record's key.
pub async fn update<C>(
    db: &C,
    record: performance_record::Model,
) -> HrResult<Option<performance_record::Model>>
where
    C: ConnectionTrait,
{
    let Some(existing) = by_id(db, record.id).await? else {
        return Ok(None);
    };
    let mut active = existing.into_active_model();
    active.assigned_reviewer = Set(required_text("reviewer", &record.assigned_reviewer)?);
    active.comments = Set(optional_text("comments", record.comments, MAX_COMMENT_LEN)?);
    Ok(Some(active.update(db).await?))
}
