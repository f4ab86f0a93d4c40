use entity::{SCHEMA_VERSION, onboarding_record};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, ConnectionTrait, EntityTrait, IntoActiveModel,
    QueryFilter, QueryOrder,
};

use super::{comment_text, employees, now, required_text};
use crate::error::HrResult;

#[derive(Clone, Debug)]
pub struct NewOnboardingRecord {
    pub employee_id: i32,
    pub assigned_hr_name: String,
    pub comments: String,
}

pub async fn all<C>(db: &C) -> HrResult<Vec<onboarding_record::Model>>
where
    C: ConnectionTrait,
{
    Ok(onboarding_record::Entity::find()
        .order_by_asc(onboarding_record::Column::Id)
        .all(db)
        .await?)
}

pub async fn by_id<C>(db: &C, id: i32) -> HrResult<Option<onboarding_record::Model>>
where
    C: ConnectionTrait,
{
    Ok(onboarding_record::Entity::find_by_id(id).one(db).await?)
}

pub async fn by_employee<C>(
    db: &C,
    employee_id: i32,
) -> HrResult<Option<onboarding_record::Model>>
where
    C: ConnectionTrait,
{
    Ok(onboarding_record::Entity::find()
        .filter(onboarding_record::Column::EmployeeId.eq(employee_id))
        .one(db)
        .await?)
}

/// A second record for the same employee is a `Conflict`.
pub async fn add<C>(db: &C, input: NewOnboardingRecord) -> HrResult<onboarding_record::Model>
where
    C: ConnectionTrait,
{
    employees::require(db, input.employee_id).await?;
    Ok(onboarding_record::ActiveModel {
        employee_id: Set(input.employee_id),
        assigned_hr_name: Set(required_text("assigned HR", &input.assigned_hr_name)?),
        comments: Set(comment_text("comments", &input.comments)?),
        initiated_at: Set(now()),
        schema_version: Set(SCHEMA_VERSION),
        ..Default::default()
    }
    .insert(db)
    .await?)
}

pub async fn update<C>(
    db: &C,
    record: onboarding_record::Model,
) -> HrResult<Option<onboarding_record::Model>>
where
    C: ConnectionTrait,
{
    let Some(existing) = by_id(db, record.id).await? else {
        return Ok(None);
    };
    let mut active = existing.into_active_model();
    active.assigned_hr_name = Set(required_text("assigned HR", &record.assigned_hr_name)?);
    active.comments = Set(comment_text("comments", &record.comments)?);
    Ok(Some(active.update(db).await?))
}
