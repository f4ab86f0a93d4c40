use entity::{SCHEMA_VERSION, separation_record};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, ConnectionTrait, EntityTrait, IntoActiveModel,
    QueryFilter, QueryOrder,
};

use super::{employees, now, required_text};
use crate::error::HrResult;

#[derive(Clone, Debug)]
pub struct NewSeparationRecord {
    pub employee_id: i32,
    pub assigned_hr_name: String,
    pub final_settlement_received: bool,
}

pub async fn all<C>(db: &C) -> HrResult<Vec<separation_record::Model>>
where
    C: ConnectionTrait,
{
    Ok(separation_record::Entity::find()
        .order_by_asc(separation_record::Column::Id)
        .all(db)
        .await?)
}

pub async fn by_id<C>(db: &C, id: i32) -> HrResult<Option<separation_record::Model>>
where
    C: ConnectionTrait,
{
    Ok(separation_record::Entity::find_by_id(id).one(db).await?)
}

pub async fn by_employee<C>(
    db: &C,
    employee_id: i32,
) -> HrResult<Option<separation_record::Model>>
where
    C: ConnectionTrait,
{
    Ok(separation_record::Entity::find()
        .filter(separation_record::Column::EmployeeId.eq(employee_id))
        .one(db)
        .await?)
}

pub async fn add<C>(db: &C, input: NewSeparationRecord) -> HrResult<separation_record::Model>
where
    C: ConnectionTrait,
{
    employees::require(db, input.employee_id).await?;
    Ok(separation_record::ActiveModel {
        employee_id: Set(input.employee_id),
        assigned_hr_name: Set(required_text("assigned HR", &input.assigned_hr_name)?),
        final_settlement_received: Set(input.final_settlement_received),
        initiated_at: Set(now()),
        schema_version: Set(SCHEMA_VERSION),
        ..Default::default()
    }
    .insert(db)
    .await?)
}

pub async fn update<C>(
    db: &C,
    record: separation_record::Model,
) -> HrResult<Option<separation_record::Model>>
where
    C: ConnectionTrait,
{
    let Some(existing) = by_id(db, record.id).await? else {
        return Ok(None);
    };
    let mut active = existing.into_active_model();
    active.assigned_hr_name = Set(required_text("assigned HR", &record.assigned_hr_name)?);
    active.final_settlement_received = Set(record.final_settlement_received);
    Ok(Some(active.update(db).await?))
}
