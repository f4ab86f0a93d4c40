use chrono::NaiveDate;
use entity::{SCHEMA_VERSION, employee::Operator, position, position::Status};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, ConnectionTrait, EntityTrait, IntoActiveModel,
    QueryFilter, QueryOrder,
};
use tracing::{debug, info};

use super::{MAX_COMMENT_LEN, MAX_NAME_LEN, optional_text, required_text, today};
use crate::error::{HrError, HrResult};

#[derive(Clone, Debug)]
pub struct NewPosition {
    pub title: String,
    pub operator: Operator,
    pub department: String,
    pub grade: Option<String>,
    pub description: Option<String>,
    pub hiring_manager: Option<String>,
    pub target_hire_date: Option<NaiveDate>,
    pub justification: Option<String>,
    /// Defaults to today.
    pub request_date: Option<NaiveDate>,
}

pub async fn all<C>(db: &C) -> HrResult<Vec<position::Model>>
where
    C: ConnectionTrait,
{
    Ok(position::Entity::find()
        .order_by_asc(position::Column::Id)
        .all(db)
        .await?)
}

pub async fn by_id<C>(db: &C, id: i32) -> HrResult<Option<position::Model>>
where
    C: ConnectionTrait,
{
    Ok(position::Entity::find_by_id(id).one(db).await?)
}

pub async fn by_status<C>(db: &C, status: Status) -> HrResult<Vec<position::Model>>
where
    C: ConnectionTrait,
{
    Ok(position::Entity::find()
        .filter(position::Column::Status.eq(status))
        .order_by_asc(position::Column::Id)
        .all(db)
        .await?)
}

/// Records a position request. New positions always await approval.
pub async fn add<C>(db: &C, input: NewPosition) -> HrResult<position::Model>
where
    C: ConnectionTrait,
{
    let model = position::ActiveModel {
        title: Set(required_text("title", &input.title)?),
        operator: Set(input.operator),
        department: Set(required_text("department", &input.department)?),
        grade: Set(optional_text("grade", input.grade, MAX_NAME_LEN)?),
        status: Set(Status::PendingApproval),
        description: Set(optional_text("description", input.description, MAX_COMMENT_LEN)?),
        hiring_manager: Set(optional_text(
            "hiring manager",
            input.hiring_manager,
            MAX_NAME_LEN,
        )?),
        target_hire_date: Set(input.target_hire_date),
        justification: Set(optional_text(
            "justification",
            input.justification,
            MAX_COMMENT_LEN,
        )?),
        request_date: Set(Some(input.request_date.unwrap_or_else(today))),
        filled_by: Set(None),
        schema_version: Set(SCHEMA_VERSION),
        ..Default::default()
    }
    .insert(db)
    .await?;
    debug!(position_id = model.id, "position requested");
    Ok(model)
}

/// Edit form: replaces every mutable field, status included.
pub async fn update<C>(db: &C, position: position::Model) -> HrResult<Option<position::Model>>
where
    C: ConnectionTrait,
{
    let Some(existing) = by_id(db, position.id).await? else {
        return Ok(None);
    };
    let mut active = existing.into_active_model();
    active.title = Set(required_text("title", &position.title)?);
    active.operator = Set(position.operator);
    active.department = Set(required_text("department", &position.department)?);
    active.grade = Set(optional_text("grade", position.grade, MAX_NAME_LEN)?);
    active.status = Set(position.status);
    active.description = Set(optional_text(
        "description",
        position.description,
        MAX_COMMENT_LEN,
    )?);
    active.hiring_manager = Set(optional_text(
        "hiring manager",
        position.hiring_manager,
        MAX_NAME_LEN,
    )?);
    active.target_hire_date = Set(position.target_hire_date);
    active.justification = Set(optional_text(
        "justification",
        position.justification,
        MAX_COMMENT_LEN,
    )?);
    active.request_date = Set(position.request_date);
    active.filled_by = Set(optional_text("filled by", position.filled_by, MAX_NAME_LEN)?);
    Ok(Some(active.update(db).await?))
}

pub async fn approve<C>(db: &C, id: i32) -> HrResult<position::Model>
where
    C: ConnectionTrait,
{
    transition(db, id, Status::Open, None).await
}

pub async fn reject<C>(db: &C, id: i32) -> HrResult<position::Model>
where
    C: ConnectionTrait,
{
    transition(db, id, Status::Rejected, None).await
}

/// Marks an open position as filled by `candidate`.
pub async fn fill<C>(db: &C, id: i32, candidate: &str) -> HrResult<position::Model>
where
    C: ConnectionTrait,
{
    let candidate = required_text("candidate", candidate)?;
    transition(db, id, Status::Filled, Some(candidate)).await
}

async fn transition<C>(
    db: &C,
    id: i32,
    next: Status,
    filled_by: Option<String>,
) -> HrResult<position::Model>
where
    C: ConnectionTrait,
{
    let existing = by_id(db, id)
        .await?
        .ok_or_else(|| HrError::not_found("position", id))?;
    let current = existing.status;
    if !current.can_transition_to(next) {
        return Err(HrError::InvalidTransition {
            from: current.to_string(),
            to: next.to_string(),
        });
    }
    let mut active = existing.into_active_model();
    active.status = Set(next);
    if filled_by.is_some() {
        active.filled_by = Set(filled_by);
    }
    let model = active.update(db).await?;
    info!(position_id = id, from = %current, to = %next, "position status changed");
    Ok(model)
}
