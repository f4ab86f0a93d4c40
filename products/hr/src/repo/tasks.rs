use chrono::NaiveDate;
use entity::{
    SCHEMA_VERSION, task,
    task::{Category, Status},
};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, ConnectionTrait, EntityTrait, IntoActiveModel,
    QueryFilter, QueryOrder,
};
use tracing::debug;

use super::{MAX_COMMENT_LEN, employees, optional_text, required_text};
use crate::error::{HrError, HrResult};

#[derive(Clone, Debug)]
pub struct NewTask {
    pub employee_id: i32,
    pub name: String,
    pub owner: String,
    pub status: Status,
    pub due_date: Option<NaiveDate>,
    pub comments: Option<String>,
    pub category: Category,
    /// Required for performance tasks, ignored otherwise.
    pub year: Option<i32>,
}

impl NewTask {
    /// A fresh checklist item: `Not Started`, no comments.
    pub fn checklist_item(
        employee_id: i32,
        name: impl Into<String>,
        owner: impl Into<String>,
        category: Category,
        due_date: Option<NaiveDate>,
    ) -> Self {
        Self {
            employee_id,
            name: name.into(),
            owner: owner.into(),
            status: Status::NotStarted,
            due_date,
            comments: None,
            category,
            year: None,
        }
    }

    pub fn with_year(mut self, year: i32) -> Self {
        self.year = Some(year);
        self
    }

    fn into_active_model(self) -> HrResult<task::ActiveModel> {
        let year = match self.category {
            Category::Performance => Some(
                self.year
                    .ok_or_else(|| HrError::validation("performance tasks need a review year"))?,
            ),
            Category::Onboarding | Category::Separation => None,
        };
        Ok(task::ActiveModel {
            employee_id: Set(self.employee_id),
            name: Set(required_text("task name", &self.name)?),
            owner: Set(required_text("owner", &self.owner)?),
            status: Set(self.status),
            due_date: Set(self.due_date),
            comments: Set(optional_text("comments", self.comments, MAX_COMMENT_LEN)?),
            category: Set(self.category),
            year: Set(year),
            schema_version: Set(SCHEMA_VERSION),
            ..Default::default()
        })
    }
}

pub async fn all<C>(db: &C) -> HrResult<Vec<task::Model>>
where
    C: ConnectionTrait,
{
    Ok(task::Entity::find()
        .order_by_asc(task::Column::Id)
        .all(db)
        .await?)
}

pub async fn by_id<C>(db: &C, id: i32) -> HrResult<Option<task::Model>>
where
    C: ConnectionTrait,
{
    Ok(task::Entity::find_by_id(id).one(db).await?)
}

pub async fn by_employee<C>(
    db: &C,
    employee_id: i32,
    category: Category,
) -> HrResult<Vec<task::Model>>
where
    C: ConnectionTrait,
{
    Ok(task::Entity::find()
        .filter(task::Column::EmployeeId.eq(employee_id))
        .filter(task::Column::Category.eq(category))
        .order_by_asc(task::Column::Id)
        .all(db)
        .await?)
}

pub async fn by_category<C>(db: &C, category: Category) -> HrResult<Vec<task::Model>>
where
    C: ConnectionTrait,
{
    Ok(task::Entity::find()
        .filter(task::Column::Category.eq(category))
        .order_by_asc(task::Column::Id)
        .all(db)
        .await?)
}

pub async fn by_employee_and_year<C>(
    db: &C,
    employee_id: i32,
    year: i32,
) -> HrResult<Vec<task::Model>>
where
    C: ConnectionTrait,
{
    Ok(task::Entity::find()
        .filter(task::Column::EmployeeId.eq(employee_id))
        .filter(task::Column::Category.eq(Category::Performance))
        .filter(task::Column::Year.eq(year))
        .order_by_asc(task::Column::Id)
        .all(db)
        .await?)
}

pub async fn add<C>(db: &C, input: NewTask) -> HrResult<task::Model>
where
    C: ConnectionTrait,
{
    employees::require(db, input.employee_id).await?;
    insert(db, input).await
}

/// Inserts without re-checking the employee; callers have already done so.
pub(crate) async fn insert<C>(db: &C, input: NewTask) -> HrResult<task::Model>
where
    C: ConnectionTrait,
{
    let model = input.into_active_model()?.insert(db).await?;
    debug!(
        task_id = model.id,
        employee_id = model.employee_id,
        category = model.category.as_str(),
        "task added"
    );
    Ok(model)
}

/// Replaces name, owner, status, due date and comments. Employee, category
/// and year are fixed at creation.
pub async fn update<C>(db: &C, task: task::Model) -> HrResult<Option<task::Model>>
where
    C: ConnectionTrait,
{
    let Some(existing) = by_id(db, task.id).await? else {
        return Ok(None);
    };
    let mut active = existing.into_active_model();
    active.name = Set(required_text("task name", &task.name)?);
    active.owner = Set(required_text("owner", &task.owner)?);
    active.status = Set(task.status);
    active.due_date = Set(task.due_date);
    active.comments = Set(optional_text("comments", task.comments, MAX_COMMENT_LEN)?);
    Ok(Some(active.update(db).await?))
}

/// Advances a task one step around `Not Started -> In Progress -> Done`.
pub async fn toggle_status<C>(db: &C, id: i32) -> HrResult<task::Model>
where
    C: ConnectionTrait,
{
    let existing = by_id(db, id)
        .await?
        .ok_or_else(|| HrError::not_found("task", id))?;
    let next = existing.status.next();
    let mut active = existing.into_active_model();
    active.status = Set(next);
    Ok(active.update(db).await?)
}
