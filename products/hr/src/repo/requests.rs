use entity::{SCHEMA_VERSION, hr_request, hr_request::Status};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, ConnectionTrait, EntityTrait, IntoActiveModel,
    QueryFilter, QueryOrder,
};
use tracing::debug;

use super::{MAX_COMMENT_LEN, MAX_NAME_LEN, employees, now, optional_text, required_text};
use crate::error::HrResult;

/// Request types offered by the intake form. `Other` takes a free-text type.
pub const REQUEST_TYPES: [&str; 27] = [
    "Accommodation Move",
    "Bank Account Opening",
    "Salary Certificate / Bank Letter",
    "Internal Transfer",
    "Cross-Training Request",
    "Visa / NOC Letter",
    "Complaint / Grievance",
    "Shift / Schedule Change",
    "Sim Card",
    "Duty Mobile",
    "TAF",
    "EOS",
    "OPS",
    "Duty Trip",
    "ID Replacement",
    "Name Tag",
    "Medical Expense Claim",
    "NOC",
    "Visa Request",
    "Weekly Meal",
    "Laundry",
    "Destination Change",
    "Removal of Benefits",
    "Business Justification",
    "Food Handler Certificate",
    "Transportation",
    OTHER_REQUEST_TYPE,
];

pub const OTHER_REQUEST_TYPE: &str = "Other";

/// Resolves the stored request type: `Other` with a custom label stores the
/// label, anything else is stored as selected.
pub fn resolve_request_type(selected: &str, custom: Option<&str>) -> String {
    match custom.map(str::trim) {
        Some(label) if selected.trim() == OTHER_REQUEST_TYPE && !label.is_empty() => {
            label.to_string()
        }
        _ => selected.trim().to_string(),
    }
}

#[derive(Clone, Debug)]
pub struct NewRequest {
    pub employee_id: i32,
    pub request_type: String,
    pub status: Status,
    pub description: Option<String>,
    pub assigned_to: Option<String>,
}

pub async fn all<C>(db: &C) -> HrResult<Vec<hr_request::Model>>
where
    C: ConnectionTrait,
{
    Ok(hr_request::Entity::find()
        .order_by_asc(hr_request::Column::Id)
        .all(db)
        .await?)
}

pub async fn by_id<C>(db: &C, id: i32) -> HrResult<Option<hr_request::Model>>
where
    C: ConnectionTrait,
{
    Ok(hr_request::Entity::find_by_id(id).one(db).await?)
}

pub async fn by_employee<C>(db: &C, employee_id: i32) -> HrResult<Vec<hr_request::Model>>
where
    C: ConnectionTrait,
{
    Ok(hr_request::Entity::find()
        .filter(hr_request::Column::EmployeeId.eq(employee_id))
        .order_by_asc(hr_request::Column::Id)
        .all(db)
        .await?)
}

/// Stamps `created_at` and `updated_at` with the current time.
pub async fn add<C>(db: &C, input: NewRequest) -> HrResult<hr_request::Model>
where
    C: ConnectionTrait,
{
    employees::require(db, input.employee_id).await?;
    let stamp = now();
    let model = hr_request::ActiveModel {
        employee_id: Set(input.employee_id),
        request_type: Set(required_text("request type", &input.request_type)?),
        status: Set(input.status),
        description: Set(optional_text(
            "description",
            input.description,
            MAX_COMMENT_LEN,
        )?),
        assigned_to: Set(optional_text("assignee", input.assigned_to, MAX_NAME_LEN)?),
        created_at: Set(stamp),
        updated_at: Set(stamp),
        schema_version: Set(SCHEMA_VERSION),
        ..Default::default()
    }
    .insert(db)
    .await?;
    debug!(request_id = model.id, employee_id = model.employee_id, "request logged");
    Ok(model)
}

/// Keeps `created_at` and the employee; refreshes `updated_at`.
pub async fn update<C>(db: &C, request: hr_request::Model) -> HrResult<Option<hr_request::Model>>
where
    C: ConnectionTrait,
{
    let Some(existing) = by_id(db, request.id).await? else {
        return Ok(None);
    };
    let mut active = existing.into_active_model();
    active.request_type = Set(required_text("request type", &request.request_type)?);
    active.status = Set(request.status);
    active.description = Set(optional_text(
        "description",
        request.description,
        MAX_COMMENT_LEN,
    )?);
    active.assigned_to = Set(optional_text("assignee", request.assigned_to, MAX_NAME_LEN)?);
    active.updated_at = Set(now());
    Ok(Some(active.update(db).await?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn other_takes_the_custom_label() {
        assert_eq!(
            resolve_request_type("Other", Some(" Parking permit ")),
            "Parking permit"
        );
        assert_eq!(resolve_request_type("Other", Some("  ")), "Other");
        assert_eq!(resolve_request_type("Sim Card", Some("ignored")), "Sim Card");
        assert_eq!(resolve_request_type("Laundry", None), "Laundry");
    }

    #[test]
    fn catalogue_ends_with_other() {
        assert_eq!(REQUEST_TYPES.len(), 27);
        assert_eq!(REQUEST_TYPES.last(), Some(&OTHER_REQUEST_TYPE));
    }
}
