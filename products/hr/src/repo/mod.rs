//! Typed repositories, one module per table.
//!
//! Every function is generic over [`sea_orm::ConnectionTrait`] so it runs
//! either on the pool or inside a caller's transaction. `update` functions
//! return `Ok(None)` when the id does not exist and leave the table unchanged.

pub mod employees;
pub mod onboardings;
pub mod performance;
pub mod positions;
pub mod requests;
pub mod separations;
pub mod tasks;

use chrono::{DateTime, FixedOffset, NaiveDate, Utc};

use crate::error::{HrError, HrResult};

pub const MAX_NAME_LEN: usize = 256;
pub const MAX_COMMENT_LEN: usize = 65_535;

/// Trims a required text field and enforces the name length limit.
pub(crate) fn required_text(field: &str, value: &str) -> HrResult<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(HrError::validation(format!("{field} must not be empty")));
    }
    if trimmed.chars().count() > MAX_NAME_LEN {
        return Err(HrError::validation(format!(
            "{field} must be at most {MAX_NAME_LEN} characters"
        )));
    }
    Ok(trimmed.to_string())
}

/// Blank optional text is stored as absent.
pub(crate) fn optional_text(
    field: &str,
    value: Option<String>,
    max_len: usize,
) -> HrResult<Option<String>> {
    let Some(value) = value else {
        return Ok(None);
    };
    if value.trim().is_empty() {
        return Ok(None);
    }
    if value.chars().count() > max_len {
        return Err(HrError::validation(format!(
            "{field} must be at most {max_len} characters"
        )));
    }
    Ok(Some(value))
}

pub(crate) fn comment_text(field: &str, value: &str) -> HrResult<String> {
    if value.chars().count() > MAX_COMMENT_LEN {
        return Err(HrError::validation(format!(
            "{field} must be at most {MAX_COMMENT_LEN} characters"
        )));
    }
    Ok(value.to_string())
}

pub(crate) fn now() -> DateTime<FixedOffset> {
    Utc::now().fixed_offset()
}

pub(crate) fn today() -> NaiveDate {
    Utc::now().date_naive()
}
