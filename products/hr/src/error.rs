use platform_api::ApiError;
use sea_orm::{DbErr, SqlErr};
use thiserror::Error;

pub type HrResult<T> = Result<T, HrError>;

#[derive(Debug, Error)]
pub enum HrError {
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: i32 },
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    Conflict(String),
    #[error("cannot move position from {from} to {to}")]
    InvalidTransition { from: String, to: String },
    #[error("malformed data: {0}")]
    Seed(String),
    #[error("database error: {0}")]
    Db(#[source] DbErr),
}

impl HrError {
    pub fn not_found(entity: &'static str, id: i32) -> Self {
        HrError::NotFound { entity, id }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        HrError::Validation(message.into())
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        HrError::Conflict(message.into())
    }
}

impl From<DbErr> for HrError {
    fn from(err: DbErr) -> Self {
        match err.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(detail)) => {
                HrError::Conflict(format!("duplicate record: {detail}"))
            }
            Some(SqlErr::ForeignKeyConstraintViolation(detail)) => {
                HrError::Validation(format!("unknown reference: {detail}"))
            }
            _ => HrError::Db(err),
        }
    }
}

impl From<HrError> for ApiError {
    fn from(err: HrError) -> Self {
        match err {
            HrError::NotFound { .. } => ApiError::NotFound(err.to_string()),
            HrError::Validation(message) => ApiError::Validation(message),
            HrError::Conflict(message) => ApiError::Conflict(message),
            HrError::InvalidTransition { .. } => ApiError::Conflict(err.to_string()),
            HrError::Seed(_) | HrError::Db(_) => ApiError::internal(err.into()),
        }
    }
}
