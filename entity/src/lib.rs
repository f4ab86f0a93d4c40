//! Database entities for the HR lifecycle tracker.
//!
//! Every table carries a `schema_version` column; rows written by this
//! version of the crate use [`SCHEMA_VERSION`].

pub mod employee;
pub mod hr_request;
pub mod onboarding_record;
pub mod performance_record;
pub mod position;
pub mod separation_record;
pub mod task;

/// Version stamped on every row inserted by this build.
pub const SCHEMA_VERSION: i16 = 1;

pub mod prelude {
    pub use super::employee::{Entity as Employee, Operator};
    pub use super::hr_request::Entity as HrRequest;
    pub use super::onboarding_record::Entity as OnboardingRecord;
    pub use super::performance_record::Entity as PerformanceRecord;
    pub use super::position::Entity as Position;
    pub use super::separation_record::Entity as SeparationRecord;
    pub use super::task::Entity as Task;
}
