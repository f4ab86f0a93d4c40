//! HR lifecycle slice.
//!
//! Typed repositories over the `entity` tables, the onboarding / separation /
//! performance process workflows, derived dashboard views, roster seeding,
//! the AI drafting adapter and the legacy JSON snapshot interchange.

pub mod drafting;
pub mod error;
pub mod legacy;
pub mod process;
pub mod repo;
pub mod seed;
pub mod views;

pub use error::{HrError, HrResult};
