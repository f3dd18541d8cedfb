//! HTTP handlers for autofill-api.

pub mod autofill;
pub mod health;

pub use autofill::{autofill, candidate_patch};
pub use health::{autofill_health, health_check};
