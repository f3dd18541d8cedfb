//! # autofill-match
//!
//! Identity resolution for vehicle intake forms.
//!
//! This crate provides:
//! - Candidate retrieval from the live and legacy stores (concurrent, capped per store)
//! - Additive signal scoring
//! - Ranking and the silent-autofill decision
//! - The [`AutofillService`] orchestrator used by the HTTP layer
//!
//! ## Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use autofill_match::{AutofillConfig, AutofillService, IdentityQuery};
//! use autofill_db::Database;
//!
//! let db = Database::connect("postgres://...").await?;
//! let service = AutofillService::new(
//!     Arc::new(db.live.clone()),
//!     Arc::new(db.legacy.clone()),
//!     AutofillConfig::from_env(),
//! );
//!
//! let response = service
//!     .autofill(&IdentityQuery {
//!         chassis_number: Some("WVW-123".into()),
//!         ..Default::default()
//!     })
//!     .await?;
//! ```

pub mod resolver;
pub mod retriever;
pub mod scorer;
pub mod service;

// Re-export core types
pub use autofill_core::*;

pub use resolver::{Resolution, Resolver};
pub use retriever::{build_clauses, CandidateRetriever};
pub use scorer::{score, ScoreWeights, Signals};
pub use service::{AutofillConfig, AutofillService};
