//! # autofill-core
//!
//! Core types, traits, and the key normalizer for the vehicle identity
//! autofill engine.
//!
//! This crate provides the data structures and trait definitions that the
//! record stores (`autofill-db`), the matcher (`autofill-match`) and the HTTP
//! layer (`autofill-api`) depend on.

pub mod clause;
pub mod defaults;
pub mod error;
pub mod logging;
pub mod models;
pub mod normalize;
pub mod traits;

// Re-export commonly used types at crate root
pub use clause::{AnyOf, MatchClause};
pub use error::{Error, Result};
pub use models::*;
pub use normalize::{
    clean_input, is_placeholder, normalize_key, normalize_owner_name, normalize_plate_key,
};
pub use traits::RecordSource;
