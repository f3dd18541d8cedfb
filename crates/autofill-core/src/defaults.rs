//! Centralized default constants for the autofill engine.
//!
//! **This module is the single source of truth** for shared default values.
//! Runtime overrides go through `AutofillConfig` / the API's environment
//! configuration, which fall back to these constants.

// =============================================================================
// RETRIEVAL
// =============================================================================

/// Maximum records fetched from each store before scoring.
pub const PER_SOURCE_LIMIT: usize = 10;

/// Maximum candidates exposed to the disambiguation UI.
pub const MAX_CANDIDATES: usize = 5;

/// Per-store query budget in milliseconds.
pub const QUERY_TIMEOUT_MS: u64 = 5_000;

/// Rows updated per statement during key backfill.
pub const BACKFILL_BATCH_SIZE: i64 = 500;

// =============================================================================
// SCORING
// =============================================================================

/// Minimum top score that allows a silent autofill.
pub const AUTOFILL_THRESHOLD: u32 = 70;

/// Chassis number matched (key or raw).
pub const SCORE_CHASSIS: u32 = 100;

/// Engine number matched (key or raw).
pub const SCORE_ENGINE: u32 = 90;

/// Plate matched together with its region or country.
pub const SCORE_PLATE_QUALIFIED: u32 = 70;

/// Plate number matched without a region or country.
pub const SCORE_PLATE_ONLY: u32 = 30;

/// National ID matched exactly.
pub const SCORE_NATIONAL_ID: u32 = 40;

/// Owner name matched on its canonical key.
pub const SCORE_OWNER_NAME: u32 = 20;

// =============================================================================
// INPUT
// =============================================================================

/// Placeholder meaning "not available", compared with all whitespace removed.
pub const PLACEHOLDER_NOT_AVAILABLE: &str = "لايوجد";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_threshold_unreachable_from_weak_signals() {
        assert!(SCORE_NATIONAL_ID + SCORE_OWNER_NAME < AUTOFILL_THRESHOLD);
        assert!(SCORE_PLATE_ONLY + SCORE_OWNER_NAME < AUTOFILL_THRESHOLD);
    }

    #[test]
    fn test_threshold_reachable_from_strong_signals() {
        assert!(SCORE_CHASSIS >= AUTOFILL_THRESHOLD);
        assert!(SCORE_ENGINE >= AUTOFILL_THRESHOLD);
        assert!(SCORE_PLATE_QUALIFIED >= AUTOFILL_THRESHOLD);
    }

    #[test]
    fn test_candidate_window_within_source_limit() {
        assert!(MAX_CANDIDATES <= PER_SOURCE_LIMIT);
    }
}
