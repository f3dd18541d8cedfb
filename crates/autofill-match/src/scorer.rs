//! Additive confidence scoring of a candidate against the query.

use serde::{Deserialize, Serialize};
use tracing::trace;

use autofill_core::defaults::{
    SCORE_CHASSIS, SCORE_ENGINE, SCORE_NATIONAL_ID, SCORE_OWNER_NAME, SCORE_PLATE_ONLY,
    SCORE_PLATE_QUALIFIED,
};
use autofill_core::{
    normalize_key, normalize_owner_name, normalize_plate_key, IdentityQuery, IndexedRecord,
};

/// Points awarded per matched signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreWeights {
    pub chassis: u32,
    pub engine: u32,
    /// Plate together with its region or country.
    pub plate_qualified: u32,
    /// Plate number alone; only when the qualified signal did not fire.
    pub plate_only: u32,
    pub national_id: u32,
    pub owner_name: u32,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            chassis: SCORE_CHASSIS,
            engine: SCORE_ENGINE,
            plate_qualified: SCORE_PLATE_QUALIFIED,
            plate_only: SCORE_PLATE_ONLY,
            national_id: SCORE_NATIONAL_ID,
            owner_name: SCORE_OWNER_NAME,
        }
    }
}

/// Which signals a candidate matched.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Signals {
    pub chassis: bool,
    pub engine: bool,
    pub plate_qualified: bool,
    pub plate_only: bool,
    pub national_id: bool,
    pub owner_name: bool,
}

impl Signals {
    /// Evaluate every signal of a sanitized query against one record.
    pub fn detect(query: &IdentityQuery, record: &IndexedRecord) -> Self {
        let raw = &record.raw;
        let keys = &record.keys;

        let chassis = query.chassis_number.as_deref().is_some_and(|v| {
            key_eq(&keys.chassis_key, &normalize_key(v)) || raw_eq(&raw.chassis_number, v)
        });
        let engine = query.engine_number.as_deref().is_some_and(|v| {
            key_eq(&keys.engine_key, &normalize_key(v)) || raw_eq(&raw.engine_number, v)
        });

        let (plate_qualified, plate_only) = match query.plate_number.as_deref() {
            Some(plate) => {
                let by_key = query
                    .plate_qualifier()
                    .is_some_and(|q| key_eq(&keys.plate_key, &normalize_plate_key(q, plate)));
                let by_country = query.plate_country.as_deref().is_some_and(|country| {
                    raw_eq(&raw.plate_number, plate) && raw_eq(&raw.plate_country, country)
                });
                let qualified = by_key || by_country;
                let alone = !qualified
                    && (key_eq(&keys.plate_number_key, &normalize_key(plate))
                        || raw_eq(&raw.plate_number, plate));
                (qualified, alone)
            }
            None => (false, false),
        };

        let national_id = query
            .national_id
            .as_deref()
            .is_some_and(|v| raw_eq(&raw.national_id, v));
        let owner_name = query
            .owner_name
            .as_deref()
            .is_some_and(|v| key_eq(&keys.owner_name_key, &normalize_owner_name(v)));

        Self {
            chassis,
            engine,
            plate_qualified,
            plate_only,
            national_id,
            owner_name,
        }
    }

    /// Sum of the weights of the matched signals.
    pub fn total(&self, weights: &ScoreWeights) -> u32 {
        [
            (self.chassis, weights.chassis),
            (self.engine, weights.engine),
            (self.plate_qualified, weights.plate_qualified),
            (self.plate_only, weights.plate_only),
            (self.national_id, weights.national_id),
            (self.owner_name, weights.owner_name),
        ]
        .iter()
        .filter(|(hit, _)| *hit)
        .map(|(_, points)| points)
        .sum()
    }
}

/// Empty keys never count as a match.
fn key_eq(stored: &str, wanted: &str) -> bool {
    !wanted.is_empty() && stored == wanted
}

fn raw_eq(stored: &Option<String>, value: &str) -> bool {
    stored.as_deref() == Some(value)
}

/// Score one record against a sanitized query.
pub fn score(query: &IdentityQuery, record: &IndexedRecord, weights: &ScoreWeights) -> u32 {
    let signals = Signals::detect(query, record);
    let total = signals.total(weights);
    trace!(
        subsystem = "match",
        component = "scorer",
        provenance = %record.provenance,
        record_id = %record.id,
        ?signals,
        score = total,
        "Candidate scored"
    );
    total
}

#[cfg(test)]
mod tests {
    use super::*;
    use autofill_core::{Provenance, RawVehicleFields};
    use uuid::Uuid;

    fn record(raw: RawVehicleFields) -> IndexedRecord {
        IndexedRecord::with_derived_keys(Uuid::new_v4(), Provenance::Live, raw)
    }

    fn full_record() -> IndexedRecord {
        record(RawVehicleFields {
            owner_name: Some("أحمد علي".to_string()),
            national_id: Some("01234567890".to_string()),
            plate_number: Some("12345".to_string()),
            plate_country: Some("SY".to_string()),
            chassis_number: Some("WVW-123".to_string()),
            engine_number: Some("EN 9".to_string()),
            ..Default::default()
        })
    }

    #[test]
    fn test_chassis_raw_or_key() {
        let w = ScoreWeights::default();
        let r = full_record();
        let by_key = IdentityQuery {
            chassis_number: Some("wvw123".to_string()),
            ..Default::default()
        };
        let by_raw = IdentityQuery {
            chassis_number: Some("WVW-123".to_string()),
            ..Default::default()
        };
        assert_eq!(score(&by_key, &r, &w), 100);
        assert_eq!(score(&by_raw, &r, &w), 100);
    }

    #[test]
    fn test_plate_and_country_scores_qualified_once() {
        let w = ScoreWeights::default();
        let q = IdentityQuery {
            plate_number: Some("12345".to_string()),
            plate_country: Some("SY".to_string()),
            ..Default::default()
        };
        // plate key and raw plate+country both hold; they do not stack
        assert_eq!(score(&q, &full_record(), &w), 70);
    }

    #[test]
    fn test_plate_with_other_region_scores_plate_only() {
        let w = ScoreWeights::default();
        let q = IdentityQuery {
            plate_number: Some("12345".to_string()),
            plate_region: Some("Aleppo".to_string()),
            ..Default::default()
        };
        let signals = Signals::detect(&q, &full_record());
        assert!(!signals.plate_qualified);
        assert!(signals.plate_only);
        assert_eq!(signals.total(&w), 30);
    }

    #[test]
    fn test_signals_are_additive() {
        let w = ScoreWeights::default();
        let q = IdentityQuery {
            chassis_number: Some("WVW-123".to_string()),
            engine_number: Some("en9".to_string()),
            plate_number: Some("12345".to_string()),
            plate_country: Some("SY".to_string()),
            national_id: Some("01234567890".to_string()),
            owner_name: Some("احمد  علي".to_string()),
            ..Default::default()
        };
        assert_eq!(score(&q, &full_record(), &w), 100 + 90 + 70 + 40 + 20);
    }

    #[test]
    fn test_owner_name_alone_is_weak() {
        let w = ScoreWeights::default();
        let q = IdentityQuery {
            owner_name: Some("أحمد علي".to_string()),
            national_id: Some("99999999999".to_string()),
            ..Default::default()
        };
        assert_eq!(score(&q, &full_record(), &w), 20);
    }

    #[test]
    fn test_no_signal_scores_zero() {
        let w = ScoreWeights::default();
        let q = IdentityQuery {
            chassis_number: Some("OTHER".to_string()),
            ..Default::default()
        };
        assert_eq!(score(&q, &full_record(), &w), 0);
    }

    #[test]
    fn test_empty_key_never_matches() {
        let w = ScoreWeights::default();
        let r = record(RawVehicleFields::default());
        let q = IdentityQuery {
            chassis_number: Some("-".to_string()),
            ..Default::default()
        };
        assert_eq!(score(&q, &r, &w), 0);
    }

    #[test]
    fn test_custom_weights() {
        let w = ScoreWeights {
            owner_name: 5,
            ..Default::default()
        };
        let q = IdentityQuery {
            owner_name: Some("احمد علي".to_string()),
            ..Default::default()
        };
        assert_eq!(score(&q, &full_record(), &w), 5);
    }
}
