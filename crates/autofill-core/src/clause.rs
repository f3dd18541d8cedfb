//! Store-agnostic "any-of" lookup predicates.
//!
//! The candidate retriever turns an [`IdentityQuery`](crate::IdentityQuery)
//! into a list of [`MatchClause`]s; each record store translates them into
//! its own query language. A record is a candidate when at least one clause
//! holds.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::IndexedRecord;

/// One disjunct of a candidate lookup.
///
/// `*Key` variants compare precomputed keys, `*Raw` variants compare the
/// stored raw value exactly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum MatchClause {
    ChassisKey(String),
    ChassisRaw(String),
    EngineKey(String),
    EngineRaw(String),
    PlateNumberKey(String),
    PlateNumberRaw(String),
    /// Region/country-qualified plate key (`REGION|PLATE`).
    PlateKey(String),
    /// Raw plate number and raw plate country, both exact.
    PlateAndCountry { plate: String, country: String },
    NationalId(String),
    OwnerNameKey(String),
    OwnerNameRaw(String),
}

impl MatchClause {
    /// Evaluate the clause against a record in memory.
    pub fn matches(&self, record: &IndexedRecord) -> bool {
        let raw = &record.raw;
        let keys = &record.keys;
        match self {
            MatchClause::ChassisKey(key) => keys.chassis_key == *key,
            MatchClause::ChassisRaw(value) => raw_eq(&raw.chassis_number, value),
            MatchClause::EngineKey(key) => keys.engine_key == *key,
            MatchClause::EngineRaw(value) => raw_eq(&raw.engine_number, value),
            MatchClause::PlateNumberKey(key) => keys.plate_number_key == *key,
            MatchClause::PlateNumberRaw(value) => raw_eq(&raw.plate_number, value),
            MatchClause::PlateKey(key) => keys.plate_key == *key,
            MatchClause::PlateAndCountry { plate, country } => {
                raw_eq(&raw.plate_number, plate) && raw_eq(&raw.plate_country, country)
            }
            MatchClause::NationalId(value) => raw_eq(&raw.national_id, value),
            MatchClause::OwnerNameKey(key) => keys.owner_name_key == *key,
            MatchClause::OwnerNameRaw(value) => raw_eq(&raw.owner_name, value),
        }
    }

    /// Short label for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            MatchClause::ChassisKey(_) => "chassis_key",
            MatchClause::ChassisRaw(_) => "chassis_raw",
            MatchClause::EngineKey(_) => "engine_key",
            MatchClause::EngineRaw(_) => "engine_raw",
            MatchClause::PlateNumberKey(_) => "plate_number_key",
            MatchClause::PlateNumberRaw(_) => "plate_number_raw",
            MatchClause::PlateKey(_) => "plate_key",
            MatchClause::PlateAndCountry { .. } => "plate_and_country",
            MatchClause::NationalId(_) => "national_id",
            MatchClause::OwnerNameKey(_) => "owner_name_key",
            MatchClause::OwnerNameRaw(_) => "owner_name_raw",
        }
    }
}

fn raw_eq(stored: &Option<String>, value: &str) -> bool {
    stored.as_deref() == Some(value)
}

/// A disjunctive lookup sent to one record store.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnyOf {
    pub clauses: Vec<MatchClause>,
    /// Live record to skip. Stores without editable records ignore it.
    pub exclude_id: Option<Uuid>,
}

impl AnyOf {
    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }

    /// True when any clause holds for the record.
    pub fn matches(&self, record: &IndexedRecord) -> bool {
        self.clauses.iter().any(|clause| clause.matches(record))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Provenance, RawVehicleFields};

    fn record() -> IndexedRecord {
        IndexedRecord::with_derived_keys(
            Uuid::new_v4(),
            Provenance::Live,
            RawVehicleFields {
                plate_number: Some("12345".to_string()),
                plate_country: Some("SY".to_string()),
                chassis_number: Some("abc-123".to_string()),
                owner_name: Some("أحمد".to_string()),
                ..Default::default()
            },
        )
    }

    #[test]
    fn test_key_and_raw_clauses() {
        let record = record();
        assert!(MatchClause::ChassisKey("ABC123".to_string()).matches(&record));
        assert!(MatchClause::ChassisRaw("abc-123".to_string()).matches(&record));
        assert!(!MatchClause::ChassisRaw("ABC-123".to_string()).matches(&record));
        assert!(MatchClause::OwnerNameKey("احمد".to_string()).matches(&record));
    }

    #[test]
    fn test_empty_key_matches_records_without_that_key() {
        // the retriever never emits empty keys for this reason
        let record = record();
        assert!(MatchClause::EngineKey(String::new()).matches(&record));
    }

    #[test]
    fn test_plate_and_country_requires_both() {
        let record = record();
        let hit = MatchClause::PlateAndCountry {
            plate: "12345".to_string(),
            country: "SY".to_string(),
        };
        let miss = MatchClause::PlateAndCountry {
            plate: "12345".to_string(),
            country: "LB".to_string(),
        };
        assert!(hit.matches(&record));
        assert!(!miss.matches(&record));
        assert!(MatchClause::PlateKey("SY|12345".to_string()).matches(&record));
    }

    #[test]
    fn test_absent_raw_field_never_matches() {
        let record = record();
        assert!(!MatchClause::NationalId("".to_string()).matches(&record));
        assert!(!MatchClause::EngineRaw("X".to_string()).matches(&record));
    }

    #[test]
    fn test_any_of() {
        let record = record();
        let query = AnyOf {
            clauses: vec![
                MatchClause::NationalId("999".to_string()),
                MatchClause::PlateNumberKey("12345".to_string()),
            ],
            exclude_id: None,
        };
        assert!(query.matches(&record));
        assert!(!AnyOf::default().matches(&record));
        assert!(AnyOf::default().is_empty());
    }
}
