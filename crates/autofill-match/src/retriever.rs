//! Candidate retrieval across the live and legacy stores.

use std::sync::Arc;
use std::time::Instant;

use tracing::debug;

use autofill_core::defaults::PER_SOURCE_LIMIT;
use autofill_core::{
    normalize_key, normalize_owner_name, normalize_plate_key, AnyOf, IdentityQuery, IndexedRecord,
    MatchClause, RecordSource, Result,
};

/// Build the disjunctive lookup for a sanitized query.
///
/// Key clauses are skipped when the normalized key is empty, so input made of
/// separators only cannot match records that lack the key.
pub fn build_clauses(query: &IdentityQuery) -> Vec<MatchClause> {
    let mut clauses = Vec::new();

    if let Some(chassis) = &query.chassis_number {
        push_key(&mut clauses, MatchClause::ChassisKey(normalize_key(chassis)));
        clauses.push(MatchClause::ChassisRaw(chassis.clone()));
    }

    if let Some(engine) = &query.engine_number {
        push_key(&mut clauses, MatchClause::EngineKey(normalize_key(engine)));
        clauses.push(MatchClause::EngineRaw(engine.clone()));
    }

    if let Some(plate) = &query.plate_number {
        push_key(&mut clauses, MatchClause::PlateNumberKey(normalize_key(plate)));
        clauses.push(MatchClause::PlateNumberRaw(plate.clone()));
        if let Some(qualifier) = query.plate_qualifier() {
            clauses.push(MatchClause::PlateKey(normalize_plate_key(qualifier, plate)));
        }
        if let Some(country) = &query.plate_country {
            clauses.push(MatchClause::PlateAndCountry {
                plate: plate.clone(),
                country: country.clone(),
            });
        }
    }

    if let Some(national_id) = &query.national_id {
        clauses.push(MatchClause::NationalId(national_id.clone()));
    }

    if let Some(owner) = &query.owner_name {
        push_key(&mut clauses, MatchClause::OwnerNameKey(normalize_owner_name(owner)));
        clauses.push(MatchClause::OwnerNameRaw(owner.clone()));
    }

    clauses
}

fn push_key(clauses: &mut Vec<MatchClause>, clause: MatchClause) {
    let empty = match &clause {
        MatchClause::ChassisKey(k)
        | MatchClause::EngineKey(k)
        | MatchClause::PlateNumberKey(k)
        | MatchClause::OwnerNameKey(k) => k.is_empty(),
        _ => false,
    };
    if !empty {
        clauses.push(clause);
    }
}

/// Queries both stores concurrently and merges their results.
#[derive(Clone)]
pub struct CandidateRetriever {
    live: Arc<dyn RecordSource>,
    legacy: Arc<dyn RecordSource>,
    per_source_limit: usize,
}

impl CandidateRetriever {
    pub fn new(live: Arc<dyn RecordSource>, legacy: Arc<dyn RecordSource>) -> Self {
        Self {
            live,
            legacy,
            per_source_limit: PER_SOURCE_LIMIT,
        }
    }

    /// Set the per-store cap.
    pub fn with_per_source_limit(mut self, limit: usize) -> Self {
        self.per_source_limit = limit;
        self
    }

    /// Fetch candidates for `query`.
    ///
    /// Returns live records first, then legacy records, each in store order.
    /// Neither store is queried when the query has no usable field. A failure
    /// in either store fails the whole retrieval.
    pub async fn retrieve(&self, query: &IdentityQuery) -> Result<Vec<IndexedRecord>> {
        let query = query.sanitized();
        let clauses = build_clauses(&query);
        if clauses.is_empty() {
            debug!(
                subsystem = "match",
                component = "retriever",
                op = "retrieve",
                "No usable input, skipping store lookups"
            );
            return Ok(Vec::new());
        }

        let start = Instant::now();
        let clause_count = clauses.len();
        let legacy_query = AnyOf {
            clauses,
            exclude_id: None,
        };
        // only the live store holds the record being edited
        let live_query = AnyOf {
            exclude_id: query.exclude_uuid(),
            ..legacy_query.clone()
        };
        let limit = self.per_source_limit;

        let (mut live, mut legacy) = tokio::try_join!(
            self.live.find_candidates(&live_query, limit),
            self.legacy.find_candidates(&legacy_query, limit),
        )?;
        live.truncate(limit);
        legacy.truncate(limit);

        debug!(
            subsystem = "match",
            component = "retriever",
            op = "retrieve",
            fields_present = ?query.present_fields(),
            clause_count,
            limit,
            live_count = live.len(),
            legacy_count = legacy.len(),
            duration_ms = start.elapsed().as_millis() as u64,
            "Candidates retrieved"
        );

        live.append(&mut legacy);
        Ok(live)
    }
}
