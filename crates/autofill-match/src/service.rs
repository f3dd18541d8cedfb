//! The autofill orchestrator: retrieve, score, resolve.

use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, info, warn};
use uuid::Uuid;

use autofill_core::defaults::{AUTOFILL_THRESHOLD, MAX_CANDIDATES, PER_SOURCE_LIMIT};
use autofill_core::{
    AutofillHealth, AutofillResponse, Candidate, IdentityQuery, Provenance, RecordSource,
    ResolvedPatch, Result,
};

use crate::resolver::Resolver;
use crate::retriever::CandidateRetriever;
use crate::scorer::{score, ScoreWeights};

/// Tunables of the matching pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AutofillConfig {
    /// Records fetched from each store before scoring.
    pub per_source_limit: usize,
    /// Candidates returned for disambiguation.
    pub max_candidates: usize,
    /// Minimum top score for a silent autofill.
    pub autofill_threshold: u32,
    pub weights: ScoreWeights,
}

impl Default for AutofillConfig {
    fn default() -> Self {
        Self {
            per_source_limit: PER_SOURCE_LIMIT,
            max_candidates: MAX_CANDIDATES,
            autofill_threshold: AUTOFILL_THRESHOLD,
            weights: ScoreWeights::default(),
        }
    }
}

impl AutofillConfig {
    /// Constructs the config from environment variables.
    ///
    /// Environment variables:
    /// - `AUTOFILL_PER_SOURCE_LIMIT` (default: 10)
    /// - `AUTOFILL_MAX_CANDIDATES` (default: 5)
    /// - `AUTOFILL_THRESHOLD` (default: 70)
    ///
    /// Unparseable or zero values fall back to the default with a warning.
    pub fn from_env() -> Self {
        Self {
            per_source_limit: parse_env("AUTOFILL_PER_SOURCE_LIMIT", PER_SOURCE_LIMIT),
            max_candidates: parse_env("AUTOFILL_MAX_CANDIDATES", MAX_CANDIDATES),
            autofill_threshold: parse_env("AUTOFILL_THRESHOLD", AUTOFILL_THRESHOLD),
            weights: ScoreWeights::default(),
        }
    }
}

fn parse_env<T>(name: &str, default: T) -> T
where
    T: std::str::FromStr + PartialEq + Default + std::fmt::Display + Copy,
{
    let Ok(value) = std::env::var(name) else {
        return default;
    };
    match value.trim().parse::<T>() {
        Ok(parsed) if parsed != T::default() => parsed,
        _ => {
            warn!(
                subsystem = "config",
                variable = name,
                value = %value,
                default = %default,
                "Invalid value, using default"
            );
            default
        }
    }
}

/// Answers autofill requests against the live and legacy stores.
///
/// Stateless between requests; cheap to clone.
#[derive(Clone)]
pub struct AutofillService {
    live: Arc<dyn RecordSource>,
    legacy: Arc<dyn RecordSource>,
    retriever: CandidateRetriever,
    resolver: Resolver,
    weights: ScoreWeights,
}

impl AutofillService {
    pub fn new(
        live: Arc<dyn RecordSource>,
        legacy: Arc<dyn RecordSource>,
        config: AutofillConfig,
    ) -> Self {
        let retriever = CandidateRetriever::new(live.clone(), legacy.clone())
            .with_per_source_limit(config.per_source_limit);
        Self {
            live,
            legacy,
            retriever,
            resolver: Resolver {
                max_candidates: config.max_candidates,
                autofill_threshold: config.autofill_threshold,
            },
            weights: config.weights,
        }
    }

    /// Resolve a partial identity into a match and/or ranked candidates.
    ///
    /// Empty or placeholder-only input yields an empty response without
    /// touching either store. Store failures propagate.
    pub async fn autofill(&self, query: &IdentityQuery) -> Result<AutofillResponse> {
        let start = Instant::now();
        let query = query.sanitized();
        if query.is_empty() {
            return Ok(AutofillResponse::empty());
        }

        let records = self.retriever.retrieve(&query).await?;
        let retrieved = records.len();
        let scored: Vec<Candidate> = records
            .into_iter()
            .map(|record| {
                let score = score(&query, &record, &self.weights);
                Candidate { record, score }
            })
            .collect();

        let resolution = self.resolver.resolve(scored);

        debug!(
            subsystem = "match",
            component = "service",
            op = "autofill",
            fields_present = ?query.present_fields(),
            retrieved,
            result_count = resolution.candidates.len(),
            top_score = resolution.top_score().unwrap_or(0),
            matched = resolution.matched.is_some(),
            duration_ms = start.elapsed().as_millis() as u64,
            "Autofill resolved"
        );
        Ok(resolution.into_response())
    }

    /// Patch of a record the user picked from the candidate list.
    pub async fn patch_for(&self, from: Provenance, id: Uuid) -> Result<Option<ResolvedPatch>> {
        let store = match from {
            Provenance::Live => &self.live,
            Provenance::Legacy => &self.legacy,
        };
        let record = store.fetch(id).await?;
        debug!(
            subsystem = "match",
            component = "service",
            op = "patch_for",
            provenance = %from,
            record_id = %id,
            found = record.is_some(),
            "Candidate patch requested"
        );
        Ok(record.as_ref().map(ResolvedPatch::from))
    }

    /// Connectivity snapshot of both stores.
    ///
    /// The sample comes from the legacy registry, falling back to the live store.
    pub async fn health(&self) -> Result<AutofillHealth> {
        let (live, legacy) = tokio::try_join!(self.live.health(), self.legacy.health())?;
        info!(
            subsystem = "match",
            component = "service",
            op = "health",
            database = %legacy.store,
            live_count = live.approximate_count,
            legacy_count = legacy.approximate_count,
            "Store health checked"
        );
        Ok(AutofillHealth {
            success: true,
            database: legacy.store,
            live_count: live.approximate_count,
            legacy_count: legacy.approximate_count,
            sample: legacy.sample.or(live.sample),
        })
    }
}
