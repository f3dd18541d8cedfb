//! In-memory [`RecordSource`] for tests and local development.
//!
//! Evaluates [`AnyOf`] lookups with [`MatchClause::matches`](autofill_core::MatchClause::matches)
//! and returns records in insertion order.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

use autofill_core::{
    AnyOf, Error, IndexedRecord, Provenance, RawVehicleFields, RecordSample, RecordSource, Result,
    SourceHealth,
};

/// Vector-backed record store.
///
/// Cloning shares the underlying records.
#[derive(Clone)]
pub struct MemoryRecordStore {
    provenance: Provenance,
    records: Arc<RwLock<Vec<IndexedRecord>>>,
    failure: Option<String>,
    lookups: Arc<AtomicUsize>,
}

impl MemoryRecordStore {
    /// Create an empty store.
    pub fn new(provenance: Provenance) -> Self {
        Self {
            provenance,
            records: Arc::new(RwLock::new(Vec::new())),
            failure: None,
            lookups: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// A store whose every operation fails with [`Error::Store`].
    pub fn failing(provenance: Provenance, message: impl Into<String>) -> Self {
        Self {
            failure: Some(message.into()),
            ..Self::new(provenance)
        }
    }

    /// Insert raw fields, deriving keys the same way the SQL stores do.
    pub async fn insert(&self, raw: RawVehicleFields) -> Uuid {
        let id = Uuid::now_v7();
        self.insert_record(IndexedRecord::with_derived_keys(id, self.provenance, raw))
            .await;
        id
    }

    /// Insert a fully built record as-is; stored keys are not recomputed.
    pub async fn insert_record(&self, mut record: IndexedRecord) {
        record.provenance = self.provenance;
        self.records.write().await.push(record);
    }

    /// Number of `find_candidates` calls served so far.
    pub fn lookup_count(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }

    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }

    fn check_failure(&self) -> Result<()> {
        match &self.failure {
            Some(message) => Err(Error::Store(format!("{}: {}", self.provenance, message))),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl RecordSource for MemoryRecordStore {
    fn provenance(&self) -> Provenance {
        self.provenance
    }

    async fn find_candidates(&self, query: &AnyOf, limit: usize) -> Result<Vec<IndexedRecord>> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        self.check_failure()?;

        // exclude_id only ever names a live record
        let exclude = match self.provenance {
            Provenance::Live => query.exclude_id,
            Provenance::Legacy => None,
        };

        let records = self.records.read().await;
        let found: Vec<IndexedRecord> = records
            .iter()
            .filter(|record| Some(record.id) != exclude)
            .filter(|record| query.matches(record))
            .take(limit)
            .cloned()
            .collect();

        debug!(
            subsystem = "db",
            component = "memory_store",
            op = "find_candidates",
            provenance = %self.provenance,
            clause_count = query.clauses.len(),
            limit,
            result_count = found.len(),
            "Memory candidates fetched"
        );
        Ok(found)
    }

    async fn fetch(&self, id: Uuid) -> Result<Option<IndexedRecord>> {
        self.check_failure()?;
        let records = self.records.read().await;
        Ok(records.iter().find(|record| record.id == id).cloned())
    }

    async fn health(&self) -> Result<SourceHealth> {
        self.check_failure()?;
        let records = self.records.read().await;
        Ok(SourceHealth {
            store: "memory".to_string(),
            provenance: self.provenance,
            approximate_count: records.len() as i64,
            sample: records.first().map(RecordSample::from),
        })
    }
}
