//! Core traits for autofill abstractions.
//!
//! Each physical record store implements [`RecordSource`]; the matcher
//! only ever sees this interface plus the provenance tag.

use std::sync::Arc;

use async_trait::async_trait;
use uuid::Uuid;

use crate::clause::AnyOf;
use crate::error::Result;
use crate::models::{IndexedRecord, Provenance, SourceHealth};

/// Read-only query interface over one record store.
#[async_trait]
pub trait RecordSource: Send + Sync {
    /// Which store this is.
    fn provenance(&self) -> Provenance;

    /// Records satisfying any clause of `query`, at most `limit` of them.
    ///
    /// Stores holding editable records must skip `query.exclude_id`.
    /// Failures must surface as errors, never as an empty list.
    async fn find_candidates(&self, query: &AnyOf, limit: usize) -> Result<Vec<IndexedRecord>>;

    /// Fetch one record by ID.
    async fn fetch(&self, id: Uuid) -> Result<Option<IndexedRecord>>;

    /// Store name, approximate size and one sample record.
    async fn health(&self) -> Result<SourceHealth>;
}

#[async_trait]
impl<T: RecordSource + ?Sized> RecordSource for Arc<T> {
    fn provenance(&self) -> Provenance {
        (**self).provenance()
    }

    async fn find_candidates(&self, query: &AnyOf, limit: usize) -> Result<Vec<IndexedRecord>> {
        (**self).find_candidates(query, limit).await
    }

    async fn fetch(&self, id: Uuid) -> Result<Option<IndexedRecord>> {
        (**self).fetch(id).await
    }

    async fn health(&self) -> Result<SourceHealth> {
        (**self).health().await
    }
}
