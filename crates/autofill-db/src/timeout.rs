//! Query budget enforcement at the store boundary.

use std::future::Future;
use std::time::Duration;

use tracing::warn;

use autofill_core::{Error, Provenance, Result};

/// Await `fut`, failing with [`Error::Timeout`] once `budget` elapses.
///
/// A timeout is an error like any other store failure; it must never be
/// mistaken for "no matching record".
pub async fn within_budget<T, F>(source: Provenance, op: &str, budget: Duration, fut: F) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    match tokio::time::timeout(budget, fut).await {
        Ok(result) => result,
        Err(_) => {
            let after_ms = budget.as_millis() as u64;
            warn!(
                subsystem = "db",
                component = "timeout",
                op,
                provenance = %source,
                duration_ms = after_ms,
                "Record store query exceeded its budget"
            );
            Err(Error::Timeout {
                source_name: source.to_string(),
                after_ms,
            })
        }
    }
}
