//! Query plumbing shared by the PostgreSQL record stores.
//!
//! Each store describes its table with a [`RecordTable`]; lookups, health
//! probes and key backfill all run through the same code so the two stores
//! cannot drift apart.

use std::time::{Duration, Instant};

use sqlx::postgres::PgRow;
use sqlx::{Pool, Postgres};
use tracing::{debug, info};
use uuid::Uuid;

use autofill_core::{
    AnyOf, Error, IndexedRecord, Provenance, RecordKeys, RecordSample, Result, SourceHealth,
};

use crate::any_of::{bind_params, AnyOfQueryBuilder, QueryParam, StoreColumns};
use crate::timeout::within_budget;

/// Static description of one record table.
pub(crate) struct RecordTable {
    pub columns: &'static StoreColumns,
    pub provenance: Provenance,
    /// Log component name.
    pub component: &'static str,
    pub select_list: &'static str,
    /// Retrieval order; also the tie-break order seen by the resolver.
    pub order_by: &'static str,
    /// Whether `AnyOf::exclude_id` applies to this table.
    pub honours_exclude: bool,
    /// Predicate picking the health-check sample row.
    pub sample_filter: &'static str,
    pub map_row: fn(&PgRow) -> Result<IndexedRecord>,
}

/// Bind value for `LIMIT`; saturates instead of wrapping negative.
pub(crate) fn limit_param(limit: usize) -> QueryParam {
    QueryParam::Int(i64::try_from(limit).unwrap_or(i64::MAX))
}

impl RecordTable {
    /// SQL and parameters of a candidate lookup.
    pub(crate) fn candidate_query(&self, query: &AnyOf, limit: usize) -> (String, Vec<QueryParam>) {
        let (predicate, mut params) = AnyOfQueryBuilder::new(self.columns, 0).build(query);
        let mut sql = format!(
            "SELECT {} FROM {} WHERE {}",
            self.select_list, self.columns.table, predicate
        );
        if let Some(exclude) = query.exclude_id.filter(|_| self.honours_exclude) {
            params.push(QueryParam::Uuid(exclude));
            sql.push_str(&format!(" AND id <> ${}", params.len()));
        }
        params.push(limit_param(limit));
        sql.push_str(&format!(" ORDER BY {} LIMIT ${}", self.order_by, params.len()));
        (sql, params)
    }

    pub(crate) async fn find_candidates(
        &self,
        pool: &Pool<Postgres>,
        budget: Duration,
        query: &AnyOf,
        limit: usize,
    ) -> Result<Vec<IndexedRecord>> {
        if query.is_empty() || limit == 0 {
            return Ok(Vec::new());
        }
        let start = Instant::now();
        let (sql, params) = self.candidate_query(query, limit);

        let rows = within_budget(self.provenance, "find_candidates", budget, async {
            bind_params(sqlx::query(&sql), &params)
                .fetch_all(pool)
                .await
                .map_err(Error::Database)
        })
        .await?;
        let records = rows.iter().map(self.map_row).collect::<Result<Vec<_>>>()?;

        debug!(
            subsystem = "db",
            component = self.component,
            op = "find_candidates",
            db_table = self.columns.table,
            clause_count = query.clauses.len(),
            limit,
            result_count = records.len(),
            duration_ms = start.elapsed().as_millis() as u64,
            "Candidates fetched"
        );
        Ok(records)
    }

    pub(crate) async fn fetch(
        &self,
        pool: &Pool<Postgres>,
        budget: Duration,
        id: Uuid,
    ) -> Result<Option<IndexedRecord>> {
        let sql = format!(
            "SELECT {} FROM {} WHERE id = $1",
            self.select_list, self.columns.table
        );
        let row = within_budget(self.provenance, "fetch", budget, async {
            sqlx::query(&sql)
                .bind(id)
                .fetch_optional(pool)
                .await
                .map_err(Error::Database)
        })
        .await?;
        row.as_ref().map(self.map_row).transpose()
    }

    pub(crate) async fn health(&self, pool: &Pool<Postgres>, budget: Duration) -> Result<SourceHealth> {
        let sample_sql = format!(
            "SELECT {} FROM {} WHERE {} ORDER BY {} LIMIT 1",
            self.select_list, self.columns.table, self.sample_filter, self.order_by
        );
        // planner estimate; exact COUNT(*) is too slow on the full registry
        let count_sql = format!(
            "SELECT GREATEST(reltuples, 0)::bigint FROM pg_class WHERE oid = '{}'::regclass",
            self.columns.table
        );
        within_budget(self.provenance, "health", budget, async {
            let store: String = sqlx::query_scalar("SELECT current_database()")
                .fetch_one(pool)
                .await
                .map_err(Error::Database)?;
            let approximate_count: i64 = sqlx::query_scalar(&count_sql)
                .fetch_one(pool)
                .await
                .map_err(Error::Database)?;
            let sample = sqlx::query(&sample_sql)
                .fetch_optional(pool)
                .await
                .map_err(Error::Database)?;
            let sample = sample.as_ref().map(self.map_row).transpose()?;

            Ok(SourceHealth {
                store,
                provenance: self.provenance,
                approximate_count,
                sample: sample.as_ref().map(RecordSample::from),
            })
        })
        .await
    }

    /// Recompute keys for rows whose key columns were never filled.
    ///
    /// Raw fields are left untouched. Returns the number of rows updated.
    pub(crate) async fn backfill_keys(&self, pool: &Pool<Postgres>, batch_size: i64) -> Result<u64> {
        let start = Instant::now();
        let batch_size = batch_size.max(1);
        let c = self.columns;
        let select_sql = format!(
            "SELECT {} FROM {}
             WHERE {} IS NULL OR {} IS NULL OR {} IS NULL OR {} IS NULL OR {} IS NULL
             LIMIT $1",
            self.select_list,
            c.table,
            c.plate_key,
            c.plate_number_key,
            c.chassis_key,
            c.engine_key,
            c.owner_name_key
        );
        let update_sql = format!(
            "UPDATE {} SET {} = $2, {} = $3, {} = $4, {} = $5, {} = $6 WHERE id = $1",
            c.table, c.plate_key, c.plate_number_key, c.chassis_key, c.engine_key, c.owner_name_key
        );
        let mut updated = 0u64;

        loop {
            let rows = sqlx::query(&select_sql)
                .bind(batch_size)
                .fetch_all(pool)
                .await
                .map_err(Error::Database)?;

            let fetched = rows.len();
            let mut tx = pool.begin().await.map_err(Error::Database)?;
            for row in &rows {
                let record = (self.map_row)(row)?;
                let keys = RecordKeys::derive(&record.raw);
                sqlx::query(&update_sql)
                    .bind(record.id)
                    .bind(&keys.plate_key)
                    .bind(&keys.plate_number_key)
                    .bind(&keys.chassis_key)
                    .bind(&keys.engine_key)
                    .bind(&keys.owner_name_key)
                    .execute(&mut *tx)
                    .await
                    .map_err(Error::Database)?;
            }
            tx.commit().await.map_err(Error::Database)?;
            updated += fetched as u64;

            if (fetched as i64) < batch_size {
                break;
            }
        }

        info!(
            subsystem = "db",
            component = self.component,
            op = "backfill_keys",
            db_table = c.table,
            result_count = updated,
            duration_ms = start.elapsed().as_millis() as u64,
            "Key backfill complete"
        );
        Ok(updated)
    }
}
