//! Live vehicle store (`vehicle` table).
//!
//! Operational records created and edited through the intake forms. This is
//! the only store where `exclude_id` applies.

use std::time::Duration;

use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::{Pool, Postgres, Row};
use uuid::Uuid;

use autofill_core::defaults::QUERY_TIMEOUT_MS;
use autofill_core::{
    AnyOf, Error, IndexedRecord, Provenance, RawVehicleFields, RecordSource, Result, SourceHealth,
};

use crate::any_of::StoreColumns;
use crate::records::{keys_from_row, text_column};
use crate::table::RecordTable;

/// Column layout of the `vehicle` table.
pub const LIVE_COLUMNS: StoreColumns = StoreColumns {
    table: "vehicle",
    chassis_number: "chassis_number",
    engine_number: "engine_number",
    plate_number: "plate_number",
    plate_country: Some("plate_country"),
    national_id: "national_id",
    owner_name: "owner_name",
    chassis_key: "chassis_key",
    engine_key: "engine_key",
    plate_key: "plate_key",
    plate_number_key: "plate_number_key",
    owner_name_key: "owner_name_key",
};

pub(crate) const LIVE_TABLE: RecordTable = RecordTable {
    columns: &LIVE_COLUMNS,
    provenance: Provenance::Live,
    component: "live_store",
    select_list: "id, owner_name, national_id, phone_number, address, \
                  plate_number, plate_country, plate_region, chassis_number, engine_number, \
                  brand, model, manufacture_year, color, fuel_type, engine_capacity, \
                  plate_key, plate_number_key, chassis_key, engine_key, owner_name_key",
    order_by: "updated_at_utc DESC, id",
    honours_exclude: true,
    sample_filter: "TRUE",
    map_row,
};

/// PostgreSQL implementation of the live vehicle [`RecordSource`].
#[derive(Clone)]
pub struct PgLiveVehicleStore {
    pool: Pool<Postgres>,
    query_timeout: Duration,
}

impl PgLiveVehicleStore {
    /// Create a store with the default query budget.
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self {
            pool,
            query_timeout: Duration::from_millis(QUERY_TIMEOUT_MS),
        }
    }

    /// Override the per-query budget.
    pub fn with_query_timeout(mut self, timeout: Duration) -> Self {
        self.query_timeout = timeout;
        self
    }

    /// Recompute keys for rows whose key columns were never filled.
    ///
    /// Raw fields are left untouched. Returns the number of rows updated.
    pub async fn backfill_keys(&self, batch_size: i64) -> Result<u64> {
        LIVE_TABLE.backfill_keys(&self.pool, batch_size).await
    }
}

fn map_row(row: &PgRow) -> Result<IndexedRecord> {
    let raw = RawVehicleFields {
        owner_name: text_column(row, "owner_name"),
        national_id: text_column(row, "national_id"),
        phone_number: text_column(row, "phone_number"),
        address: text_column(row, "address"),
        plate_number: text_column(row, "plate_number"),
        plate_country: text_column(row, "plate_country"),
        plate_region: text_column(row, "plate_region"),
        chassis_number: text_column(row, "chassis_number"),
        engine_number: text_column(row, "engine_number"),
        brand: text_column(row, "brand"),
        model: text_column(row, "model"),
        year: row
            .try_get::<Option<i32>, _>("manufacture_year")
            .ok()
            .flatten()
            .map(|y| y.to_string()),
        color: text_column(row, "color"),
        fuel_type: text_column(row, "fuel_type"),
        engine_capacity: text_column(row, "engine_capacity"),
    };
    Ok(IndexedRecord {
        id: row.try_get("id").map_err(Error::Database)?,
        provenance: Provenance::Live,
        raw,
        keys: keys_from_row(row),
    })
}

#[async_trait]
impl RecordSource for PgLiveVehicleStore {
    fn provenance(&self) -> Provenance {
        Provenance::Live
    }

    async fn find_candidates(&self, query: &AnyOf, limit: usize) -> Result<Vec<IndexedRecord>> {
        LIVE_TABLE
            .find_candidates(&self.pool, self.query_timeout, query, limit)
            .await
    }

    async fn fetch(&self, id: Uuid) -> Result<Option<IndexedRecord>> {
        LIVE_TABLE.fetch(&self.pool, self.query_timeout, id).await
    }

    async fn health(&self) -> Result<SourceHealth> {
        LIVE_TABLE.health(&self.pool, self.query_timeout).await
    }
}
