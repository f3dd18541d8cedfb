//! Legacy registry store (`legacy_vehicle` table).
//!
//! Rows come from the bulk spreadsheet import and keep the import's column
//! naming. The registry is read-only here and has no raw plate country,
//! only a plate region.

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

/// Column layout of the `legacy_vehicle` table.
pub const LEGACY_COLUMNS: StoreColumns = StoreColumns {
    table: "legacy_vehicle",
    chassis_number: "chassis_no",
    engine_number: "engine_no",
    plate_number: "plate_no",
    plate_country: None,
    national_id: "owner_national_no",
    owner_name: "owner_full_name",
    chassis_key: "chassis_key",
    engine_key: "engine_key",
    plate_key: "plate_key",
    plate_number_key: "plate_number_key",
    owner_name_key: "owner_name_key",
};

// exclude_id targets live records only
pub(crate) const LEGACY_TABLE: RecordTable = RecordTable {
    columns: &LEGACY_COLUMNS,
    provenance: Provenance::Legacy,
    component: "legacy_store",
    select_list: "id, owner_full_name, owner_national_no, phone, address, \
                  plate_no, plate_region, chassis_no, engine_no, \
                  make, model, year, color, fuel, engine_cc, \
                  plate_key, plate_number_key, chassis_key, engine_key, owner_name_key",
    order_by: "imported_at_utc DESC, id",
    honours_exclude: false,
    sample_filter: "chassis_no IS NOT NULL OR plate_no IS NOT NULL",
    map_row,
};

/// PostgreSQL implementation of the legacy registry [`RecordSource`].
#[derive(Clone)]
pub struct PgLegacyRegistryStore {
    pool: Pool<Postgres>,
    query_timeout: Duration,
}

impl PgLegacyRegistryStore {
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

    /// Fill key columns for imported rows that arrived without them.
    pub async fn backfill_keys(&self, batch_size: i64) -> Result<u64> {
        LEGACY_TABLE.backfill_keys(&self.pool, batch_size).await
    }
}

fn map_row(row: &PgRow) -> Result<IndexedRecord> {
    let raw = RawVehicleFields {
        owner_name: text_column(row, "owner_full_name"),
        national_id: text_column(row, "owner_national_no"),
        phone_number: text_column(row, "phone"),
        address: text_column(row, "address"),
        plate_number: text_column(row, "plate_no"),
        plate_country: None,
        plate_region: text_column(row, "plate_region"),
        chassis_number: text_column(row, "chassis_no"),
        engine_number: text_column(row, "engine_no"),
        brand: text_column(row, "make"),
        model: text_column(row, "model"),
        year: text_column(row, "year"),
        color: text_column(row, "color"),
        fuel_type: text_column(row, "fuel"),
        engine_capacity: text_column(row, "engine_cc"),
    };
    Ok(IndexedRecord {
        id: row.try_get("id").map_err(Error::Database)?,
        provenance: Provenance::Legacy,
        raw,
        keys: keys_from_row(row),
    })
}

#[async_trait]
impl RecordSource for PgLegacyRegistryStore {
    fn provenance(&self) -> Provenance {
        Provenance::Legacy
    }

    async fn find_candidates(&self, query: &AnyOf, limit: usize) -> Result<Vec<IndexedRecord>> {
        LEGACY_TABLE
            .find_candidates(&self.pool, self.query_timeout, query, limit)
            .await
    }

    async fn fetch(&self, id: Uuid) -> Result<Option<IndexedRecord>> {
        LEGACY_TABLE.fetch(&self.pool, self.query_timeout, id).await
    }

    async fn health(&self) -> Result<SourceHealth> {
        LEGACY_TABLE.health(&self.pool, self.query_timeout).await
    }
}
