//! SQL translation of store-agnostic [`AnyOf`] lookups.
//!
//! The live and legacy tables name their columns differently, so each store
//! describes its layout with a [`StoreColumns`] and shares this builder.

use autofill_core::{AnyOf, MatchClause};
use uuid::Uuid;

/// Type-safe parameter binding for SQL queries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryParam {
    /// Text parameter.
    String(String),
    /// UUID parameter.
    Uuid(Uuid),
    /// 64-bit integer parameter.
    Int(i64),
}

/// Physical column names of one record table.
#[derive(Debug, Clone, Copy)]
pub struct StoreColumns {
    pub table: &'static str,
    pub chassis_number: &'static str,
    pub engine_number: &'static str,
    pub plate_number: &'static str,
    /// `None` when the table has no raw plate country.
    pub plate_country: Option<&'static str>,
    pub national_id: &'static str,
    pub owner_name: &'static str,
    pub chassis_key: &'static str,
    pub engine_key: &'static str,
    pub plate_key: &'static str,
    pub plate_number_key: &'static str,
    pub owner_name_key: &'static str,
}

/// Generates the `WHERE` fragment for an [`AnyOf`] lookup.
///
/// # Example
///
/// ```rust,ignore
/// let builder = AnyOfQueryBuilder::new(&LIVE_COLUMNS, 0);
/// let (sql, params) = builder.build(&any_of);
/// // sql: "(chassis_key = $1 OR chassis_number = $2)"
/// ```
pub struct AnyOfQueryBuilder<'a> {
    columns: &'a StoreColumns,
    param_offset: usize,
}

impl<'a> AnyOfQueryBuilder<'a> {
    /// Create a builder; `param_offset` is the number of parameters already bound.
    pub fn new(columns: &'a StoreColumns, param_offset: usize) -> Self {
        Self {
            columns,
            param_offset,
        }
    }

    /// Build the disjunction.
    ///
    /// Returns `("FALSE", [])` when no clause applies to this table.
    pub fn build(&self, query: &AnyOf) -> (String, Vec<QueryParam>) {
        let mut disjuncts = Vec::new();
        let mut params = Vec::new();
        let mut param_idx = self.param_offset;
        let c = self.columns;

        for clause in &query.clauses {
            let (column, value) = match clause {
                MatchClause::ChassisKey(v) => (c.chassis_key, v),
                MatchClause::ChassisRaw(v) => (c.chassis_number, v),
                MatchClause::EngineKey(v) => (c.engine_key, v),
                MatchClause::EngineRaw(v) => (c.engine_number, v),
                MatchClause::PlateNumberKey(v) => (c.plate_number_key, v),
                MatchClause::PlateNumberRaw(v) => (c.plate_number, v),
                MatchClause::PlateKey(v) => (c.plate_key, v),
                MatchClause::NationalId(v) => (c.national_id, v),
                MatchClause::OwnerNameKey(v) => (c.owner_name_key, v),
                MatchClause::OwnerNameRaw(v) => (c.owner_name, v),
                MatchClause::PlateAndCountry { plate, country } => {
                    let Some(country_column) = c.plate_country else {
                        continue;
                    };
                    disjuncts.push(format!(
                        "({} = ${} AND {} = ${})",
                        c.plate_number,
                        param_idx + 1,
                        country_column,
                        param_idx + 2
                    ));
                    param_idx += 2;
                    params.push(QueryParam::String(plate.clone()));
                    params.push(QueryParam::String(country.clone()));
                    continue;
                }
            };
            param_idx += 1;
            disjuncts.push(format!("{} = ${}", column, param_idx));
            params.push(QueryParam::String(value.clone()));
        }

        if disjuncts.is_empty() {
            return ("FALSE".to_string(), vec![]);
        }

        (format!("({})", disjuncts.join(" OR ")), params)
    }
}

/// Bind a slice of [`QueryParam`]s onto a query in order.
pub fn bind_params<'q>(
    mut q: sqlx::query::Query<'q, sqlx::Postgres, sqlx::postgres::PgArguments>,
    params: &'q [QueryParam],
) -> sqlx::query::Query<'q, sqlx::Postgres, sqlx::postgres::PgArguments> {
    for param in params {
        q = match param {
            QueryParam::String(s) => q.bind(s),
            QueryParam::Uuid(id) => q.bind(id),
            QueryParam::Int(n) => q.bind(n),
        };
    }
    q
}
