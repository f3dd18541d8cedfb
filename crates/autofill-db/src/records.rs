//! Lenient column readers shared by the PostgreSQL stores.
//!
//! A missing or mistyped column yields `None`/empty for that field instead
//! of failing the whole lookup.

use sqlx::postgres::PgRow;
use sqlx::Row;

use autofill_core::{clean_input, RecordKeys};

/// Stored text as the matcher sees it: trimmed, blanks and placeholders absent.
pub(crate) fn stored_text(value: Option<String>) -> Option<String> {
    clean_input(value.as_deref())
}

/// Nullable text column, read through [`stored_text`].
pub(crate) fn text_column(row: &PgRow, column: &str) -> Option<String> {
    stored_text(row.try_get::<Option<String>, _>(column).ok().flatten())
}

/// Key column; NULL (not yet backfilled) reads as the empty key.
pub(crate) fn key_column(row: &PgRow, column: &str) -> String {
    row.try_get::<Option<String>, _>(column)
        .ok()
        .flatten()
        .unwrap_or_default()
}

/// The five key columns, which both tables name the same way.
pub(crate) fn keys_from_row(row: &PgRow) -> RecordKeys {
    RecordKeys {
        plate_key: key_column(row, "plate_key"),
        plate_number_key: key_column(row, "plate_number_key"),
        chassis_key: key_column(row, "chassis_key"),
        engine_key: key_column(row, "engine_key"),
        owner_name_key: key_column(row, "owner_name_key"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stored_text_drops_blanks_and_placeholders() {
        assert_eq!(stored_text(None), None);
        assert_eq!(stored_text(Some("   ".to_string())), None);
        assert_eq!(stored_text(Some("لا يوجد".to_string())), None);
        assert_eq!(stored_text(Some(" لايوجد ".to_string())), None);
    }

    #[test]
    fn test_stored_text_keeps_real_values_trimmed() {
        assert_eq!(stored_text(Some(" Kia ".to_string())), Some("Kia".to_string()));
        assert_eq!(
            stored_text(Some("أحمد العلي".to_string())),
            Some("أحمد العلي".to_string())
        );
    }
}
