//! Liveness and store diagnostics.

use axum::{extract::State, response::IntoResponse, Json};

use autofill_core::AutofillHealth;

use crate::{ApiError, AppState};

/// Process liveness; does not touch the stores.
pub async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// Store connectivity, approximate record counts and one sample record.
///
/// # Returns
/// - 200 OK with `{ success, database, liveCount, legacyCount, sample }`
/// - 500 Internal Server Error if either store fails
pub async fn autofill_health(
    State(state): State<AppState>,
) -> Result<Json<AutofillHealth>, ApiError> {
    Ok(Json(state.service.health().await?))
}
