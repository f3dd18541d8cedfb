//! Autofill HTTP handlers.
//!
//! `GET /autofill` resolves a partial identity typed into an intake form;
//! `GET /autofill/patch/:from/:id` returns the patch of a candidate the user
//! picked from the disambiguation list.

use axum::{
    extract::{
        rejection::{PathRejection, QueryRejection},
        Path, Query, State,
    },
    Json,
};
use serde::Serialize;
use uuid::Uuid;

use autofill_core::{AutofillResponse, IdentityQuery, Provenance, ResolvedPatch};

use crate::{ApiError, AppState};

/// Body of a successful patch lookup.
#[derive(Debug, Serialize)]
pub struct PatchResponse {
    pub success: bool,
    pub patch: ResolvedPatch,
}

/// Resolve a partial identity.
///
/// # Query Parameters
/// All optional: `chassisNumber`, `engineNumber`, `plateNumber`, `plateCountry`,
/// `plateRegion`, `ownerName`, `nationalId`, `excludeId`. Blank values and
/// "not available" placeholders count as absent; unknown parameters are ignored.
///
/// # Returns
/// - 200 OK with `{ success: true, match, candidates }`
/// - 400 Bad Request if the query string cannot be decoded (e.g. a repeated field)
/// - 500 Internal Server Error if either store fails
pub async fn autofill(
    State(state): State<AppState>,
    query: Result<Query<IdentityQuery>, QueryRejection>,
) -> Result<Json<AutofillResponse>, ApiError> {
    let Query(query) = query.map_err(|rejection| ApiError::BadRequest(rejection.body_text()))?;
    Ok(Json(state.service.autofill(&query).await?))
}

/// Patch of one record from the named store.
///
/// # Path Parameters
/// - `from`: `live` or `legacy`
/// - `id`: record UUID
///
/// # Returns
/// - 200 OK with `{ success: true, patch }`
/// - 400 Bad Request for an unknown store or malformed ID
/// - 404 Not Found if the record does not exist
pub async fn candidate_patch(
    State(state): State<AppState>,
    path: Result<Path<(String, String)>, PathRejection>,
) -> Result<Json<PatchResponse>, ApiError> {
    let Path((from, id)) = path.map_err(|rejection| ApiError::BadRequest(rejection.body_text()))?;
    let from: Provenance = from.parse()?;
    let id = Uuid::parse_str(id.trim())
        .map_err(|_| ApiError::BadRequest(format!("Invalid record id '{}'", id)))?;

    let patch = state
        .service
        .patch_for(from, id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("No {} record {}", from, id)))?;

    Ok(Json(PatchResponse {
        success: true,
        patch,
    }))
}
