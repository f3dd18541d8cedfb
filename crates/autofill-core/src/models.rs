//! Domain types shared by the record stores, the matcher and the HTTP layer.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::Error;
use crate::normalize::{
    clean_input, normalize_key, normalize_owner_name, normalize_plate_key,
};

// =============================================================================
// QUERY
// =============================================================================

/// Partial identity typed into an intake form.
///
/// Every field is optional. Deserializes directly from the `/autofill`
/// query string; unknown parameters are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct IdentityQuery {
    pub plate_number: Option<String>,
    pub plate_country: Option<String>,
    pub plate_region: Option<String>,
    pub chassis_number: Option<String>,
    pub engine_number: Option<String>,
    pub national_id: Option<String>,
    pub owner_name: Option<String>,
    /// ID of the live record being edited; never returned as a candidate.
    pub exclude_id: Option<String>,
}

impl IdentityQuery {
    /// Trim every field and drop blanks and "not available" placeholders.
    pub fn sanitized(&self) -> Self {
        Self {
            plate_number: clean_input(self.plate_number.as_deref()),
            plate_country: clean_input(self.plate_country.as_deref()),
            plate_region: clean_input(self.plate_region.as_deref()),
            chassis_number: clean_input(self.chassis_number.as_deref()),
            engine_number: clean_input(self.engine_number.as_deref()),
            national_id: clean_input(self.national_id.as_deref()),
            owner_name: clean_input(self.owner_name.as_deref()),
            exclude_id: clean_input(self.exclude_id.as_deref()),
        }
    }

    /// Region if given, otherwise country. Qualifies the plate key.
    pub fn plate_qualifier(&self) -> Option<&str> {
        self.plate_region
            .as_deref()
            .or(self.plate_country.as_deref())
    }

    /// True when no identifying field carries a value.
    ///
    /// `exclude_id` and a bare region/country do not identify anything.
    pub fn is_empty(&self) -> bool {
        self.present_fields().is_empty()
    }

    /// Names of identifying fields that carry a value, for logging.
    pub fn present_fields(&self) -> Vec<&'static str> {
        let mut fields = Vec::new();
        if self.chassis_number.is_some() {
            fields.push("chassisNumber");
        }
        if self.engine_number.is_some() {
            fields.push("engineNumber");
        }
        if self.plate_number.is_some() {
            fields.push("plateNumber");
        }
        if self.national_id.is_some() {
            fields.push("nationalId");
        }
        if self.owner_name.is_some() {
            fields.push("ownerName");
        }
        fields
    }

    /// Parsed `exclude_id`; values that are not UUIDs exclude nothing.
    pub fn exclude_uuid(&self) -> Option<Uuid> {
        self.exclude_id
            .as_deref()
            .and_then(|id| Uuid::parse_str(id.trim()).ok())
    }
}

// =============================================================================
// STORED RECORDS
// =============================================================================

/// Which physical store a record came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provenance {
    /// Operational vehicle table.
    Live,
    /// Bulk-imported historical registry.
    Legacy,
}

impl Provenance {
    pub fn as_str(&self) -> &'static str {
        match self {
            Provenance::Live => "live",
            Provenance::Legacy => "legacy",
        }
    }
}

impl std::fmt::Display for Provenance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Provenance {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "live" => Ok(Provenance::Live),
            "legacy" => Ok(Provenance::Legacy),
            other => Err(Error::InvalidInput(format!(
                "Unknown record source '{}': expected 'live' or 'legacy'",
                other
            ))),
        }
    }
}

/// Raw identity and descriptive fields as stored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawVehicleFields {
    pub owner_name: Option<String>,
    pub national_id: Option<String>,
    pub phone_number: Option<String>,
    pub address: Option<String>,
    pub plate_number: Option<String>,
    pub plate_country: Option<String>,
    pub plate_region: Option<String>,
    pub chassis_number: Option<String>,
    pub engine_number: Option<String>,
    pub brand: Option<String>,
    pub model: Option<String>,
    pub year: Option<String>,
    pub color: Option<String>,
    pub fuel_type: Option<String>,
    pub engine_capacity: Option<String>,
}

impl RawVehicleFields {
    /// Region if stored, otherwise country.
    pub fn plate_qualifier(&self) -> Option<&str> {
        non_blank(self.plate_region.as_deref()).or(non_blank(self.plate_country.as_deref()))
    }
}

/// Precomputed comparison keys stored alongside each record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordKeys {
    /// `REGION|PLATE`, empty when the record has no plate or no region/country.
    pub plate_key: String,
    pub plate_number_key: String,
    pub chassis_key: String,
    pub engine_key: String,
    pub owner_name_key: String,
}

impl RecordKeys {
    /// Derive keys from raw fields. This is the write-time rule every store must follow.
    pub fn derive(raw: &RawVehicleFields) -> Self {
        let plate = non_blank(raw.plate_number.as_deref());
        let plate_key = match (raw.plate_qualifier(), plate) {
            (Some(region), Some(plate)) => normalize_plate_key(region, plate),
            _ => String::new(),
        };
        Self {
            plate_key,
            plate_number_key: plate.map(normalize_key).unwrap_or_default(),
            chassis_key: raw
                .chassis_number
                .as_deref()
                .map(normalize_key)
                .unwrap_or_default(),
            engine_key: raw
                .engine_number
                .as_deref()
                .map(normalize_key)
                .unwrap_or_default(),
            owner_name_key: raw
                .owner_name
                .as_deref()
                .map(normalize_owner_name)
                .unwrap_or_default(),
        }
    }
}

/// A stored vehicle/registry row as seen by the matcher. Read-only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexedRecord {
    pub id: Uuid,
    pub provenance: Provenance,
    #[serde(flatten)]
    pub raw: RawVehicleFields,
    pub keys: RecordKeys,
}

impl IndexedRecord {
    /// Build a record whose keys are derived from its raw fields.
    pub fn with_derived_keys(id: Uuid, provenance: Provenance, raw: RawVehicleFields) -> Self {
        let keys = RecordKeys::derive(&raw);
        Self {
            id,
            provenance,
            raw,
            keys,
        }
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

// =============================================================================
// MATCH RESULTS
// =============================================================================

/// A retrieved record with its confidence score. Lives for one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub record: IndexedRecord,
    pub score: u32,
}

impl Candidate {
    pub fn provenance(&self) -> Provenance {
        self.record.provenance
    }
}

/// Flat set of values proposed to prefill a form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedPatch {
    pub owner_name: String,
    pub national_id: String,
    pub phone_number: String,
    pub address: String,
    pub plate_number: String,
    pub plate_country: String,
    pub plate_region: String,
    pub chassis_number: String,
    pub engine_number: String,
    pub brand: String,
    pub model: String,
    pub year: String,
    pub color: String,
    pub fuel_type: String,
    pub engine_capacity: String,
}

impl From<&IndexedRecord> for ResolvedPatch {
    fn from(record: &IndexedRecord) -> Self {
        let raw = &record.raw;
        let take = |v: &Option<String>| v.clone().unwrap_or_default();
        Self {
            owner_name: take(&raw.owner_name),
            national_id: take(&raw.national_id),
            phone_number: take(&raw.phone_number),
            address: take(&raw.address),
            plate_number: take(&raw.plate_number),
            plate_country: take(&raw.plate_country),
            plate_region: take(&raw.plate_region),
            chassis_number: take(&raw.chassis_number),
            engine_number: take(&raw.engine_number),
            brand: take(&raw.brand),
            model: take(&raw.model),
            year: take(&raw.year),
            color: take(&raw.color),
            fuel_type: take(&raw.fuel_type),
            engine_capacity: take(&raw.engine_capacity),
        }
    }
}

/// Short summary shown in the disambiguation list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidatePreview {
    pub owner_name: Option<String>,
    pub plate_number: Option<String>,
    pub plate_region: Option<String>,
    pub plate_country: Option<String>,
    pub chassis_number: Option<String>,
    pub engine_number: Option<String>,
    pub national_id: Option<String>,
    pub brand: Option<String>,
    pub model: Option<String>,
    pub year: Option<String>,
}

impl From<&IndexedRecord> for CandidatePreview {
    fn from(record: &IndexedRecord) -> Self {
        let raw = &record.raw;
        Self {
            owner_name: raw.owner_name.clone(),
            plate_number: raw.plate_number.clone(),
            plate_region: raw.plate_region.clone(),
            plate_country: raw.plate_country.clone(),
            chassis_number: raw.chassis_number.clone(),
            engine_number: raw.engine_number.clone(),
            national_id: raw.national_id.clone(),
            brand: raw.brand.clone(),
            model: raw.model.clone(),
            year: raw.year.clone(),
        }
    }
}

/// One entry of the ranked `candidates` list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidateView {
    pub from: Provenance,
    pub score: u32,
    pub preview: CandidatePreview,
    pub patch: ResolvedPatch,
}

impl From<&Candidate> for CandidateView {
    fn from(candidate: &Candidate) -> Self {
        Self {
            from: candidate.provenance(),
            score: candidate.score,
            preview: CandidatePreview::from(&candidate.record),
            patch: ResolvedPatch::from(&candidate.record),
        }
    }
}

/// Body of a successful `/autofill` response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AutofillResponse {
    pub success: bool,
    /// Present only when the best candidate is strong enough to prefill silently.
    #[serde(rename = "match")]
    pub matched: Option<ResolvedPatch>,
    pub candidates: Vec<CandidateView>,
}

impl AutofillResponse {
    /// The response for absent or useless input.
    pub fn empty() -> Self {
        Self {
            success: true,
            matched: None,
            candidates: Vec::new(),
        }
    }
}

// =============================================================================
// DIAGNOSTICS
// =============================================================================

/// Key fields of one stored record, for operational verification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordSample {
    pub id: Uuid,
    pub plate_number: Option<String>,
    pub plate_key: String,
    pub chassis_number: Option<String>,
    pub chassis_key: String,
    pub engine_number: Option<String>,
    pub engine_key: String,
    pub owner_name: Option<String>,
    pub owner_name_key: String,
}

impl From<&IndexedRecord> for RecordSample {
    fn from(record: &IndexedRecord) -> Self {
        Self {
            id: record.id,
            plate_number: record.raw.plate_number.clone(),
            plate_key: record.keys.plate_key.clone(),
            chassis_number: record.raw.chassis_number.clone(),
            chassis_key: record.keys.chassis_key.clone(),
            engine_number: record.raw.engine_number.clone(),
            engine_key: record.keys.engine_key.clone(),
            owner_name: record.raw.owner_name.clone(),
            owner_name_key: record.keys.owner_name_key.clone(),
        }
    }
}

/// Connectivity snapshot of one record store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceHealth {
    /// Backing store name (database name, or "memory").
    pub store: String,
    pub provenance: Provenance,
    /// Approximate row count; may lag behind the true count.
    pub approximate_count: i64,
    pub sample: Option<RecordSample>,
}

/// Body of `/autofill/health`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AutofillHealth {
    pub success: bool,
    pub database: String,
    pub live_count: i64,
    pub legacy_count: i64,
    pub sample: Option<RecordSample>,
}
