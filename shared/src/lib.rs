//! Shared wire types for the nutrition tracker.
//!
//! These are the serde DTOs exchanged between the REST backend and any
//! frontend. Domain logic lives in the backend crate; this crate is types
//! only.

use serde::{Deserialize, Serialize};

/// One logged food event as it appears on the wire and in the ledger.
///
/// Dates are canonical `YYYY-MM-DD` strings. Calories and protein are always
/// present; fat, fiber, quantity and satiety depend on which estimate schema
/// produced the entry and are treated as zero/absent downstream when missing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NutritionEntry {
    /// Calendar date the food was eaten (`YYYY-MM-DD`)
    pub date: String,
    /// Food name as returned by the estimate (or edited by the user)
    pub food: String,
    /// Free-text quantity description, e.g. "1 bowl (approx. 350g)"
    pub quantity: Option<String>,
    pub calories: f64,
    /// Protein in grams
    pub protein: f64,
    /// Fat in grams (absent on the 3-field schema)
    pub fat: Option<f64>,
    /// Fiber in grams (absent on the 3-field schema)
    pub fiber: Option<f64>,
    /// User-reported satiety, ordinal 1-5
    pub satiety: Option<u8>,
}

/// A ledger entry together with its position in the full ledger.
///
/// Positions are indices into the complete ledger (not into a filtered
/// page) and are what the edit/delete endpoints address rows by.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LedgerRow {
    pub position: usize,
    #[serde(flatten)]
    pub entry: NutritionEntry,
}

/// Which comma-separated reply layout the estimation call requests.
///
/// The prompt sent to the model and the parser that decodes the reply are
/// both derived from this, so the two cannot drift apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EstimateSchemaVersion {
    /// Food name, calories, protein
    Basic,
    /// Basic plus fat and fiber
    Macros,
    /// Macros plus a quantity description
    Full,
}

impl Default for EstimateSchemaVersion {
    fn default() -> Self {
        EstimateSchemaVersion::Macros
    }
}

/// Request body for `POST /api/estimate`.
///
/// Exactly one of `text` or `image_base64` must be set. Images are raw bytes
/// base64-encoded by the client, with their MIME type alongside.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EstimateRequest {
    pub text: Option<String>,
    pub image_base64: Option<String>,
    /// MIME type of the uploaded image, defaults to `image/jpeg`
    pub image_mime: Option<String>,
    #[serde(default)]
    pub schema: EstimateSchemaVersion,
}

/// Preview of a parsed estimate, held server-side until confirmed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EstimatePreview {
    pub entry: NutritionEntry,
    /// The verbatim model reply the entry was parsed from
    pub raw_reply: String,
    pub schema: EstimateSchemaVersion,
}

/// Request body for `POST /api/entries/confirm`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ConfirmEntryRequest {
    /// Optional satiety rating (1-5) recorded with the entry
    pub satiety: Option<u8>,
    /// Optional date override (`YYYY-MM-DD`); defaults to today
    pub date: Option<String>,
}

/// Response after committing a pending estimate to the ledger.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfirmEntryResponse {
    pub position: usize,
    pub entry: NutritionEntry,
    /// Refreshed totals for the entry's date
    pub summary: DailySummary,
}

/// Query parameters accepted by `GET /api/entries`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct EntryListRequest {
    /// Restrict to entries whose date equals this (`YYYY-MM-DD`)
    pub date: Option<String>,
    /// Maximum number of rows to return, most recent first in the ledger
    pub limit: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntryListResponse {
    pub rows: Vec<LedgerRow>,
    /// Total ledger length before filtering/limiting
    pub ledger_len: usize,
}

/// Summed nutrition for a single date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailySummary {
    pub date: String,
    pub calories: f64,
    pub protein: f64,
    pub fat: f64,
    pub fiber: f64,
    pub entry_count: usize,
}

/// Calorie total for one date in the weekly view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayCalories {
    pub date: String,
    pub calories: f64,
}

/// The most recent (up to) 7 distinct dates present in the ledger, newest
/// first, each with its calorie sum. Not a fixed trailing calendar window:
/// sparse ledgers surface older dates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeeklySummary {
    pub days: Vec<DayCalories>,
}

/// Biological sex used by the BMR formula.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sex {
    Male,
    Female,
}

/// Singleton body-metric profile the daily targets are derived from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub sex: Sex,
    pub weight_kg: f64,
    pub height_cm: f64,
    pub age_years: u32,
    pub daily_step_goal: u32,
}

/// Daily calorie/macro goals computed from the profile. Derived per request,
/// never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyTargets {
    /// Mifflin-St Jeor basal metabolic rate, unrounded
    pub bmr: f64,
    /// Total daily energy expenditure (bmr * 1.2, floored)
    pub tdee: i64,
    /// tdee plus the step bonus
    pub calorie_target: i64,
    pub protein_g: i64,
    pub fat_g: i64,
    pub fiber_g: i64,
}

/// Response for the profile endpoints: the stored profile plus the targets
/// it implies.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileResponse {
    pub profile: UserProfile,
    pub targets: DailyTargets,
}
