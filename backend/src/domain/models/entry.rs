//! Domain model for a logged nutrition entry.
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Canonical date format for ledger entries.
///
/// Dates are stored as plain strings so that rows written by earlier
/// iterations of the tracker (which were not consistent about formats)
/// survive a read unchanged. Everything this backend writes uses this
/// format, and "today" is the local calendar date.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// One logged food event.
///
/// Calories and protein are always present. Fat, fiber and quantity exist
/// only when the estimate schema that produced the entry requested them;
/// downstream aggregation treats a missing macro as zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NutritionEntry {
    /// Calendar date (`YYYY-MM-DD` for rows written by this backend)
    pub date: String,
    pub food: String,
    /// Free-text quantity description
    pub quantity: Option<String>,
    pub calories: f64,
    pub protein: f64,
    pub fat: Option<f64>,
    pub fiber: Option<f64>,
    /// User-reported satiety, ordinal 1-5
    pub satiety: Option<u8>,
}

impl NutritionEntry {
    /// Today's date in the canonical format.
    pub fn today() -> String {
        chrono::Local::now().date_naive().format(DATE_FORMAT).to_string()
    }

    /// Parse this entry's date field, if it is in the canonical format.
    pub fn parsed_date(&self) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(&self.date, DATE_FORMAT).ok()
    }
}

impl From<NutritionEntry> for shared::NutritionEntry {
    fn from(e: NutritionEntry) -> Self {
        shared::NutritionEntry {
            date: e.date,
            food: e.food,
            quantity: e.quantity,
            calories: e.calories,
            protein: e.protein,
            fat: e.fat,
            fiber: e.fiber,
            satiety: e.satiety,
        }
    }
}

impl From<shared::NutritionEntry> for NutritionEntry {
    fn from(e: shared::NutritionEntry) -> Self {
        NutritionEntry {
            date: e.date,
            food: e.food,
            quantity: e.quantity,
            calories: e.calories,
            protein: e.protein,
            fat: e.fat,
            fiber: e.fiber,
            satiety: e.satiety,
        }
    }
}
