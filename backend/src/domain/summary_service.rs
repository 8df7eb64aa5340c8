//! Daily and weekly aggregation over the ledger.

use chrono::NaiveDate;
use log::warn;
use std::collections::BTreeMap;

use crate::domain::models::entry::{NutritionEntry, DATE_FORMAT};

/// Summed nutrition for one date.
#[derive(Debug, Clone, PartialEq)]
pub struct DailySummary {
    pub date: String,
    pub calories: f64,
    pub protein: f64,
    pub fat: f64,
    pub fiber: f64,
    pub entry_count: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DayCalories {
    pub date: String,
    pub calories: f64,
}

impl From<DailySummary> for shared::DailySummary {
    fn from(s: DailySummary) -> Self {
        shared::DailySummary {
            date: s.date,
            calories: s.calories,
            protein: s.protein,
            fat: s.fat,
            fiber: s.fiber,
            entry_count: s.entry_count,
        }
    }
}

impl From<DayCalories> for shared::DayCalories {
    fn from(d: DayCalories) -> Self {
        shared::DayCalories { date: d.date, calories: d.calories }
    }
}

#[derive(Debug, Clone, Default)]
pub struct SummaryService;

impl SummaryService {
    pub fn new() -> Self {
        Self
    }

    /// Totals for entries whose date field equals `date` exactly (string
    /// equality, no range logic). Missing macros count as zero; an empty or
    /// unmatched ledger sums to zero with no error.
    pub fn daily_summary(&self, entries: &[NutritionEntry], date: &str) -> DailySummary {
        let mut summary = DailySummary {
            date: date.to_string(),
            calories: 0.0,
            protein: 0.0,
            fat: 0.0,
            fiber: 0.0,
            entry_count: 0,
        };
        for entry in entries.iter().filter(|e| e.date == date) {
            summary.calories += entry.calories;
            summary.protein += entry.protein;
            summary.fat += entry.fat.unwrap_or(0.0);
            summary.fiber += entry.fiber.unwrap_or(0.0);
            summary.entry_count += 1;
        }
        summary
    }

    /// Calorie totals for the most recent 7 distinct dates present in the
    /// ledger, newest first. Deliberately not a trailing calendar window: a
    /// sparse ledger surfaces older dates. Entries whose date does not parse
    /// in the canonical format are dropped from the grouping.
    pub fn weekly_summary(&self, entries: &[NutritionEntry]) -> Vec<DayCalories> {
        let mut by_date: BTreeMap<NaiveDate, f64> = BTreeMap::new();
        for entry in entries {
            match entry.parsed_date() {
                Some(date) => *by_date.entry(date).or_insert(0.0) += entry.calories,
                None => {
                    warn!("skipping entry with unparseable date '{}' in weekly view", entry.date)
                }
            }
        }

        by_date
            .into_iter()
            .rev()
            .take(7)
            .map(|(date, calories)| DayCalories {
                date: date.format(DATE_FORMAT).to_string(),
                calories,
            })
            .collect()
    }
}
