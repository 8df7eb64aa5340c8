//! CSV-backed ledger repository.
//!
//! The ledger worksheet is one CSV file with the columns
//! `Date,Food,Quantity,Calories,Protein,Fat,Fiber,Satiety`. The store
//! exposes no partial-append primitive, so every mutation reads the whole
//! file, transforms the rows in memory, and writes the whole file back.
//!
//! That read-modify-write cycle is guarded by a revision token (row count
//! plus a content hash) captured at read time and re-checked immediately
//! before the atomic replace. Two interleaved sessions therefore fail fast
//! with `ConcurrentModification` instead of silently dropping each other's
//! rows. The check is best-effort, not a transaction.

use csv::{Reader, StringRecord, Writer};
use log::{info, warn};
use std::collections::hash_map::DefaultHasher;
use std::fs;
use std::hash::{Hash, Hasher};

use super::connection::CsvConnection;
use crate::domain::errors::TrackerError;
use crate::domain::models::entry::NutritionEntry;
use crate::storage::LedgerStorage;

const WORKSHEET: &str = "ledger";
const HEADER: [&str; 8] = [
    "Date", "Food", "Quantity", "Calories", "Protein", "Fat", "Fiber", "Satiety",
];

/// State of the worksheet at read time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Revision {
    rows: usize,
    checksum: u64,
}

#[derive(Clone)]
pub struct LedgerRepository {
    connection: CsvConnection,
}

impl LedgerRepository {
    pub fn new(connection: CsvConnection) -> Self {
        Self { connection }
    }

    fn revision_of(contents: &str, rows: usize) -> Revision {
        let mut hasher = DefaultHasher::new();
        contents.hash(&mut hasher);
        Revision { rows, checksum: hasher.finish() }
    }

    /// Read the raw worksheet. A missing file is an empty ledger.
    fn read_contents(&self) -> Result<String, TrackerError> {
        let path = self.connection.worksheet_path(WORKSHEET);
        if !path.exists() {
            return Ok(String::new());
        }
        Ok(fs::read_to_string(&path)?)
    }

    fn parse_row(record: &StringRecord) -> NutritionEntry {
        let text = |i: usize| record.get(i).unwrap_or("").trim().to_string();
        let opt_text = |i: usize| {
            let v = text(i);
            if v.is_empty() { None } else { Some(v) }
        };
        // Missing or non-numeric macros count as zero downstream.
        let number = |i: usize| text(i).parse::<f64>().unwrap_or(0.0);
        let opt_number = |i: usize| text(i).parse::<f64>().ok();

        NutritionEntry {
            date: text(0),
            food: text(1),
            quantity: opt_text(2),
            calories: number(3),
            protein: number(4),
            fat: opt_number(5),
            fiber: opt_number(6),
            satiety: text(7).parse::<u8>().ok(),
        }
    }

    fn parse_contents(contents: &str) -> Result<Vec<NutritionEntry>, TrackerError> {
        if contents.is_empty() {
            return Ok(Vec::new());
        }
        let mut reader = Reader::from_reader(contents.as_bytes());
        let mut entries = Vec::new();
        for record in reader.records() {
            entries.push(Self::parse_row(&record?));
        }
        Ok(entries)
    }

    fn serialize(entries: &[NutritionEntry]) -> Result<String, TrackerError> {
        let mut writer = Writer::from_writer(Vec::new());
        writer.write_record(HEADER)?;
        for entry in entries {
            let fmt = |v: f64| {
                if v == v.trunc() { format!("{}", v as i64) } else { format!("{v}") }
            };
            writer.write_record([
                entry.date.as_str(),
                entry.food.as_str(),
                entry.quantity.as_deref().unwrap_or(""),
                &fmt(entry.calories),
                &fmt(entry.protein),
                &entry.fat.map(fmt).unwrap_or_default(),
                &entry.fiber.map(fmt).unwrap_or_default(),
                &entry.satiety.map(|s| s.to_string()).unwrap_or_default(),
            ])?;
        }
        let bytes = writer
            .into_inner()
            .map_err(|e| TrackerError::LedgerUnavailable(e.to_string()))?;
        String::from_utf8(bytes).map_err(|e| TrackerError::LedgerUnavailable(e.to_string()))
    }

    /// Read the whole ledger together with its revision token.
    fn read_snapshot(&self) -> Result<(Vec<NutritionEntry>, Revision), TrackerError> {
        let contents = self.read_contents()?;
        let entries = Self::parse_contents(&contents)?;
        let revision = Self::revision_of(&contents, entries.len());
        Ok((entries, revision))
    }

    /// Replace the worksheet, failing if it changed since `expected` was
    /// captured. The temp-file-then-rename write applies all rows or none.
    fn write_all(
        &self,
        entries: &[NutritionEntry],
        expected: Revision,
    ) -> Result<(), TrackerError> {
        let current_contents = self.read_contents()?;
        let current_rows = Self::parse_contents(&current_contents)?.len();
        let current = Self::revision_of(&current_contents, current_rows);
        if current != expected {
            warn!(
                "ledger changed under us ({} rows now, {} at read time), refusing to write",
                current.rows, expected.rows
            );
            return Err(TrackerError::ConcurrentModification);
        }

        let serialized = Self::serialize(entries)?;
        self.connection.write_worksheet_atomic(WORKSHEET, &serialized)?;
        Ok(())
    }
}

impl LedgerStorage for LedgerRepository {
    fn read_entries(&self) -> Result<Vec<NutritionEntry>, TrackerError> {
        Ok(self.read_snapshot()?.0)
    }

    fn append_entry(&self, entry: &NutritionEntry) -> Result<usize, TrackerError> {
        let (mut entries, revision) = self.read_snapshot()?;
        entries.push(entry.clone());
        self.write_all(&entries, revision)?;
        info!("appended ledger entry '{}' ({} kcal)", entry.food, entry.calories);
        Ok(entries.len() - 1)
    }

    fn update_entry(&self, position: usize, entry: &NutritionEntry) -> Result<(), TrackerError> {
        let (mut entries, revision) = self.read_snapshot()?;
        let slot = entries
            .get_mut(position)
            .ok_or(TrackerError::EntryNotFound(position))?;
        *slot = entry.clone();
        self.write_all(&entries, revision)?;
        info!("updated ledger entry at position {position}");
        Ok(())
    }

    fn delete_entry(&self, position: usize) -> Result<NutritionEntry, TrackerError> {
        let (mut entries, revision) = self.read_snapshot()?;
        if position >= entries.len() {
            return Err(TrackerError::EntryNotFound(position));
        }
        let removed = entries.remove(position);
        self.write_all(&entries, revision)?;
        info!("deleted ledger entry '{}' at position {position}", removed.food);
        Ok(removed)
    }

    fn overwrite_entries(&self, entries: &[NutritionEntry]) -> Result<(), TrackerError> {
        let (_, revision) = self.read_snapshot()?;
        self.write_all(entries, revision)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::csv::test_utils::TestEnvironment;

    fn entry(date: &str, food: &str, calories: f64) -> NutritionEntry {
        NutritionEntry {
            date: date.to_string(),
            food: food.to_string(),
            quantity: None,
            calories,
            protein: 10.0,
            fat: None,
            fiber: None,
            satiety: None,
        }
    }

    #[test]
    fn missing_worksheet_reads_as_empty_ledger() {
        let env = TestEnvironment::new().unwrap();
        let repo = LedgerRepository::new(env.connection.clone());
        assert_eq!(repo.read_entries().unwrap(), Vec::new());
    }

    #[test]
    fn append_then_read_returns_previous_plus_new_in_order() {
        let env = TestEnvironment::new().unwrap();
        let repo = LedgerRepository::new(env.connection.clone());

        let first = entry("2025-01-01", "Toast", 150.0);
        let second = entry("2025-01-01", "Eggs", 140.0);
        assert_eq!(repo.append_entry(&first).unwrap(), 0);

        let before = repo.read_entries().unwrap();
        assert_eq!(repo.append_entry(&second).unwrap(), 1);
        let after = repo.read_entries().unwrap();

        assert_eq!(after.len(), before.len() + 1);
        assert_eq!(&after[..before.len()], &before[..]);
        assert_eq!(after.last().unwrap(), &second);
    }

    #[test]
    fn delete_by_position_leaves_other_entries_unchanged() {
        let env = TestEnvironment::new().unwrap();
        let repo = LedgerRepository::new(env.connection.clone());
        let entries = [
            entry("2025-01-01", "Toast", 150.0),
            entry("2025-01-01", "Eggs", 140.0),
            entry("2025-01-02", "Salad", 320.0),
        ];
        for e in &entries {
            repo.append_entry(e).unwrap();
        }

        let removed = repo.delete_entry(1).unwrap();
        assert_eq!(removed.food, "Eggs");

        let remaining = repo.read_entries().unwrap();
        assert_eq!(remaining, vec![entries[0].clone(), entries[2].clone()]);
    }

    #[test]
    fn update_overwrites_exactly_one_row() {
        let env = TestEnvironment::new().unwrap();
        let repo = LedgerRepository::new(env.connection.clone());
        repo.append_entry(&entry("2025-01-01", "Toast", 150.0)).unwrap();
        repo.append_entry(&entry("2025-01-01", "Eggs", 140.0)).unwrap();

        let edited = NutritionEntry {
            satiety: Some(4),
            ..entry("2025-01-01", "Eggs on toast", 290.0)
        };
        repo.update_entry(1, &edited).unwrap();

        let entries = repo.read_entries().unwrap();
        assert_eq!(entries[0].food, "Toast");
        assert_eq!(entries[1], edited);
    }

    #[test]
    fn out_of_range_positions_are_rejected() {
        let env = TestEnvironment::new().unwrap();
        let repo = LedgerRepository::new(env.connection.clone());
        repo.append_entry(&entry("2025-01-01", "Toast", 150.0)).unwrap();

        assert!(matches!(
            repo.delete_entry(5).unwrap_err(),
            TrackerError::EntryNotFound(5)
        ));
        assert!(matches!(
            repo.update_entry(5, &entry("2025-01-01", "X", 1.0)).unwrap_err(),
            TrackerError::EntryNotFound(5)
        ));
        // Nothing was applied.
        assert_eq!(repo.read_entries().unwrap().len(), 1);
    }

    #[test]
    fn concurrent_write_fails_with_stale_revision() {
        let env = TestEnvironment::new().unwrap();
        let repo = LedgerRepository::new(env.connection.clone());
        repo.append_entry(&entry("2025-01-01", "Toast", 150.0)).unwrap();

        // Session A snapshots the ledger.
        let (mut entries_a, revision_a) = repo.read_snapshot().unwrap();

        // Session B appends in the meantime.
        repo.append_entry(&entry("2025-01-01", "Eggs", 140.0)).unwrap();

        entries_a.push(entry("2025-01-01", "Salad", 320.0));
        let err = repo.write_all(&entries_a, revision_a).unwrap_err();
        assert!(matches!(err, TrackerError::ConcurrentModification));

        // Session B's append survived untouched.
        let entries = repo.read_entries().unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[1].food, "Eggs");
    }

    #[test]
    fn optional_columns_round_trip_through_the_worksheet() {
        let env = TestEnvironment::new().unwrap();
        let repo = LedgerRepository::new(env.connection.clone());
        let full = NutritionEntry {
            date: "2025-01-03".into(),
            food: "Lentil soup".into(),
            quantity: Some("1 bowl (approx. 350g)".into()),
            calories: 280.0,
            protein: 14.5,
            fat: Some(6.0),
            fiber: Some(9.0),
            satiety: Some(4),
        };
        repo.append_entry(&full).unwrap();
        assert_eq!(repo.read_entries().unwrap(), vec![full]);
    }

    #[test]
    fn overwrite_replaces_the_whole_ledger() {
        let env = TestEnvironment::new().unwrap();
        let repo = LedgerRepository::new(env.connection.clone());
        repo.append_entry(&entry("2025-01-01", "Toast", 150.0)).unwrap();
        repo.append_entry(&entry("2025-01-01", "Eggs", 140.0)).unwrap();

        let replacement = vec![entry("2025-02-01", "Salad", 320.0)];
        repo.overwrite_entries(&replacement).unwrap();
        assert_eq!(repo.read_entries().unwrap(), replacement);
    }

    #[test]
    fn foreign_rows_with_odd_values_still_load() {
        let env = TestEnvironment::new().unwrap();
        // A row written by an older iteration: different date format and a
        // non-numeric calorie cell.
        let contents = "Date,Food,Quantity,Calories,Protein,Fat,Fiber,Satiety\n\
                        01/02/2025,Mystery stew,,unknown,12,,,\n";
        env.connection.write_worksheet_atomic(WORKSHEET, contents).unwrap();

        let repo = LedgerRepository::new(env.connection.clone());
        let entries = repo.read_entries().unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].date, "01/02/2025");
        assert_eq!(entries[0].calories, 0.0);
        assert_eq!(entries[0].protein, 12.0);
    }
}
