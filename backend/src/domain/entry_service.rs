//! Ledger entry operations: confirm a pending estimate, list, edit, delete.
//!
//! The service never writes on a parse or estimation failure; only an
//! explicit confirmation (or edit) reaches the ledger. All mutations go
//! through the `LedgerStorage` trait, which owns the whole-table
//! read-modify-write cycle.

use chrono::NaiveDate;
use log::info;
use std::sync::Arc;

use crate::domain::commands::entries::{ConfirmEntryCommand, EntryListQuery, EntryListResult};
use crate::domain::errors::TrackerError;
use crate::domain::estimation_service::PendingEstimate;
use crate::domain::models::entry::{NutritionEntry, DATE_FORMAT};
use crate::storage::LedgerStorage;

#[derive(Clone)]
pub struct EntryService {
    ledger: Arc<dyn LedgerStorage>,
}

impl EntryService {
    pub fn new(ledger: Arc<dyn LedgerStorage>) -> Self {
        Self { ledger }
    }

    fn validate_satiety(satiety: Option<u8>) -> Result<(), TrackerError> {
        if let Some(s) = satiety {
            if !(1..=5).contains(&s) {
                return Err(TrackerError::InvalidSatiety(s));
            }
        }
        Ok(())
    }

    fn validate_date(date: &str) -> Result<(), TrackerError> {
        NaiveDate::parse_from_str(date, DATE_FORMAT)
            .map(|_| ())
            .map_err(|_| TrackerError::InvalidDate(date.to_string()))
    }

    /// Append the confirmed estimate, returning its ledger position.
    pub fn confirm_pending(
        &self,
        pending: PendingEstimate,
        command: ConfirmEntryCommand,
    ) -> Result<(usize, NutritionEntry), TrackerError> {
        Self::validate_satiety(command.satiety)?;

        let mut entry = pending.entry;
        if let Some(date) = command.date {
            Self::validate_date(&date)?;
            entry.date = date;
        }
        entry.satiety = command.satiety;

        let position = self.ledger.append_entry(&entry)?;
        info!("confirmed '{}' into the ledger at position {position}", entry.food);
        Ok((position, entry))
    }

    /// The full ledger in insertion order, for the aggregators.
    pub fn read_ledger(&self) -> Result<Vec<NutritionEntry>, TrackerError> {
        self.ledger.read_entries()
    }

    /// List entries, optionally restricted to one date and truncated to the
    /// most recently appended `limit` rows. Positions always index the full
    /// ledger so edit/delete can address rows from any filtered view.
    pub fn list_entries(&self, query: EntryListQuery) -> Result<EntryListResult, TrackerError> {
        let entries = self.ledger.read_entries()?;
        let ledger_len = entries.len();

        let mut rows: Vec<(usize, NutritionEntry)> = entries
            .into_iter()
            .enumerate()
            .filter(|(_, e)| query.date.as_deref().map_or(true, |d| e.date == d))
            .collect();

        if let Some(limit) = query.limit {
            if rows.len() > limit {
                rows.drain(..rows.len() - limit);
            }
        }

        Ok(EntryListResult { rows, ledger_len })
    }

    /// Full-field overwrite of the entry at `position`.
    pub fn update_entry(
        &self,
        position: usize,
        entry: NutritionEntry,
    ) -> Result<NutritionEntry, TrackerError> {
        Self::validate_satiety(entry.satiety)?;
        Self::validate_date(&entry.date)?;
        self.ledger.update_entry(position, &entry)?;
        Ok(entry)
    }

    pub fn delete_entry(&self, position: usize) -> Result<NutritionEntry, TrackerError> {
        self.ledger.delete_entry(position)
    }
}
