//! Command and query structs for ledger entry operations.

use crate::domain::models::entry::NutritionEntry;

/// Commit the pending estimate to the ledger.
#[derive(Debug, Clone, Default)]
pub struct ConfirmEntryCommand {
    /// Satiety rating (1-5) the user attaches at confirmation time
    pub satiety: Option<u8>,
    /// Log under this date instead of today (`YYYY-MM-DD`)
    pub date: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct EntryListQuery {
    /// Only entries whose date field equals this exactly
    pub date: Option<String>,
    /// At most this many rows, keeping the most recently appended
    pub limit: Option<usize>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EntryListResult {
    /// (position in the full ledger, entry) pairs in ledger order
    pub rows: Vec<(usize, NutritionEntry)>,
    /// Ledger length before filtering and limiting
    pub ledger_len: usize,
}
