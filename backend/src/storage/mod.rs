//! # Storage Traits
//!
//! Narrow interfaces over the worksheet-style tabular store so the domain
//! layer never sees how mutations are implemented. The backing store has no
//! partial-append primitive: every mutation is read-all, transform in
//! memory, write-all. Callers get append/update/delete and the repository
//! owns the read-modify-write cycle (including the revision check that turns
//! a concurrent write into `ConcurrentModification` instead of a silent
//! lost update).

pub mod csv;

use crate::domain::errors::TrackerError;
use crate::domain::models::entry::NutritionEntry;
use crate::domain::models::profile::UserProfile;

pub use csv::CsvConnection;

/// Interface for the food-entry ledger.
pub trait LedgerStorage: Send + Sync {
    /// Read the full ledger in insertion order. A missing worksheet is an
    /// empty ledger, not an error.
    fn read_entries(&self) -> Result<Vec<NutritionEntry>, TrackerError>;

    /// Append one entry, returning its position in the ledger.
    fn append_entry(&self, entry: &NutritionEntry) -> Result<usize, TrackerError>;

    /// Overwrite the entry at `position` wholesale.
    fn update_entry(&self, position: usize, entry: &NutritionEntry) -> Result<(), TrackerError>;

    /// Remove the entry at `position`, returning it.
    fn delete_entry(&self, position: usize) -> Result<NutritionEntry, TrackerError>;

    /// Replace the whole ledger with `entries`.
    fn overwrite_entries(&self, entries: &[NutritionEntry]) -> Result<(), TrackerError>;
}

/// Interface for the singleton body-metric profile.
pub trait ProfileStorage: Send + Sync {
    /// The current profile, or `None` before the first save.
    fn load_profile(&self) -> Result<Option<UserProfile>, TrackerError>;

    /// Persist `profile` as the new current profile.
    fn save_profile(&self, profile: &UserProfile) -> Result<(), TrackerError>;
}
