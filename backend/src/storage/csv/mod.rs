//! # CSV Storage Module
//!
//! File-based implementation of the worksheet-style tabular store: one CSV
//! file per worksheet under a single data directory, whole-file reads and
//! atomic whole-file writes. The same traits could be implemented against a
//! remote spreadsheet or a real database without touching the domain layer.
//!
//! ## Files
//!
//! ```text
//! data/
//! ├── ledger.csv     Date,Food,Quantity,Calories,Protein,Fat,Fiber,Satiety
//! └── profile.csv    Sex,Weight,Height,Age,StepGoal   (last row authoritative)
//! ```

pub mod connection;
pub mod ledger_repository;
pub mod profile_repository;

#[cfg(test)]
pub mod test_utils;

pub use connection::CsvConnection;
pub use ledger_repository::LedgerRepository;
pub use profile_repository::ProfileRepository;
