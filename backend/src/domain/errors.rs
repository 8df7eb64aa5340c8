//! Error taxonomy for the nutrition tracker domain.
//!
//! Every external call (model request, worksheet read, worksheet write) is
//! wrapped at the point of use and converted into one of these variants.
//! Nothing is retried automatically; the REST layer maps each variant to a
//! status code and the user re-triggers the action.

use thiserror::Error;

/// A model reply that did not match the requested comma-separated schema.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MalformedEstimate {
    #[error("expected at least {expected} comma-separated fields, got {got}")]
    NotEnoughFields { expected: usize, got: usize },
    #[error("field '{field}' is not a number: '{value}'")]
    InvalidNumber { field: &'static str, value: String },
}

#[derive(Debug, Error)]
pub enum TrackerError {
    /// Network/quota/model failure from the generative-AI call, or an empty
    /// reply. Never fatal to the session.
    #[error("estimation failed: {0}")]
    EstimationFailed(String),

    #[error("could not parse estimate: {0}")]
    MalformedEstimate(#[from] MalformedEstimate),

    /// Remote store unreachable or unreadable. Reads of a missing worksheet
    /// are treated as an empty ledger instead and do not raise this.
    #[error("ledger unavailable: {0}")]
    LedgerUnavailable(String),

    /// The revision token captured at read time was stale at write time:
    /// another session wrote the worksheet in between. Nothing was applied.
    #[error("ledger was modified by another session, please retry")]
    ConcurrentModification,

    #[error("no entry at position {0}")]
    EntryNotFound(usize),

    #[error("no pending estimate to confirm")]
    NoPendingEstimate,

    #[error("invalid profile: {0}")]
    InvalidProfile(String),

    #[error("satiety must be between 1 and 5, got {0}")]
    InvalidSatiety(u8),

    #[error("invalid date '{0}', expected YYYY-MM-DD")]
    InvalidDate(String),

    #[error("estimate request must contain either text or an image")]
    EmptyEstimateInput,

    #[error("estimate request must contain either text or an image, not both")]
    AmbiguousEstimateInput,
}

impl From<std::io::Error> for TrackerError {
    fn from(e: std::io::Error) -> Self {
        TrackerError::LedgerUnavailable(e.to_string())
    }
}

impl From<csv::Error> for TrackerError {
    fn from(e: csv::Error) -> Self {
        TrackerError::LedgerUnavailable(e.to_string())
    }
}

impl From<reqwest::Error> for TrackerError {
    fn from(e: reqwest::Error) -> Self {
        TrackerError::EstimationFailed(e.to_string())
    }
}
