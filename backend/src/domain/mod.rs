//! Domain layer: models, services and the error taxonomy.

pub mod commands;
pub mod entry_service;
pub mod errors;
pub mod estimate;
pub mod estimation_service;
pub mod gemini;
pub mod models;
pub mod profile_service;
pub mod summary_service;
pub mod target_service;

pub use entry_service::EntryService;
pub use estimation_service::{EstimationService, SessionState};
pub use profile_service::ProfileService;
pub use summary_service::SummaryService;
