//! Test utilities for the CSV storage layer.
//!
//! RAII-based cleanup: the temp directory lives as long as the environment
//! and is removed even if a test panics.

use tempfile::TempDir;

use super::connection::CsvConnection;
use crate::domain::errors::TrackerError;

pub struct TestEnvironment {
    pub connection: CsvConnection,
    _temp_dir: TempDir,
}

impl TestEnvironment {
    pub fn new() -> Result<Self, TrackerError> {
        let temp_dir = TempDir::new().map_err(TrackerError::from)?;
        let connection = CsvConnection::new(temp_dir.path())?;
        Ok(Self { connection, _temp_dir: temp_dir })
    }
}
