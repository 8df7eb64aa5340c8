//! Shared handle to the data directory backing the CSV worksheets.

use log::info;
use std::fs;
use std::path::{Path, PathBuf};

use crate::domain::errors::TrackerError;

/// Cheap-to-clone handle mapping worksheet names to files under one data
/// directory. Each repository owns one worksheet file.
#[derive(Debug, Clone)]
pub struct CsvConnection {
    base_directory: PathBuf,
}

impl CsvConnection {
    /// Open (creating if needed) the data directory.
    pub fn new<P: AsRef<Path>>(base_directory: P) -> Result<Self, TrackerError> {
        let base_directory = base_directory.as_ref().to_path_buf();
        if !base_directory.exists() {
            fs::create_dir_all(&base_directory)?;
            info!("created data directory {:?}", base_directory);
        }
        Ok(Self { base_directory })
    }

    pub fn base_directory(&self) -> &Path {
        &self.base_directory
    }

    /// Path of a named worksheet's backing file.
    pub fn worksheet_path(&self, worksheet: &str) -> PathBuf {
        self.base_directory.join(format!("{worksheet}.csv"))
    }

    /// Atomically replace a worksheet's contents: write a temp file in the
    /// same directory, then rename over the target. A failed write leaves
    /// the previous contents intact.
    pub fn write_worksheet_atomic(
        &self,
        worksheet: &str,
        contents: &str,
    ) -> Result<(), TrackerError> {
        let target = self.worksheet_path(worksheet);
        let temp = self.base_directory.join(format!(".{worksheet}.csv.tmp"));
        fs::write(&temp, contents)?;
        fs::rename(&temp, &target)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn worksheets_map_to_csv_files_under_the_data_dir() {
        let temp = TempDir::new().unwrap();
        let connection = CsvConnection::new(temp.path()).unwrap();
        assert_eq!(
            connection.worksheet_path("ledger"),
            connection.base_directory().join("ledger.csv")
        );
    }

    #[test]
    fn atomic_write_replaces_contents_and_leaves_no_temp_file() {
        let temp = TempDir::new().unwrap();
        let connection = CsvConnection::new(temp.path()).unwrap();
        connection.write_worksheet_atomic("ledger", "a,b\n1,2\n").unwrap();
        connection.write_worksheet_atomic("ledger", "a,b\n3,4\n").unwrap();

        let contents = fs::read_to_string(connection.worksheet_path("ledger")).unwrap();
        assert_eq!(contents, "a,b\n3,4\n");
        let files: Vec<_> = fs::read_dir(connection.base_directory())
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();
        assert_eq!(files, vec!["ledger.csv"]);
    }
}
