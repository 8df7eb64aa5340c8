//! CSV-backed profile repository.
//!
//! The profile worksheet is a side table with the columns
//! `Sex,Weight,Height,Age,StepGoal`. Saves append a row and the last row is
//! authoritative on load; the profile is never updated in place. This keeps
//! a free history of body-metric changes without any schema for it.

use csv::{Reader, StringRecord, Writer};
use log::info;
use std::fs;

use super::connection::CsvConnection;
use crate::domain::errors::TrackerError;
use crate::domain::models::profile::{Sex, UserProfile};
use crate::storage::ProfileStorage;

const WORKSHEET: &str = "profile";
const HEADER: [&str; 5] = ["Sex", "Weight", "Height", "Age", "StepGoal"];

#[derive(Clone)]
pub struct ProfileRepository {
    connection: CsvConnection,
}

impl ProfileRepository {
    pub fn new(connection: CsvConnection) -> Self {
        Self { connection }
    }

    fn read_contents(&self) -> Result<String, TrackerError> {
        let path = self.connection.worksheet_path(WORKSHEET);
        if !path.exists() {
            return Ok(String::new());
        }
        Ok(fs::read_to_string(&path)?)
    }

    fn parse_row(record: &StringRecord) -> Option<UserProfile> {
        let get = |i: usize| record.get(i).unwrap_or("").trim();
        let sex = match get(0) {
            "male" => Sex::Male,
            "female" => Sex::Female,
            _ => return None,
        };
        Some(UserProfile {
            sex,
            weight_kg: get(1).parse().ok()?,
            height_cm: get(2).parse().ok()?,
            age_years: get(3).parse().ok()?,
            daily_step_goal: get(4).parse().unwrap_or(0),
        })
    }

    fn read_rows(&self) -> Result<Vec<StringRecord>, TrackerError> {
        let contents = self.read_contents()?;
        if contents.is_empty() {
            return Ok(Vec::new());
        }
        let mut reader = Reader::from_reader(contents.as_bytes());
        let mut rows = Vec::new();
        for record in reader.records() {
            rows.push(record?);
        }
        Ok(rows)
    }
}

impl ProfileStorage for ProfileRepository {
    fn load_profile(&self) -> Result<Option<UserProfile>, TrackerError> {
        let rows = self.read_rows()?;
        // Last row wins; unreadable trailing rows fall back to older ones.
        Ok(rows.iter().rev().find_map(Self::parse_row))
    }

    fn save_profile(&self, profile: &UserProfile) -> Result<(), TrackerError> {
        let rows = self.read_rows()?;

        let mut writer = Writer::from_writer(Vec::new());
        writer.write_record(HEADER)?;
        for row in &rows {
            writer.write_record(row)?;
        }
        let sex = match profile.sex {
            Sex::Male => "male",
            Sex::Female => "female",
        };
        writer.write_record([
            sex,
            &profile.weight_kg.to_string(),
            &profile.height_cm.to_string(),
            &profile.age_years.to_string(),
            &profile.daily_step_goal.to_string(),
        ])?;

        let bytes = writer
            .into_inner()
            .map_err(|e| TrackerError::LedgerUnavailable(e.to_string()))?;
        let serialized = String::from_utf8(bytes)
            .map_err(|e| TrackerError::LedgerUnavailable(e.to_string()))?;
        self.connection.write_worksheet_atomic(WORKSHEET, &serialized)?;
        info!("saved profile ({} rows of history)", rows.len() + 1);
        Ok(())
    }
}
