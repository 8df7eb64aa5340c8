//! Domain model for the singleton body-metric profile.
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Sex {
    Male,
    Female,
}

/// Body metrics the daily targets are derived from.
///
/// There is at most one current profile. Saves append a row to the profile
/// worksheet and the last row is authoritative on load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub sex: Sex,
    pub weight_kg: f64,
    pub height_cm: f64,
    pub age_years: u32,
    pub daily_step_goal: u32,
}

impl Default for UserProfile {
    fn default() -> Self {
        Self {
            sex: Sex::Male,
            weight_kg: 80.0,
            height_cm: 175.0,
            age_years: 30,
            daily_step_goal: 8000,
        }
    }
}

impl From<UserProfile> for shared::UserProfile {
    fn from(p: UserProfile) -> Self {
        shared::UserProfile {
            sex: match p.sex {
                Sex::Male => shared::Sex::Male,
                Sex::Female => shared::Sex::Female,
            },
            weight_kg: p.weight_kg,
            height_cm: p.height_cm,
            age_years: p.age_years,
            daily_step_goal: p.daily_step_goal,
        }
    }
}

impl From<shared::UserProfile> for UserProfile {
    fn from(p: shared::UserProfile) -> Self {
        UserProfile {
            sex: match p.sex {
                shared::Sex::Male => Sex::Male,
                shared::Sex::Female => Sex::Female,
            },
            weight_kg: p.weight_kg,
            height_cm: p.height_cm,
            age_years: p.age_years,
            daily_step_goal: p.daily_step_goal,
        }
    }
}
