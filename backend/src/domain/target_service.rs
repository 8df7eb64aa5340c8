//! Daily calorie and macro targets derived from the body-metric profile.
//!
//! Pure arithmetic, recomputed per request and never persisted. The BMR is
//! Mifflin-St Jeor with a fixed 1.2 activity multiplier; the step goal adds
//! a flat 0.04 kcal per step on top.

use crate::domain::errors::TrackerError;
use crate::domain::models::profile::{Sex, UserProfile};

#[derive(Debug, Clone, PartialEq)]
pub struct DailyTargets {
    pub bmr: f64,
    pub tdee: i64,
    pub calorie_target: i64,
    pub protein_g: i64,
    pub fat_g: i64,
    pub fiber_g: i64,
}

impl From<DailyTargets> for shared::DailyTargets {
    fn from(t: DailyTargets) -> Self {
        shared::DailyTargets {
            bmr: t.bmr,
            tdee: t.tdee,
            calorie_target: t.calorie_target,
            protein_g: t.protein_g,
            fat_g: t.fat_g,
            fiber_g: t.fiber_g,
        }
    }
}

/// Compute the daily targets for `profile`.
///
/// Non-positive weight, height or age never made sense in any iteration of
/// the tracker, so they are rejected here instead of producing a negative
/// calorie budget.
pub fn daily_targets(profile: &UserProfile) -> Result<DailyTargets, TrackerError> {
    if profile.weight_kg <= 0.0 || profile.height_cm <= 0.0 || profile.age_years == 0 {
        return Err(TrackerError::InvalidProfile(
            "weight, height and age must be positive".to_string(),
        ));
    }

    let sex_term = match profile.sex {
        Sex::Male => 5.0,
        Sex::Female => -161.0,
    };
    let bmr = 10.0 * profile.weight_kg + 6.25 * profile.height_cm
        - 5.0 * profile.age_years as f64
        + sex_term;

    let tdee = (bmr * 1.2).floor() as i64;
    let protein_g = (profile.weight_kg * 1.8).floor() as i64;
    let fat_g = ((tdee as f64 * 0.25) / 9.0).floor() as i64;
    let fiber_g = match profile.sex {
        Sex::Male => 30,
        Sex::Female => 25,
    };
    let step_bonus = (profile.daily_step_goal as f64 * 0.04).floor() as i64;

    Ok(DailyTargets {
        bmr,
        tdee,
        calorie_target: tdee + step_bonus,
        protein_g,
        fat_g,
        fiber_g,
    })
}
