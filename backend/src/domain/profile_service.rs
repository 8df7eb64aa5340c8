//! Singleton profile load/save on top of `ProfileStorage`.

use log::info;
use std::sync::Arc;

use crate::domain::errors::TrackerError;
use crate::domain::models::profile::UserProfile;
use crate::storage::ProfileStorage;

#[derive(Clone)]
pub struct ProfileService {
    storage: Arc<dyn ProfileStorage>,
}

impl ProfileService {
    pub fn new(storage: Arc<dyn ProfileStorage>) -> Self {
        Self { storage }
    }

    /// The stored profile, or the built-in defaults before the first save.
    pub fn load_or_default(&self) -> Result<UserProfile, TrackerError> {
        match self.storage.load_profile()? {
            Some(profile) => Ok(profile),
            None => {
                info!("no stored profile yet, using defaults");
                Ok(UserProfile::default())
            }
        }
    }

    /// Overwrite the current profile wholesale (append-then-read-last in
    /// the backing worksheet).
    pub fn save(&self, profile: UserProfile) -> Result<UserProfile, TrackerError> {
        if profile.weight_kg <= 0.0 || profile.height_cm <= 0.0 || profile.age_years == 0 {
            return Err(TrackerError::InvalidProfile(
                "weight, height and age must be positive".to_string(),
            ));
        }
        self.storage.save_profile(&profile)?;
        Ok(profile)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::csv::{test_utils::TestEnvironment, ProfileRepository};

    fn create_test_service() -> (ProfileService, TestEnvironment) {
        let env = TestEnvironment::new().unwrap();
        let repo = ProfileRepository::new(env.connection.clone());
        (ProfileService::new(Arc::new(repo)), env)
    }

    #[test]
    fn defaults_before_first_save() {
        let (service, _env) = create_test_service();
        assert_eq!(service.load_or_default().unwrap(), UserProfile::default());
    }

    #[test]
    fn save_then_load_round_trips() {
        let (service, _env) = create_test_service();
        let profile = UserProfile { weight_kg: 70.0, ..UserProfile::default() };
        service.save(profile.clone()).unwrap();
        assert_eq!(service.load_or_default().unwrap(), profile);
    }

    #[test]
    fn invalid_metrics_are_rejected_before_storage() {
        let (service, _env) = create_test_service();
        let err = service
            .save(UserProfile { height_cm: -1.0, ..UserProfile::default() })
            .unwrap_err();
        assert!(matches!(err, TrackerError::InvalidProfile(_)));
        // The store still has no profile.
        assert_eq!(service.load_or_default().unwrap(), UserProfile::default());
    }
}
