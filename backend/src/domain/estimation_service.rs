//! Estimation orchestration: prompt the model, parse the reply, hold the
//! result as an explicit pending estimate until the user confirms it.
//!
//! Session state is a plain struct owned by the caller (the REST layer keeps
//! one behind a mutex) rather than ambient globals, so every handler's reads
//! and writes of it are visible at the call site.

use async_trait::async_trait;
use log::{info, warn};
use std::sync::Arc;

use crate::domain::errors::TrackerError;
use crate::domain::estimate::{parse_estimate, EstimateSchema, EstimateSchemaVersion};
use crate::domain::models::entry::NutritionEntry;

/// User input forwarded to the model alongside the fixed instruction.
#[derive(Debug, Clone)]
pub enum EstimateInput {
    Text(String),
    Image { bytes: Vec<u8>, mime_type: String },
}

impl EstimateInput {
    /// Short description used for the session's `last_query` field.
    pub fn describe(&self) -> String {
        match self {
            EstimateInput::Text(text) => text.clone(),
            EstimateInput::Image { bytes, mime_type } => {
                format!("[image {} ({} bytes)]", mime_type, bytes.len())
            }
        }
    }
}

/// Seam to the generative model. The production implementation is the Gemini
/// REST client; tests substitute a stub.
#[async_trait]
pub trait ModelBackend: Send + Sync {
    /// Send the instruction plus user input, return the raw reply text.
    async fn generate(
        &self,
        instruction: &str,
        input: &EstimateInput,
    ) -> Result<String, TrackerError>;
}

/// A parsed estimate awaiting user confirmation. Nothing is written to the
/// ledger until the confirm step takes this out of the session.
#[derive(Debug, Clone)]
pub struct PendingEstimate {
    pub entry: NutritionEntry,
    pub raw_reply: String,
    pub schema: EstimateSchemaVersion,
}

/// Per-session interaction state, threaded explicitly through handlers.
#[derive(Debug, Default)]
pub struct SessionState {
    pub pending_estimate: Option<PendingEstimate>,
    pub last_query: Option<String>,
}

#[derive(Debug, Clone)]
pub struct EstimateCommand {
    pub input: EstimateInput,
    pub schema: EstimateSchemaVersion,
}

#[derive(Clone)]
pub struct EstimationService {
    backend: Arc<dyn ModelBackend>,
}

impl EstimationService {
    pub fn new(backend: Arc<dyn ModelBackend>) -> Self {
        Self { backend }
    }

    /// Run one estimation round trip and parse the reply.
    ///
    /// A failure here (transport, quota, malformed reply) leaves the ledger
    /// untouched; the caller surfaces the error and the user retries. The
    /// returned estimate is dated today; the confirm step may override that.
    pub async fn request_estimate(
        &self,
        command: EstimateCommand,
    ) -> Result<PendingEstimate, TrackerError> {
        let schema = EstimateSchema::get(command.schema);
        let instruction = schema.instruction();

        let raw_reply = self.backend.generate(&instruction, &command.input).await?;
        info!("model replied with {} bytes", raw_reply.len());

        let parsed = parse_estimate(schema, &raw_reply).map_err(|e| {
            warn!("estimate reply did not match schema {:?}: {}", command.schema, e);
            e
        })?;

        let entry = NutritionEntry {
            date: NutritionEntry::today(),
            food: parsed.food,
            quantity: parsed.quantity,
            calories: parsed.calories,
            protein: parsed.protein,
            fat: parsed.fat,
            fiber: parsed.fiber,
            satiety: None,
        };

        Ok(PendingEstimate {
            entry,
            raw_reply,
            schema: command.schema,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Stub backend returning a canned reply.
    struct FixedReply(&'static str);

    #[async_trait]
    impl ModelBackend for FixedReply {
        async fn generate(
            &self,
            _instruction: &str,
            _input: &EstimateInput,
        ) -> Result<String, TrackerError> {
            Ok(self.0.to_string())
        }
    }

    /// Stub backend that always fails, as on quota exhaustion.
    struct AlwaysFails;

    #[async_trait]
    impl ModelBackend for AlwaysFails {
        async fn generate(
            &self,
            _instruction: &str,
            _input: &EstimateInput,
        ) -> Result<String, TrackerError> {
            Err(TrackerError::EstimationFailed("quota exceeded".into()))
        }
    }

    fn text_command(schema: EstimateSchemaVersion) -> EstimateCommand {
        EstimateCommand {
            input: EstimateInput::Text("a bowl of lentil soup".into()),
            schema,
        }
    }

    #[tokio::test]
    async fn well_formed_reply_becomes_a_pending_estimate() {
        let service = EstimationService::new(Arc::new(FixedReply("Lentil soup, 280, 14, 6, 9")));
        let pending = service
            .request_estimate(text_command(EstimateSchemaVersion::Macros))
            .await
            .unwrap();
        assert_eq!(pending.entry.food, "Lentil soup");
        assert_eq!(pending.entry.calories, 280.0);
        assert_eq!(pending.entry.fiber, Some(9.0));
        assert_eq!(pending.entry.satiety, None);
        assert_eq!(pending.entry.date, NutritionEntry::today());
        assert_eq!(pending.raw_reply, "Lentil soup, 280, 14, 6, 9");
    }

    #[tokio::test]
    async fn malformed_reply_propagates_as_malformed_estimate() {
        let service = EstimationService::new(Arc::new(FixedReply("I cannot identify this food")));
        let err = service
            .request_estimate(text_command(EstimateSchemaVersion::Basic))
            .await
            .unwrap_err();
        assert!(matches!(err, TrackerError::MalformedEstimate(_)));
    }

    #[tokio::test]
    async fn backend_failure_propagates_as_estimation_failed() {
        let service = EstimationService::new(Arc::new(AlwaysFails));
        let err = service
            .request_estimate(text_command(EstimateSchemaVersion::Basic))
            .await
            .unwrap_err();
        assert!(matches!(err, TrackerError::EstimationFailed(_)));
    }
}
