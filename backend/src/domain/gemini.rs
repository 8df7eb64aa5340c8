//! Gemini `generateContent` client.
//!
//! One blocking round trip per estimate, no retries: a transport error,
//! non-success status, or empty candidate list all surface as
//! `EstimationFailed` for the user to retry manually.

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use reqwest::Client;
use serde::Deserialize;
use serde_json::{json, Value};
use std::time::Duration;

use crate::config::GeminiConfig;
use crate::domain::errors::TrackerError;
use crate::domain::estimation_service::{EstimateInput, ModelBackend};

/// Request timeout. Image analysis on the flash models comfortably fits.
const REQUEST_TIMEOUT_SECS: u64 = 30;
const CONNECT_TIMEOUT_SECS: u64 = 10;

#[derive(Clone)]
pub struct GeminiClient {
    http: Client,
    api_key: String,
    model: String,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

#[derive(Debug, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    text: Option<String>,
}

impl GeminiClient {
    pub fn new(config: &GeminiConfig) -> Result<Self, TrackerError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
            .build()?;
        Ok(Self {
            http,
            api_key: config.api_key.clone(),
            model: config.model.clone(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        )
    }

    /// Assemble the `contents` parts for one request. Text input is folded
    /// into the instruction part; images travel as inline base64 data.
    fn build_parts(instruction: &str, input: &EstimateInput) -> Vec<Value> {
        match input {
            EstimateInput::Text(text) => {
                vec![json!({ "text": format!("{instruction}\n\nFood description: {text}") })]
            }
            EstimateInput::Image { bytes, mime_type } => vec![
                json!({ "text": instruction }),
                json!({
                    "inline_data": {
                        "mime_type": mime_type,
                        "data": BASE64.encode(bytes),
                    }
                }),
            ],
        }
    }
}

#[async_trait]
impl ModelBackend for GeminiClient {
    async fn generate(
        &self,
        instruction: &str,
        input: &EstimateInput,
    ) -> Result<String, TrackerError> {
        let body = json!({
            "contents": [{ "parts": Self::build_parts(instruction, input) }]
        });

        let response = self
            .http
            .post(self.endpoint())
            .query(&[("key", self.api_key.as_str())])
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(TrackerError::EstimationFailed(format!(
                "model endpoint returned {status}: {detail}"
            )));
        }

        let parsed: GenerateContentResponse = response.json().await?;
        let reply: String = parsed
            .candidates
            .into_iter()
            .filter_map(|c| c.content)
            .flat_map(|c| c.parts)
            .filter_map(|p| p.text)
            .collect::<Vec<_>>()
            .join("");

        if reply.trim().is_empty() {
            return Err(TrackerError::EstimationFailed("empty model reply".into()));
        }
        Ok(reply)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_input_is_a_single_part() {
        let parts = GeminiClient::build_parts(
            "Return ONLY a comma-separated list",
            &EstimateInput::Text("two boiled eggs".into()),
        );
        assert_eq!(parts.len(), 1);
        let text = parts[0]["text"].as_str().unwrap();
        assert!(text.starts_with("Return ONLY"));
        assert!(text.contains("two boiled eggs"));
    }

    #[test]
    fn image_input_carries_inline_data() {
        let parts = GeminiClient::build_parts(
            "instruction",
            &EstimateInput::Image {
                bytes: vec![0xFF, 0xD8, 0xFF],
                mime_type: "image/jpeg".into(),
            },
        );
        assert_eq!(parts.len(), 2);
        assert_eq!(parts[1]["inline_data"]["mime_type"], "image/jpeg");
        assert_eq!(parts[1]["inline_data"]["data"], BASE64.encode([0xFF, 0xD8, 0xFF]));
    }

    #[test]
    fn reply_text_is_joined_across_parts() {
        let raw = r#"{
            "candidates": [{
                "content": { "parts": [{ "text": "Apple, " }, { "text": "95, 0.5" }] }
            }]
        }"#;
        let parsed: GenerateContentResponse = serde_json::from_str(raw).unwrap();
        let reply: String = parsed
            .candidates
            .into_iter()
            .filter_map(|c| c.content)
            .flat_map(|c| c.parts)
            .filter_map(|p| p.text)
            .collect::<Vec<_>>()
            .join("");
        assert_eq!(reply, "Apple, 95, 0.5");
    }
}
