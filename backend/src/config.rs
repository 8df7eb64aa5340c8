//! Environment-based configuration.

use anyhow::Context;
use std::net::SocketAddr;
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct GeminiConfig {
    pub api_key: String,
    pub model: String,
    pub base_url: String,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Directory holding the worksheet CSV files
    pub data_dir: PathBuf,
    pub bind_addr: SocketAddr,
    pub gemini: GeminiConfig,
}

impl AppConfig {
    /// Read configuration from the environment. Only the API key is
    /// mandatory; everything else has a sensible default.
    pub fn from_env() -> anyhow::Result<Self> {
        let data_dir = std::env::var("NUTRITION_DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("./data"));
        let bind_addr = std::env::var("BIND_ADDR")
            .unwrap_or_else(|_| "127.0.0.1:3000".to_string())
            .parse::<SocketAddr>()?;
        let gemini = GeminiConfig {
            api_key: std::env::var("GEMINI_API_KEY")
                .context("GEMINI_API_KEY is not set")?,
            model: std::env::var("GEMINI_MODEL")
                .unwrap_or_else(|_| "gemini-1.5-flash".to_string()),
            base_url: std::env::var("GEMINI_BASE_URL")
                .unwrap_or_else(|_| "https://generativelanguage.googleapis.com".to_string()),
        };
        Ok(Self { data_dir, bind_addr, gemini })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_api_key_names_the_variable() {
        std::env::remove_var("GEMINI_API_KEY");
        let err = AppConfig::from_env().unwrap_err();
        assert!(err.to_string().contains("GEMINI_API_KEY"));
    }
}
