use std::fmt;

use anyhow::{Context, Result};

use crate::llm_client::{DEFAULT_API_URL, DEFAULT_MODEL};

const DEFAULT_PORT: u16 = 8000;
const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Application configuration loaded from environment variables.
/// Startup fails if the inference credential is missing.
#[derive(Clone)]
pub struct Config {
    pub replicate_api_token: String,
    pub replicate_api_url: String,
    pub replicate_model: String,
    pub max_upload_bytes: usize,
    pub port: u16,
    pub rust_log: String,
}

// Manual impl so the inference token never reaches the logs.
impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("replicate_api_token", &"[redacted]")
            .field("replicate_api_url", &self.replicate_api_url)
            .field("replicate_model", &self.replicate_model)
            .field("max_upload_bytes", &self.max_upload_bytes)
            .field("port", &self.port)
            .field("rust_log", &self.rust_log)
            .finish()
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        Ok(Config {
            replicate_api_token: get("REPLICATE_API_TOKEN").with_context(|| {
                "Required environment variable 'REPLICATE_API_TOKEN' is not set".to_string()
            })?,
            replicate_api_url: get("REPLICATE_API_URL")
                .unwrap_or_else(|| DEFAULT_API_URL.to_string()),
            replicate_model: get("REPLICATE_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            max_upload_bytes: match get("MAX_UPLOAD_BYTES") {
                Some(v) => v
                    .parse::<usize>()
                    .context("MAX_UPLOAD_BYTES must be a byte count")?,
                None => DEFAULT_MAX_UPLOAD_BYTES,
            },
            port: match get("PORT") {
                Some(v) => v
                    .parse::<u16>()
                    .context("PORT must be a valid port number")?,
                None => DEFAULT_PORT,
            },
            rust_log: get("RUST_LOG").unwrap_or_else(|| "info".to_string()),
        })
    }
}
