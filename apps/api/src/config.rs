use std::time::Duration;

use anyhow::{Context, Result};

use crate::evaluation::inference::InferencePolicy;
use crate::llm_client::LlmEndpoint;
use crate::report::clamp_skills_per_page;

pub const DEFAULT_API_VERSION: &str = "2024-02-15-preview";
pub const DEFAULT_FALLBACK_INTERVIEW_DATE: &str = "2025-07-23";
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Application configuration loaded from environment variables.
/// Startup fails if a required variable is missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub azure_openai_endpoint: String,
    pub azure_openai_api_key: String,
    pub azure_openai_deployment: String,
    pub azure_openai_api_version: String,
    /// Redis backs the evaluation cache when set; otherwise it lives in memory.
    pub redis_url: Option<String>,
    pub port: u16,
    pub rust_log: String,
    pub llm_timeout: Duration,
    pub extraction_timeout: Duration,
    pub max_upload_bytes: usize,
    pub pdf_page_limit: usize,
    /// Date quoted to the model when a submission carries none.
    pub fallback_interview_date: String,
    pub skills_per_page: usize,
    pub inference_policy: InferencePolicy,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            azure_openai_endpoint: require_env("AZURE_OPENAI_ENDPOINT")?,
            azure_openai_api_key: require_env("AZURE_OPENAI_API_KEY")?,
            azure_openai_deployment: require_env("AZURE_OPENAI_DEPLOYMENT")?,
            azure_openai_api_version: std::env::var("AZURE_OPENAI_API_VERSION")
                .unwrap_or_else(|_| DEFAULT_API_VERSION.to_string()),
            redis_url: std::env::var("REDIS_URL").ok().filter(|v| !v.trim().is_empty()),
            port: parse_env("PORT", 8080)?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            llm_timeout: Duration::from_secs(parse_env("LLM_TIMEOUT_SECS", 120)?),
            extraction_timeout: Duration::from_secs(parse_env("EXTRACTION_TIMEOUT_SECS", 30)?),
            max_upload_bytes: parse_env("MAX_UPLOAD_BYTES", DEFAULT_MAX_UPLOAD_BYTES)?,
            pdf_page_limit: parse_env("PDF_PAGE_LIMIT", crate::extraction::DEFAULT_PAGE_LIMIT)?,
            fallback_interview_date: std::env::var("FALLBACK_INTERVIEW_DATE")
                .unwrap_or_else(|_| DEFAULT_FALLBACK_INTERVIEW_DATE.to_string()),
            skills_per_page: clamp_skills_per_page(parse_env(
                "SKILLS_PER_PAGE",
                crate::report::DEFAULT_SKILLS_PER_PAGE,
            )?),
            inference_policy: InferencePolicy::default(),
        })
    }

    pub fn llm_endpoint(&self) -> LlmEndpoint {
        LlmEndpoint {
            base_url: self.azure_openai_endpoint.clone(),
            deployment: self.azure_openai_deployment.clone(),
            api_version: self.azure_openai_api_version.clone(),
            api_key: self.azure_openai_api_key.clone(),
        }
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("{key} must be a valid number, got '{raw}'")),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
impl Config {
    /// Defaults with a dummy endpoint; tests never reach the network through it.
    pub fn for_tests() -> Self {
        Config {
            azure_openai_endpoint: "http://127.0.0.1:9".to_string(),
            azure_openai_api_key: "test-key".to_string(),
            azure_openai_deployment: "eval".to_string(),
            azure_openai_api_version: DEFAULT_API_VERSION.to_string(),
            redis_url: None,
            port: 8080,
            rust_log: "debug".to_string(),
            llm_timeout: Duration::from_secs(5),
            extraction_timeout: Duration::from_secs(5),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            pdf_page_limit: crate::extraction::DEFAULT_PAGE_LIMIT,
            fallback_interview_date: DEFAULT_FALLBACK_INTERVIEW_DATE.to_string(),
            skills_per_page: crate::report::DEFAULT_SKILLS_PER_PAGE,
            inference_policy: InferencePolicy::default(),
        }
    }
}
