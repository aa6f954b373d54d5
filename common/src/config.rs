//! Application configuration.
//!
//! Values are loaded once from `.env` and the process environment into plain structs,
//! one per collaborator. Nothing here is global: callers hand each collaborator its own
//! section when constructing it.

use std::env;
use std::str::FromStr;
use thiserror::Error;
use validator::Validate;

use crate::format_validation_errors;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {key}: {value:?}")]
    Invalid { key: &'static str, value: String },
    #[error("invalid configuration: {0}")]
    Validation(String),
}

/// Where and how verbosely to log.
#[derive(Debug, Clone, Validate)]
pub struct LogConfig {
    /// `tracing` filter directive, e.g. `info` or `plagiarism=debug`.
    #[validate(length(min = 1, message = "LOG_LEVEL must not be empty"))]
    pub level: String,
    #[validate(length(min = 1, message = "LOG_DIR must not be empty"))]
    pub dir: String,
    #[validate(length(min = 1, message = "LOG_FILE must not be empty"))]
    pub file: String,
    pub to_stdout: bool,
}

/// Settings for retrieving submitted documents.
#[derive(Debug, Clone, Validate)]
pub struct FetchConfig {
    #[validate(range(min = 1, max = 600, message = "FETCH_TIMEOUT_SECS must be between 1 and 600"))]
    pub timeout_secs: u64,
    #[validate(range(min = 1, message = "FETCH_MAX_BYTES must be positive"))]
    pub max_bytes: u64,
    /// Upper bound on prior submissions downloaded at the same time.
    #[validate(range(min = 1, max = 64, message = "FETCH_CONCURRENCY must be between 1 and 64"))]
    pub concurrency: usize,
}

/// Settings for the AI scoring service.
#[derive(Clone, Validate)]
pub struct EvaluatorConfig {
    pub api_key: String,
    #[validate(url(message = "OPENAI_BASE_URL must be a valid URL"))]
    pub base_url: String,
    #[validate(length(min = 1, message = "OPENAI_MODEL must not be empty"))]
    pub model: String,
    #[validate(range(min = 0.0, max = 2.0, message = "OPENAI_TEMPERATURE must be between 0 and 2"))]
    pub temperature: f32,
}

impl std::fmt::Debug for EvaluatorConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EvaluatorConfig")
            .field("api_key", &if self.api_key.is_empty() { "" } else { "***" })
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .finish()
    }
}

#[derive(Debug, Clone, Validate)]
pub struct Config {
    pub project_name: String,
    #[validate(nested)]
    pub log: LogConfig,
    #[validate(nested)]
    pub fetch: FetchConfig,
    #[validate(nested)]
    pub evaluator: EvaluatorConfig,
}

impl Config {
    /// Loads `.env` (if present) and reads the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup, applying defaults for
    /// missing keys, then validates it.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let text = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.into());

        let config = Config {
            project_name: text("PROJECT_NAME", "plagiarism-checker"),
            log: LogConfig {
                level: text("LOG_LEVEL", "info"),
                dir: text("LOG_DIR", "logs"),
                file: text("LOG_FILE", "plagiarism.log"),
                to_stdout: parse(&lookup, "LOG_TO_STDOUT", true)?,
            },
            fetch: FetchConfig {
                timeout_secs: parse(&lookup, "FETCH_TIMEOUT_SECS", 30)?,
                max_bytes: parse(&lookup, "FETCH_MAX_BYTES", 20 * 1024 * 1024)?,
                concurrency: parse(&lookup, "FETCH_CONCURRENCY", 8)?,
            },
            evaluator: EvaluatorConfig {
                api_key: text("OPENAI_API_KEY", ""),
                base_url: text("OPENAI_BASE_URL", "https://api.openai.com/v1"),
                model: text("OPENAI_MODEL", "gpt-4.1-mini"),
                temperature: parse(&lookup, "OPENAI_TEMPERATURE", 0.2)?,
            },
        };

        config
            .validate()
            .map_err(|e| ConfigError::Validation(format_validation_errors(&e)))?;

        Ok(config)
    }
}

fn parse<F, T>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        None => Ok(default),
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { key, value }),
    }
}
