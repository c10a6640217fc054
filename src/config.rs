//! Process-level configuration for the Gemini client.
//!
//! Credentials and the model id are read once at startup and carried in an
//! explicit [`Config`] struct instead of being re-read from the environment
//! by whoever needs them.

use crate::backends::google::DEFAULT_MODEL;
use crate::error::GeminiError;

/// Default request timeout applied when `GEMINI_TIMEOUT_SECS` is unset.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Configuration for talking to the Gemini API.
#[derive(Debug, Clone)]
pub struct Config {
    /// API key for authentication
    pub api_key: String,
    /// Model identifier (e.g. "gemini-2.0-flash")
    pub model: String,
    /// Request timeout in seconds
    pub timeout_seconds: u64,
}

impl Config {
    /// Creates a configuration with the default model and timeout.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: DEFAULT_MODEL.to_string(),
            timeout_seconds: DEFAULT_TIMEOUT_SECS,
        }
    }

    /// Reads the configuration from the environment.
    ///
    /// * `GEMINI_API_KEY` - required; a missing or empty key is a fatal
    ///   configuration error, reported before any network call is attempted
    /// * `GEMINI_MODEL_ID` - optional, defaults to "gemini-2.0-flash"
    /// * `GEMINI_TIMEOUT_SECS` - optional, defaults to 30
    pub fn from_env() -> Result<Self, GeminiError> {
        let api_key = std::env::var("GEMINI_API_KEY")
            .ok()
            .filter(|key| !key.is_empty())
            .ok_or_else(|| {
                GeminiError::AuthError("GEMINI_API_KEY not set in environment".to_string())
            })?;

        let model = std::env::var("GEMINI_MODEL_ID").unwrap_or_else(|_| DEFAULT_MODEL.to_string());

        let timeout_seconds = std::env::var("GEMINI_TIMEOUT_SECS")
            .ok()
            .and_then(|raw| raw.parse().ok())
            .unwrap_or(DEFAULT_TIMEOUT_SECS);

        Ok(Self {
            api_key,
            model,
            timeout_seconds,
        })
    }
}
