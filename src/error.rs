use std::fmt;

/// Error types that can occur when talking to the Gemini API or
/// interpreting its output.
#[derive(Debug)]
pub enum GeminiError {
    /// HTTP request/response errors
    HttpError(String),
    /// Authentication and configuration errors (e.g. missing API key)
    AuthError(String),
    /// Invalid request parameters or arguments
    InvalidRequest(String),
    /// Errors returned by the Gemini API
    ProviderError(String),
    /// A registered function could not be resolved or executed
    ToolError(String),
    /// Model output is not a JSON array (or not JSON at all) after cleanup
    ResponseFormatError {
        /// What went wrong
        message: String,
        /// The raw, uncleaned model output for diagnosis
        raw_response: String,
    },
    /// Model output parsed as JSON but violates the action schema
    SchemaValidationError {
        /// What went wrong, naming the offending value
        message: String,
        /// The raw, uncleaned model output for diagnosis
        raw_response: String,
    },
}

impl GeminiError {
    /// Returns the raw model output attached to parse/validation failures.
    pub fn raw_response(&self) -> Option<&str> {
        match self {
            GeminiError::ResponseFormatError { raw_response, .. }
            | GeminiError::SchemaValidationError { raw_response, .. } => Some(raw_response),
            _ => None,
        }
    }
}

impl fmt::Display for GeminiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GeminiError::HttpError(e) => write!(f, "HTTP Error: {}", e),
            GeminiError::AuthError(e) => write!(f, "Auth Error: {}", e),
            GeminiError::InvalidRequest(e) => write!(f, "Invalid Request: {}", e),
            GeminiError::ProviderError(e) => write!(f, "Provider Error: {}", e),
            GeminiError::ToolError(e) => write!(f, "Tool Error: {}", e),
            GeminiError::ResponseFormatError { message, .. } => {
                write!(f, "Response Format Error: {}", message)
            }
            GeminiError::SchemaValidationError { message, .. } => {
                write!(f, "Validation Error: {}", message)
            }
        }
    }
}

impl std::error::Error for GeminiError {}

/// Converts reqwest HTTP errors into GeminiErrors
impl From<reqwest::Error> for GeminiError {
    fn from(err: reqwest::Error) -> Self {
        GeminiError::HttpError(err.to_string())
    }
}
