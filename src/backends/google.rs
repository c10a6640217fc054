//! Google Gemini API client implementation for chat and function calling.
//!
//! This module provides integration with Google's Gemini models through the
//! v1beta `generateContent` REST endpoint.
//!
//! # Features
//! - Single-shot chat requests with an optional system prompt
//! - Model-invoked function calling: declared functions are surfaced to the
//!   model and their registered handlers are executed transparently, with
//!   results fed back until the model produces final text
//! - Configuration options for temperature, tokens, top_p, top_k etc.
//!
//! # Example
//! ```no_run
//! use gemini_kit::backends::google::Google;
//! use gemini_kit::chat::{ChatMessage, ChatProvider};
//!
//! #[tokio::main]
//! async fn main() {
//! let client = Google::new(
//!     "your-api-key",
//!     None, // Use default model
//!     Some(1000), // Max tokens
//!     Some(0.7), // Temperature
//!     None, // Default timeout
//!     None, // No system prompt
//!     None, // Default top_p
//!     None, // Default top_k
//!     None, // No tools
//! );
//!
//! let messages = vec![ChatMessage::user().content("Hello!").build()];
//!
//! let response = client.chat(&messages).await.unwrap();
//! println!("{}", response);
//! }
//! ```

use crate::{
    chat::{ChatMessage, ChatProvider, ChatRole, FunctionTool, RegisteredTool},
    error::GeminiError,
};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Default model used when none is configured.
pub const DEFAULT_MODEL: &str = "gemini-2.0-flash";

/// Upper bound on function-calling rounds within one chat request.
const MAX_TOOL_TURNS: usize = 4;

/// Client for interacting with Google's Gemini API.
///
/// This struct holds the configuration and state needed to make requests to
/// the Gemini API. It implements the [`ChatProvider`] trait.
pub struct Google {
    /// API key for authentication with Google's API
    pub api_key: String,
    /// Model identifier (e.g. "gemini-2.0-flash")
    pub model: String,
    /// Maximum number of tokens to generate in responses
    pub max_tokens: Option<u32>,
    /// Sampling temperature between 0.0 and 1.0
    pub temperature: Option<f32>,
    /// Optional system prompt to set context
    pub system: Option<String>,
    /// Request timeout in seconds
    pub timeout_seconds: Option<u64>,
    /// Top-p sampling parameter
    pub top_p: Option<f32>,
    /// Top-k sampling parameter
    pub top_k: Option<u32>,
    /// Functions surfaced to the model, with their handlers
    tools: Vec<RegisteredTool>,
    /// HTTP client for making API requests
    client: Client,
}

/// Request body for chat completions
#[derive(Serialize)]
struct GoogleChatRequest {
    /// Conversation turns
    contents: Vec<GoogleContent>,
    /// Function declarations surfaced to the model
    #[serde(skip_serializing_if = "Option::is_none")]
    tools: Option<Vec<GoogleTools>>,
    /// Optional generation parameters
    #[serde(skip_serializing_if = "Option::is_none", rename = "generationConfig")]
    generation_config: Option<GoogleGenerationConfig>,
}

/// Wrapper for function declarations in a request
#[derive(Serialize)]
struct GoogleTools {
    #[serde(rename = "functionDeclarations")]
    function_declarations: Vec<FunctionTool>,
}

/// Individual turn in a chat conversation
#[derive(Serialize, Clone)]
struct GoogleContent {
    /// Role of the turn ("user" or "model")
    role: String,
    /// Content parts of the turn
    parts: Vec<GooglePart>,
}

/// One part of a conversation turn
#[derive(Serialize, Clone)]
enum GooglePart {
    /// Plain text
    #[serde(rename = "text")]
    Text(String),
    /// A function call requested by the model, echoed back in history
    #[serde(rename = "functionCall")]
    FunctionCall(GoogleFunctionCall),
    /// The result of executing a requested function
    #[serde(rename = "functionResponse")]
    FunctionResponse(GoogleFunctionResponse),
}

/// A function invocation requested by the model
#[derive(Serialize, Deserialize, Clone, Debug)]
pub(crate) struct GoogleFunctionCall {
    /// Name of the declared function to invoke
    pub name: String,
    /// Arguments supplied by the model
    #[serde(default)]
    pub args: Value,
}

/// The result of a function invocation, sent back to the model
#[derive(Serialize, Clone)]
struct GoogleFunctionResponse {
    name: String,
    response: Value,
}

/// Configuration parameters for text generation
#[derive(Serialize)]
struct GoogleGenerationConfig {
    /// Maximum tokens to generate
    #[serde(skip_serializing_if = "Option::is_none", rename = "maxOutputTokens")]
    max_output_tokens: Option<u32>,
    /// Sampling temperature
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    /// Top-p sampling parameter
    #[serde(skip_serializing_if = "Option::is_none", rename = "topP")]
    top_p: Option<f32>,
    /// Top-k sampling parameter
    #[serde(skip_serializing_if = "Option::is_none", rename = "topK")]
    top_k: Option<u32>,
}

/// Response from the chat completion API
#[derive(Deserialize)]
struct GoogleChatResponse {
    /// Generated completion candidates
    candidates: Vec<GoogleCandidate>,
}

/// Individual completion candidate
#[derive(Deserialize)]
struct GoogleCandidate {
    /// Content of the candidate response
    content: GoogleResponseContent,
}

/// Content block within a response
#[derive(Deserialize)]
struct GoogleResponseContent {
    /// Parts making up the content
    #[serde(default)]
    parts: Vec<GoogleResponsePart>,
}

/// Individual part of response content
#[derive(Deserialize, Default)]
struct GoogleResponsePart {
    /// Text content of this part
    #[serde(default)]
    text: Option<String>,
    /// Function call requested by the model
    #[serde(default, rename = "functionCall")]
    function_call: Option<GoogleFunctionCall>,
}

impl Google {
    /// Creates a new Google Gemini client with the specified configuration.
    ///
    /// # Arguments
    ///
    /// * `api_key` - Google API key for authentication
    /// * `model` - Model identifier (defaults to "gemini-2.0-flash")
    /// * `max_tokens` - Maximum tokens in response
    /// * `temperature` - Sampling temperature between 0.0 and 1.0
    /// * `timeout_seconds` - Request timeout in seconds
    /// * `system` - System prompt to set context
    /// * `top_p` - Top-p sampling parameter
    /// * `top_k` - Top-k sampling parameter
    /// * `tools` - Functions surfaced to the model
    ///
    /// # Returns
    ///
    /// A new `Google` client instance
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        api_key: impl Into<String>,
        model: Option<String>,
        max_tokens: Option<u32>,
        temperature: Option<f32>,
        timeout_seconds: Option<u64>,
        system: Option<String>,
        top_p: Option<f32>,
        top_k: Option<u32>,
        tools: Option<Vec<RegisteredTool>>,
    ) -> Self {
        let mut builder = Client::builder();
        if let Some(sec) = timeout_seconds {
            builder = builder.timeout(std::time::Duration::from_secs(sec));
        }
        Self {
            api_key: api_key.into(),
            model: model.unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            max_tokens,
            temperature,
            system,
            timeout_seconds,
            top_p,
            top_k,
            tools: tools.unwrap_or_default(),
            client: builder.build().expect("Failed to build reqwest Client"),
        }
    }

    /// Returns the function declarations surfaced to the model.
    pub fn tools(&self) -> &[RegisteredTool] {
        &self.tools
    }

    fn generation_config(&self) -> Option<GoogleGenerationConfig> {
        // Omit generation_config entirely when empty to avoid validation errors
        if self.max_tokens.is_none()
            && self.temperature.is_none()
            && self.top_p.is_none()
            && self.top_k.is_none()
        {
            None
        } else {
            Some(GoogleGenerationConfig {
                max_output_tokens: self.max_tokens,
                temperature: self.temperature,
                top_p: self.top_p,
                top_k: self.top_k,
            })
        }
    }

    /// Sends one generateContent request and returns the first candidate's parts.
    async fn generate_content(
        &self,
        contents: &[GoogleContent],
    ) -> Result<Vec<GoogleResponsePart>, GeminiError> {
        let req_body = GoogleChatRequest {
            contents: contents.to_vec(),
            tools: if self.tools.is_empty() {
                None
            } else {
                Some(vec![GoogleTools {
                    function_declarations: self
                        .tools
                        .iter()
                        .map(|t| t.function.clone())
                        .collect(),
                }])
            },
            generation_config: self.generation_config(),
        };

        let url = format!(
            "https://generativelanguage.googleapis.com/v1beta/models/{model}:generateContent?key={key}",
            model = self.model,
            key = self.api_key
        );

        log::debug!("sending generateContent request to model {}", self.model);

        let resp = self.client.post(&url).json(&req_body).send().await?;

        let status = resp.status();
        if !status.is_success() {
            let error_text = resp.text().await.unwrap_or_default();
            return Err(GeminiError::ProviderError(format!(
                "Google API returned error status {status}: {error_text}"
            )));
        }

        let json_resp: GoogleChatResponse = resp.json().await?;
        let first_candidate = json_resp.candidates.into_iter().next().ok_or_else(|| {
            GeminiError::ProviderError("No candidates returned by Google".to_string())
        })?;

        Ok(first_candidate.content.parts)
    }

    /// Executes a model-requested function call through its registered handler.
    fn run_tool(&self, call: &GoogleFunctionCall) -> Result<Value, GeminiError> {
        let tool = self
            .tools
            .iter()
            .find(|t| t.function.name == call.name)
            .ok_or_else(|| {
                GeminiError::ToolError(format!("model requested unknown function: {}", call.name))
            })?;
        let handler = tool.handler.as_ref().ok_or_else(|| {
            GeminiError::ToolError(format!("no handler registered for function: {}", call.name))
        })?;
        handler(&call.args)
    }
}

#[async_trait]
impl ChatProvider for Google {
    /// Sends a chat request to Google's Gemini API.
    ///
    /// When functions are registered, any function calls the model requests
    /// are executed and their results fed back; the loop is bounded by
    /// `MAX_TOOL_TURNS` rounds.
    ///
    /// # Arguments
    ///
    /// * `messages` - Slice of chat messages representing the conversation
    ///
    /// # Returns
    ///
    /// The model's final response text or an error
    async fn chat(&self, messages: &[ChatMessage]) -> Result<String, GeminiError> {
        if self.api_key.is_empty() {
            return Err(GeminiError::AuthError("Missing Google API key".to_string()));
        }

        let mut contents = Vec::new();

        // Gemini has no dedicated system role; prepend as a user turn
        if let Some(system) = &self.system {
            contents.push(GoogleContent {
                role: "user".to_string(),
                parts: vec![GooglePart::Text(system.clone())],
            });
        }

        for msg in messages {
            contents.push(GoogleContent {
                role: match msg.role {
                    ChatRole::User => "user",
                    ChatRole::Assistant => "model",
                }
                .to_string(),
                parts: vec![GooglePart::Text(msg.content.clone())],
            });
        }

        for _ in 0..MAX_TOOL_TURNS {
            let parts = self.generate_content(&contents).await?;

            let calls: Vec<GoogleFunctionCall> = parts
                .iter()
                .filter_map(|p| p.function_call.clone())
                .collect();

            if calls.is_empty() {
                let response_text = parts
                    .into_iter()
                    .filter_map(|part| part.text)
                    .collect::<Vec<_>>()
                    .join("");
                return Ok(response_text);
            }

            log::debug!("model requested {} function call(s)", calls.len());

            // Echo the model's function calls into history, then answer them
            contents.push(GoogleContent {
                role: "model".to_string(),
                parts: calls.iter().cloned().map(GooglePart::FunctionCall).collect(),
            });

            let mut response_parts = Vec::with_capacity(calls.len());
            for call in &calls {
                let result = self.run_tool(call)?;
                log::debug!("function {} returned {}", call.name, result);
                response_parts.push(GooglePart::FunctionResponse(GoogleFunctionResponse {
                    name: call.name.clone(),
                    response: result,
                }));
            }
            contents.push(GoogleContent {
                role: "user".to_string(),
                parts: response_parts,
            });
        }

        Err(GeminiError::ToolError(format!(
            "function calling did not settle after {MAX_TOOL_TURNS} rounds"
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::{FunctionBuilder, ParamBuilder};
    use serde_json::json;

    fn client_with_tool() -> Google {
        let tool = FunctionBuilder::new("calculate_bmi")
            .description("Calculates BMI")
            .param(
                ParamBuilder::new("weight_kg")
                    .type_of("number")
                    .description("Weight in kilograms"),
            )
            .required(vec!["weight_kg".to_string()])
            .handler(|args| Ok(json!({ "echo": args.clone() })))
            .build();
        Google::new(
            "test-key",
            None,
            Some(512),
            Some(0.7),
            Some(30),
            None,
            None,
            None,
            Some(vec![tool]),
        )
    }

    #[test]
    fn request_body_uses_gemini_wire_fields() {
        let client = client_with_tool();
        let contents = vec![GoogleContent {
            role: "user".to_string(),
            parts: vec![GooglePart::Text("What is my BMI?".to_string())],
        }];
        let req_body = GoogleChatRequest {
            contents,
            tools: Some(vec![GoogleTools {
                function_declarations: client.tools().iter().map(|t| t.function.clone()).collect(),
            }]),
            generation_config: client.generation_config(),
        };

        let body = serde_json::to_value(&req_body).unwrap();
        assert_eq!(body["contents"][0]["role"], "user");
        assert_eq!(body["contents"][0]["parts"][0]["text"], "What is my BMI?");
        let declaration = &body["tools"][0]["functionDeclarations"][0];
        assert_eq!(declaration["name"], "calculate_bmi");
        assert_eq!(declaration["parameters"]["type"], "object");
        assert_eq!(
            declaration["parameters"]["properties"]["weight_kg"]["type"],
            "number"
        );
        assert_eq!(body["generationConfig"]["maxOutputTokens"], 512);
        assert!(body["generationConfig"].get("topP").is_none());
    }

    #[test]
    fn generation_config_omitted_when_unset() {
        let client = Google::new("test-key", None, None, None, None, None, None, None, None);
        assert!(client.generation_config().is_none());
    }

    #[test]
    fn response_with_function_call_deserializes() {
        let raw = r#"{
            "candidates": [{
                "content": {
                    "role": "model",
                    "parts": [{
                        "functionCall": {
                            "name": "calculate_bmi",
                            "args": { "weight_kg": 70.0, "height_cm": 175.0 }
                        }
                    }]
                }
            }]
        }"#;
        let resp: GoogleChatResponse = serde_json::from_str(raw).unwrap();
        let part = &resp.candidates[0].content.parts[0];
        let call = part.function_call.as_ref().unwrap();
        assert_eq!(call.name, "calculate_bmi");
        assert_eq!(call.args["height_cm"], 175.0);
        assert!(part.text.is_none());
    }

    #[test]
    fn run_tool_rejects_unknown_function() {
        let client = client_with_tool();
        let err = client
            .run_tool(&GoogleFunctionCall {
                name: "fly".to_string(),
                args: json!({}),
            })
            .unwrap_err();
        assert!(err.to_string().contains("fly"));
    }

    #[test]
    fn run_tool_executes_registered_handler() {
        let client = client_with_tool();
        let result = client
            .run_tool(&GoogleFunctionCall {
                name: "calculate_bmi".to_string(),
                args: json!({ "weight_kg": 70.0 }),
            })
            .unwrap();
        assert_eq!(result["echo"]["weight_kg"], 70.0);
    }
}
