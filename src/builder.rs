//! Builder module for configuring and instantiating the Gemini client.
//!
//! This module provides a flexible builder pattern for creating and
//! configuring a [`Google`] client with various settings, and for declaring
//! functions the model may invoke.

use crate::{
    backends::google::Google,
    chat::{FunctionTool, ParameterProperty, ParametersSchema, RegisteredTool, ToolHandler},
    config::Config,
    error::GeminiError,
};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;

/// Builder for configuring and instantiating a Gemini client.
///
/// Provides a fluent interface for setting various configuration options
/// like model selection, API keys, generation parameters, etc.
#[derive(Default)]
pub struct GeminiBuilder {
    /// API key for authentication
    api_key: Option<String>,
    /// Model identifier/name to use
    model: Option<String>,
    /// Maximum tokens to generate in responses
    max_tokens: Option<u32>,
    /// Temperature parameter for controlling response randomness (0.0-1.0)
    temperature: Option<f32>,
    /// System prompt/context to guide model behavior
    system: Option<String>,
    /// Request timeout duration in seconds
    timeout_seconds: Option<u64>,
    /// Top-p (nucleus) sampling parameter
    top_p: Option<f32>,
    /// Top-k sampling parameter
    top_k: Option<u32>,
    /// Declared functions with their handlers
    tools: Option<Vec<RegisteredTool>>,
}

impl GeminiBuilder {
    /// Creates a new empty builder instance with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a builder pre-populated from a [`Config`].
    pub fn from_config(config: &Config) -> Self {
        Self::new()
            .api_key(&config.api_key)
            .model(&config.model)
            .timeout_seconds(config.timeout_seconds)
    }

    /// Sets the API key for authentication.
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Sets the model identifier to use.
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Sets the maximum number of tokens to generate.
    pub fn max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    /// Sets the temperature for controlling response randomness (0.0-1.0).
    pub fn temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    /// Sets the system prompt/context.
    pub fn system(mut self, system: impl Into<String>) -> Self {
        self.system = Some(system.into());
        self
    }

    /// Sets the request timeout in seconds.
    pub fn timeout_seconds(mut self, timeout_seconds: u64) -> Self {
        self.timeout_seconds = Some(timeout_seconds);
        self
    }

    /// Sets the top-p (nucleus) sampling parameter.
    pub fn top_p(mut self, top_p: f32) -> Self {
        self.top_p = Some(top_p);
        self
    }

    /// Sets the top-k sampling parameter.
    pub fn top_k(mut self, top_k: u32) -> Self {
        self.top_k = Some(top_k);
        self
    }

    /// Adds a declared function to the builder
    pub fn function(mut self, function_builder: FunctionBuilder) -> Self {
        if self.tools.is_none() {
            self.tools = Some(Vec::new());
        }
        if let Some(tools) = &mut self.tools {
            tools.push(function_builder.build());
        }
        self
    }

    /// Builds and returns a configured Gemini client.
    ///
    /// # Errors
    ///
    /// Returns an error if no API key was provided.
    pub fn build(self) -> Result<Google, GeminiError> {
        let api_key = self
            .api_key
            .ok_or_else(|| GeminiError::InvalidRequest("No API key provided".to_string()))?;

        Ok(Google::new(
            api_key,
            self.model,
            self.max_tokens,
            self.temperature,
            self.timeout_seconds,
            self.system,
            self.top_p,
            self.top_k,
            self.tools,
        ))
    }
}

/// Builder for function parameters
pub struct ParamBuilder {
    name: String,
    property_type: String,
    description: String,
    items: Option<Box<ParameterProperty>>,
    enum_list: Option<Vec<String>>,
}

impl ParamBuilder {
    /// Creates a new parameter builder
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            property_type: "string".to_string(),
            description: String::new(),
            items: None,
            enum_list: None,
        }
    }

    /// Sets the parameter type
    pub fn type_of(mut self, type_str: impl Into<String>) -> Self {
        self.property_type = type_str.into();
        self
    }

    /// Sets the parameter description
    pub fn description(mut self, desc: impl Into<String>) -> Self {
        self.description = desc.into();
        self
    }

    /// Sets the array item type for array parameters
    pub fn items(mut self, item_property: ParameterProperty) -> Self {
        self.items = Some(Box::new(item_property));
        self
    }

    /// Sets the enum values for enum parameters
    pub fn enum_values(mut self, values: Vec<String>) -> Self {
        self.enum_list = Some(values);
        self
    }

    /// Builds the parameter property
    fn build(self) -> (String, ParameterProperty) {
        (
            self.name,
            ParameterProperty {
                property_type: self.property_type,
                description: self.description,
                items: self.items,
                enum_list: self.enum_list,
            },
        )
    }
}

/// Builder for function declarations.
///
/// The declaration (name, parameter schema, description) is what the model
/// sees; the handler attached with [`FunctionBuilder::handler`] is executed
/// when the model requests an invocation.
pub struct FunctionBuilder {
    name: String,
    description: String,
    parameters: Vec<ParamBuilder>,
    required: Vec<String>,
    handler: Option<Arc<ToolHandler>>,
}

impl FunctionBuilder {
    /// Creates a new function builder
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            parameters: Vec::new(),
            required: Vec::new(),
            handler: None,
        }
    }

    /// Sets the function description
    pub fn description(mut self, desc: impl Into<String>) -> Self {
        self.description = desc.into();
        self
    }

    /// Adds a parameter to the function
    pub fn param(mut self, param: ParamBuilder) -> Self {
        self.parameters.push(param);
        self
    }

    /// Marks parameters as required
    pub fn required(mut self, param_names: Vec<String>) -> Self {
        self.required = param_names;
        self
    }

    /// Attaches the handler executed when the model invokes this function
    pub fn handler<F>(mut self, f: F) -> Self
    where
        F: Fn(&Value) -> Result<Value, GeminiError> + Send + Sync + 'static,
    {
        self.handler = Some(Arc::new(f));
        self
    }

    /// Builds the registered tool
    pub fn build(self) -> RegisteredTool {
        let mut properties = HashMap::new();
        for param in self.parameters {
            let (name, prop) = param.build();
            properties.insert(name, prop);
        }

        RegisteredTool {
            function: FunctionTool {
                name: self.name,
                description: self.description,
                parameters: ParametersSchema {
                    schema_type: "object".to_string(),
                    properties,
                    required: self.required,
                },
            },
            handler: self.handler,
        }
    }
}
