//! gemini-kit is a small client for Google's Gemini API with two demo
//! pipelines built on top of it.
//!
//! # Overview
//! The crate provides:
//!
//! - A thin Gemini `generateContent` client with a bounded request timeout
//! - Model-invoked function calling: declare a function with a schema and a
//!   handler, and the client executes it transparently when the model asks
//! - Structured-output validation: a parser that turns untrusted model text
//!   into a validated robot action plan, or fails with the raw output
//!   attached
//!
//! # Architecture
//! The crate is organized into modules that handle different aspects of the
//! two pipelines:

// Re-export for convenience
pub use async_trait::async_trait;

/// Backend implementation for the Gemini API
pub mod backends;

/// Builder pattern for configuring the client and declaring functions
pub mod builder;

/// Chat messages, function declarations and the provider trait
pub mod chat;

/// Process-level configuration (API key, model id, timeout)
pub mod config;

/// Error types and handling
pub mod error;

/// Body Mass Index calculator exposed to the model as a function
pub mod bmi;

/// Robot action plans and the model-output parser
pub mod plan;

/// Prompt construction for the action planner
pub mod prompt;

pub use error::GeminiError;

#[inline]
/// Initialize logging using env_logger if the "logging" feature is enabled.
/// This is a no-op if the feature is not enabled.
pub fn init_logging() {
    #[cfg(feature = "logging")]
    {
        let _ = env_logger::try_init();
    }
}
