//! Abstractions for requesting podcast scripts from a language model.
//!
//! The `llm` crate defines a [`LLMClient`] trait along with the
//! [`OpenAiClient`] implementation for OpenAI-compatible chat completion
//! servers. [`ScriptWriter`] turns a user topic into a script that fits the
//! spoken-length budget.

pub mod client;
pub mod model;
pub mod script;
pub mod traits;

pub use client::OpenAiClient;
pub use model::{ChatMessage, ChatRequest, Role};
pub use script::{ScriptError, ScriptWriter, DEFAULT_MODEL};
pub use traits::{LLMClient, LLMError};
