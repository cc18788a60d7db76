//! Podcast script generation.
//!
//! [`ScriptWriter`] asks the completion provider for a short script and
//! rejects anything that would not fit the spoken-length budget.

use std::sync::Arc;

use lingproc::WordBudget;
use thiserror::Error;
use tracing::{info, warn};

use crate::model::{ChatMessage, ChatRequest};
use crate::traits::{LLMClient, LLMError};

pub const DEFAULT_MODEL: &str = "gpt-4";

/// Sampling temperature for script generation.
pub const TEMPERATURE: f32 = 0.7;

/// Output token cap that keeps completions short.
pub const MAX_TOKENS: u32 = 120;

#[derive(Debug, Error)]
pub enum ScriptError {
    #[error("Missing prompt parameter")]
    MissingInput,
    #[error("No script generated")]
    EmptyGeneration,
    #[error(
        "Script is too long ({words} words). Maximum allowed is {limit} words for {minutes} minute of speech."
    )]
    ScriptTooLong {
        words: usize,
        limit: usize,
        minutes: u32,
    },
    #[error(transparent)]
    Upstream(#[from] LLMError),
}

impl ScriptError {
    /// `true` for faults caused by the request or the shape of the content,
    /// `false` for provider or network failures.
    pub fn is_client_fault(&self) -> bool {
        !matches!(self, ScriptError::Upstream(_))
    }
}

pub struct ScriptWriter {
    client: Arc<dyn LLMClient>,
    model: String,
    budget: WordBudget,
}

impl ScriptWriter {
    pub fn new(client: Arc<dyn LLMClient>, model: impl Into<String>, budget: WordBudget) -> Self {
        Self {
            client,
            model: model.into(),
            budget,
        }
    }

    pub fn budget(&self) -> WordBudget {
        self.budget
    }

    /// System instruction constraining the script to the budget.
    pub fn system_prompt(&self) -> String {
        format!(
            "You are a podcast script writer. Create a well-structured podcast script with an \
             introduction and main content. The script MUST be short and concise, approximately \
             {} minute when spoken (around {} words). Format the response in a natural, \
             conversational style.",
            self.budget.minutes(),
            self.budget.max_words()
        )
    }

    /// Generate a script for `prompt`.
    pub async fn write(&self, prompt: &str) -> Result<String, ScriptError> {
        if prompt.trim().is_empty() {
            return Err(ScriptError::MissingInput);
        }

        let request = ChatRequest {
            model: self.model.clone(),
            messages: vec![
                ChatMessage::system(self.system_prompt()),
                ChatMessage::user(prompt),
            ],
            temperature: TEMPERATURE,
            max_tokens: MAX_TOKENS,
        };

        let script = match self.client.complete(request).await {
            Ok(Some(text)) if !text.trim().is_empty() => text,
            Ok(_) => return Err(ScriptError::EmptyGeneration),
            Err(e) => {
                warn!(error = %e, "script generation failed");
                return Err(e.into());
            }
        };

        let check = self.budget.check(&script);
        if !check.within() {
            warn!(words = check.words, limit = check.limit, "script over budget");
            return Err(ScriptError::ScriptTooLong {
                words: check.words,
                limit: check.limit,
                minutes: self.budget.minutes(),
            });
        }

        info!(words = check.words, "script generated");
        Ok(script)
    }
}
