//! Grounding prompt assembly.

use serde::{Deserialize, Serialize};

use crate::error::{RagError, Result};
use crate::models::RetrievalResult;

/// Placeholder replaced by the bulleted context in a custom template.
pub const CONTEXT_PLACEHOLDER: &str = "{context}";

pub const DEFAULT_TEMPLATE: &str = "You are a helpful chatbot.
Use only the following pieces of context to answer the question. Don't make up any new information:
{context}
";

/// System instruction and user message for one generation call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Prompt {
    pub system: String,
    pub user: String,
}

/// Builds the system instruction that confines the model to the retrieved
/// chunks.
///
/// An empty retrieval still yields a complete instruction with an empty
/// context section; the model is left to say it does not know.
#[derive(Debug, Clone)]
pub struct PromptAssembler {
    template: String,
}

impl Default for PromptAssembler {
    fn default() -> Self {
        Self {
            template: DEFAULT_TEMPLATE.to_string(),
        }
    }
}

impl PromptAssembler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use `template` instead of the built-in instruction. It must contain
    /// [`CONTEXT_PLACEHOLDER`] exactly once.
    pub fn with_template(template: impl Into<String>) -> Result<Self> {
        let template = template.into();
        match template.matches(CONTEXT_PLACEHOLDER).count() {
            1 => Ok(Self { template }),
            0 => Err(RagError::invalid_config(format!(
                "prompt template must contain {CONTEXT_PLACEHOLDER}"
            ))),
            _ => Err(RagError::invalid_config(format!(
                "prompt template must contain {CONTEXT_PLACEHOLDER} only once"
            ))),
        }
    }

    pub fn template(&self) -> &str {
        &self.template
    }

    pub fn assemble(&self, retrieved: &RetrievalResult, query: &str) -> Prompt {
        let context = retrieved
            .chunks()
            .map(|chunk| format!(" - {chunk}"))
            .collect::<Vec<_>>()
            .join("\n");

        Prompt {
            system: self.template.replacen(CONTEXT_PLACEHOLDER, &context, 1),
            user: query.to_string(),
        }
    }
}
