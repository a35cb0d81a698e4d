use anyhow::Result;
use async_trait::async_trait;
use serde_json::Value;

pub mod gemini;

/// A single-turn request to a text generation provider.
#[derive(Debug)]
pub struct Prompt<'a> {
    /// Instruction the model receives ahead of the user message
    pub system_instruction: &'a str,

    /// Structure the generated JSON output has to follow
    pub response_schema: &'a Value,

    pub user_message: String,
}

/// Produces structured JSON text for a prompt.
///
/// Implementations make exactly one attempt per call and return the provider output
/// untouched; any failure is reported through the error.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, prompt: &Prompt<'_>) -> Result<String>;
}
