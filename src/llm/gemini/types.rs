use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::llm::Prompt;

/// Finish reasons that mean the candidate text cannot be trusted.
const BLOCKING_FINISH_REASONS: [&str; 2] = ["SAFETY", "RECITATION"];

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub(crate) struct GenerateContentRequest<'a> {
    pub(crate) system_instruction: Content<'a>,
    pub(crate) contents: Vec<Content<'a>>,
    pub(crate) generation_config: GenerationConfig<'a>,
}

#[derive(Serialize, Debug)]
pub(crate) struct Content<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) role: Option<&'a str>,
    pub(crate) parts: Vec<Part<'a>>,
}

#[derive(Serialize, Debug)]
pub(crate) struct Part<'a> {
    pub(crate) text: &'a str,
}

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub(crate) struct GenerationConfig<'a> {
    pub(crate) response_mime_type: &'a str,
    pub(crate) response_schema: &'a Value,
}

impl<'a> GenerateContentRequest<'a> {
    pub(crate) fn new(prompt: &'a Prompt<'_>) -> Self {
        GenerateContentRequest {
            system_instruction: Content {
                role: None,
                parts: vec![Part {
                    text: prompt.system_instruction,
                }],
            },
            contents: vec![Content {
                role: Some("user"),
                parts: vec![Part {
                    text: &prompt.user_message,
                }],
            }],
            generation_config: GenerationConfig {
                response_mime_type: "application/json",
                response_schema: prompt.response_schema,
            },
        }
    }
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub(crate) struct GenerateContentResponse {
    #[serde(default)]
    pub(crate) candidates: Vec<Candidate>,
    pub(crate) prompt_feedback: Option<PromptFeedback>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub(crate) struct Candidate {
    pub(crate) content: Option<CandidateContent>,
    pub(crate) finish_reason: Option<String>,
}

#[derive(Deserialize, Debug)]
pub(crate) struct CandidateContent {
    #[serde(default)]
    pub(crate) parts: Vec<CandidatePart>,
}

#[derive(Deserialize, Debug)]
pub(crate) struct CandidatePart {
    pub(crate) text: Option<String>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub(crate) struct PromptFeedback {
    pub(crate) block_reason: Option<String>,
}

#[derive(Deserialize, Debug)]
pub(crate) struct ErrorResponse {
    pub(crate) error: ErrorBody,
}

#[derive(Deserialize, Debug)]
pub(crate) struct ErrorBody {
    pub(crate) message: String,
    pub(crate) status: Option<String>,
}

impl GenerateContentResponse {
    /// Joins the text parts of the first candidate.
    pub(crate) fn into_text(self) -> Result<String> {
        if let Some(reason) = self.prompt_feedback.and_then(|f| f.block_reason) {
            bail!("Prompt was blocked by Gemini: {reason}");
        }
        let Some(candidate) = self.candidates.into_iter().next() else {
            bail!("Gemini returned no candidates");
        };
        if let Some(reason) = candidate.finish_reason.as_deref() {
            if BLOCKING_FINISH_REASONS.contains(&reason) {
                bail!("Gemini stopped generating: {reason}");
            }
        }

        let text: String = candidate
            .content
            .map(|content| content.parts)
            .unwrap_or_default()
            .into_iter()
            .filter_map(|part| part.text)
            .collect();
        if text.is_empty() {
            bail!("Gemini candidate carried no text");
        }
        Ok(text)
    }
}
