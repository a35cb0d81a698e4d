use anyhow::{bail, Context, Result};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::grading::rubric::ALLOWED_SCORES;

#[derive(Deserialize, Debug)]
pub struct GradingRequest {
    #[serde(default, alias = "tema", deserialize_with = "falsy_as_none")]
    pub topic: Option<String>,
    #[serde(default, alias = "texto", deserialize_with = "falsy_as_none")]
    pub text: Option<String>,
}

/// `null`, `false` and `0` read as absent; any other non-string is rejected.
fn falsy_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(value) => Ok(Some(value)),
        Value::Null | Value::Bool(false) => Ok(None),
        Value::Number(number) if number.as_f64() == Some(0.0) => Ok(None),
        other => Err(D::Error::custom(format!("expected a string, found {other}"))),
    }
}

/// A submission with both fields present and non-empty.
#[derive(Debug, Clone, Copy)]
pub struct Essay<'a> {
    pub topic: &'a str,
    pub text: &'a str,
}

impl GradingRequest {
    pub fn essay(&self) -> Option<Essay<'_>> {
        match (self.topic.as_deref(), self.text.as_deref()) {
            (Some(topic), Some(text)) if !topic.is_empty() && !text.is_empty() => {
                Some(Essay { topic, text })
            }
            _ => None,
        }
    }
}

/// Typed mirror of the grading schema, used when upstream output is checked.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GradingResult {
    pub score_c1: f64,
    pub comment_c1: String,
    pub score_c2: f64,
    pub comment_c2: String,
    pub score_c3: f64,
    pub comment_c3: String,
    pub score_c4: f64,
    pub comment_c4: String,
    pub score_c5: f64,
    pub comment_c5: String,
    pub overall_comments: String,
}

impl GradingResult {
    pub fn scores(&self) -> [f64; 5] {
        [
            self.score_c1,
            self.score_c2,
            self.score_c3,
            self.score_c4,
            self.score_c5,
        ]
    }

    /// Parses upstream output and rejects scores outside the allowed set.
    pub fn parse_checked(raw: &str) -> Result<Self> {
        let result: GradingResult =
            serde_json::from_str(raw).context("Upstream output does not match the grading schema")?;

        for (index, score) in result.scores().into_iter().enumerate() {
            if !ALLOWED_SCORES.iter().any(|allowed| f64::from(*allowed) == score) {
                bail!(
                    "Score {score} for competency C{} is not one of {:?}",
                    index + 1,
                    ALLOWED_SCORES
                );
            }
        }
        Ok(result)
    }
}
