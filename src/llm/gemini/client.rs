use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use url::Url;

use crate::llm::gemini::types::{ErrorResponse, GenerateContentRequest, GenerateContentResponse};
use crate::llm::{Prompt, TextGenerator};

const API_KEY_HEADER: &str = "x-goog-api-key";

/// Talks to the `generateContent` endpoint of one Gemini model.
#[derive(Clone, Debug)]
pub struct GeminiClient {
    http: Client,
    endpoint: Url,
    model: String,
    api_key: String,
}

impl GeminiClient {
    pub fn new(base_url: &str, model: &str, api_key: impl Into<String>) -> Result<Self> {
        let mut base = Url::parse(base_url).with_context(|| format!("Invalid API base URL {base_url}"))?;
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }

        let model = model.trim_start_matches("models/").to_string();
        let endpoint = base
            .join(&format!("v1beta/models/{model}:generateContent"))
            .with_context(|| format!("Invalid model name {model}"))?;

        Ok(Self {
            http: Client::new(),
            endpoint,
            model,
            api_key: api_key.into(),
        })
    }
}

#[async_trait]
impl TextGenerator for GeminiClient {
    #[tracing::instrument(level = "info", skip_all, fields(model = %self.model))]
    async fn generate(&self, prompt: &Prompt<'_>) -> Result<String> {
        let response = self
            .http
            .post(self.endpoint.clone())
            .header(API_KEY_HEADER, &self.api_key)
            .json(&GenerateContentRequest::new(prompt))
            .send()
            .await
            .context("Failed to reach the Gemini API")?;

        let status = response.status();
        if !status.is_success() {
            let detail = match response.json::<ErrorResponse>().await {
                Ok(ErrorResponse { error }) => {
                    format!("{} ({})", error.message, error.status.unwrap_or_default())
                }
                Err(_) => "no error detail".to_string(),
            };
            bail!("Gemini API responded with {status}: {detail}");
        }

        let response: GenerateContentResponse = response
            .json()
            .await
            .context("Failed to decode the Gemini response")?;
        response.into_text()
    }
}
