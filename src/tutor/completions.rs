//! Client for the plain text-completion endpoint (`/v1/completions`), which the
//! chat client does not cover.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::{TutorError, MAX_TOKENS, TEMPERATURE};

#[derive(Debug, Serialize)]
pub struct CompletionRequest<'a> {
    pub model: &'a str,
    pub prompt: &'a str,
    pub max_tokens: u32,
    pub temperature: f32,
}

#[derive(Debug, Deserialize)]
pub struct CompletionResponse {
    #[serde(default)]
    pub choices: Vec<CompletionChoice>,
}

#[derive(Debug, Deserialize)]
pub struct CompletionChoice {
    #[serde(default)]
    pub text: String,
}

impl CompletionResponse {
    /// Text of the first choice, trimmed.
    pub fn first_text(self) -> Result<String, TutorError> {
        self.choices
            .into_iter()
            .next()
            .map(|choice| choice.text.trim().to_string())
            .filter(|text| !text.is_empty())
            .ok_or(TutorError::EmptyResponse)
    }
}

pub struct CompletionClient {
    http: reqwest::Client,
    url: String,
    api_key: String,
    model: String,
}

impl CompletionClient {
    pub fn new(
        api_base: &str,
        api_key: String,
        model: String,
        timeout: Duration,
    ) -> Result<Self, TutorError> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            url: format!("{}/v1/completions", api_base),
            api_key,
            model,
        })
    }

    pub fn request<'a>(&'a self, prompt: &'a str) -> CompletionRequest<'a> {
        CompletionRequest {
            model: &self.model,
            prompt,
            max_tokens: MAX_TOKENS,
            temperature: TEMPERATURE,
        }
    }

    pub async fn complete(&self, prompt: &str) -> Result<String, TutorError> {
        let response = self
            .http
            .post(&self.url)
            .bearer_auth(&self.api_key)
            .json(&self.request(prompt))
            .send()
            .await?
            .error_for_status()?;

        let body: CompletionResponse = response.json().await?;
        body.first_text()
    }
}
