//! Groq Client
//!
//! LLM client implementation for the Groq API (OpenAI-compatible
//! chat-completions wire format).

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use serde::Deserialize;

use super::llm_client::LlmClient;

/// Default Groq model
const DEFAULT_MODEL: &str = "llama-3.1-8b-instant";

const API_URL: &str = "https://api.groq.com/openai/v1/chat/completions";

/// Groq API client
#[derive(Clone)]
pub struct GroqClient {
    api_key: String,
    client: reqwest::Client,
    model: String,
}

impl GroqClient {
    /// Create a new Groq client with the given API key and the default
    /// model. Model selection lives in [`crate::config::AppConfig`]; this
    /// constructor reads nothing from the environment.
    pub fn new(api_key: String) -> Self {
        Self::with_model(api_key, DEFAULT_MODEL)
    }

    /// Create with a specific model
    pub fn with_model(api_key: String, model: &str) -> Self {
        Self {
            api_key,
            client: reqwest::Client::new(),
            model: model.to_string(),
        }
    }

    /// Internal API call implementation
    async fn call_api(&self, system_prompt: &str, user_prompt: &str) -> Result<String> {
        let response = self
            .client
            .post(API_URL)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&serde_json::json!({
                "model": &self.model,
                "messages": [
                    {"role": "system", "content": system_prompt},
                    {"role": "user", "content": user_prompt}
                ],
                "temperature": 0.1,
                "stream": false
            }))
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(anyhow!("Groq API error {}: {}", status, body));
        }

        #[derive(Deserialize)]
        struct Message {
            content: String,
        }
        #[derive(Deserialize)]
        struct Choice {
            message: Message,
        }
        #[derive(Deserialize)]
        struct ApiResponse {
            choices: Vec<Choice>,
        }

        let api_response: ApiResponse = response.json().await?;
        api_response
            .choices
            .first()
            .map(|c| c.message.content.clone())
            .ok_or_else(|| anyhow!("Groq returned no choices"))
    }
}

#[async_trait]
impl LlmClient for GroqClient {
    async fn chat(&self, system_prompt: &str, user_prompt: &str) -> Result<String> {
        self.call_api(system_prompt, user_prompt).await
    }

    fn model_name(&self) -> &str {
        &self.model
    }

    fn provider_name(&self) -> &str {
        "Groq"
    }
}
