//! OpenAI chat-completions oracle
use reqwest::Client as HttpClient;
use serde::{Deserialize, Serialize};

use crate::{
    error::{AppError, AppResult},
    services::oracle::Oracle,
};

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 1],
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Clone)]
pub struct OpenAiOracle {
    http_client: HttpClient,
    api_key: String,
    api_url: String,
    model: String,
}

impl OpenAiOracle {
    pub fn new(api_key: String, api_url: String, model: String) -> Self {
        Self {
            http_client: HttpClient::new(),
            api_key,
            api_url,
            model,
        }
    }

    /// Pulls the first answer out of a completion, verbatim
    fn extract_answer(response: ChatResponse) -> AppResult<String> {
        response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| AppError::Oracle("oracle returned no answer".to_string()))
    }
}

#[async_trait::async_trait]
impl Oracle for OpenAiOracle {
    async fn call(&self, prompt: &str) -> AppResult<String> {
        let url = format!("{}/chat/completions", self.api_url.trim_end_matches('/'));
        let request = ChatRequest {
            model: &self.model,
            messages: [ChatMessage {
                role: "user",
                content: prompt,
            }],
        };

        let response = self
            .http_client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| AppError::Oracle(format!("request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::Oracle(format!(
                "API returned status {}: {}",
                status, body
            )));
        }

        let completion: ChatResponse = response
            .json()
            .await
            .map_err(|e| AppError::Oracle(format!("invalid response body: {}", e)))?;

        let answer = Self::extract_answer(completion)?;

        tracing::debug!(oracle = self.name(), answer = %answer, "Oracle answered");

        Ok(answer)
    }

    fn name(&self) -> &'static str {
        "openai"
    }
}
