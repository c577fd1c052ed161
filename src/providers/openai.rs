use super::{LLMProvider, Message};
use crate::core::error::AgentError;
use crate::providers::base_client::BaseApiClient;
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_MODEL: &str = "gpt-3.5-turbo";

const TEMPERATURE: f64 = 0.7;
const MAX_TOKENS: u32 = 150;

#[derive(Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: &'a [Message],
    temperature: f64,
    max_tokens: u32,
}

#[derive(Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: MessageContent,
}

#[derive(Deserialize)]
struct MessageContent {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Deserialize)]
struct ApiErrorBody {
    error: ApiErrorDetail,
}

#[derive(Deserialize)]
struct ApiErrorDetail {
    message: String,
}

#[derive(Clone)]
pub struct OpenAIProvider {
    client: BaseApiClient,
    model: String,
}

impl OpenAIProvider {
    pub fn with_endpoint(
        endpoint: String,
        api_key: Option<String>,
        model: String,
        timeout: Duration,
    ) -> Result<Self, AgentError> {
        // A missing key is sent as an empty bearer token so the endpoint
        // reports the failure on first use.
        let api_key = Some(api_key.unwrap_or_default());
        Ok(Self {
            client: BaseApiClient::new(endpoint, api_key, timeout)?,
            model,
        })
    }
}

#[async_trait::async_trait]
impl LLMProvider for OpenAIProvider {
    async fn get_response(&self, messages: &[Message]) -> Result<String, AgentError> {
        let payload = ChatCompletionRequest {
            model: &self.model,
            messages,
            temperature: TEMPERATURE,
            max_tokens: MAX_TOKENS,
        };

        let response = self
            .client
            .send_request("chat/completions", &payload)
            .await?;

        let status = response.status();
        let response_body: String = response.text().await?;

        if !status.is_success() {
            let detail = serde_json::from_str::<ApiErrorBody>(&response_body)
                .map(|body| body.error.message)
                .unwrap_or_else(|_| format!("completion endpoint returned {}", status));
            tracing::warn!(%status, "completion request failed");
            return Err(AgentError::Api(detail));
        }

        let parsed: ChatCompletionResponse = serde_json::from_str(&response_body)
            .map_err(|e| AgentError::Api(format!("Malformed completion response: {}", e)))?;

        let first = parsed
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| AgentError::Api("No choices in API response".to_string()))?;

        Ok(first.message.content.unwrap_or_default().trim().to_string())
    }

    fn model(&self) -> &str {
        &self.model
    }
}
