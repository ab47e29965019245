use std::env;
use std::error::Error;
use std::fmt;

use dotenv::dotenv;
use reqwest::Client;
use tracing::debug;

use super::endpoints::{CompletionConfig, Message, MessagesRequest, MessagesResponse, Provider};

pub const MESSAGES_URL: &str = "https://api.anthropic.com/v1/messages";
pub const ANTHROPIC_VERSION: &str = "2023-06-01";

#[derive(Debug)]
pub enum ApiConnectionError {
    MissingApiKey(String),
    NetworkError(reqwest::Error),
    SerializationError(serde_json::Error),
    ApiError {
        status: reqwest::StatusCode,
        error_body: String,
    },
    /// The call succeeded but the response carried no text block.
    EmptyResponse,
}

impl fmt::Display for ApiConnectionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiConnectionError::MissingApiKey(key_name) => {
                write!(f, "API key not found in environment: {}", key_name)
            }
            ApiConnectionError::NetworkError(err) => write!(f, "Network error: {}", err),
            ApiConnectionError::SerializationError(err) => {
                write!(f, "Serialization error: {}", err)
            }
            ApiConnectionError::ApiError { status, error_body } => {
                write!(f, "API error {}: {}", status, error_body)
            }
            ApiConnectionError::EmptyResponse => {
                write!(f, "API response contained no text content")
            }
        }
    }
}

impl Error for ApiConnectionError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            ApiConnectionError::NetworkError(err) => Some(err),
            ApiConnectionError::SerializationError(err) => Some(err),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for ApiConnectionError {
    fn from(err: reqwest::Error) -> Self {
        ApiConnectionError::NetworkError(err)
    }
}

impl From<serde_json::Error> for ApiConnectionError {
    fn from(err: serde_json::Error) -> Self {
        ApiConnectionError::SerializationError(err)
    }
}

impl Provider {
    pub fn anthropic(api_key_env_var_name: &str) -> Self {
        dotenv().ok();
        Self::Anthropic {
            api_key_env_var: api_key_env_var_name.to_string(),
        }
    }

    pub async fn call_messages(
        &self,
        request: MessagesRequest,
    ) -> Result<MessagesResponse, ApiConnectionError> {
        match self {
            Provider::Anthropic { api_key_env_var } => {
                dotenv().ok();
                let api_key = env::var(api_key_env_var)
                    .map_err(|_| ApiConnectionError::MissingApiKey(api_key_env_var.clone()))?;

                let client = Client::new();
                let response = client
                    .post(MESSAGES_URL)
                    .header("x-api-key", api_key)
                    .header("anthropic-version", ANTHROPIC_VERSION)
                    .header("Content-Type", "application/json")
                    .json(&request)
                    .send()
                    .await?;

                if response.status().is_success() {
                    let messages_response = response.json::<MessagesResponse>().await?;
                    Ok(messages_response)
                } else {
                    let status = response.status();
                    let error_body = response
                        .text()
                        .await
                        .unwrap_or_else(|_| "Failed to read error body".to_string());
                    Err(ApiConnectionError::ApiError { status, error_body })
                }
            }
        }
    }

    /// Single-turn completion: one user prompt in, the first text block out.
    pub async fn complete(
        &self,
        config: &CompletionConfig,
        prompt: &str,
    ) -> Result<String, ApiConnectionError> {
        let request = MessagesRequest {
            model: config.model.clone(),
            max_tokens: config.max_tokens,
            messages: vec![Message {
                role: "user".to_string(),
                content: prompt.to_string(),
            }],
        };

        let response = self.call_messages(request).await?;
        let text = response
            .first_text()
            .map(|text| text.to_string())
            .ok_or(ApiConnectionError::EmptyResponse)?;
        debug!(
            model = %response.model,
            stop_reason = response.stop_reason.as_deref().unwrap_or("-"),
            chars = text.len(),
            "completion received"
        );
        Ok(text)
    }
}
