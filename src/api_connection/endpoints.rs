use std::env;

use serde::{Deserialize, Serialize};

pub const DEFAULT_MODEL: &str = "claude-haiku-4-5-20251001";
pub const DEFAULT_MAX_TOKENS: u32 = 2048;

/// Optional override for the completion model id.
pub const MODEL_ENV_VAR: &str = "MEAL_PLANNER_MODEL";

#[derive(Clone, Debug)]
pub enum Provider {
    Anthropic {
        /// Name of the environment variable holding the API key. The key
        /// itself is only read at call time.
        api_key_env_var: String,
    },
}

/// Model id and output budget for one completion call. Model name and token
/// limits are configuration, not behavior.
#[derive(Clone, Debug)]
pub struct CompletionConfig {
    pub model: String,
    pub max_tokens: u32,
}

impl CompletionConfig {
    pub fn from_env() -> Self {
        CompletionConfig {
            model: env::var(MODEL_ENV_VAR).unwrap_or_else(|_| DEFAULT_MODEL.to_string()),
            max_tokens: DEFAULT_MAX_TOKENS,
        }
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Message {
    pub role: String,
    pub content: String,
}

#[derive(Debug, Serialize, Clone)]
pub struct MessagesRequest {
    pub model: String,
    pub max_tokens: u32,
    pub messages: Vec<Message>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ContentBlock {
    #[serde(rename = "type")]
    pub block_type: String,
    #[serde(default)]
    pub text: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct MessagesUsage {
    pub input_tokens: u32,
    pub output_tokens: u32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct MessagesResponse {
    pub id: String,
    pub model: String,
    pub content: Vec<ContentBlock>,
    #[serde(default)]
    pub stop_reason: Option<String>,
    #[serde(default)]
    pub usage: Option<MessagesUsage>,
}

impl MessagesResponse {
    /// First text block of the response, the `{prompt} -> {text}` side of the
    /// completion contract.
    pub fn first_text(&self) -> Option<&str> {
        self.content
            .iter()
            .find(|block| block.block_type == "text")
            .map(|block| block.text.as_str())
    }
}
