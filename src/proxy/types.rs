//! Request and response types.
//!
//! The willow API types wrap analysis and estimate results for clients;
//! the chat-completion types are the OpenAI-compatible subset spoken to the
//! upstream.

use serde::{Deserialize, Serialize};

use crate::analyzer::QueryAnalysis;
use crate::router::ResourceEstimate;

/// Body of `POST /v1/estimate` and `POST /v1/chat`.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct QueryRequest {
    pub query: String,
}

/// Response of `POST /v1/estimate`.
#[derive(Debug, Clone, Serialize)]
pub struct EstimateResponse {
    pub analysis: QueryAnalysis,
    /// Complexity scaled by the category multiplier
    pub impact: f64,
    pub estimate: ResourceEstimate,
}

/// Flattened estimate shown next to a chat reply.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SustainabilityInfo {
    pub model: String,
    pub provider: String,
    pub location: String,
    pub energy_saved: f64,
    pub co2_saved: f64,
    pub water_saved: f64,
    pub token_count: u64,
}

impl From<&ResourceEstimate> for SustainabilityInfo {
    fn from(estimate: &ResourceEstimate) -> Self {
        Self {
            model: estimate.provider.model.clone(),
            provider: estimate.provider.name.clone(),
            location: estimate.provider.region.clone(),
            energy_saved: estimate.energy_saved,
            co2_saved: estimate.co2_saved,
            water_saved: estimate.water_saved,
            token_count: estimate.token_count,
        }
    }
}

/// Response of `POST /v1/chat`.
#[derive(Debug, Clone, Serialize)]
pub struct ChatReply {
    pub response: String,
    pub sustainability: SustainabilityInfo,
    pub analysis: QueryAnalysis,
}

/// Chat completion request (OpenAI-compatible).
#[derive(Debug, Clone, Serialize)]
pub struct ChatCompletionRequest {
    pub model: String,
    pub messages: Vec<Message>,
}

/// A chat message.
#[derive(Debug, Clone, Serialize)]
pub struct Message {
    pub role: String,
    pub content: String,
}

impl Message {
    pub fn system(content: &str) -> Self {
        Self {
            role: "system".to_string(),
            content: content.to_string(),
        }
    }

    pub fn user(content: &str) -> Self {
        Self {
            role: "user".to_string(),
            content: content.to_string(),
        }
    }
}

impl ChatCompletionRequest {
    /// A single-turn request: optional system prompt, then the user's query.
    pub fn single_turn(model: &str, system_prompt: &str, query: &str) -> Self {
        let mut messages = Vec::with_capacity(2);
        if !system_prompt.is_empty() {
            messages.push(Message::system(system_prompt));
        }
        messages.push(Message::user(query));

        Self {
            model: model.to_string(),
            messages,
        }
    }
}

/// Chat completion response (OpenAI-compatible). Fields willow does not
/// read are ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatCompletionResponse {
    pub choices: Vec<Choice>,
    #[serde(default)]
    pub usage: Option<Usage>,
}

/// A completion choice.
#[derive(Debug, Clone, Deserialize)]
pub struct Choice {
    pub message: ChoiceMessage,
}

/// Assistant message in a choice. `content` may be null upstream.
#[derive(Debug, Clone, Deserialize)]
pub struct ChoiceMessage {
    pub content: Option<String>,
}

/// Token usage statistics.
#[derive(Debug, Clone, Deserialize)]
pub struct Usage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
}

impl ChatCompletionResponse {
    /// Text of the first choice, or `None` when there are no choices.
    /// A null content counts as empty text.
    pub fn first_content(&self) -> Option<&str> {
        self.choices
            .first()
            .map(|c| c.message.content.as_deref().unwrap_or(""))
    }
}
