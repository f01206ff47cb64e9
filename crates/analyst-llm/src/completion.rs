//! One chat completion round trip: what is sent and what comes back

use crate::{Message, ToolDefinition};
use serde::{Deserialize, Serialize};

/// Everything a provider needs for one call
///
/// Built with [`CompletionRequest::new`] and the `with_*` methods:
///
/// ```
/// use analyst_llm::{CompletionRequest, Message};
///
/// let request = CompletionRequest::new("databricks-dbrx-instruct", vec![Message::user("SWOT for NVDA")])
///     .with_system("You are a financial analyst")
///     .with_temperature(0.1);
/// assert_eq!(request.max_tokens, 2000);
/// ```
#[derive(Debug, Clone)]
pub struct CompletionRequest {
    /// Model name, or the serving endpoint name on Databricks
    pub model: String,
    pub messages: Vec<Message>,
    pub system: Option<String>,
    pub max_tokens: usize,
    pub temperature: Option<f32>,
    /// `None` keeps the request free of a `tools` field
    pub tools: Option<Vec<ToolDefinition>>,
}

impl CompletionRequest {
    /// Analyst default for the completion budget
    pub const DEFAULT_MAX_TOKENS: usize = 2000;

    pub fn new(model: impl Into<String>, messages: Vec<Message>) -> Self {
        Self {
            model: model.into(),
            messages,
            system: None,
            max_tokens: Self::DEFAULT_MAX_TOKENS,
            temperature: None,
            tools: None,
        }
    }

    pub fn with_system(mut self, system: impl Into<String>) -> Self {
        self.system = Some(system.into());
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: usize) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    /// An empty list is treated as no tools
    pub fn with_tools(mut self, tools: Vec<ToolDefinition>) -> Self {
        self.tools = (!tools.is_empty()).then_some(tools);
        self
    }
}

/// The assistant's reply plus bookkeeping
#[derive(Debug, Clone)]
pub struct CompletionResponse {
    pub message: Message,
    pub stop_reason: StopReason,
    pub usage: TokenUsage,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    EndTurn,
    /// Reply was cut off by `max_tokens`
    MaxTokens,
    ToolUse,
}

/// Prompt and completion token counts
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUsage {
    pub input_tokens: usize,
    pub output_tokens: usize,
}

impl TokenUsage {
    pub fn total(&self) -> usize {
        self.input_tokens + self.output_tokens
    }

    /// Fold another round trip into a running total
    pub fn add(&mut self, other: TokenUsage) {
        self.input_tokens += other.input_tokens;
        self.output_tokens += other.output_tokens;
    }
}
