//! Agent executor for running tool-calling loops
//!
//! The loop:
//! 1. Call the LLM with the conversation and the registered tools
//! 2. If it asked for tools, run them, append the results and go again
//! 3. On end of turn, return the final text
//!
//! Every tool invocation is recorded as a [`ToolStep`] so callers can show
//! the intermediate work next to the answer.

use analyst_core::{Error, Result};
use analyst_llm::{
    CompletionRequest, ContentBlock, LLMProvider, Message, StopReason, TokenUsage, ToolDefinition,
};
use analyst_tools::ToolRegistry;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Final text returned when the loop hits its iteration cap
pub const ITERATION_LIMIT_MESSAGE: &str = "Agent stopped due to iteration limit.";

/// One tool invocation made during a run
#[derive(Debug, Clone, Serialize)]
pub struct ToolStep {
    /// Tool name as requested by the model
    pub tool: String,
    /// Tool call id assigned by the model
    pub call_id: String,
    /// Arguments the model passed
    pub input: Value,
    /// Text fed back to the model
    pub output: String,
    /// Whether the tool failed (or did not exist)
    pub is_error: bool,
    /// Wall-clock time spent in the tool
    pub duration_ms: u64,
}

/// Result of a complete run
#[derive(Debug, Clone, Serialize)]
pub struct ExecutionOutcome {
    /// Final answer text
    pub output: String,
    /// Tool invocations in call order
    pub steps: Vec<ToolStep>,
    /// LLM round trips made
    pub iterations: usize,
    /// Tokens used across all round trips
    pub usage: TokenUsage,
}

/// Configuration for agent execution
#[derive(Debug, Clone)]
pub struct ExecutorConfig {
    /// Upper bound on LLM round trips
    pub max_iterations: usize,

    /// Model or serving endpoint name
    pub model: String,

    /// System prompt
    pub system_prompt: Option<String>,

    /// Max tokens per completion
    pub max_tokens: usize,

    /// Temperature
    pub temperature: Option<f32>,
}

impl Default for ExecutorConfig {
    fn default() -> Self {
        Self {
            max_iterations: 10,
            model: "databricks-dbrx-instruct".to_string(),
            system_prompt: None,
            max_tokens: 2000,
            temperature: Some(0.1),
        }
    }
}

/// Executes an agent loop: LLM → tool calls → execution → loop back
pub struct AgentExecutor {
    provider: Arc<dyn LLMProvider>,
    tool_registry: Arc<ToolRegistry>,
    config: ExecutorConfig,
}

impl AgentExecutor {
    /// Create a new agent executor
    pub fn new(
        provider: Arc<dyn LLMProvider>,
        tool_registry: Arc<ToolRegistry>,
        config: ExecutorConfig,
    ) -> Self {
        Self {
            provider,
            tool_registry,
            config,
        }
    }

    /// Create a builder
    pub fn builder() -> AgentExecutorBuilder {
        AgentExecutorBuilder::new()
    }

    /// Executor configuration
    pub fn config(&self) -> &ExecutorConfig {
        &self.config
    }

    /// Run the loop for one user message and return the final text
    pub async fn run(&self, user_message: String) -> Result<String> {
        Ok(self.run_with_steps(user_message).await?.output)
    }

    /// Run the loop for one user message, keeping the intermediate steps
    pub async fn run_with_steps(&self, user_message: String) -> Result<ExecutionOutcome> {
        self.run_with_history(user_message, Vec::new()).await
    }

    /// Run the loop after previous conversation turns
    pub async fn run_with_history(
        &self,
        user_message: String,
        history: Vec<Message>,
    ) -> Result<ExecutionOutcome> {
        let mut conversation = history;
        conversation.push(Message::user(user_message));
        self.run_conversation(conversation).await
    }

    async fn run_conversation(&self, mut conversation: Vec<Message>) -> Result<ExecutionOutcome> {
        let tools = self.build_tool_definitions();
        let mut steps = Vec::new();
        let mut usage = TokenUsage::default();

        for iteration in 1..=self.config.max_iterations {
            info!(
                iteration,
                max_iterations = self.config.max_iterations,
                model = %self.config.model,
                tool_count = tools.len(),
                "agent iteration started"
            );

            let response = self
                .provider
                .complete(self.build_request(&conversation, &tools))
                .await
                .map_err(|e| Error::ProcessingFailed(e.to_string()))?;

            usage.add(response.usage);

            let preview: String = response
                .message
                .text()
                .unwrap_or("")
                .chars()
                .take(300)
                .collect();
            debug!(stop_reason = ?response.stop_reason, preview = %preview, "LLM response received");

            let wants_tools =
                response.stop_reason == StopReason::ToolUse || response.message.has_tool_uses();
            conversation.push(response.message.clone());

            if !wants_tools {
                if response.stop_reason == StopReason::MaxTokens {
                    warn!("LLM response truncated at max tokens");
                }
                let output = response.message.text().unwrap_or_default().to_string();

                info!(iteration, steps = steps.len(), "agent completed");
                return Ok(ExecutionOutcome {
                    output,
                    steps,
                    iterations: iteration,
                    usage,
                });
            }

            let (results, mut new_steps) = self.execute_tools(&response.message).await;
            if results.is_empty() {
                return Err(Error::ProcessingFailed(
                    "model signalled tool use without any tool calls".to_string(),
                ));
            }
            conversation.extend(results);
            steps.append(&mut new_steps);
        }

        warn!(
            max_iterations = self.config.max_iterations,
            "max iterations reached, stopping"
        );
        Ok(ExecutionOutcome {
            output: ITERATION_LIMIT_MESSAGE.to_string(),
            steps,
            iterations: self.config.max_iterations,
            usage,
        })
    }

    fn build_request(&self, conversation: &[Message], tools: &[ToolDefinition]) -> CompletionRequest {
        let mut request = CompletionRequest::new(&self.config.model, conversation.to_vec())
            .with_max_tokens(self.config.max_tokens)
            .with_tools(tools.to_vec());

        if let Some(system) = &self.config.system_prompt {
            request = request.with_system(system.clone());
        }
        if let Some(temperature) = self.config.temperature {
            request = request.with_temperature(temperature);
        }
        request
    }

    fn build_tool_definitions(&self) -> Vec<ToolDefinition> {
        self.tool_registry
            .list_tools()
            .iter()
            .map(|tool| ToolDefinition::new(tool.name(), tool.description(), tool.input_schema()))
            .collect()
    }

    /// Run each requested tool; failures are reported back to the model, not raised.
    async fn execute_tools(&self, message: &Message) -> (Vec<Message>, Vec<ToolStep>) {
        let mut results = Vec::new();
        let mut steps = Vec::new();

        for block in message.tool_uses() {
            let ContentBlock::ToolUse { id, name, input } = block else {
                continue;
            };

            info!(tool_name = %name, tool_id = %id, input = %input, "executing tool");

            let start = Instant::now();
            let outcome = match self.tool_registry.get(name) {
                Some(tool) => tool.execute(input.clone()).await.map(|v| render_tool_output(&v)),
                None => Err(Error::InvalidInput(format!("{name} is not a valid tool"))),
            };
            let duration_ms = start.elapsed().as_millis() as u64;

            let step = match outcome {
                Ok(output) => {
                    info!(tool_name = %name, duration_ms, output_len = output.len(), "tool succeeded");
                    results.push(Message::tool_result(id.clone(), output.clone()));
                    ToolStep {
                        tool: name.clone(),
                        call_id: id.clone(),
                        input: input.clone(),
                        output,
                        is_error: false,
                        duration_ms,
                    }
                }
                Err(e) => {
                    warn!(tool_name = %name, duration_ms, error = %e, "tool failed");
                    let output = format!("Error: {e}");
                    results.push(Message::tool_error(id.clone(), output.clone()));
                    ToolStep {
                        tool: name.clone(),
                        call_id: id.clone(),
                        input: input.clone(),
                        output,
                        is_error: true,
                        duration_ms,
                    }
                }
            };

            steps.push(step);
        }

        (results, steps)
    }
}

fn render_tool_output(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Builder for AgentExecutor
pub struct AgentExecutorBuilder {
    provider: Option<Arc<dyn LLMProvider>>,
    tool_registry: Arc<ToolRegistry>,
    config: ExecutorConfig,
}

impl AgentExecutorBuilder {
    /// Create a new builder
    pub fn new() -> Self {
        Self {
            provider: None,
            tool_registry: Arc::new(ToolRegistry::new()),
            config: ExecutorConfig::default(),
        }
    }

    /// Set the LLM provider
    pub fn provider(mut self, provider: Arc<dyn LLMProvider>) -> Self {
        self.provider = Some(provider);
        self
    }

    /// Set the tool registry
    pub fn tool_registry(mut self, registry: Arc<ToolRegistry>) -> Self {
        self.tool_registry = registry;
        self
    }

    /// Set the full configuration
    pub fn config(mut self, config: ExecutorConfig) -> Self {
        self.config = config;
        self
    }

    /// Set maximum iterations
    pub fn max_iterations(mut self, max: usize) -> Self {
        self.config.max_iterations = max;
        self
    }

    /// Set the model
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.config.model = model.into();
        self
    }

    /// Set the system prompt
    pub fn system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.config.system_prompt = Some(prompt.into());
        self
    }

    /// Set max tokens
    pub fn max_tokens(mut self, max_tokens: usize) -> Self {
        self.config.max_tokens = max_tokens;
        self
    }

    /// Set temperature
    pub fn temperature(mut self, temperature: f32) -> Self {
        self.config.temperature = Some(temperature);
        self
    }

    /// Build the executor
    pub fn build(self) -> Result<AgentExecutor> {
        let provider = self
            .provider
            .ok_or_else(|| Error::InitializationFailed("Provider not set".to_string()))?;

        Ok(AgentExecutor::new(provider, self.tool_registry, self.config))
    }
}

impl Default for AgentExecutorBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Scripted LLM provider for tests of code built on the executor
///
/// Enabled inside this crate's tests and, for dependents, through the
/// `testing` feature.
#[cfg(any(test, feature = "testing"))]
pub mod testing {
    use analyst_llm::{CompletionRequest, CompletionResponse, LLMError, LLMProvider, Message};
    use analyst_llm::{ContentBlock, StopReason, TokenUsage};
    use async_trait::async_trait;
    use serde_json::Value;
    use std::collections::VecDeque;
    use std::sync::{Mutex, MutexGuard, PoisonError};

    /// Provider that replays canned responses and records requests
    pub struct ScriptedProvider {
        responses: Mutex<VecDeque<CompletionResponse>>,
        requests: Mutex<Vec<CompletionRequest>>,
    }

    impl ScriptedProvider {
        pub fn new(responses: Vec<CompletionResponse>) -> Self {
            Self {
                responses: Mutex::new(responses.into()),
                requests: Mutex::new(Vec::new()),
            }
        }

        /// Requests received so far, oldest first
        pub fn requests(&self) -> MutexGuard<'_, Vec<CompletionRequest>> {
            self.requests.lock().unwrap_or_else(PoisonError::into_inner)
        }
    }

    #[async_trait]
    impl LLMProvider for ScriptedProvider {
        async fn complete(&self, request: CompletionRequest) -> analyst_llm::Result<CompletionResponse> {
            self.requests().push(request);
            self.responses
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .pop_front()
                .ok_or_else(|| LLMError::RequestFailed("script exhausted".to_string()))
        }

        fn name(&self) -> &str {
            "scripted"
        }
    }

    pub fn text(answer: &str) -> CompletionResponse {
        CompletionResponse {
            message: Message::assistant(answer),
            stop_reason: StopReason::EndTurn,
            usage: TokenUsage {
                input_tokens: 10,
                output_tokens: 5,
            },
        }
    }

    pub fn tool_call(id: &str, name: &str, input: Value) -> CompletionResponse {
        CompletionResponse {
            message: Message::assistant_blocks(vec![ContentBlock::ToolUse {
                id: id.to_string(),
                name: name.to_string(),
                input,
            }]),
            stop_reason: StopReason::ToolUse,
            usage: TokenUsage {
                input_tokens: 10,
                output_tokens: 5,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::testing::{ScriptedProvider, text, tool_call};
    use super::*;
    use analyst_llm::MessageContent;
    use analyst_tools::Tool;
    use async_trait::async_trait;
    use serde_json::json;

    struct UpperTool;

    #[async_trait]
    impl Tool for UpperTool {
        async fn execute(&self, params: Value) -> Result<Value> {
            let ticker = params["ticker"]
                .as_str()
                .ok_or_else(|| Error::InvalidInput("ticker is required".to_string()))?;
            Ok(json!({ "ticker": ticker.to_uppercase(), "report": "ok" }))
        }

        fn name(&self) -> &str {
            "upper"
        }

        fn description(&self) -> &str {
            "Upper-cases a ticker"
        }

        fn input_schema(&self) -> Value {
            json!({ "type": "object", "properties": { "ticker": { "type": "string" } } })
        }
    }

    fn registry() -> Arc<ToolRegistry> {
        let registry = ToolRegistry::new();
        registry.register(Arc::new(UpperTool));
        Arc::new(registry)
    }

    #[test]
    fn test_builder() {
        let builder = AgentExecutorBuilder::new()
            .model("test-model")
            .max_iterations(5)
            .system_prompt("Test prompt");

        assert_eq!(builder.config.model, "test-model");
        assert_eq!(builder.config.max_iterations, 5);
        assert_eq!(builder.config.system_prompt, Some("Test prompt".to_string()));
    }

    #[test]
    fn test_default_config() {
        let config = ExecutorConfig::default();
        assert_eq!(config.max_iterations, 10);
        assert_eq!(config.model, "databricks-dbrx-instruct");
        assert_eq!(config.max_tokens, 2000);
        assert_eq!(config.temperature, Some(0.1));
    }

    #[test]
    fn test_build_without_provider_fails() {
        assert!(AgentExecutorBuilder::new().build().is_err());
    }

    #[tokio::test]
    async fn test_tool_loop_records_steps() {
        let provider = Arc::new(ScriptedProvider::new(vec![
            tool_call("call_1", "upper", json!({ "ticker": "aapl" })),
            text("AAPL looks healthy"),
        ]));
        let executor = AgentExecutor::builder()
            .provider(provider.clone())
            .tool_registry(registry())
            .system_prompt("analyst")
            .build()
            .unwrap();

        let outcome = executor.run_with_steps("How is apple?".into()).await.unwrap();

        assert_eq!(outcome.output, "AAPL looks healthy");
        assert_eq!(outcome.iterations, 2);
        assert_eq!(outcome.usage.total(), 30);
        assert_eq!(outcome.steps.len(), 1);
        assert_eq!(outcome.steps[0].tool, "upper");
        assert!(!outcome.steps[0].is_error);
        assert!(outcome.steps[0].output.contains("\"AAPL\""));

        let requests = provider.requests();
        assert_eq!(requests.len(), 2);
        assert_eq!(requests[0].system.as_deref(), Some("analyst"));
        assert_eq!(requests[0].tools.as_ref().map(Vec::len), Some(1));
        // user, assistant tool call, tool result
        assert_eq!(requests[1].messages.len(), 3);
        assert!(matches!(
            requests[1].messages[2].content,
            Some(MessageContent::Blocks(_))
        ));
    }

    #[tokio::test]
    async fn test_unknown_tool_is_reported_to_model() {
        let provider = Arc::new(ScriptedProvider::new(vec![
            tool_call("call_1", "nope", json!({})),
            text("sorry"),
        ]));
        let executor = AgentExecutor::builder()
            .provider(provider)
            .tool_registry(registry())
            .build()
            .unwrap();

        let outcome = executor.run_with_steps("hi".into()).await.unwrap();
        assert_eq!(outcome.output, "sorry");
        assert!(outcome.steps[0].is_error);
        assert!(outcome.steps[0].output.contains("nope is not a valid tool"));
    }

    #[tokio::test]
    async fn test_tool_error_is_recorded() {
        let provider = Arc::new(ScriptedProvider::new(vec![
            tool_call("call_1", "upper", json!({})),
            text("could not fetch"),
        ]));
        let executor = AgentExecutor::builder()
            .provider(provider)
            .tool_registry(registry())
            .build()
            .unwrap();

        let outcome = executor.run_with_steps("hi".into()).await.unwrap();
        assert!(outcome.steps[0].is_error);
        assert!(outcome.steps[0].output.starts_with("Error: "));
    }

    #[tokio::test]
    async fn test_iteration_cap() {
        let responses = (0..3)
            .map(|i| tool_call(&format!("call_{i}"), "upper", json!({ "ticker": "msft" })))
            .collect();
        let provider = Arc::new(ScriptedProvider::new(responses));
        let executor = AgentExecutor::builder()
            .provider(provider.clone())
            .tool_registry(registry())
            .max_iterations(3)
            .build()
            .unwrap();

        let outcome = executor.run_with_steps("loop".into()).await.unwrap();
        assert_eq!(outcome.output, ITERATION_LIMIT_MESSAGE);
        assert_eq!(outcome.steps.len(), 3);
        assert_eq!(provider.requests().len(), 3);
    }

    #[tokio::test]
    async fn test_provider_error_propagates() {
        let executor = AgentExecutor::builder()
            .provider(Arc::new(ScriptedProvider::new(vec![])))
            .build()
            .unwrap();

        let err = executor.run("hi".into()).await.unwrap_err();
        assert!(err.to_string().contains("script exhausted"));
    }
}
