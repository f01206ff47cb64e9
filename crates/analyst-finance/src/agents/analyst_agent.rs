//! LLM-orchestrated financial analyst
//!
//! The model decides which analysis tools to call; the executor runs them and
//! feeds the reports back until the model answers.

use crate::analyst::FinancialAnalyst;
use crate::prompts::SYSTEM_PROMPT;
use crate::tools::register_tools;
use analyst_core::{Agent, Context, Result};
use analyst_llm::LLMProvider;
use analyst_runtime::{AgentRuntime, ExecutorConfig, ToolAgent, ToolStep};
use analyst_tools::ToolRegistry;
use async_trait::async_trait;
use serde::Serialize;
use std::sync::Arc;
use tracing::{info, warn};

/// Answer from [`AnalystAgent::query`]
#[derive(Debug, Clone, Serialize)]
pub struct AgentResponse {
    pub output: String,
    pub steps: Vec<ToolStep>,
    pub success: bool,
    pub error: Option<String>,
}

/// Agent that answers through LLM function calling
pub struct AnalystAgent {
    agent: ToolAgent,
}

impl AnalystAgent {
    /// Register the analysis tools on `runtime` and build the agent
    pub fn new(runtime: &AgentRuntime, analyst: &FinancialAnalyst) -> Self {
        register_tools(runtime.tools(), analyst);

        let config = analyst.config();
        let executor_config = ExecutorConfig {
            max_iterations: config.max_iterations,
            model: config.model.clone(),
            system_prompt: Some(SYSTEM_PROMPT.to_string()),
            max_tokens: config.max_tokens,
            temperature: Some(config.temperature),
        };

        let agent = runtime.create_tool_agent(executor_config, "financial-analyst");
        Self { agent }
    }

    /// Build a runtime around `provider` with only the analysis tools
    pub fn with_provider(provider: Arc<dyn LLMProvider>, analyst: &FinancialAnalyst) -> Result<Self> {
        let runtime = AgentRuntime::builder()
            .provider(provider)
            .tool_registry(Arc::new(ToolRegistry::new()))
            .build()?;
        Ok(Self::new(&runtime, analyst))
    }

    /// Run a question through the tool loop; never fails
    pub async fn query(&self, text: &str, context: &mut Context) -> AgentResponse {
        match self.agent.run(text.to_string(), context).await {
            Ok(outcome) => {
                info!(
                    steps = outcome.steps.len(),
                    iterations = outcome.iterations,
                    tokens = outcome.usage.total(),
                    "agent query finished"
                );
                AgentResponse {
                    output: outcome.output,
                    steps: outcome.steps,
                    success: true,
                    error: None,
                }
            }
            Err(e) => {
                warn!(error = %e, "agent query failed");
                AgentResponse {
                    output: format!("Error processing query: {e}"),
                    steps: Vec::new(),
                    success: false,
                    error: Some(e.to_string()),
                }
            }
        }
    }
}

#[async_trait]
impl Agent for AnalystAgent {
    async fn process(&self, input: String, context: &mut Context) -> Result<String> {
        self.agent.process(input, context).await
    }

    fn name(&self) -> &str {
        "financial-analyst"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::MockMarketData;
    use crate::config::FinanceConfig;
    use crate::model::CompanySnapshot;
    use analyst_runtime::executor::testing::{ScriptedProvider, text, tool_call};
    use serde_json::json;

    fn analyst() -> FinancialAnalyst {
        let mut mock = MockMarketData::new();
        mock.expect_company_snapshot().returning(|t| {
            Ok(CompanySnapshot {
                ticker: t.to_string(),
                profit_margins: Some(0.3),
                ..Default::default()
            })
        });
        FinancialAnalyst::new(Arc::new(mock), Arc::new(FinanceConfig::default()))
    }

    #[tokio::test]
    async fn test_query_runs_tools() {
        let provider = Arc::new(ScriptedProvider::new(vec![
            tool_call("call_1", "generate_swot_analysis", json!({ "ticker": "AAPL" })),
            text("Apple has a strong profit margin."),
        ]));
        let agent = AnalystAgent::with_provider(provider.clone(), &analyst()).unwrap();
        let mut context = Context::new();

        let response = agent.query("SWOT for Apple please", &mut context).await;

        assert!(response.success);
        assert_eq!(response.error, None);
        assert_eq!(response.output, "Apple has a strong profit margin.");
        assert_eq!(response.steps.len(), 1);
        assert_eq!(response.steps[0].tool, "generate_swot_analysis");
        assert!(!response.steps[0].is_error);
        assert!(response.steps[0].output.contains("Strong profit margin of 30.0%"));
        assert_eq!(context.ticker(), Some("AAPL"));

        let requests = provider.requests();
        let first = &requests[0];
        assert_eq!(first.model, "databricks-dbrx-instruct");
        assert_eq!(first.max_tokens, 2000);
        assert_eq!(first.temperature, Some(0.1));
        assert_eq!(first.system.as_deref(), Some(SYSTEM_PROMPT));
        let tools: Vec<&str> = first
            .tools
            .as_ref()
            .unwrap()
            .iter()
            .map(|t| t.name.as_str())
            .collect();
        assert_eq!(
            tools,
            vec!["analyze_ma_activity", "generate_swot_analysis", "get_financial_metrics"]
        );
    }

    #[tokio::test]
    async fn test_query_failure_is_reported() {
        let provider = Arc::new(ScriptedProvider::new(Vec::new()));
        let agent = AnalystAgent::with_provider(provider, &analyst()).unwrap();
        let mut context = Context::new();

        let response = agent.query("Analyze MSFT", &mut context).await;

        assert!(!response.success);
        assert!(response.output.starts_with("Error processing query: "));
        assert!(response.error.unwrap().contains("script exhausted"));
        assert!(response.steps.is_empty());
    }
}
