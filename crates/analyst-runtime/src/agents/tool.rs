//! Tool agent implementation (wraps AgentExecutor)

use crate::executor::{AgentExecutor, ExecutionOutcome};
use analyst_core::{Agent, Context, Result};
use async_trait::async_trait;

/// An agent that answers through the LLM tool loop
///
/// The last step's ticker argument, when present, is remembered in the
/// [`Context`] so follow-up questions can refer to "it".
pub struct ToolAgent {
    executor: AgentExecutor,
    name: String,
}

impl ToolAgent {
    /// Create a new tool agent
    pub fn new(executor: AgentExecutor, name: impl Into<String>) -> Self {
        Self {
            executor,
            name: name.into(),
        }
    }

    /// Get a reference to the underlying executor
    pub fn executor(&self) -> &AgentExecutor {
        &self.executor
    }

    /// Run a query and return the full outcome including tool steps
    pub async fn run(&self, input: String, context: &mut Context) -> Result<ExecutionOutcome> {
        let outcome = self.executor.run_with_steps(input).await?;

        let last_ticker = outcome
            .steps
            .iter()
            .rev()
            .find_map(|step| step.input.get("ticker").and_then(|v| v.as_str()));
        if let Some(ticker) = last_ticker {
            context.set_ticker(ticker);
        }

        Ok(outcome)
    }
}

#[async_trait]
impl Agent for ToolAgent {
    async fn process(&self, input: String, context: &mut Context) -> Result<String> {
        Ok(self.run(input, context).await?.output)
    }

    fn name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::executor::testing::{ScriptedProvider, text, tool_call};
    use analyst_tools::{Tool, ToolRegistry};
    use serde_json::{Value, json};
    use std::sync::Arc;

    struct Echo;

    #[async_trait]
    impl Tool for Echo {
        async fn execute(&self, params: Value) -> Result<Value> {
            Ok(params)
        }
        fn name(&self) -> &str {
            "echo"
        }
        fn description(&self) -> &str {
            "echo"
        }
        fn input_schema(&self) -> Value {
            json!({ "type": "object" })
        }
    }

    #[tokio::test]
    async fn test_tool_agent_remembers_ticker() {
        let registry = ToolRegistry::new();
        registry.register(Arc::new(Echo));

        let executor = AgentExecutor::builder()
            .provider(Arc::new(ScriptedProvider::new(vec![
                tool_call("c1", "echo", json!({ "ticker": "nvda" })),
                text("done"),
            ])))
            .tool_registry(Arc::new(registry))
            .build()
            .unwrap();

        let agent = ToolAgent::new(executor, "analyst");
        let mut context = Context::new();
        let reply = agent.process("nvidia?".into(), &mut context).await.unwrap();

        assert_eq!(agent.name(), "analyst");
        assert_eq!(reply, "done");
        assert_eq!(context.ticker(), Some("NVDA"));
    }
}
