//! Tool registry for managing available tools

use crate::Tool;
use std::collections::BTreeMap;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard};

/// Registry for managing tools
///
/// Tools are kept in name order so the definitions sent to the LLM are
/// stable between requests.
#[derive(Default)]
pub struct ToolRegistry {
    tools: RwLock<BTreeMap<String, Arc<dyn Tool>>>,
}

impl ToolRegistry {
    /// Create a new tool registry
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> RwLockReadGuard<'_, BTreeMap<String, Arc<dyn Tool>>> {
        self.tools.read().unwrap_or_else(PoisonError::into_inner)
    }

    /// Register a tool, replacing any tool with the same name
    pub fn register(&self, tool: Arc<dyn Tool>) {
        let name = tool.name().to_string();
        let mut tools = self.tools.write().unwrap_or_else(PoisonError::into_inner);
        if tools.insert(name.clone(), tool).is_some() {
            tracing::debug!(tool = %name, "replaced existing tool");
        }
    }

    /// Get a tool by name
    pub fn get(&self, name: &str) -> Option<Arc<dyn Tool>> {
        self.read().get(name).cloned()
    }

    /// List all registered tools
    pub fn list_tools(&self) -> Vec<Arc<dyn Tool>> {
        self.read().values().cloned().collect()
    }

    /// Names of all registered tools
    pub fn names(&self) -> Vec<String> {
        self.read().keys().cloned().collect()
    }

    /// Get the number of registered tools
    pub fn len(&self) -> usize {
        self.read().len()
    }

    /// Check if the registry is empty
    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use analyst_core::Result;
    use async_trait::async_trait;
    use serde_json::{Value, json};

    struct Named(&'static str);

    #[async_trait]
    impl Tool for Named {
        async fn execute(&self, params: Value) -> Result<Value> {
            Ok(json!({ "tool": self.0, "params": params }))
        }

        fn name(&self) -> &str {
            self.0
        }

        fn description(&self) -> &str {
            "test tool"
        }

        fn input_schema(&self) -> Value {
            json!({ "type": "object" })
        }
    }

    #[test]
    fn test_register_and_get() {
        let registry = ToolRegistry::new();
        assert!(registry.is_empty());

        registry.register(Arc::new(Named("generate_swot_analysis")));
        registry.register(Arc::new(Named("analyze_ma_activity")));

        assert_eq!(registry.len(), 2);
        assert!(registry.get("analyze_ma_activity").is_some());
        assert!(registry.get("missing").is_none());
    }

    #[test]
    fn test_names_are_sorted() {
        let registry = ToolRegistry::new();
        registry.register(Arc::new(Named("b_tool")));
        registry.register(Arc::new(Named("a_tool")));
        assert_eq!(registry.names(), vec!["a_tool", "b_tool"]);
    }

    #[test]
    fn test_register_replaces() {
        let registry = ToolRegistry::new();
        registry.register(Arc::new(Named("same")));
        registry.register(Arc::new(Named("same")));
        assert_eq!(registry.len(), 1);
    }

    #[tokio::test]
    async fn test_execute_through_registry() {
        let registry = ToolRegistry::new();
        registry.register(Arc::new(Named("echo")));

        let tool = registry.get("echo").unwrap();
        let out = tool.execute(json!({ "ticker": "AAPL" })).await.unwrap();
        assert_eq!(out["params"]["ticker"], "AAPL");
    }
}
