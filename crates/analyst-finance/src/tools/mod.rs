//! Analysis tools exposed to the LLM agent
//!
//! Each tool wraps one [`FinancialAnalyst`] report and answers with
//! `{ "ticker": ..., "report": ... }`.

pub mod mergers;
pub mod metrics;
pub mod swot;

pub use mergers::MaActivityTool;
pub use metrics::FinancialMetricsTool;
pub use swot::SwotAnalysisTool;

use crate::analyst::FinancialAnalyst;
use analyst_tools::ToolRegistry;
use serde::Deserialize;
use serde_json::{Value, json};
use std::sync::Arc;

/// Register every analysis tool
pub fn register_tools(registry: &ToolRegistry, analyst: &FinancialAnalyst) {
    registry.register(Arc::new(FinancialMetricsTool::new(analyst.clone())));
    registry.register(Arc::new(MaActivityTool::new(analyst.clone())));
    registry.register(Arc::new(SwotAnalysisTool::new(analyst.clone())));
}

/// Registry holding every analysis tool
pub fn analysis_registry(analyst: &FinancialAnalyst) -> Arc<ToolRegistry> {
    let registry = Arc::new(ToolRegistry::new());
    register_tools(&registry, analyst);
    registry
}

#[derive(Debug, Deserialize)]
struct TickerParams {
    ticker: String,
}

fn parse_params<T: for<'de> Deserialize<'de>>(params: Value) -> analyst_core::Result<T> {
    serde_json::from_value(params).map_err(|e| analyst_core::Error::InvalidInput(e.to_string()))
}

fn ticker_schema(extra: Option<(&str, Value)>) -> Value {
    let mut properties = json!({
        "ticker": {
            "type": "string",
            "description": "Stock ticker symbol (e.g., AAPL, MSFT, GOOGL)"
        }
    });
    if let Some((name, schema)) = extra {
        properties[name] = schema;
    }
    json!({
        "type": "object",
        "properties": properties,
        "required": ["ticker"]
    })
}

fn report_value(ticker: &str, report: String) -> Value {
    json!({ "ticker": ticker.trim().to_uppercase(), "report": report })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::MockMarketData;
    use crate::config::FinanceConfig;

    #[test]
    fn test_register_tools() {
        let analyst = FinancialAnalyst::new(
            Arc::new(MockMarketData::new()),
            Arc::new(FinanceConfig::default()),
        );
        let registry = analysis_registry(&analyst);

        assert_eq!(
            registry.names(),
            vec!["analyze_ma_activity", "generate_swot_analysis", "get_financial_metrics"]
        );
        for tool in registry.list_tools() {
            let schema = tool.input_schema();
            assert_eq!(schema["type"], "object");
            assert_eq!(schema["required"][0], "ticker");
            assert!(!tool.description().is_empty());
        }
    }

    #[test]
    fn test_missing_ticker_is_invalid_input() {
        let analyst = FinancialAnalyst::new(
            Arc::new(MockMarketData::new()),
            Arc::new(FinanceConfig::default()),
        );
        let registry = analysis_registry(&analyst);

        for name in registry.names() {
            let tool = registry.get(&name).unwrap();
            let err = tokio_test::block_on(tool.execute(json!({ "symbol": "AAPL" }))).unwrap_err();
            assert!(
                matches!(err, analyst_core::Error::InvalidInput(ref msg) if msg.contains("ticker")),
                "{name}: {err}"
            );
        }
    }
}
