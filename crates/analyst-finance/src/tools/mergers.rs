//! `analyze_ma_activity` tool

use super::{TickerParams, parse_params, report_value, ticker_schema};
use crate::analyst::FinancialAnalyst;
use analyst_core::Result as AgentResult;
use analyst_tools::Tool;
use async_trait::async_trait;
use serde_json::Value;

/// Recent M&A-related news for a ticker
pub struct MaActivityTool {
    analyst: FinancialAnalyst,
}

impl MaActivityTool {
    pub fn new(analyst: FinancialAnalyst) -> Self {
        Self { analyst }
    }
}

#[async_trait]
impl Tool for MaActivityTool {
    async fn execute(&self, params: Value) -> AgentResult<Value> {
        let TickerParams { ticker } = parse_params(params)?;

        let report = self.analyst.try_ma_analysis(&ticker).await.map_err(|e| {
            analyst_core::Error::Generic(format!(
                "Error analyzing M&A for {}: {e}",
                ticker.trim().to_uppercase()
            ))
        })?;

        Ok(report_value(&ticker, report))
    }

    fn name(&self) -> &str {
        "analyze_ma_activity"
    }

    fn description(&self) -> &str {
        "Analyze merger and acquisition activity for a company by filtering its \
         recent news for deals, acquisitions, buyouts and takeovers."
    }

    fn input_schema(&self) -> Value {
        ticker_schema(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::MockMarketData;
    use crate::config::FinanceConfig;
    use crate::model::{CompanySnapshot, NewsItem};
    use serde_json::json;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_execute() {
        let mut mock = MockMarketData::new();
        mock.expect_company_snapshot().returning(|t| {
            Ok(CompanySnapshot {
                ticker: t.to_string(),
                ..Default::default()
            })
        });
        mock.expect_company_news().returning(|_| {
            Ok(vec![NewsItem {
                title: "Pfizer completes takeover of Seagen".into(),
                ..Default::default()
            }])
        });

        let tool = MaActivityTool::new(FinancialAnalyst::new(
            Arc::new(mock),
            Arc::new(FinanceConfig::default()),
        ));
        let result = tool.execute(json!({ "ticker": "pfe" })).await.unwrap();

        assert_eq!(result["ticker"], "PFE");
        let report = result["report"].as_str().unwrap();
        assert!(report.contains("1. Pfizer completes takeover of Seagen"));
    }
}
