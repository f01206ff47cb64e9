//! `get_financial_metrics` tool

use super::{parse_params, report_value, ticker_schema};
use crate::analyst::FinancialAnalyst;
use crate::report::MetricsKind;
use analyst_core::Result as AgentResult;
use analyst_tools::Tool;
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{Value, json};

#[derive(Debug, Deserialize)]
struct MetricsParams {
    ticker: String,
    #[serde(default)]
    metrics_type: Option<String>,
}

/// Summary metrics, ratios or price history for a ticker
pub struct FinancialMetricsTool {
    analyst: FinancialAnalyst,
}

impl FinancialMetricsTool {
    pub fn new(analyst: FinancialAnalyst) -> Self {
        Self { analyst }
    }
}

#[async_trait]
impl Tool for FinancialMetricsTool {
    async fn execute(&self, params: Value) -> AgentResult<Value> {
        let params: MetricsParams = parse_params(params)?;
        let kind: MetricsKind = params
            .metrics_type
            .as_deref()
            .unwrap_or_default()
            .parse()
            .unwrap_or_default();

        let report = self
            .analyst
            .try_financial_metrics(&params.ticker, kind)
            .await
            .map_err(|e| {
                analyst_core::Error::Generic(format!(
                    "Error fetching data for {}: {e}",
                    params.ticker.trim().to_uppercase()
                ))
            })?;

        Ok(report_value(&params.ticker, report))
    }

    fn name(&self) -> &str {
        "get_financial_metrics"
    }

    fn description(&self) -> &str {
        "Get financial metrics for a company: summary (market cap, valuation, \
         profitability, growth, financial health), ratios, historical prices, \
         or a detailed combination."
    }

    fn input_schema(&self) -> Value {
        ticker_schema(Some((
            "metrics_type",
            json!({
                "type": "string",
                "description": "Type of metrics to return",
                "enum": MetricsKind::ALL.map(MetricsKind::as_str),
                "default": "summary"
            }),
        )))
    }
}
