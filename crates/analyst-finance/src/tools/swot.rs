//! `generate_swot_analysis` tool

use super::{TickerParams, parse_params, report_value, ticker_schema};
use crate::analyst::FinancialAnalyst;
use analyst_core::Result as AgentResult;
use analyst_tools::Tool;
use async_trait::async_trait;
use serde_json::Value;

/// Rule-based SWOT analysis for a ticker
pub struct SwotAnalysisTool {
    analyst: FinancialAnalyst,
}

impl SwotAnalysisTool {
    pub fn new(analyst: FinancialAnalyst) -> Self {
        Self { analyst }
    }
}

#[async_trait]
impl Tool for SwotAnalysisTool {
    async fn execute(&self, params: Value) -> AgentResult<Value> {
        let TickerParams { ticker } = parse_params(params)?;

        let report = self.analyst.try_swot_analysis(&ticker).await.map_err(|e| {
            analyst_core::Error::Generic(format!(
                "Error generating SWOT for {}: {e}",
                ticker.trim().to_uppercase()
            ))
        })?;

        Ok(report_value(&ticker, report))
    }

    fn name(&self) -> &str {
        "generate_swot_analysis"
    }

    fn description(&self) -> &str {
        "Generate a SWOT (Strengths, Weaknesses, Opportunities, Threats) analysis \
         for a company from its profitability, liquidity, leverage, valuation and \
         analyst sentiment."
    }

    fn input_schema(&self) -> Value {
        ticker_schema(None)
    }
}
