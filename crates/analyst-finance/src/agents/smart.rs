//! Keyword-routed agent
//!
//! Answers free text without an LLM: the [`SmartRouter`] picks the ticker and
//! report, the [`FinancialAnalyst`] renders it.

use crate::analyst::{FinancialAnalyst, fetch_error, ma_error, swot_error};
use crate::report::{MetricsKind, heavy_rule};
use crate::router::{HELP_TEXT, Intent, SmartRouter};
use analyst_core::{Agent, Context, Result};
use async_trait::async_trait;
use tracing::info;

/// Agent that routes questions by keyword
pub struct SmartAgent {
    analyst: FinancialAnalyst,
    router: SmartRouter,
}

impl SmartAgent {
    pub fn new(analyst: FinancialAnalyst) -> Self {
        Self {
            analyst,
            router: SmartRouter::new(),
        }
    }

    pub fn router(&self) -> &SmartRouter {
        &self.router
    }

    /// Route one question and render the chosen report
    ///
    /// A ticker whose report was fetched is stored in `context` so a
    /// follow-up such as "and the ratios?" reuses it. Failed lookups leave
    /// the remembered ticker alone.
    pub async fn respond(&self, input: &str, context: &mut Context) -> String {
        let routing = self.router.route(input, context.ticker());
        let Some(ticker) = routing.ticker else {
            return HELP_TEXT.to_string();
        };

        info!(ticker = %ticker, tool = routing.intent.tool_label(), "agent decision");

        let outcome = match routing.intent {
            Intent::Swot => self
                .analyst
                .try_swot_analysis(&ticker)
                .await
                .map_err(|e| swot_error(&ticker, &e)),
            Intent::MergersAcquisitions => self
                .analyst
                .try_ma_analysis(&ticker)
                .await
                .map_err(|e| ma_error(&ticker, &e)),
            Intent::Ratios => self
                .analyst
                .try_financial_metrics(&ticker, MetricsKind::Ratios)
                .await
                .map_err(|e| fetch_error(&ticker, &e)),
            Intent::Metrics => self
                .analyst
                .try_financial_metrics(&ticker, MetricsKind::Summary)
                .await
                .map_err(|e| fetch_error(&ticker, &e)),
        };

        let report = match outcome {
            Ok(report) => {
                context.set_ticker(&ticker);
                context.set_last_analysis(routing.intent.tool_label());
                report
            }
            Err(message) => message,
        };

        format!(
            "**Agent Decision:** Analyzing {ticker}...\n\n**Tool Selected:** {}\n\n{}\n{report}",
            routing.intent.tool_label(),
            heavy_rule(),
        )
    }
}

#[async_trait]
impl Agent for SmartAgent {
    async fn process(&self, input: String, context: &mut Context) -> Result<String> {
        Ok(self.respond(&input, context).await)
    }

    fn name(&self) -> &str {
        "smart-agent"
    }
}
