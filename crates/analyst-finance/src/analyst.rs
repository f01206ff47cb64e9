//! Analysis façade
//!
//! [`FinancialAnalyst`] runs one report end to end: fetch from
//! [`MarketData`], render, and turn any failure into a readable line so
//! the chat surfaces always have something to show.

use crate::api::{MarketData, YahooClient};
use crate::config::FinanceConfig;
use crate::error::{FinanceError, Result};
use crate::model::HistoricalSummary;
use crate::report::{
    MetricsKind, filter_ma_news, render_historical, render_ma_report, render_ratios,
    render_summary, render_swot,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use tracing::{info, warn};

/// Reply for an empty ticker
pub const EMPTY_TICKER_MESSAGE: &str = "Please enter a stock ticker (e.g., AAPL, MSFT)";

/// The three analyses offered by the manual-selection surface
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AnalysisType {
    FinancialMetrics,
    MergersAcquisitions,
    Swot,
}

impl AnalysisType {
    pub const ALL: [AnalysisType; 3] = [
        AnalysisType::FinancialMetrics,
        AnalysisType::MergersAcquisitions,
        AnalysisType::Swot,
    ];

    /// Short name accepted by [`FromStr`]
    pub fn keyword(self) -> &'static str {
        match self {
            AnalysisType::FinancialMetrics => "metrics",
            AnalysisType::MergersAcquisitions => "ma",
            AnalysisType::Swot => "swot",
        }
    }

    /// Display label
    pub fn label(self) -> &'static str {
        match self {
            AnalysisType::FinancialMetrics => "Financial Metrics",
            AnalysisType::MergersAcquisitions => "M&A Analysis",
            AnalysisType::Swot => "SWOT Analysis",
        }
    }
}

impl fmt::Display for AnalysisType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for AnalysisType {
    type Err = FinanceError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "financial metrics" | "financial" | "metrics" | "m" => Ok(AnalysisType::FinancialMetrics),
            "m&a analysis" | "m&a" | "ma" | "mergers" | "merger" => {
                Ok(AnalysisType::MergersAcquisitions)
            }
            "swot analysis" | "swot" | "s" => Ok(AnalysisType::Swot),
            other => Err(FinanceError::CommandError(format!(
                "Unknown analysis type '{other}'. Use one of: {}",
                AnalysisType::ALL.map(AnalysisType::keyword).join(", ")
            ))),
        }
    }
}

/// Fetches data and renders reports
#[derive(Clone)]
pub struct FinancialAnalyst {
    market: Arc<dyn MarketData>,
    config: Arc<FinanceConfig>,
}

impl FinancialAnalyst {
    pub fn new(market: Arc<dyn MarketData>, config: Arc<FinanceConfig>) -> Self {
        Self { market, config }
    }

    /// Analyst backed by the Yahoo Finance client
    pub fn yahoo(config: FinanceConfig) -> Result<Self> {
        let client = YahooClient::new(&config)?;
        Ok(Self::new(Arc::new(client), Arc::new(config)))
    }

    pub fn config(&self) -> &FinanceConfig {
        &self.config
    }

    pub fn market(&self) -> Arc<dyn MarketData> {
        Arc::clone(&self.market)
    }

    pub async fn try_financial_metrics(&self, ticker: &str, kind: MetricsKind) -> Result<String> {
        let ticker = clean_ticker(ticker);
        info!(ticker = %ticker, kind = %kind, "financial metrics");

        match kind {
            MetricsKind::Summary => {
                let snapshot = self.market.company_snapshot(&ticker).await?;
                Ok(render_summary(&snapshot))
            }
            MetricsKind::Ratios => {
                let snapshot = self.market.company_snapshot(&ticker).await?;
                Ok(render_ratios(&snapshot))
            }
            MetricsKind::Historical => {
                self.try_history_report(&ticker, &self.config.history_range)
                    .await
            }
            MetricsKind::Detailed => {
                let snapshot = self.market.company_snapshot(&ticker).await?;
                let history = match self.try_history_report(&ticker, "1y").await {
                    Ok(report) => report,
                    Err(e) => {
                        warn!(ticker = %ticker, error = %e, "history unavailable for detailed report");
                        render_historical(&ticker, "1y", None)
                    }
                };
                Ok(format!(
                    "{}\n{}\n{}",
                    render_summary(&snapshot),
                    render_ratios(&snapshot),
                    history
                ))
            }
        }
    }

    /// Metrics report, or `Error fetching data for {TICKER}: …`
    pub async fn financial_metrics(&self, ticker: &str, kind: MetricsKind) -> String {
        self.try_financial_metrics(ticker, kind)
            .await
            .unwrap_or_else(|e| fetch_error(ticker, &e))
    }

    pub async fn try_history_report(&self, ticker: &str, range: &str) -> Result<String> {
        let ticker = clean_ticker(ticker);
        let bars = self.market.price_history(&ticker, range).await?;
        let summary = HistoricalSummary::from_bars(range, &bars);
        Ok(render_historical(&ticker, range, summary.as_ref()))
    }

    pub async fn history_report(&self, ticker: &str, range: &str) -> String {
        self.try_history_report(ticker, range)
            .await
            .unwrap_or_else(|e| fetch_error(ticker, &e))
    }

    pub async fn try_ma_analysis(&self, ticker: &str) -> Result<String> {
        let ticker = clean_ticker(ticker);
        let snapshot = self.market.company_snapshot(&ticker).await?;

        // Missing news is reported as "no matches" rather than a failure
        let news = match self.market.company_news(&ticker).await {
            Ok(news) => news,
            Err(e) => {
                warn!(ticker = %ticker, error = %e, "news unavailable");
                Vec::new()
            }
        };

        let matches = filter_ma_news(&news, self.config.ma_scan_limit);
        info!(ticker = %ticker, scanned = news.len(), matches = matches.len(), "M&A news filtered");
        Ok(render_ma_report(
            &snapshot,
            &matches,
            self.config.ma_display_limit,
        ))
    }

    /// M&A report, or `Error analyzing M&A for {TICKER}: …`
    pub async fn ma_analysis(&self, ticker: &str) -> String {
        self.try_ma_analysis(ticker)
            .await
            .unwrap_or_else(|e| ma_error(ticker, &e))
    }

    pub async fn try_swot_analysis(&self, ticker: &str) -> Result<String> {
        let ticker = clean_ticker(ticker);
        let snapshot = self.market.company_snapshot(&ticker).await?;
        info!(ticker = %ticker, "SWOT analysis");
        Ok(render_swot(&snapshot))
    }

    /// SWOT report, or `Error generating SWOT for {TICKER}: …`
    pub async fn swot_analysis(&self, ticker: &str) -> String {
        self.try_swot_analysis(ticker)
            .await
            .unwrap_or_else(|e| swot_error(ticker, &e))
    }

    /// Manual-selection entry point
    pub async fn analyze(&self, ticker: &str, analysis: AnalysisType) -> String {
        if ticker.trim().is_empty() {
            return EMPTY_TICKER_MESSAGE.to_string();
        }

        match analysis {
            AnalysisType::FinancialMetrics => {
                self.financial_metrics(ticker, MetricsKind::Summary).await
            }
            AnalysisType::MergersAcquisitions => self.ma_analysis(ticker).await,
            AnalysisType::Swot => self.swot_analysis(ticker).await,
        }
    }
}

fn clean_ticker(ticker: &str) -> String {
    ticker.trim().to_uppercase()
}

pub(crate) fn fetch_error(ticker: &str, error: &FinanceError) -> String {
    warn!(ticker, error = %error, "fetching data failed");
    format!("Error fetching data for {}: {error}", clean_ticker(ticker))
}

pub(crate) fn ma_error(ticker: &str, error: &FinanceError) -> String {
    warn!(ticker, error = %error, "M&A analysis failed");
    format!("Error analyzing M&A for {}: {error}", clean_ticker(ticker))
}

pub(crate) fn swot_error(ticker: &str, error: &FinanceError) -> String {
    warn!(ticker, error = %error, "SWOT analysis failed");
    format!("Error generating SWOT for {}: {error}", clean_ticker(ticker))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::MockMarketData;
    use crate::model::{CompanySnapshot, NewsItem, PriceBar};
    use chrono::DateTime;
    use mockall::predicate::eq;

    fn snapshot(ticker: &str) -> CompanySnapshot {
        CompanySnapshot {
            ticker: ticker.to_string(),
            long_name: Some("Tesla, Inc.".into()),
            industry: Some("Auto Manufacturers".into()),
            profit_margins: Some(0.2),
            ..Default::default()
        }
    }

    fn analyst(mock: MockMarketData) -> FinancialAnalyst {
        FinancialAnalyst::new(Arc::new(mock), Arc::new(FinanceConfig::default()))
    }

    #[test]
    fn test_analysis_type_parse() {
        assert_eq!(
            "Financial Metrics".parse::<AnalysisType>().unwrap(),
            AnalysisType::FinancialMetrics
        );
        assert_eq!("M&A Analysis".parse::<AnalysisType>().unwrap(), AnalysisType::MergersAcquisitions);
        assert_eq!("ma".parse::<AnalysisType>().unwrap(), AnalysisType::MergersAcquisitions);
        assert_eq!("SWOT".parse::<AnalysisType>().unwrap(), AnalysisType::Swot);
        assert_eq!(AnalysisType::Swot.to_string(), "SWOT Analysis");

        let err = "dcf".parse::<AnalysisType>().unwrap_err();
        assert_eq!(
            err.to_string(),
            "Command error: Unknown analysis type 'dcf'. Use one of: metrics, ma, swot"
        );
        for analysis in AnalysisType::ALL {
            assert_eq!(analysis.keyword().parse::<AnalysisType>().unwrap(), analysis);
        }
    }

    #[tokio::test]
    async fn test_summary_uppercases_ticker() {
        let mut mock = MockMarketData::new();
        mock.expect_company_snapshot()
            .with(eq("TSLA"))
            .times(1)
            .returning(|t| Ok(snapshot(t)));

        let report = analyst(mock)
            .financial_metrics(" tsla ", MetricsKind::Summary)
            .await;
        assert!(report.starts_with("Financial Metrics for TSLA\n"));
    }

    #[tokio::test]
    async fn test_fetch_error_is_stringified() {
        let mut mock = MockMarketData::new();
        mock.expect_company_snapshot().returning(|t| {
            Err(FinanceError::DataUnavailable {
                ticker: t.to_string(),
                reason: "no quote summary returned".into(),
            })
        });

        let report = analyst(mock).financial_metrics("xyz", MetricsKind::Ratios).await;
        assert_eq!(
            report,
            "Error fetching data for XYZ: Data not available for XYZ: no quote summary returned"
        );
    }

    #[tokio::test]
    async fn test_historical_uses_configured_range() {
        let mut mock = MockMarketData::new();
        mock.expect_price_history()
            .with(eq("AAPL"), eq("1y"))
            .returning(|_, _| {
                Ok(vec![PriceBar {
                    timestamp: DateTime::from_timestamp(1_700_000_000, 0).unwrap(),
                    open: 1.0,
                    high: 2.0,
                    low: 0.5,
                    close: 1.5,
                    volume: 10,
                }])
            });

        let report = analyst(mock)
            .financial_metrics("AAPL", MetricsKind::Historical)
            .await;
        assert!(report.starts_with("Price History for AAPL (1y)\n"));
        assert!(report.contains("Data Points: 1\n"));
    }

    #[tokio::test]
    async fn test_detailed_survives_history_failure() {
        let mut mock = MockMarketData::new();
        mock.expect_company_snapshot().returning(|t| Ok(snapshot(t)));
        mock.expect_price_history()
            .returning(|_, _| Err(FinanceError::YahooFinanceError("no data".into())));

        let report = analyst(mock)
            .financial_metrics("TSLA", MetricsKind::Detailed)
            .await;
        assert!(report.contains("Financial Metrics for TSLA"));
        assert!(report.contains("Financial Ratios for TSLA"));
        assert!(report.ends_with("No historical data available\n"));
    }

    #[tokio::test]
    async fn test_ma_analysis_tolerates_news_failure() {
        let mut mock = MockMarketData::new();
        mock.expect_company_snapshot().returning(|t| Ok(snapshot(t)));
        mock.expect_company_news()
            .returning(|_| Err(FinanceError::RateLimited { provider: "Yahoo Finance".into() }));

        let report = analyst(mock).ma_analysis("tsla").await;
        assert!(report.starts_with("M&A Activity Analysis for TSLA\n"));
        assert!(report.contains("No recent M&A-related news found."));
    }

    #[tokio::test]
    async fn test_ma_analysis_lists_matches() {
        let mut mock = MockMarketData::new();
        mock.expect_company_snapshot().returning(|t| Ok(snapshot(t)));
        mock.expect_company_news().returning(|_| {
            Ok(vec![
                NewsItem { title: "Tesla weighs acquisition of supplier".into(), ..Default::default() },
                NewsItem { title: "Deliveries rise".into(), ..Default::default() },
            ])
        });

        let report = analyst(mock).ma_analysis("TSLA").await;
        assert!(report.contains("Recent M&A-Related News (1 items):"));
        assert!(report.contains("1. Tesla weighs acquisition of supplier\n"));
    }

    #[tokio::test]
    async fn test_error_prefixes() {
        let mut mock = MockMarketData::new();
        mock.expect_company_snapshot()
            .returning(|t| Err(FinanceError::InvalidTicker(t.to_string())));

        let analyst = analyst(mock);
        assert_eq!(
            analyst.ma_analysis("bad!").await,
            "Error analyzing M&A for BAD!: Invalid ticker: BAD!"
        );
        assert_eq!(
            analyst.swot_analysis("bad!").await,
            "Error generating SWOT for BAD!: Invalid ticker: BAD!"
        );
    }

    #[tokio::test]
    async fn test_analyze_dispatch() {
        let mut mock = MockMarketData::new();
        mock.expect_company_snapshot().returning(|t| Ok(snapshot(t)));

        let analyst = analyst(mock);
        assert_eq!(analyst.analyze("  ", AnalysisType::Swot).await, EMPTY_TICKER_MESSAGE);
        assert!(
            analyst
                .analyze("tsla", AnalysisType::Swot)
                .await
                .starts_with("SWOT Analysis for TSLA\n")
        );
        assert!(
            analyst
                .analyze("tsla", AnalysisType::FinancialMetrics)
                .await
                .starts_with("Financial Metrics for TSLA\n")
        );
    }
}
