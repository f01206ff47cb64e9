//! Financial analyst agent
//!
//! Turns a company ticker into plain-text research reports built from public
//! Yahoo Finance data:
//!
//! - Financial metrics (summary, ratios, price history, or all three)
//! - M&A activity, found by keyword-filtering recent news
//! - A rule-based SWOT analysis
//!
//! The reports are reachable through a keyword-routed [`SmartAgent`], an
//! LLM-orchestrated [`AnalystAgent`] that calls them as tools, and the
//! [`bot::AnalystBot`] REPL.
//!
//! # Example
//!
//! ```rust,ignore
//! use analyst_finance::{FinanceConfig, FinancialAnalyst, MetricsKind};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let analyst = FinancialAnalyst::yahoo(FinanceConfig::from_env()?)?;
//!     println!("{}", analyst.financial_metrics("AAPL", MetricsKind::Summary).await);
//!     println!("{}", analyst.swot_analysis("AAPL").await);
//!     Ok(())
//! }
//! ```

pub mod agents;
pub mod analyst;
pub mod api;
pub mod bot;
pub mod catalog;
pub mod config;
pub mod error;
pub mod model;
pub mod prompts;
pub mod report;
pub mod router;
pub mod tools;

pub use agents::{AgentResponse, AnalystAgent, SmartAgent};
pub use analyst::{AnalysisType, EMPTY_TICKER_MESSAGE, FinancialAnalyst};
pub use api::{MarketData, YahooClient};
pub use config::FinanceConfig;
pub use error::{FinanceError, Result};
pub use model::{CompanySnapshot, HistoricalSummary, NewsItem, PriceBar};
pub use report::{MetricsKind, Swot};
pub use router::{Intent, RoutingResult, SmartRouter};
pub use tools::{analysis_registry, register_tools};
