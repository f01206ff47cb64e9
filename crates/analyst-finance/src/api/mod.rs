//! Market data access
//!
//! [`MarketData`] is the seam between the reports and the network. The
//! production implementation is [`YahooClient`]; tests use the generated
//! `MockMarketData`.

pub mod yahoo;

use crate::error::Result;
use crate::model::{CompanySnapshot, NewsItem, PriceBar};
use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;

pub use yahoo::{SUPPORTED_RANGES, YahooClient, range_start};

/// Source of company fundamentals, news and prices
#[cfg_attr(test, automock)]
#[async_trait]
pub trait MarketData: Send + Sync {
    /// Quote-summary snapshot for a ticker
    async fn company_snapshot(&self, ticker: &str) -> Result<CompanySnapshot>;

    /// Most recent news items for a ticker, newest first
    async fn company_news(&self, ticker: &str) -> Result<Vec<NewsItem>>;

    /// Daily bars over a range such as `1mo`, `1y` or `ytd`, oldest first
    async fn price_history(&self, ticker: &str, range: &str) -> Result<Vec<PriceBar>>;
}
