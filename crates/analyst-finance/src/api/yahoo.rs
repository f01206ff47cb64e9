//! Yahoo Finance client
//!
//! Fundamentals and news come from the JSON endpoints behind
//! `query2.finance.yahoo.com`; price history goes through the
//! `yahoo_finance_api` connector.

use crate::api::MarketData;
use crate::config::FinanceConfig;
use crate::error::{FinanceError, Result};
use crate::model::{CompanySnapshot, NewsItem, PriceBar};
use async_trait::async_trait;
use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc};
use governor::clock::DefaultClock;
use governor::state::{InMemoryState, NotKeyed};
use governor::{Quota, RateLimiter};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::Value;
use std::num::NonZeroU32;
use std::sync::Arc;
use time::OffsetDateTime;
use tracing::{debug, info, instrument, warn};
use url::Url;
use yahoo_finance_api as yahoo;

type SharedRateLimiter = Arc<RateLimiter<NotKeyed, InMemoryState, DefaultClock>>;

const QUOTE_SUMMARY_MODULES: &str =
    "price,summaryDetail,financialData,defaultKeyStatistics,assetProfile";

const PROVIDER: &str = "Yahoo Finance";

/// Ranges accepted by [`range_start`]
pub const SUPPORTED_RANGES: &[&str] = &[
    "1d", "5d", "1mo", "3mo", "6mo", "1y", "2y", "5y", "10y", "ytd", "max",
];

/// Start of a history range ending at `end`
pub fn range_start(range: &str, end: DateTime<Utc>) -> Result<DateTime<Utc>> {
    let days = match range {
        "1d" => 1,
        "5d" => 5,
        "1mo" => 30,
        "3mo" => 90,
        "6mo" => 180,
        "1y" => 365,
        "2y" => 730,
        "5y" => 1825,
        "10y" => 3650,
        "max" => 36500,
        "ytd" => {
            return NaiveDate::from_ymd_opt(end.year(), 1, 1)
                .and_then(|d| d.and_hms_opt(0, 0, 0))
                .map(|dt| dt.and_utc())
                .ok_or_else(|| FinanceError::Other(format!("cannot compute ytd for {end}")));
        }
        other => {
            return Err(FinanceError::InvalidRange {
                range: other.to_string(),
                supported: SUPPORTED_RANGES.join(", "),
            });
        }
    };
    Ok(end - Duration::days(days))
}

/// Upper-case and sanity-check a ticker before it goes into a URL
pub fn normalize_ticker(ticker: &str) -> Result<String> {
    let ticker = ticker.trim().to_uppercase();
    let valid = !ticker.is_empty()
        && ticker.len() <= 12
        && ticker
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '^' | '='));
    if valid {
        Ok(ticker)
    } else {
        Err(FinanceError::InvalidTicker(ticker))
    }
}

/// Yahoo Finance client
pub struct YahooClient {
    client: Client,
    base_url: String,
    news_count: usize,
    rate_limiter: SharedRateLimiter,
    connector: yahoo::YahooConnector,
}

impl YahooClient {
    /// Create a client from the finance configuration
    pub fn new(config: &FinanceConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(config.request_timeout)
            .build()?;

        let per_minute = NonZeroU32::new(config.requests_per_minute).unwrap_or(NonZeroU32::MIN);
        let rate_limiter = Arc::new(RateLimiter::direct(Quota::per_minute(per_minute)));

        let connector = yahoo::YahooConnector::new()
            .map_err(|e| FinanceError::YahooFinanceError(e.to_string()))?;

        Ok(Self {
            client,
            base_url: config.quote_base_url.trim_end_matches('/').to_string(),
            news_count: config.news_count,
            rate_limiter,
            connector,
        })
    }

    fn endpoint(&self, path: &str, params: &[(&str, &str)]) -> Result<Url> {
        Ok(Url::parse_with_params(
            &format!("{}{path}", self.base_url),
            params,
        )?)
    }

    async fn get_json(&self, ticker: &str, url: Url) -> Result<Value> {
        self.rate_limiter.until_ready().await;
        debug!(%url, "requesting quote API");

        let response = self.client.get(url).send().await?;
        let status = response.status();
        let body = response.text().await?;

        if status == StatusCode::TOO_MANY_REQUESTS {
            warn!(ticker, "quote API rate limited");
            return Err(FinanceError::RateLimited {
                provider: PROVIDER.to_string(),
            });
        }

        if status == StatusCode::NOT_FOUND {
            // Unknown tickers come back as 404 with an explanatory body
            if let Some(reason) = serde_json::from_str::<Value>(&body)
                .ok()
                .as_ref()
                .and_then(api_error_description)
            {
                return Err(FinanceError::DataUnavailable {
                    ticker: ticker.to_string(),
                    reason,
                });
            }
        }

        if !status.is_success() {
            warn!(ticker, %status, "quote API request failed");
            return Err(FinanceError::ApiError {
                status: status.as_u16(),
                message: body.chars().take(200).collect(),
            });
        }

        Ok(serde_json::from_str(&body)?)
    }
}

/// `quoteSummary.error` / `finance.error` description, when present
fn api_error_description(body: &Value) -> Option<String> {
    ["quoteSummary", "finance"]
        .iter()
        .filter_map(|root| body.get(root)?.get("error"))
        .find(|err| !err.is_null())
        .map(|err| {
            err.get("description")
                .and_then(Value::as_str)
                .map_or_else(|| err.to_string(), ToString::to_string)
        })
}

#[async_trait]
impl MarketData for YahooClient {
    #[instrument(skip(self))]
    async fn company_snapshot(&self, ticker: &str) -> Result<CompanySnapshot> {
        let ticker = normalize_ticker(ticker)?;
        let url = self.endpoint(
            &format!("/v10/finance/quoteSummary/{ticker}"),
            &[("modules", QUOTE_SUMMARY_MODULES)],
        )?;

        let body = self.get_json(&ticker, url).await?;

        if let Some(reason) = api_error_description(&body) {
            return Err(FinanceError::DataUnavailable { ticker, reason });
        }

        let result = body
            .get("quoteSummary")
            .and_then(|s| s.get("result"))
            .and_then(Value::as_array)
            .and_then(|r| r.first())
            .ok_or_else(|| FinanceError::DataUnavailable {
                ticker: ticker.clone(),
                reason: "no quote summary returned".to_string(),
            })?;

        info!(ticker = %ticker, "fetched company snapshot");
        Ok(CompanySnapshot::from_quote_summary(&ticker, result))
    }

    #[instrument(skip(self))]
    async fn company_news(&self, ticker: &str) -> Result<Vec<NewsItem>> {
        let ticker = normalize_ticker(ticker)?;
        let news_count = self.news_count.to_string();
        let url = self.endpoint(
            "/v1/finance/search",
            &[
                ("q", ticker.as_str()),
                ("quotesCount", "1"),
                ("newsCount", news_count.as_str()),
            ],
        )?;

        let body = self.get_json(&ticker, url).await?;
        let news: Vec<NewsItem> = match body.get("news").and_then(Value::as_array) {
            Some(items) => items
                .iter()
                .enumerate()
                .filter_map(|(index, item)| match NewsItem::deserialize(item) {
                    Ok(news_item) => Some(news_item),
                    Err(e) => {
                        debug!(ticker = %ticker, index, error = %e, "skipping malformed news item");
                        None
                    }
                })
                .collect(),
            None => Vec::new(),
        };

        info!(ticker = %ticker, count = news.len(), "fetched company news");
        Ok(news)
    }

    #[instrument(skip(self))]
    async fn price_history(&self, ticker: &str, range: &str) -> Result<Vec<PriceBar>> {
        let ticker = normalize_ticker(ticker)?;
        let end = Utc::now();
        let start = range_start(range, end)?;

        let start = OffsetDateTime::from_unix_timestamp(start.timestamp())
            .map_err(|e| FinanceError::YahooFinanceError(format!("Invalid start timestamp: {e}")))?;
        let end = OffsetDateTime::from_unix_timestamp(end.timestamp())
            .map_err(|e| FinanceError::YahooFinanceError(format!("Invalid end timestamp: {e}")))?;

        self.rate_limiter.until_ready().await;
        let response = self
            .connector
            .get_quote_history(&ticker, start, end)
            .await
            .map_err(|e| FinanceError::YahooFinanceError(e.to_string()))?;

        let quotes = match response.quotes() {
            Ok(quotes) => quotes,
            Err(e) => {
                debug!(ticker = %ticker, error = %e, "no quotes in history response");
                return Ok(Vec::new());
            }
        };

        let bars: Vec<PriceBar> = quotes
            .iter()
            .filter_map(|q| {
                Some(PriceBar {
                    timestamp: DateTime::from_timestamp(q.timestamp as i64, 0)?,
                    open: q.open,
                    high: q.high,
                    low: q.low,
                    close: q.close,
                    volume: q.volume,
                })
            })
            .collect();

        info!(ticker = %ticker, range, bars = bars.len(), "fetched price history");
        Ok(bars)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use serde_json::json;

    fn client_for(server: &MockServer) -> YahooClient {
        let config = FinanceConfig::builder()
            .quote_base_url(server.base_url())
            .requests_per_minute(1_000)
            .build()
            .unwrap();
        YahooClient::new(&config).unwrap()
    }

    #[test]
    fn test_normalize_ticker() {
        assert_eq!(normalize_ticker(" brk-b ").unwrap(), "BRK-B");
        assert_eq!(normalize_ticker("^gspc").unwrap(), "^GSPC");
        assert!(normalize_ticker("").is_err());
        assert!(normalize_ticker("AA PL").is_err());
        assert!(normalize_ticker("../etc").is_err());
    }

    #[test]
    fn test_range_start() {
        let end = DateTime::parse_from_rfc3339("2024-06-15T12:00:00Z")
            .unwrap()
            .with_timezone(&Utc);

        assert_eq!(range_start("1mo", end).unwrap(), end - Duration::days(30));
        assert_eq!(
            range_start("ytd", end).unwrap().to_rfc3339(),
            "2024-01-01T00:00:00+00:00"
        );
        let err = range_start("3w", end).unwrap_err();
        assert!(matches!(err, FinanceError::InvalidRange { ref range, .. } if range == "3w"));
        assert!(err.to_string().starts_with("Unsupported range '3w', expected one of 1d, 5d"));
    }

    #[tokio::test]
    async fn test_company_snapshot() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/v10/finance/quoteSummary/MSFT")
                    .query_param("modules", QUOTE_SUMMARY_MODULES)
                    .header_exists("user-agent");
                then.status(200).json_body(json!({
                    "quoteSummary": {
                        "result": [{
                            "price": { "longName": "Microsoft Corporation" },
                            "financialData": { "returnOnEquity": { "raw": 0.38, "fmt": "38.00%" } }
                        }],
                        "error": null
                    }
                }));
            })
            .await;

        let snapshot = client_for(&server).company_snapshot("msft").await.unwrap();
        mock.assert_async().await;

        assert_eq!(snapshot.ticker, "MSFT");
        assert_eq!(snapshot.long_name.as_deref(), Some("Microsoft Corporation"));
        assert_eq!(snapshot.return_on_equity, Some(0.38));
    }

    #[tokio::test]
    async fn test_company_snapshot_empty_result() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/v10/finance/quoteSummary/ZZZZ");
                then.status(200)
                    .json_body(json!({ "quoteSummary": { "result": [], "error": null } }));
            })
            .await;

        let err = client_for(&server).company_snapshot("ZZZZ").await.unwrap_err();
        assert!(matches!(err, FinanceError::DataUnavailable { ref ticker, .. } if ticker == "ZZZZ"));
    }

    #[tokio::test]
    async fn test_company_snapshot_not_found() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/v10/finance/quoteSummary/NOPE");
                then.status(404).json_body(json!({
                    "quoteSummary": {
                        "result": null,
                        "error": { "code": "Not Found", "description": "Quote not found for symbol: NOPE" }
                    }
                }));
            })
            .await;

        let err = client_for(&server).company_snapshot("NOPE").await.unwrap_err();
        assert_eq!(
            err.to_string(),
            "Data not available for NOPE: Quote not found for symbol: NOPE"
        );
    }

    #[tokio::test]
    async fn test_rate_limited_and_server_error() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/v10/finance/quoteSummary/AAPL");
                then.status(429).body("Too Many Requests");
            })
            .await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/v10/finance/quoteSummary/TSLA");
                then.status(500).body("boom");
            })
            .await;

        let client = client_for(&server);
        assert!(matches!(
            client.company_snapshot("AAPL").await.unwrap_err(),
            FinanceError::RateLimited { .. }
        ));
        assert!(matches!(
            client.company_snapshot("TSLA").await.unwrap_err(),
            FinanceError::ApiError { status: 500, .. }
        ));
    }

    #[tokio::test]
    async fn test_company_news() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/v1/finance/search")
                    .query_param("q", "NVDA")
                    .query_param("quotesCount", "1")
                    .query_param("newsCount", "10");
                then.status(200).json_body(json!({
                    "news": [
                        { "title": "Nvidia closes deal", "publisher": "Bloomberg", "providerPublishTime": 1_700_000_000 },
                        { "title": "Chip stocks rally" }
                    ]
                }));
            })
            .await;

        let news = client_for(&server).company_news("nvda").await.unwrap();
        mock.assert_async().await;
        assert_eq!(news.len(), 2);
        assert_eq!(news[0].publisher.as_deref(), Some("Bloomberg"));
        assert_eq!(news[1].link, None);
    }

    #[tokio::test]
    async fn test_company_news_skips_malformed_items() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/v1/finance/search").query_param("q", "AAPL");
                then.status(200).json_body(json!({
                    "news": [
                        { "title": null, "publisher": "Reuters" },
                        { "title": "Apple acquires startup", "providerPublishTime": 1_700_000_000 },
                        "not an object"
                    ]
                }));
            })
            .await;

        let news = client_for(&server).company_news("AAPL").await.unwrap();
        assert_eq!(news.len(), 1);
        assert_eq!(news[0].title, "Apple acquires startup");
        assert_eq!(news[0].published_date().as_deref(), Some("2023-11-14"));
    }

    #[tokio::test]
    async fn test_company_news_missing_array() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/v1/finance/search");
                then.status(200).json_body(json!({ "quotes": [] }));
            })
            .await;

        let news = client_for(&server).company_news("IBM").await.unwrap();
        assert!(news.is_empty());
    }

    #[tokio::test]
    async fn test_invalid_ticker_never_hits_network() {
        let server = MockServer::start_async().await;
        let err = client_for(&server).company_news("  ").await.unwrap_err();
        assert!(matches!(err, FinanceError::InvalidTicker(_)));
    }
}
