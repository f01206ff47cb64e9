//! Typed views of quote API payloads
//!
//! The quote-summary endpoint wraps most values as `{ "raw": 1.5, "fmt": "1.50" }`,
//! sends some as plain values and leaves unknown ones as `{}`. [`CompanySnapshot`]
//! flattens one response into optional fields so the reports never have to
//! look at JSON.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Numeric field: prefers `raw`, falls back to parsing `fmt`
pub fn number_field(module: &Value, key: &str) -> Option<f64> {
    match module.get(key)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => parse_formatted(s),
        Value::Object(obj) => obj
            .get("raw")
            .and_then(Value::as_f64)
            .or_else(|| obj.get("fmt").and_then(Value::as_str).and_then(parse_formatted)),
        _ => None,
    }
}

/// Text field: a plain string, or the `fmt` of a wrapper object
pub fn text_field(module: &Value, key: &str) -> Option<String> {
    let text = match module.get(key)? {
        Value::String(s) => s.clone(),
        Value::Object(obj) => obj.get("fmt").and_then(Value::as_str)?.to_string(),
        _ => return None,
    };
    let text = text.trim();
    (!text.is_empty()).then(|| text.to_string())
}

/// Parse display strings such as `"1,234.5"` or `"12.5%"`
fn parse_formatted(s: &str) -> Option<f64> {
    let cleaned = s.trim().replace(',', "");
    let value = match cleaned.strip_suffix('%') {
        Some(pct) => pct.trim().parse::<f64>().ok().map(|v| v / 100.0),
        None => cleaned.parse::<f64>().ok(),
    };
    value.filter(|v| v.is_finite())
}

/// One quote-summary response for a ticker
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CompanySnapshot {
    pub ticker: String,
    pub long_name: Option<String>,
    pub sector: Option<String>,
    pub industry: Option<String>,
    pub business_summary: Option<String>,

    pub market_cap: Option<f64>,
    /// `price.regularMarketPrice`
    pub regular_market_price: Option<f64>,
    /// `financialData.currentPrice`
    pub current_price: Option<f64>,
    pub target_mean_price: Option<f64>,
    pub fifty_two_week_high: Option<f64>,
    pub fifty_two_week_low: Option<f64>,
    pub fifty_two_week_change: Option<f64>,

    pub trailing_pe: Option<f64>,
    pub forward_pe: Option<f64>,
    pub peg_ratio: Option<f64>,
    pub price_to_book: Option<f64>,
    pub price_to_sales: Option<f64>,
    pub enterprise_to_revenue: Option<f64>,
    pub enterprise_to_ebitda: Option<f64>,

    pub total_revenue: Option<f64>,
    pub revenue_growth: Option<f64>,
    pub earnings_growth: Option<f64>,
    pub gross_margins: Option<f64>,
    pub operating_margins: Option<f64>,
    pub profit_margins: Option<f64>,
    pub return_on_equity: Option<f64>,
    pub return_on_assets: Option<f64>,

    pub current_ratio: Option<f64>,
    pub quick_ratio: Option<f64>,
    pub debt_to_equity: Option<f64>,

    pub dividend_yield: Option<f64>,
    pub payout_ratio: Option<f64>,
    pub beta: Option<f64>,
    pub recommendation_key: Option<String>,
}

impl CompanySnapshot {
    /// Build a snapshot from `quoteSummary.result[0]`
    pub fn from_quote_summary(ticker: &str, result: &Value) -> Self {
        let empty = Value::Null;
        let module = |name: &str| result.get(name).unwrap_or(&empty);

        let price = module("price");
        let summary = module("summaryDetail");
        let financial = module("financialData");
        let stats = module("defaultKeyStatistics");
        let profile = module("assetProfile");

        Self {
            ticker: ticker.to_uppercase(),
            long_name: text_field(price, "longName").or_else(|| text_field(price, "shortName")),
            sector: text_field(profile, "sector"),
            industry: text_field(profile, "industry"),
            business_summary: text_field(profile, "longBusinessSummary"),

            market_cap: number_field(price, "marketCap")
                .or_else(|| number_field(summary, "marketCap")),
            regular_market_price: number_field(price, "regularMarketPrice"),
            current_price: number_field(financial, "currentPrice"),
            target_mean_price: number_field(financial, "targetMeanPrice"),
            fifty_two_week_high: number_field(summary, "fiftyTwoWeekHigh"),
            fifty_two_week_low: number_field(summary, "fiftyTwoWeekLow"),
            fifty_two_week_change: number_field(stats, "52WeekChange"),

            trailing_pe: number_field(summary, "trailingPE"),
            forward_pe: number_field(summary, "forwardPE")
                .or_else(|| number_field(stats, "forwardPE")),
            peg_ratio: number_field(stats, "pegRatio"),
            price_to_book: number_field(stats, "priceToBook"),
            price_to_sales: number_field(summary, "priceToSalesTrailing12Months"),
            enterprise_to_revenue: number_field(stats, "enterpriseToRevenue"),
            enterprise_to_ebitda: number_field(stats, "enterpriseToEbitda"),

            total_revenue: number_field(financial, "totalRevenue"),
            revenue_growth: number_field(financial, "revenueGrowth"),
            earnings_growth: number_field(financial, "earningsGrowth"),
            gross_margins: number_field(financial, "grossMargins"),
            operating_margins: number_field(financial, "operatingMargins"),
            profit_margins: number_field(financial, "profitMargins"),
            return_on_equity: number_field(financial, "returnOnEquity"),
            return_on_assets: number_field(financial, "returnOnAssets"),

            current_ratio: number_field(financial, "currentRatio"),
            quick_ratio: number_field(financial, "quickRatio"),
            debt_to_equity: number_field(financial, "debtToEquity"),

            dividend_yield: number_field(summary, "dividendYield"),
            payout_ratio: number_field(summary, "payoutRatio"),
            beta: number_field(summary, "beta"),
            recommendation_key: text_field(financial, "recommendationKey"),
        }
    }

    /// Best available last price
    pub fn price(&self) -> Option<f64> {
        self.current_price.or(self.regular_market_price)
    }
}

/// One item from the search endpoint's `news` array
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewsItem {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub publisher: Option<String>,
    #[serde(default)]
    pub link: Option<String>,
    /// Unix seconds
    #[serde(default)]
    pub provider_publish_time: Option<i64>,
    #[serde(default)]
    pub summary: Option<String>,
}

impl NewsItem {
    /// Publish date as `YYYY-MM-DD` (UTC)
    pub fn published_date(&self) -> Option<String> {
        let secs = self.provider_publish_time.filter(|t| *t > 0)?;
        DateTime::<Utc>::from_timestamp(secs, 0).map(|dt| dt.format("%Y-%m-%d").to_string())
    }
}

/// Daily OHLCV bar
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceBar {
    pub timestamp: DateTime<Utc>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: u64,
}

/// Aggregates over a run of price bars
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistoricalSummary {
    pub period: String,
    pub data_points: usize,
    pub latest_close: f64,
    pub period_high: f64,
    pub period_low: f64,
    pub average_volume: f64,
    /// First close to last close, in percent
    pub price_change_percent: f64,
}

impl HistoricalSummary {
    /// Summarise bars in chronological order; `None` when there are none
    pub fn from_bars(period: &str, bars: &[PriceBar]) -> Option<Self> {
        let first = bars.first()?;
        let last = bars.last()?;

        let period_high = bars.iter().map(|b| b.high).fold(f64::MIN, f64::max);
        let period_low = bars.iter().map(|b| b.low).fold(f64::MAX, f64::min);
        let average_volume =
            bars.iter().map(|b| b.volume as f64).sum::<f64>() / bars.len() as f64;
        let price_change_percent = if first.close == 0.0 {
            0.0
        } else {
            (last.close - first.close) / first.close * 100.0
        };

        Some(Self {
            period: period.to_string(),
            data_points: bars.len(),
            latest_close: last.close,
            period_high,
            period_low,
            average_volume,
            price_change_percent,
        })
    }
}
