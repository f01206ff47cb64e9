//! Financial metrics reports

use super::{company_block, fmt_market_cap, fmt_money, fmt_percent_if, fmt_text, fmt_value, title};
use crate::model::{CompanySnapshot, HistoricalSummary};
use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

/// Which metrics report to render
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MetricsKind {
    #[default]
    Summary,
    Ratios,
    Historical,
    Detailed,
}

impl MetricsKind {
    pub const ALL: [MetricsKind; 4] = [
        MetricsKind::Summary,
        MetricsKind::Ratios,
        MetricsKind::Historical,
        MetricsKind::Detailed,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            MetricsKind::Summary => "summary",
            MetricsKind::Ratios => "ratios",
            MetricsKind::Historical => "historical",
            MetricsKind::Detailed => "detailed",
        }
    }
}

impl fmt::Display for MetricsKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unknown kinds fall back to [`MetricsKind::Summary`]
impl FromStr for MetricsKind {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim().to_lowercase().as_str() {
            "ratios" | "ratio" => MetricsKind::Ratios,
            "historical" | "history" => MetricsKind::Historical,
            "detailed" | "detail" | "full" => MetricsKind::Detailed,
            _ => MetricsKind::Summary,
        })
    }
}

/// `Financial Metrics for {TICKER}`
pub fn render_summary(snapshot: &CompanySnapshot) -> String {
    let s = snapshot;
    let mut output = title(&format!("Financial Metrics for {}", s.ticker));

    output.push_str(&company_block(s));
    output.push('\n');

    output.push_str(&format!("Market Cap: {}\n", fmt_market_cap(s.market_cap)));
    output.push_str(&format!("Current Price: {}\n", fmt_money(s.regular_market_price)));
    output.push_str(&format!("52 Week High: {}\n", fmt_money(s.fifty_two_week_high)));
    output.push_str(&format!("52 Week Low: {}\n\n", fmt_money(s.fifty_two_week_low)));

    output.push_str("Valuation Metrics:\n");
    output.push_str(&format!("  P/E Ratio: {}\n", fmt_value(s.trailing_pe)));
    output.push_str(&format!("  Forward P/E: {}\n", fmt_value(s.forward_pe)));
    output.push_str(&format!("  Price to Book: {}\n", fmt_value(s.price_to_book)));
    output.push_str(&format!("  PEG Ratio: {}\n\n", fmt_value(s.peg_ratio)));

    output.push_str("Profitability:\n");
    output.push_str(&format!(
        "  Profit Margin: {}\n",
        fmt_percent_if(s.profit_margins, |v| v > 0.0)
    ));
    output.push_str(&format!(
        "  Operating Margin: {}\n",
        fmt_percent_if(s.operating_margins, |v| v > 0.0)
    ));
    output.push_str(&format!("  ROE: {}\n", fmt_value(s.return_on_equity)));
    output.push_str(&format!("  ROA: {}\n\n", fmt_value(s.return_on_assets)));

    output.push_str("Growth:\n");
    output.push_str(&format!(
        "  Revenue Growth: {}\n",
        fmt_percent_if(s.revenue_growth, |v| v != 0.0)
    ));
    output.push_str(&format!("  Earnings Growth: {}\n\n", fmt_value(s.earnings_growth)));

    output.push_str("Financial Health:\n");
    output.push_str(&format!("  Current Ratio: {}\n", fmt_value(s.current_ratio)));
    output.push_str(&format!("  Debt to Equity: {}\n", fmt_value(s.debt_to_equity)));
    output.push_str(&format!("  Quick Ratio: {}\n\n", fmt_value(s.quick_ratio)));

    output.push_str("Dividend:\n");
    output.push_str(&format!(
        "  Dividend Yield: {}\n",
        fmt_percent_if(s.dividend_yield, |v| v > 0.0)
    ));
    output.push_str(&format!("  Payout Ratio: {}\n\n", fmt_value(s.payout_ratio)));

    let recommendation = s.recommendation_key.as_deref().map(str::to_uppercase);
    output.push_str(&format!(
        "Analyst Recommendation: {}\n",
        fmt_text(recommendation.as_deref())
    ));

    output
}

/// `Financial Ratios for {TICKER}`
pub fn render_ratios(snapshot: &CompanySnapshot) -> String {
    let s = snapshot;
    let mut output = title(&format!("Financial Ratios for {}", s.ticker));

    let sections: [(&str, Vec<(&str, Option<f64>)>); 4] = [
        (
            "Profitability Ratios",
            vec![
                ("Gross Margin", s.gross_margins),
                ("Operating Margin", s.operating_margins),
                ("Profit Margin", s.profit_margins),
                ("ROE", s.return_on_equity),
                ("ROA", s.return_on_assets),
            ],
        ),
        (
            "Valuation Ratios",
            vec![
                ("P/E Ratio", s.trailing_pe),
                ("Forward P/E", s.forward_pe),
                ("PEG Ratio", s.peg_ratio),
                ("Price to Book", s.price_to_book),
                ("Price to Sales", s.price_to_sales),
                ("EV/Revenue", s.enterprise_to_revenue),
                ("EV/EBITDA", s.enterprise_to_ebitda),
            ],
        ),
        (
            "Liquidity Ratios",
            vec![
                ("Current Ratio", s.current_ratio),
                ("Quick Ratio", s.quick_ratio),
            ],
        ),
        ("Leverage Ratios", vec![("Debt to Equity", s.debt_to_equity)]),
    ];

    let rendered: Vec<String> = sections
        .iter()
        .map(|(heading, rows)| {
            let mut section = format!("{heading}:\n");
            for (label, value) in rows {
                section.push_str(&format!("  {label}: {}\n", fmt_value(*value)));
            }
            section
        })
        .collect();

    output.push_str(&rendered.join("\n"));
    output
}

/// `Price History for {TICKER} ({range})`
pub fn render_historical(ticker: &str, range: &str, history: Option<&HistoricalSummary>) -> String {
    let mut output = title(&format!("Price History for {ticker} ({range})"));
    let Some(h) = history else {
        output.push_str("No historical data available\n");
        return output;
    };

    output.push_str(&format!("Data Points: {}\n", h.data_points));
    output.push_str(&format!("Latest Close: ${:.2}\n", h.latest_close));
    output.push_str(&format!("Period High: ${:.2}\n", h.period_high));
    output.push_str(&format!("Period Low: ${:.2}\n", h.period_low));
    output.push_str(&format!("Average Volume: {:.0}\n", h.average_volume));
    output.push_str(&format!("Price Change: {:+.2}%\n", h.price_change_percent));
    output
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot() -> CompanySnapshot {
        CompanySnapshot {
            ticker: "AAPL".into(),
            long_name: Some("Apple Inc.".into()),
            sector: Some("Technology".into()),
            industry: Some("Consumer Electronics".into()),
            market_cap: Some(2_950_000_000_000.0),
            regular_market_price: Some(189.5),
            trailing_pe: Some(29.1),
            profit_margins: Some(0.2531),
            operating_margins: Some(-0.02),
            revenue_growth: Some(-0.014),
            enterprise_to_ebitda: Some(22.4),
            dividend_yield: Some(0.0051),
            recommendation_key: Some("strong_buy".into()),
            ..Default::default()
        }
    }

    #[test]
    fn test_metrics_kind_parse() {
        assert_eq!("ratios".parse::<MetricsKind>().unwrap(), MetricsKind::Ratios);
        assert_eq!(" Historical ".parse::<MetricsKind>().unwrap(), MetricsKind::Historical);
        assert_eq!("detailed".parse::<MetricsKind>().unwrap(), MetricsKind::Detailed);
        assert_eq!("whatever".parse::<MetricsKind>().unwrap(), MetricsKind::Summary);
        assert_eq!(MetricsKind::default().to_string(), "summary");
    }

    #[test]
    fn test_render_summary() {
        let report = render_summary(&snapshot());

        assert!(report.starts_with("Financial Metrics for AAPL\n"));
        assert!(report.contains("Company: Apple Inc.\nSector: Technology\n"));
        assert!(report.contains("Market Cap: $2950.00B\n"));
        assert!(report.contains("Current Price: $189.5\n"));
        assert!(report.contains("52 Week High: N/A\n"));
        assert!(report.contains("  P/E Ratio: 29.1\n"));
        assert!(report.contains("  Profit Margin: 25.31%\n"));
        // non-positive margins are not shown as percentages
        assert!(report.contains("  Operating Margin: N/A\n"));
        // negative growth still is
        assert!(report.contains("  Revenue Growth: -1.40%\n"));
        assert!(report.contains("  Dividend Yield: 0.51%\n"));
        assert!(report.ends_with("Analyst Recommendation: STRONG_BUY\n"));
    }

    #[test]
    fn test_render_summary_empty_snapshot() {
        let report = render_summary(&CompanySnapshot {
            ticker: "ZZZ".into(),
            ..Default::default()
        });
        assert!(report.contains("Market Cap: N/A\n"));
        assert!(report.contains("Analyst Recommendation: N/A\n"));
    }

    #[test]
    fn test_render_ratios() {
        let report = render_ratios(&snapshot());

        assert!(report.starts_with("Financial Ratios for AAPL\n"));
        assert!(report.contains("Profitability Ratios:\n  Gross Margin: N/A\n"));
        assert!(report.contains("  Profit Margin: 0.2531\n"));
        assert!(report.contains("  EV/EBITDA: 22.4\n"));
        assert!(report.contains("\n\nLiquidity Ratios:\n"));
        assert!(report.ends_with("Leverage Ratios:\n  Debt to Equity: N/A\n"));
    }

    #[test]
    fn test_render_historical() {
        let summary = HistoricalSummary {
            period: "1mo".into(),
            data_points: 21,
            latest_close: 120.0,
            period_high: 121.5,
            period_low: 98.25,
            average_volume: 2_000_000.4,
            price_change_percent: 20.0,
        };

        let report = render_historical("MSFT", "1mo", Some(&summary));
        assert!(report.starts_with("Price History for MSFT (1mo)\n"));
        assert!(report.contains("Data Points: 21\n"));
        assert!(report.contains("Period Low: $98.25\n"));
        assert!(report.contains("Average Volume: 2000000\n"));
        assert!(report.contains("Price Change: +20.00%\n"));

        let empty = render_historical("MSFT", "5d", None);
        assert!(empty.starts_with("Price History for MSFT (5d)\n"));
        assert!(empty.ends_with("No historical data available\n"));
    }
}
