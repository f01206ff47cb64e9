//! Plain-text report rendering
//!
//! Every report is a title line, a 70-char `=` rule and a blank line,
//! followed by `Label: value` lines. Missing values print `N/A`.

pub mod mergers;
pub mod metrics;
pub mod swot;

pub use mergers::{MA_KEYWORDS, filter_ma_news, render_ma_report};
pub use metrics::{MetricsKind, render_historical, render_ratios, render_summary};
pub use swot::{Swot, render_swot};

use crate::model::CompanySnapshot;

/// Width of the section rules
pub const RULE_WIDTH: usize = 70;

const NOT_AVAILABLE: &str = "N/A";

/// `=` rule
pub fn heavy_rule() -> String {
    "=".repeat(RULE_WIDTH)
}

/// `-` rule
pub fn light_rule() -> String {
    "-".repeat(RULE_WIDTH)
}

/// Title, heavy rule and a blank line
pub fn title(text: &str) -> String {
    format!("{text}\n{}\n\n", heavy_rule())
}

/// Plain value, shortest float representation
pub fn fmt_value(value: Option<f64>) -> String {
    value.map_or_else(|| NOT_AVAILABLE.to_string(), |v| v.to_string())
}

/// Text value or `N/A`
pub fn fmt_text(value: Option<&str>) -> String {
    value.unwrap_or(NOT_AVAILABLE).to_string()
}

/// Dollar value; `N/A` carries no currency sign
pub fn fmt_money(value: Option<f64>) -> String {
    value.map_or_else(|| NOT_AVAILABLE.to_string(), |v| format!("${v}"))
}

/// `$X.XXB` above a billion, `$X.XXM` above zero
pub fn fmt_market_cap(value: Option<f64>) -> String {
    match value {
        Some(cap) if cap > 1_000_000_000.0 => format!("${:.2}B", cap / 1_000_000_000.0),
        Some(cap) if cap > 0.0 => format!("${:.2}M", cap / 1_000_000.0),
        _ => NOT_AVAILABLE.to_string(),
    }
}

/// Fraction as a two-decimal percentage when `keep` accepts it
pub fn fmt_percent_if(value: Option<f64>, keep: impl Fn(f64) -> bool) -> String {
    match value {
        Some(v) if keep(v) => format!("{:.2}%", v * 100.0),
        _ => NOT_AVAILABLE.to_string(),
    }
}

/// `Company:` / `Sector:` / `Industry:` lines
pub fn company_block(snapshot: &CompanySnapshot) -> String {
    format!(
        "Company: {}\nSector: {}\nIndustry: {}\n",
        fmt_text(snapshot.long_name.as_deref()),
        fmt_text(snapshot.sector.as_deref()),
        fmt_text(snapshot.industry.as_deref()),
    )
}
