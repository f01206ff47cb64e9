//! M&A news filter and report

use super::{company_block, fmt_market_cap, title};
use crate::model::{CompanySnapshot, NewsItem};

/// Case-insensitive substrings that mark a headline as deal news
pub const MA_KEYWORDS: &[&str] = &[
    "merger",
    "acquisition",
    "acquire",
    "bought",
    "purchase",
    "takeover",
    "deal",
    "buyout",
    "consolidation",
    "m&a",
];

const SUMMARY_LIMIT: usize = 300;

fn is_ma_related(item: &NewsItem) -> bool {
    let title = item.title.to_lowercase();
    let summary = item.summary.as_deref().unwrap_or_default().to_lowercase();
    MA_KEYWORDS
        .iter()
        .any(|kw| title.contains(kw) || summary.contains(kw))
}

/// M&A-related items among the first `scan_limit` news items
pub fn filter_ma_news(news: &[NewsItem], scan_limit: usize) -> Vec<&NewsItem> {
    news.iter()
        .take(scan_limit)
        .filter(|item| is_ma_related(item))
        .collect()
}

fn truncate_chars(text: &str, limit: usize) -> String {
    match text.char_indices().nth(limit) {
        Some((idx, _)) => format!("{}...", &text[..idx]),
        None => text.to_string(),
    }
}

/// `M&A Activity Analysis for {TICKER}`
///
/// The count in the heading covers every match; only the first
/// `display_limit` are listed.
pub fn render_ma_report(
    snapshot: &CompanySnapshot,
    matches: &[&NewsItem],
    display_limit: usize,
) -> String {
    let mut output = title(&format!("M&A Activity Analysis for {}", snapshot.ticker));
    output.push_str(&company_block(snapshot));
    output.push_str(&format!(
        "Market Cap: {}\n\n",
        fmt_market_cap(snapshot.market_cap)
    ));

    if matches.is_empty() {
        output.push_str("No recent M&A-related news found.\n\n");
        output.push_str("This could indicate:\n");
        output.push_str("  - The company is not actively pursuing M&A\n");
        output.push_str("  - M&A activities are confidential/pre-announcement\n");
        output.push_str("  - The industry is experiencing low M&A activity\n");
        return output;
    }

    output.push_str(&format!(
        "Recent M&A-Related News ({} items):\n\n",
        matches.len()
    ));

    for (i, item) in matches.iter().take(display_limit).enumerate() {
        output.push_str(&format!("{}. {}\n", i + 1, item.title));
        output.push_str(&format!(
            "   Publisher: {}\n",
            item.publisher.as_deref().unwrap_or("N/A")
        ));
        if let Some(date) = item.published_date() {
            output.push_str(&format!("   Date: {date}\n"));
        }
        if let Some(summary) = item.summary.as_deref().filter(|s| !s.trim().is_empty()) {
            output.push_str(&format!(
                "   Summary: {}\n",
                truncate_chars(summary.trim(), SUMMARY_LIMIT)
            ));
        }
        output.push_str(&format!(
            "   Link: {}\n\n",
            item.link.as_deref().unwrap_or("N/A")
        ));
    }

    output
}
