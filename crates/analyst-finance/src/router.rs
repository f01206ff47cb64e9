//! Keyword router for free-text questions
//!
//! Picks a ticker and a report from plain English without an LLM.
//! Resolution and intent detection are both first-match-wins tables.

use regex::Regex;
use std::sync::LazyLock;

/// Which report a question asks for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Intent {
    /// Strengths, weaknesses, opportunities, threats
    Swot,
    /// Merger and acquisition news
    MergersAcquisitions,
    /// Financial ratios
    Ratios,
    /// Summary financial metrics
    Metrics,
}

impl Intent {
    /// Label shown after `**Tool Selected:**`
    pub fn tool_label(self) -> &'static str {
        match self {
            Self::Swot => "SWOT Analysis",
            Self::MergersAcquisitions => "M&A Analyzer",
            Self::Ratios => "Financial Ratios",
            Self::Metrics => "Financial Metrics",
        }
    }
}

mod keywords {
    pub const SWOT: &[&str] = &[
        "swot",
        "strengths",
        "weaknesses",
        "opportunities",
        "threats",
        "strategic",
    ];

    pub const MERGERS: &[&str] = &["m&a", "merger", "acquisition", "deal", "buyout", "acquire"];

    pub const RATIOS: &[&str] = &["ratio", "ratios", "valuation", "profitability", "leverage"];
}

/// Company names that resolve to a ticker, lower case
pub const COMPANY_TO_TICKER: &[(&str, &str)] = &[
    ("general motors", "GM"),
    ("apple", "AAPL"),
    ("microsoft", "MSFT"),
    ("google", "GOOGL"),
    ("alphabet", "GOOGL"),
    ("meta", "META"),
    ("facebook", "META"),
    ("amazon", "AMZN"),
    ("tesla", "TSLA"),
    ("nvidia", "NVDA"),
    ("amd", "AMD"),
    ("intel", "INTC"),
    ("netflix", "NFLX"),
    ("disney", "DIS"),
    ("nike", "NKE"),
    ("walmart", "WMT"),
    ("target", "TGT"),
    ("jpmorgan", "JPM"),
    ("chase", "JPM"),
    ("goldman", "GS"),
    ("morgan", "MS"),
    ("visa", "V"),
    ("mastercard", "MA"),
    ("paypal", "PYPL"),
    ("square", "SQ"),
    ("boeing", "BA"),
    ("airbus", "AIR"),
    ("lockheed", "LMT"),
    ("raytheon", "RTX"),
    ("pfizer", "PFE"),
    ("moderna", "MRNA"),
    ("johnson", "JNJ"),
    ("abbvie", "ABBV"),
    ("exxon", "XOM"),
    ("chevron", "CVX"),
    ("shell", "SHEL"),
    ("bp", "BP"),
    ("starbucks", "SBUX"),
    ("mcdonalds", "MCD"),
    ("chipotle", "CMG"),
    ("ford", "F"),
    ("gm", "GM"),
    ("toyota", "TM"),
];

/// Words that look like tickers but are ordinary English or finance jargon
const COMMON_WORDS: &[&str] = &[
    "a", "i", "me", "my", "we", "us", "you", "your", "it", "its", "is", "am", "are", "was",
    "be", "been", "do", "does", "did", "doing", "can", "could", "will", "would", "shall",
    "should", "may", "might", "must", "the", "an", "and", "or", "but", "nor", "so", "yet",
    "if", "then", "than", "of", "on", "in", "at", "to", "for", "from", "by", "with", "about",
    "into", "over", "under", "as", "up", "down", "out", "off", "what", "whats", "which", "who",
    "whom", "whose", "why", "how", "when", "where", "this", "that", "these", "those", "there",
    "their", "they", "them", "he", "she", "his", "her", "our", "ours", "all", "any", "some",
    "each", "more", "most", "much", "many", "very", "just", "also", "only", "now", "new",
    "not", "no", "yes", "please", "thank", "thanks", "hi", "hello", "hey", "give", "show",
    "tell", "get", "got", "let", "lets", "find", "check", "look", "see", "know", "want",
    "need", "like", "good", "bad", "best", "worth", "buy", "sell", "hold", "stock", "stocks",
    "share", "price", "info", "data", "news", "report", "today", "year", "risk", "risks",
    "ceo", "cfo", "ipo", "eps", "roe", "roa", "pe", "etf", "usa", "firm", "deals", "going",
    "quick", "pls", "plz", "have", "has", "had", "debt", "beta", "cash", "sales", "margin",
    "cap", "caps", "yield", "ebit", "fcf", "ev", "peg", "pb", "ps", "div", "book", "value",
    "costs", "tax", "loss", "gain", "gains", "gross", "total", "rate", "rates", "trend",
    "chart", "high", "highs", "float", "bond", "bonds", "fund", "funds", "asset", "peers",
    "rival", "prices", "shares", "earn", "grade", "score", "moat", "churn",
];

fn is_routing_keyword(word: &str) -> bool {
    [keywords::SWOT, keywords::MERGERS, keywords::RATIOS]
        .iter()
        .any(|group| group.contains(&word))
        || matches!(word, "analyze" | "analyse" | "analysis" | "metrics" | "financial" | "company")
}

fn is_common_word(word: &str) -> bool {
    let lower = word.to_lowercase();
    COMMON_WORDS.contains(&lower.as_str()) || is_routing_keyword(&lower)
}

/// Upper-case tickers as typed, with an optional `$` and share-class suffix
static TICKER_TOKEN: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"^\$?([A-Z]{1,5}(?:[.\-][A-Z])?)$").ok());

fn trim_punctuation(word: &str) -> &str {
    word.trim_matches(|c: char| matches!(c, '.' | ',' | '!' | '?' | ';' | ':' | '"' | '\'' | '(' | ')'))
}

/// Strip punctuation and a possessive, so `Tesla's?` becomes `Tesla`
fn clean_word(word: &str) -> &str {
    let word = trim_punctuation(word);
    let word = word
        .strip_suffix("'s")
        .or_else(|| word.strip_suffix("\u{2019}s"))
        .unwrap_or(word);
    trim_punctuation(word)
}

/// Reply when no ticker can be found
pub const HELP_TEXT: &str = r#"I need a company ticker or name to analyze!

Try asking:
- "Analyze AAPL" or "Analyze Apple"
- "What are the financial metrics for Tesla?"
- "Give me a SWOT for NVDA" or "SWOT for Nvidia"
- "M&A activity for Microsoft"

Available: AAPL, MSFT, GOOGL, TSLA, NVDA, AMZN, META, etc."#;

/// Outcome of routing one question
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutingResult {
    pub ticker: Option<String>,
    pub intent: Intent,
}

/// Keyword router
#[derive(Debug, Clone, Default)]
pub struct SmartRouter;

impl SmartRouter {
    pub fn new() -> Self {
        Self
    }

    /// Classify a question; SWOT beats M&A beats ratios
    pub fn classify(&self, query: &str) -> Intent {
        let query = query.to_lowercase();
        if Self::matches_any(&query, keywords::SWOT) {
            Intent::Swot
        } else if Self::matches_any(&query, keywords::MERGERS) {
            Intent::MergersAcquisitions
        } else if Self::matches_any(&query, keywords::RATIOS) {
            Intent::Ratios
        } else {
            Intent::Metrics
        }
    }

    fn matches_any(query: &str, keywords: &[&str]) -> bool {
        keywords.iter().any(|kw| query.contains(kw))
    }

    /// Company name lookup: multi-word names first, then single words
    pub fn company_ticker(&self, query: &str) -> Option<&'static str> {
        let words: Vec<String> = query
            .split_whitespace()
            .map(|w| clean_word(w).to_lowercase())
            .filter(|w| !w.is_empty())
            .collect();
        let joined = format!(" {} ", words.join(" "));

        COMPANY_TO_TICKER
            .iter()
            .filter(|(name, _)| name.contains(' '))
            .find(|(name, _)| joined.contains(&format!(" {name} ")))
            .or_else(|| {
                words.iter().find_map(|word| {
                    COMPANY_TO_TICKER
                        .iter()
                        .find(|(name, _)| *name == word.as_str())
                })
            })
            .map(|(_, ticker)| *ticker)
    }

    /// Symbols typed in upper case, such as `NVDA` or `$BRK.B`
    pub fn extract_symbols(&self, query: &str) -> Vec<String> {
        let Some(pattern) = TICKER_TOKEN.as_ref() else {
            return Vec::new();
        };

        let mut symbols: Vec<String> = Vec::new();
        for word in query.split_whitespace() {
            let word = clean_word(word);
            if let Some(caps) = pattern.captures(word) {
                let symbol = caps[1].to_string();
                if !is_common_word(&symbol) && !symbols.contains(&symbol) {
                    symbols.push(symbol);
                }
            }
        }
        symbols
    }

    /// Short alphabetic words that are not common English, upper-cased
    fn candidate_words(query: &str) -> impl Iterator<Item = String> + '_ {
        query
            .split_whitespace()
            .map(clean_word)
            .filter(|w| (2..=5).contains(&w.len()) && w.chars().all(|c| c.is_ascii_alphabetic()))
            .filter(|w| !is_common_word(w))
            .map(str::to_uppercase)
    }

    /// Find the ticker a question is about, falling back to `remembered`
    pub fn resolve_ticker(&self, query: &str, remembered: Option<&str>) -> Option<String> {
        if let Some(ticker) = self.company_ticker(query) {
            return Some(ticker.to_string());
        }
        if let Some(symbol) = self.extract_symbols(query).into_iter().next() {
            return Some(symbol);
        }
        if let Some(word) = Self::candidate_words(query).next() {
            return Some(word);
        }
        remembered
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_uppercase)
    }

    /// Resolve the ticker and classify the intent
    pub fn route(&self, query: &str, remembered: Option<&str>) -> RoutingResult {
        let result = RoutingResult {
            ticker: self.resolve_ticker(query, remembered),
            intent: self.classify(query),
        };
        tracing::debug!(?result, "routed query");
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_intent_priority() {
        let router = SmartRouter::new();

        assert_eq!(router.classify("SWOT for NVDA"), Intent::Swot);
        assert_eq!(router.classify("strengths of the merger"), Intent::Swot);
        assert_eq!(router.classify("Any M&A deals for MSFT?"), Intent::MergersAcquisitions);
        assert_eq!(router.classify("acquisition valuation"), Intent::MergersAcquisitions);
        assert_eq!(router.classify("valuation ratios for AAPL"), Intent::Ratios);
        assert_eq!(router.classify("Analyze Tesla"), Intent::Metrics);
    }

    #[test]
    fn test_tool_labels() {
        assert_eq!(Intent::Swot.tool_label(), "SWOT Analysis");
        assert_eq!(Intent::MergersAcquisitions.tool_label(), "M&A Analyzer");
        assert_eq!(Intent::Ratios.tool_label(), "Financial Ratios");
        assert_eq!(Intent::Metrics.tool_label(), "Financial Metrics");
    }

    #[test]
    fn test_company_names() {
        let router = SmartRouter::new();

        assert_eq!(router.company_ticker("Analyze Apple!"), Some("AAPL"));
        assert_eq!(router.company_ticker("how is General Motors doing"), Some("GM"));
        assert_eq!(router.company_ticker("SWOT for Nvidia."), Some("NVDA"));
        assert_eq!(router.company_ticker("nothing here"), None);
    }

    #[test]
    fn test_symbol_extraction() {
        let router = SmartRouter::new();

        assert_eq!(router.extract_symbols("Give me a SWOT for NVDA"), vec!["NVDA"]);
        assert_eq!(router.extract_symbols("Compare $AAPL, MSFT and BRK.B?"), vec![
            "AAPL", "MSFT", "BRK.B"
        ]);
        assert!(router.extract_symbols("I want M&A news").is_empty());
    }

    #[test]
    fn test_resolution_order() {
        let router = SmartRouter::new();

        // company name beats an upper-case token
        assert_eq!(router.resolve_ticker("Is Tesla better than NVDA", None).as_deref(), Some("TSLA"));
        // upper-case token beats a lower-case word
        assert_eq!(router.resolve_ticker("ratios pls for IBM", None).as_deref(), Some("IBM"));
        // lower-case tickers still resolve when not common words
        assert_eq!(router.resolve_ticker("analyze tsla please", None).as_deref(), Some("TSLA"));
        assert_eq!(router.resolve_ticker("what are the ratios", Some("amzn")).as_deref(), Some("AMZN"));
        assert_eq!(router.resolve_ticker("what are the ratios", None), None);
    }

    #[test]
    fn test_finance_terms_keep_remembered_ticker() {
        let router = SmartRouter::new();

        for query in [
            "what about debt?",
            "and the beta",
            "how much cash do they have",
            "what about sales and margin",
            "is the risk high",
            "eps and price please",
        ] {
            assert_eq!(
                router.resolve_ticker(query, Some("MSFT")).as_deref(),
                Some("MSFT"),
                "{query}"
            );
        }

        // symbols that double as words still resolve when typed in upper case
        assert_eq!(router.resolve_ticker("compare LOW and COST", Some("MSFT")).as_deref(), Some("LOW"));
    }

    #[test]
    fn test_possessive_company_names() {
        let router = SmartRouter::new();

        assert_eq!(router.resolve_ticker("how is Tesla's margin", Some("MSFT")).as_deref(), Some("TSLA"));
        assert_eq!(router.resolve_ticker("Nvidia\u{2019}s threats?", None).as_deref(), Some("NVDA"));
        assert_eq!(router.extract_symbols("AAPL's ratios"), vec!["AAPL"]);
    }

    #[test]
    fn test_route() {
        let router = SmartRouter::new();
        let result = router.route("What are the strengths and weaknesses of Tesla?", None);
        assert_eq!(result.ticker.as_deref(), Some("TSLA"));
        assert_eq!(result.intent, Intent::Swot);
    }
}
