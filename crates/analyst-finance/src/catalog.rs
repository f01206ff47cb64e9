//! Popular tickers grouped by sector

/// Eight well-known tickers per sector
pub const POPULAR_TICKERS: &[(&str, &[&str])] = &[
    ("Technology", &["AAPL", "MSFT", "GOOGL", "META", "NVDA", "AMD", "TSLA", "AMZN"]),
    ("Finance", &["JPM", "BAC", "WFC", "GS", "MS", "C", "V", "MA"]),
    ("Healthcare", &["JNJ", "UNH", "PFE", "ABBV", "MRK", "TMO", "DHR", "CVS"]),
    ("Consumer", &["WMT", "HD", "NKE", "MCD", "SBUX", "COST", "TGT", "LOW"]),
    ("Energy", &["XOM", "CVX", "COP", "SLB", "EOG", "MPC", "PSX", "VLO"]),
    ("Industrial", &["CAT", "BA", "GE", "HON", "UPS", "LMT", "DE", "MMM"]),
];

/// Sector names in display order
pub fn sectors() -> Vec<&'static str> {
    POPULAR_TICKERS.iter().map(|(sector, _)| *sector).collect()
}

/// Tickers for a sector, matched case-insensitively; empty when unknown
pub fn tickers_for(sector: &str) -> &'static [&'static str] {
    let sector = sector.trim();
    POPULAR_TICKERS
        .iter()
        .find(|(name, _)| name.eq_ignore_ascii_case(sector))
        .map_or(&[], |(_, tickers)| *tickers)
}

/// Sector a popular ticker belongs to
pub fn sector_of(ticker: &str) -> Option<&'static str> {
    let ticker = ticker.trim();
    POPULAR_TICKERS
        .iter()
        .find(|(_, tickers)| tickers.iter().any(|t| t.eq_ignore_ascii_case(ticker)))
        .map(|(sector, _)| *sector)
}
