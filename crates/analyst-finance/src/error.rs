//! Error types for the financial analyst domain

use thiserror::Error;

/// Errors raised while fetching market data or running an analysis
#[derive(Debug, Error)]
pub enum FinanceError {
    /// Quote API answered with a non-success status
    #[error("API error ({status}): {message}")]
    ApiError {
        status: u16,
        message: String,
    },

    /// Ticker is empty or contains characters no exchange symbol uses
    #[error("Invalid ticker: {0}")]
    InvalidTicker(String),

    /// The API answered but had nothing for this ticker
    #[error("Data not available for {ticker}: {reason}")]
    DataUnavailable {
        ticker: String,
        reason: String,
    },

    /// HTTP 429 from the quote API
    #[error("Rate limit exceeded for {provider}")]
    RateLimited {
        provider: String,
    },

    /// Network or HTTP error
    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    /// JSON parsing error
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// History range outside the set the chart endpoint understands
    #[error("Unsupported range '{range}', expected one of {supported}")]
    InvalidRange {
        range: String,
        supported: String,
    },

    /// Price history lookup failed
    #[error("Yahoo Finance error: {0}")]
    YahooFinanceError(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Bot command could not be parsed
    #[error("Command error: {0}")]
    CommandError(String),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

/// Result type alias for finance operations
pub type Result<T> = std::result::Result<T, FinanceError>;

impl From<FinanceError> for analyst_core::Error {
    fn from(err: FinanceError) -> Self {
        analyst_core::Error::ProcessingFailed(err.to_string())
    }
}

impl From<analyst_core::Error> for FinanceError {
    fn from(err: analyst_core::Error) -> Self {
        FinanceError::Other(err.to_string())
    }
}

impl From<url::ParseError> for FinanceError {
    fn from(err: url::ParseError) -> Self {
        FinanceError::ConfigError(format!("invalid quote API URL: {err}"))
    }
}
