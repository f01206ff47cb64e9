//! Configuration for the financial analyst

use crate::error::{FinanceError, Result};
use analyst_utils::{env_parse, env_var};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Public Yahoo Finance query host
pub const DEFAULT_QUOTE_BASE_URL: &str = "https://query2.finance.yahoo.com";

/// Browser user agent; the quote API rejects requests without one
pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";

/// Settings shared by the quote client, the reports and the LLM agent
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FinanceConfig {
    /// Quote API base URL
    pub quote_base_url: String,

    /// `User-Agent` header sent to the quote API
    pub user_agent: String,

    /// Per-request timeout
    pub request_timeout: Duration,

    /// Client-side throttle for quote API calls
    pub requests_per_minute: u32,

    /// How many news items to request per ticker
    pub news_count: usize,

    /// How many news items the M&A filter looks at
    pub ma_scan_limit: usize,

    /// How many M&A matches are shown
    pub ma_display_limit: usize,

    /// Range used by the historical metrics
    pub history_range: String,

    /// LLM model or serving endpoint name
    pub model: String,

    /// LLM sampling temperature
    pub temperature: f32,

    /// LLM max tokens per completion
    pub max_tokens: usize,

    /// Tool-loop iteration cap
    pub max_iterations: usize,
}

impl Default for FinanceConfig {
    fn default() -> Self {
        Self {
            quote_base_url: DEFAULT_QUOTE_BASE_URL.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            request_timeout: Duration::from_secs(10),
            requests_per_minute: 60,
            news_count: 10,
            ma_scan_limit: 15,
            ma_display_limit: 5,
            history_range: "1y".to_string(),
            model: "databricks-dbrx-instruct".to_string(),
            temperature: 0.1,
            max_tokens: 2000,
            max_iterations: 10,
        }
    }
}

impl FinanceConfig {
    /// Create a new configuration builder
    pub fn builder() -> FinanceConfigBuilder {
        FinanceConfigBuilder::default()
    }

    /// Defaults overridden by `ANALYST_*` environment variables
    pub fn from_env() -> Result<Self> {
        Self::builder().from_env().build()
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.quote_base_url.trim().is_empty() {
            return Err(FinanceError::ConfigError(
                "quote_base_url must not be empty".to_string(),
            ));
        }

        let limits = [
            ("requests_per_minute", self.requests_per_minute as usize),
            ("news_count", self.news_count),
            ("ma_scan_limit", self.ma_scan_limit),
            ("ma_display_limit", self.ma_display_limit),
            ("max_tokens", self.max_tokens),
            ("max_iterations", self.max_iterations),
        ];
        if let Some((name, _)) = limits.iter().find(|(_, v)| *v == 0) {
            return Err(FinanceError::ConfigError(format!(
                "{name} must be greater than 0"
            )));
        }

        if self.request_timeout.is_zero() {
            return Err(FinanceError::ConfigError(
                "request_timeout must be greater than 0".to_string(),
            ));
        }

        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(FinanceError::ConfigError(format!(
                "temperature must be within 0.0..=2.0, got {}",
                self.temperature
            )));
        }

        Ok(())
    }
}

/// Builder for FinanceConfig
#[derive(Debug, Default)]
pub struct FinanceConfigBuilder {
    quote_base_url: Option<String>,
    user_agent: Option<String>,
    request_timeout: Option<Duration>,
    requests_per_minute: Option<u32>,
    news_count: Option<usize>,
    ma_scan_limit: Option<usize>,
    ma_display_limit: Option<usize>,
    history_range: Option<String>,
    model: Option<String>,
    temperature: Option<f32>,
    max_tokens: Option<usize>,
    max_iterations: Option<usize>,
}

impl FinanceConfigBuilder {
    /// Set the quote API base URL
    pub fn quote_base_url(mut self, url: impl Into<String>) -> Self {
        self.quote_base_url = Some(url.into());
        self
    }

    /// Set the user agent
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = Some(agent.into());
        self
    }

    /// Set request timeout
    pub fn request_timeout(mut self, duration: Duration) -> Self {
        self.request_timeout = Some(duration);
        self
    }

    /// Set the quote API throttle
    pub fn requests_per_minute(mut self, rpm: u32) -> Self {
        self.requests_per_minute = Some(rpm);
        self
    }

    /// Set the number of news items requested
    pub fn news_count(mut self, count: usize) -> Self {
        self.news_count = Some(count);
        self
    }

    /// Set how many news items the M&A filter scans
    pub fn ma_scan_limit(mut self, limit: usize) -> Self {
        self.ma_scan_limit = Some(limit);
        self
    }

    /// Set how many M&A matches are shown
    pub fn ma_display_limit(mut self, limit: usize) -> Self {
        self.ma_display_limit = Some(limit);
        self
    }

    /// Set the default history range
    pub fn history_range(mut self, range: impl Into<String>) -> Self {
        self.history_range = Some(range.into());
        self
    }

    /// Set the LLM model
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Set the LLM temperature
    pub fn temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    /// Set the LLM max tokens
    pub fn max_tokens(mut self, max_tokens: usize) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    /// Set the tool-loop iteration cap
    pub fn max_iterations(mut self, max: usize) -> Self {
        self.max_iterations = Some(max);
        self
    }

    /// Fill unset fields from `ANALYST_*` environment variables
    pub fn from_env(mut self) -> Self {
        self.quote_base_url = self.quote_base_url.or_else(|| env_var("ANALYST_QUOTE_BASE_URL"));
        self.user_agent = self.user_agent.or_else(|| env_var("ANALYST_USER_AGENT"));
        self.request_timeout = self
            .request_timeout
            .or_else(|| env_parse::<u64>("ANALYST_TIMEOUT_SECS").map(Duration::from_secs));
        self.requests_per_minute = self
            .requests_per_minute
            .or_else(|| env_parse("ANALYST_REQUESTS_PER_MINUTE"));
        self.history_range = self.history_range.or_else(|| env_var("ANALYST_HISTORY_RANGE"));
        self.model = self.model.or_else(|| env_var("ANALYST_MODEL"));
        self.temperature = self.temperature.or_else(|| env_parse("ANALYST_TEMPERATURE"));
        self.max_tokens = self.max_tokens.or_else(|| env_parse("ANALYST_MAX_TOKENS"));
        self.max_iterations = self
            .max_iterations
            .or_else(|| env_parse("ANALYST_MAX_ITERATIONS"));
        self
    }

    /// Build and validate the configuration
    pub fn build(self) -> Result<FinanceConfig> {
        let defaults = FinanceConfig::default();

        let config = FinanceConfig {
            quote_base_url: self
                .quote_base_url
                .map(|u| u.trim_end_matches('/').to_string())
                .unwrap_or(defaults.quote_base_url),
            user_agent: self.user_agent.unwrap_or(defaults.user_agent),
            request_timeout: self.request_timeout.unwrap_or(defaults.request_timeout),
            requests_per_minute: self.requests_per_minute.unwrap_or(defaults.requests_per_minute),
            news_count: self.news_count.unwrap_or(defaults.news_count),
            ma_scan_limit: self.ma_scan_limit.unwrap_or(defaults.ma_scan_limit),
            ma_display_limit: self.ma_display_limit.unwrap_or(defaults.ma_display_limit),
            history_range: self.history_range.unwrap_or(defaults.history_range),
            model: self.model.unwrap_or(defaults.model),
            temperature: self.temperature.unwrap_or(defaults.temperature),
            max_tokens: self.max_tokens.unwrap_or(defaults.max_tokens),
            max_iterations: self.max_iterations.unwrap_or(defaults.max_iterations),
        };

        config.validate()?;
        Ok(config)
    }
}
