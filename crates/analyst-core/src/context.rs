//! Execution context for agents
//!
//! The `Context` struct is a small key-value store carried across turns of a
//! conversation. The bot uses it to remember the last ticker so follow-up
//! questions ("and its ratios?") resolve without repeating the symbol.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Well-known context keys
pub mod keys {
    /// Last ticker the user asked about
    pub const TICKER: &str = "ticker";
    /// Last analysis that was run (e.g., "SWOT Analysis")
    pub const LAST_ANALYSIS: &str = "last_analysis";
    /// Session ID for tracking
    pub const SESSION_ID: &str = "session_id";
}

/// Context passed to agents during execution
///
/// # Example
///
/// ```
/// use analyst_core::Context;
///
/// let ctx = Context::new()
///     .with_ticker("aapl")
///     .with_session_id("session-123");
///
/// assert_eq!(ctx.ticker(), Some("AAPL"));
/// assert_eq!(ctx.session_id(), Some("session-123"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct Context {
    data: HashMap<String, serde_json::Value>,
}

impl Context {
    /// Create a new empty context
    pub fn new() -> Self {
        Self::default()
    }

    // =========== Builder Methods ===========

    /// Set the current ticker (stored upper-cased)
    pub fn with_ticker(mut self, ticker: impl AsRef<str>) -> Self {
        self.set_ticker(ticker);
        self
    }

    /// Set the session ID
    pub fn with_session_id(mut self, session_id: impl Into<String>) -> Self {
        self.insert(keys::SESSION_ID, serde_json::json!(session_id.into()));
        self
    }

    // =========== Common Accessors ===========

    /// Get the current ticker
    pub fn ticker(&self) -> Option<&str> {
        self.get(keys::TICKER).and_then(|v| v.as_str())
    }

    /// Set the current ticker (stored upper-cased)
    pub fn set_ticker(&mut self, ticker: impl AsRef<str>) {
        let ticker = ticker.as_ref().trim().to_uppercase();
        if !ticker.is_empty() {
            self.insert(keys::TICKER, serde_json::json!(ticker));
        }
    }

    /// Get the last analysis label
    pub fn last_analysis(&self) -> Option<&str> {
        self.get(keys::LAST_ANALYSIS).and_then(|v| v.as_str())
    }

    /// Record the last analysis label
    pub fn set_last_analysis(&mut self, label: impl Into<String>) {
        self.insert(keys::LAST_ANALYSIS, serde_json::json!(label.into()));
    }

    /// Get the session ID
    pub fn session_id(&self) -> Option<&str> {
        self.get(keys::SESSION_ID).and_then(|v| v.as_str())
    }

    // =========== Generic Key-Value Operations ===========

    /// Insert a value into the context
    pub fn insert(&mut self, key: impl Into<String>, value: serde_json::Value) {
        self.data.insert(key.into(), value);
    }

    /// Get a value from the context
    pub fn get(&self, key: &str) -> Option<&serde_json::Value> {
        self.data.get(key)
    }

    /// Insert a typed value into the context
    pub fn insert_typed<T: Serialize>(
        &mut self,
        key: impl Into<String>,
        value: &T,
    ) -> crate::Result<()> {
        let json_value = serde_json::to_value(value).map_err(|e| {
            crate::Error::ProcessingFailed(format!("Failed to serialize context value: {e}"))
        })?;
        self.data.insert(key.into(), json_value);
        Ok(())
    }

    /// Get a typed value from the context
    pub fn get_typed<T: for<'de> Deserialize<'de>>(&self, key: &str) -> crate::Result<Option<T>> {
        match self.data.get(key) {
            None => Ok(None),
            Some(value) => {
                let typed = serde_json::from_value(value.clone()).map_err(|e| {
                    crate::Error::ProcessingFailed(format!(
                        "Failed to deserialize context value: {e}"
                    ))
                })?;
                Ok(Some(typed))
            }
        }
    }

    /// Remove a value from the context
    pub fn remove(&mut self, key: &str) -> Option<serde_json::Value> {
        self.data.remove(key)
    }

    /// Clear all values except the session ID
    pub fn reset(&mut self) {
        let session = self.data.remove(keys::SESSION_ID);
        self.data.clear();
        if let Some(session) = session {
            self.data.insert(keys::SESSION_ID.to_string(), session);
        }
    }

    /// Get the number of entries in the context
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Check if the context is empty
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}
