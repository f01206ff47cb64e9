//! Bounded conversation history for the analyst bot

use chrono::{DateTime, Utc};
use std::collections::VecDeque;

/// Turns kept when no limit is configured
pub const DEFAULT_MAX_HISTORY: usize = 50;

/// A single turn in the conversation
#[derive(Debug, Clone)]
pub struct ConversationTurn {
    pub user_input: String,
    pub response: String,
    /// Ticker the turn was about, if any
    pub ticker: Option<String>,
    pub timestamp: DateTime<Utc>,
}

impl ConversationTurn {
    pub fn new(user_input: String, response: String, ticker: Option<String>) -> Self {
        Self {
            user_input,
            response,
            ticker,
            timestamp: Utc::now(),
        }
    }
}

/// Oldest turns are dropped once the limit is reached
#[derive(Debug)]
pub struct ConversationManager {
    history: VecDeque<ConversationTurn>,
    max_history: usize,
}

impl Default for ConversationManager {
    fn default() -> Self {
        Self::new()
    }
}

impl ConversationManager {
    pub fn new() -> Self {
        Self::with_max_history(DEFAULT_MAX_HISTORY)
    }

    /// A limit of zero is treated as one
    pub fn with_max_history(max_history: usize) -> Self {
        let max_history = max_history.max(1);
        Self {
            history: VecDeque::with_capacity(max_history),
            max_history,
        }
    }

    pub fn add_turn(&mut self, user_input: String, response: String, ticker: Option<String>) {
        self.history
            .push_back(ConversationTurn::new(user_input, response, ticker));

        while self.history.len() > self.max_history {
            self.history.pop_front();
        }
    }

    pub fn history(&self) -> &VecDeque<ConversationTurn> {
        &self.history
    }

    /// Most recent first
    pub fn last_turns(&self, n: usize) -> Vec<&ConversationTurn> {
        self.history.iter().rev().take(n).collect()
    }

    /// Ticker of the most recent turn that had one
    pub fn last_ticker(&self) -> Option<&str> {
        self.history
            .iter()
            .rev()
            .find_map(|turn| turn.ticker.as_deref())
    }

    pub fn max_history(&self) -> usize {
        self.max_history
    }

    pub fn clear(&mut self) {
        self.history.clear();
    }

    pub fn len(&self) -> usize {
        self.history.len()
    }

    pub fn is_empty(&self) -> bool {
        self.history.is_empty()
    }
}
