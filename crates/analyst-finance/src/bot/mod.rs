//! Financial Analyst Bot
//!
//! A conversational front end over the analysis surfaces.
//!
//! # Features
//!
//! - **Slash commands**: `/metrics AAPL`, `/swot TSLA`, `/history NVDA 6mo`
//! - **Free text**: anything else goes to the keyword-routed [`SmartAgent`]
//! - **Follow-ups**: the last ticker is kept in a [`Context`]
//! - **LLM agent**: `/agent <question>` when a provider is configured
//!
//! # Example
//!
//! ```rust,ignore
//! use analyst_finance::bot::{AnalystBot, BotConfig};
//!
//! let mut bot = AnalystBot::from_config(BotConfig::from_env()?)?;
//! if let Some(reply) = bot.process_input("/swot AAPL").await? {
//!     println!("{reply}");
//! }
//! ```

pub mod commands;
pub mod conversation;

use crate::agents::{AnalystAgent, SmartAgent};
use crate::analyst::FinancialAnalyst;
use crate::catalog::{POPULAR_TICKERS, sector_of, sectors, tickers_for};
use crate::config::FinanceConfig;
use crate::error::Result;
use crate::report::title;
use analyst_core::Context;
use tracing::{debug, info};
use uuid::Uuid;

pub use commands::Command;
pub use conversation::{ConversationManager, ConversationTurn, DEFAULT_MAX_HISTORY};

/// Reply to `/agent` when no LLM provider was configured
pub const AGENT_UNAVAILABLE_MESSAGE: &str = "The LLM agent is not configured. \
Set OPENAI_API_KEY (optionally OPENAI_API_BASE), or DATABRICKS_HOST and DATABRICKS_TOKEN, \
and restart the bot. Free-text questions still work through the smart agent.";

/// Configuration for the analyst bot
#[derive(Debug, Clone)]
pub struct BotConfig {
    pub finance: FinanceConfig,
    pub welcome_message: String,
    pub prompt: String,
    pub max_history: usize,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            finance: FinanceConfig::default(),
            welcome_message: "Financial Analyst Bot - type /help for commands".to_string(),
            prompt: ">>> ".to_string(),
            max_history: DEFAULT_MAX_HISTORY,
        }
    }
}

impl BotConfig {
    /// Create config from environment variables
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            finance: FinanceConfig::from_env()?,
            ..Default::default()
        })
    }

    pub fn builder() -> BotConfigBuilder {
        BotConfigBuilder::default()
    }
}

/// Builder for [`BotConfig`]
#[derive(Debug, Default)]
pub struct BotConfigBuilder {
    finance: Option<FinanceConfig>,
    welcome_message: Option<String>,
    prompt: Option<String>,
    max_history: Option<usize>,
}

impl BotConfigBuilder {
    pub fn finance(mut self, config: FinanceConfig) -> Self {
        self.finance = Some(config);
        self
    }

    pub fn welcome_message(mut self, msg: impl Into<String>) -> Self {
        self.welcome_message = Some(msg.into());
        self
    }

    pub fn prompt(mut self, prompt: impl Into<String>) -> Self {
        self.prompt = Some(prompt.into());
        self
    }

    pub fn max_history(mut self, max: usize) -> Self {
        self.max_history = Some(max);
        self
    }

    pub fn build(self) -> BotConfig {
        let defaults = BotConfig::default();
        BotConfig {
            finance: self.finance.unwrap_or(defaults.finance),
            welcome_message: self.welcome_message.unwrap_or(defaults.welcome_message),
            prompt: self.prompt.unwrap_or(defaults.prompt),
            max_history: self.max_history.unwrap_or(defaults.max_history),
        }
    }
}

/// Financial Analyst Bot
pub struct AnalystBot {
    analyst: FinancialAnalyst,
    smart: SmartAgent,
    agent: Option<AnalystAgent>,
    conversation: ConversationManager,
    context: Context,
    config: BotConfig,
}

impl AnalystBot {
    /// Bot over an existing analyst, without an LLM agent
    pub fn new(analyst: FinancialAnalyst, config: BotConfig) -> Self {
        let session_id = Uuid::new_v4().to_string();
        info!(session_id = %session_id, "starting analyst bot session");

        Self {
            smart: SmartAgent::new(analyst.clone()),
            analyst,
            agent: None,
            conversation: ConversationManager::with_max_history(config.max_history),
            context: Context::new().with_session_id(session_id),
            config,
        }
    }

    /// Bot backed by the Yahoo Finance client
    pub fn from_config(config: BotConfig) -> Result<Self> {
        let analyst = FinancialAnalyst::yahoo(config.finance.clone())?;
        Ok(Self::new(analyst, config))
    }

    /// Enable `/agent`
    pub fn with_agent(mut self, agent: AnalystAgent) -> Self {
        self.agent = Some(agent);
        self
    }

    pub fn analyst(&self) -> &FinancialAnalyst {
        &self.analyst
    }

    pub fn welcome(&self) -> &str {
        &self.config.welcome_message
    }

    pub fn prompt(&self) -> &str {
        &self.config.prompt
    }

    pub fn session_id(&self) -> Option<&str> {
        self.context.session_id()
    }

    pub fn has_agent(&self) -> bool {
        self.agent.is_some()
    }

    /// Ticker follow-up questions resolve to
    pub fn current_ticker(&self) -> Option<&str> {
        self.context.ticker()
    }

    pub fn conversation(&self) -> &ConversationManager {
        &self.conversation
    }

    /// Process user input; `None` means the user asked to exit
    pub async fn process_input(&mut self, input: &str) -> Result<Option<String>> {
        let command = Command::parse(input)?;
        debug!(command = command.description(), "parsed bot input");
        self.execute_command(command, input.trim()).await
    }

    async fn execute_command(&mut self, command: Command, input: &str) -> Result<Option<String>> {
        let (reply, ticker) = match command {
            Command::Metrics { ticker, kind } => {
                let report = self.analyst.financial_metrics(&ticker, kind).await;
                (report, Some(ticker))
            }
            Command::History { ticker, range } => {
                let range = range.unwrap_or_else(|| self.analyst.config().history_range.clone());
                let report = self.analyst.history_report(&ticker, &range).await;
                (report, Some(ticker))
            }
            Command::MergersAcquisitions { ticker } => {
                let report = self.analyst.ma_analysis(&ticker).await;
                (report, Some(ticker))
            }
            Command::Swot { ticker } => {
                let report = self.analyst.swot_analysis(&ticker).await;
                (report, Some(ticker))
            }
            Command::Analyze { ticker, analysis } => {
                let report = self.analyst.analyze(&ticker, analysis).await;
                (report, Some(ticker))
            }
            Command::Sectors => (render_sectors(), None),
            Command::Sector { name } => (render_sector(&name), None),
            Command::Agent { question } => {
                let Some(agent) = &self.agent else {
                    return Ok(Some(AGENT_UNAVAILABLE_MESSAGE.to_string()));
                };
                let response = agent.query(&question, &mut self.context).await;
                let ticker = self.context.ticker().map(str::to_string);
                (response.output, ticker)
            }
            Command::Clear => {
                self.conversation.clear();
                self.context.reset();
                return Ok(Some("Conversation history cleared.".to_string()));
            }
            Command::Help => return Ok(Some(Command::help_text().to_string())),
            Command::Exit => return Ok(None),
            Command::Query { text } => {
                let reply = self.smart.respond(&text, &mut self.context).await;
                let ticker = self.context.ticker().map(str::to_string);
                (reply, ticker)
            }
        };

        if let Some(ticker) = &ticker {
            self.context.set_ticker(ticker);
        }
        self.conversation
            .add_turn(input.to_string(), reply.clone(), ticker);
        Ok(Some(reply))
    }
}

fn render_sectors() -> String {
    let mut output = title("Popular Tickers by Sector");
    for (sector, tickers) in POPULAR_TICKERS {
        output.push_str(&format!("{sector:<12} {}\n", tickers.join(", ")));
    }
    output
}

/// Tickers for a sector; a popular ticker stands in for its own sector
fn render_sector(name: &str) -> String {
    let name = name.trim();
    let (sector, tickers) = match (tickers_for(name), sector_of(name)) {
        (tickers, _) if !tickers.is_empty() => (name.to_string(), tickers),
        (_, Some(sector)) => (sector.to_string(), tickers_for(sector)),
        _ => {
            return format!(
                "Unknown sector '{name}'. Available sectors: {}",
                sectors().join(", ")
            );
        }
    };

    let mut output = title(&format!("Popular {sector} Tickers"));
    output.push_str(&tickers.join(", "));
    output.push('\n');
    output
}
