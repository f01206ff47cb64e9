//! Slash-command parsing for the analyst bot

use crate::analyst::AnalysisType;
use crate::error::{FinanceError, Result};
use crate::report::MetricsKind;

/// Parsed command from user input
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Financial metrics report
    Metrics { ticker: String, kind: MetricsKind },
    /// Price history for a range, or the configured default
    History {
        ticker: String,
        range: Option<String>,
    },
    /// M&A news scan
    MergersAcquisitions { ticker: String },
    /// Rule-based SWOT
    Swot { ticker: String },
    /// One of the three analyses picked by name
    Analyze {
        ticker: String,
        analysis: AnalysisType,
    },
    /// List sectors with their popular tickers
    Sectors,
    /// Popular tickers for one sector
    Sector { name: String },
    /// Question for the LLM agent
    Agent { question: String },
    /// Clear conversation history
    Clear,
    /// Show help
    Help,
    /// Exit the bot
    Exit,
    /// Free text for the smart agent
    Query { text: String },
}

fn required_ticker(args: &[&str], command: &str) -> Result<String> {
    args.first()
        .map(|t| t.to_uppercase())
        .ok_or_else(|| FinanceError::CommandError(format!("Missing ticker for {command} command")))
}

impl Command {
    /// Parse a command from user input
    pub fn parse(input: &str) -> Result<Self> {
        let input = input.trim();

        if input.is_empty() {
            return Err(FinanceError::CommandError("Empty input".to_string()));
        }

        let Some(rest) = input.strip_prefix('/') else {
            return Ok(Command::Query {
                text: input.to_string(),
            });
        };

        let parts: Vec<&str> = rest.split_whitespace().collect();
        let Some((cmd, args)) = parts.split_first() else {
            return Err(FinanceError::CommandError("Empty command".to_string()));
        };
        let cmd = cmd.to_lowercase();

        match cmd.as_str() {
            "metrics" | "m" => {
                let ticker = required_ticker(args, "metrics")?;
                let kind = args
                    .get(1)
                    .and_then(|k| k.parse().ok())
                    .unwrap_or_default();
                Ok(Command::Metrics { ticker, kind })
            }
            "ratios" | "r" => Ok(Command::Metrics {
                ticker: required_ticker(args, "ratios")?,
                kind: MetricsKind::Ratios,
            }),
            "history" | "h" => Ok(Command::History {
                ticker: required_ticker(args, "history")?,
                range: args.get(1).map(|r| r.to_lowercase()),
            }),
            "ma" | "mergers" => Ok(Command::MergersAcquisitions {
                ticker: required_ticker(args, "ma")?,
            }),
            "swot" | "s" => Ok(Command::Swot {
                ticker: required_ticker(args, "swot")?,
            }),
            "analyze" | "a" => {
                let ticker = required_ticker(args, "analyze")?;
                if args.len() < 2 {
                    return Err(FinanceError::CommandError(
                        "Missing analysis type. Use /analyze <ticker> metrics|ma|swot".to_string(),
                    ));
                }
                let analysis = args[1..].join(" ").parse()?;
                Ok(Command::Analyze { ticker, analysis })
            }
            "sectors" => Ok(Command::Sectors),
            "sector" => {
                if args.is_empty() {
                    return Err(FinanceError::CommandError(
                        "Missing sector name for sector command".to_string(),
                    ));
                }
                Ok(Command::Sector {
                    name: args.join(" "),
                })
            }
            "agent" | "ask" => {
                if args.is_empty() {
                    return Err(FinanceError::CommandError(
                        "Missing question for agent command".to_string(),
                    ));
                }
                Ok(Command::Agent {
                    question: args.join(" "),
                })
            }
            "clear" | "cls" => Ok(Command::Clear),
            "help" | "?" => Ok(Command::Help),
            "exit" | "quit" | "q" => Ok(Command::Exit),
            _ => Err(FinanceError::CommandError(format!("Unknown command: {cmd}"))),
        }
    }

    /// Get help text for all commands
    pub fn help_text() -> &'static str {
        r#"
Financial Analyst Bot Commands
==============================

Analysis Commands:
  /metrics <ticker> [kind]    Financial metrics (summary, ratios, historical, detailed)
  /ratios <ticker>            Key financial ratios
  /history <ticker> [range]   Price history (1mo, 3mo, 6mo, 1y, 5y, ytd, max...)
  /ma <ticker>                M&A news scan
  /swot <ticker>              SWOT analysis
  /analyze <ticker> <type>    Run metrics, ma or swot by name

Reference Commands:
  /sectors                    Popular tickers by sector
  /sector <name|ticker>       Popular tickers for one sector

Agent Commands:
  /agent <question>           Ask the LLM agent (needs OPENAI_API_KEY)

Other Commands:
  /clear                      Clear conversation history
  /help                       Show help
  /exit                       Exit

Command Aliases:
  /m = /metrics    /r = /ratios    /h = /history
  /s = /swot       /a = /analyze   /q = /exit

Natural Language:
  Anything else goes to the smart agent, for example:
  - "Give me a SWOT for Tesla"
  - "Any acquisitions at Microsoft?"
  - "What are the ratios?"  (reuses the last ticker)
"#
    }

    /// Get a short description of the command
    pub fn description(&self) -> &'static str {
        match self {
            Command::Metrics { .. } => "Financial metrics",
            Command::History { .. } => "Price history",
            Command::MergersAcquisitions { .. } => "M&A analysis",
            Command::Swot { .. } => "SWOT analysis",
            Command::Analyze { .. } => "Analysis by type",
            Command::Sectors => "Popular tickers by sector",
            Command::Sector { .. } => "Popular tickers for a sector",
            Command::Agent { .. } => "LLM agent query",
            Command::Clear => "Clear conversation history",
            Command::Help => "Show help",
            Command::Exit => "Exit the bot",
            Command::Query { .. } => "Natural language query",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_metrics() {
        let cmd = Command::parse("/metrics aapl").unwrap();
        assert_eq!(
            cmd,
            Command::Metrics {
                ticker: "AAPL".to_string(),
                kind: MetricsKind::Summary,
            }
        );

        let cmd = Command::parse("/m msft detailed").unwrap();
        assert_eq!(
            cmd,
            Command::Metrics {
                ticker: "MSFT".to_string(),
                kind: MetricsKind::Detailed,
            }
        );

        let cmd = Command::parse("/r nvda").unwrap();
        assert_eq!(
            cmd,
            Command::Metrics {
                ticker: "NVDA".to_string(),
                kind: MetricsKind::Ratios,
            }
        );
    }

    #[test]
    fn test_parse_history() {
        assert_eq!(
            Command::parse("/history tsla 6MO").unwrap(),
            Command::History {
                ticker: "TSLA".to_string(),
                range: Some("6mo".to_string()),
            }
        );
        assert_eq!(
            Command::parse("/h tsla").unwrap(),
            Command::History {
                ticker: "TSLA".to_string(),
                range: None,
            }
        );
    }

    #[test]
    fn test_parse_analyze() {
        let cmd = Command::parse("/analyze jpm m&a").unwrap();
        assert_eq!(
            cmd,
            Command::Analyze {
                ticker: "JPM".to_string(),
                analysis: AnalysisType::MergersAcquisitions,
            }
        );

        let cmd = Command::parse("/a jpm SWOT Analysis").unwrap();
        assert_eq!(
            cmd,
            Command::Analyze {
                ticker: "JPM".to_string(),
                analysis: AnalysisType::Swot,
            }
        );

        assert!(Command::parse("/analyze jpm").is_err());
        assert!(Command::parse("/analyze jpm dcf").is_err());
    }

    #[test]
    fn test_parse_natural_language() {
        let cmd = Command::parse("  What about Tesla's valuation?  ").unwrap();
        assert_eq!(
            cmd,
            Command::Query {
                text: "What about Tesla's valuation?".to_string()
            }
        );
    }

    #[test]
    fn test_parse_multi_word_args() {
        assert_eq!(
            Command::parse("/agent compare apple and microsoft").unwrap(),
            Command::Agent {
                question: "compare apple and microsoft".to_string()
            }
        );
        assert_eq!(
            Command::parse("/sector energy").unwrap(),
            Command::Sector {
                name: "energy".to_string()
            }
        );
    }

    #[test]
    fn test_parse_missing_arg() {
        for input in ["/metrics", "/ratios", "/history", "/ma", "/swot", "/analyze", "/sector", "/agent"] {
            let err = Command::parse(input).unwrap_err();
            assert!(matches!(err, FinanceError::CommandError(_)), "{input}");
        }
    }

    #[test]
    fn test_parse_misc() {
        assert_eq!(Command::parse("/HELP").unwrap(), Command::Help);
        assert_eq!(Command::parse("/?").unwrap(), Command::Help);
        assert_eq!(Command::parse("/quit").unwrap(), Command::Exit);
        assert_eq!(Command::parse("/sectors").unwrap(), Command::Sectors);
        assert_eq!(Command::parse("/clear").unwrap(), Command::Clear);
        assert!(Command::parse("").is_err());
        assert!(Command::parse("/").is_err());
        assert!(Command::parse("/dcf AAPL").is_err());
    }
}
