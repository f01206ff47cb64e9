//! `fin-analyst`: financial analyst on the command line
//!
//! # Usage
//!
//! ```bash
//! fin-analyst metrics AAPL --kind detailed
//! fin-analyst swot TSLA
//! fin-analyst ask "any acquisitions at Microsoft?"
//!
//! # LLM agent (OPENAI_API_KEY, or DATABRICKS_HOST + DATABRICKS_TOKEN)
//! fin-analyst agent --steps "compare the margins of NVDA and AMD"
//!
//! fin-analyst chat
//! ```

use analyst_core::Context;
use analyst_finance::bot::{AnalystBot, BotConfig};
use analyst_finance::catalog::{POPULAR_TICKERS, tickers_for};
use analyst_finance::{
    AnalysisType, AnalystAgent, FinanceConfig, FinancialAnalyst, MetricsKind, SmartAgent,
};
use analyst_llm::providers::OpenAIProvider;
use analyst_utils::{LogFormat, init_tracing_with};
use anyhow::{Context as _, bail};
use clap::{Parser, Subcommand};
use comfy_table::{Table, presets::UTF8_FULL};
use std::io::{self, BufRead, Write};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

const LOG_FILTER: &str = "warn,analyst_finance=info,analyst_runtime=info";

#[derive(Parser, Debug)]
#[command(name = "fin-analyst")]
#[command(about = "Financial metrics, M&A news and SWOT analysis from public market data", long_about = None)]
struct Cli {
    /// Log output format (pretty or json)
    #[arg(long, global = true, default_value = "pretty")]
    log_format: LogFormat,

    /// Override the quote API base URL
    #[arg(long, global = true)]
    quote_base_url: Option<String>,

    /// HTTP timeout for quote requests
    #[arg(long, global = true)]
    timeout_secs: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Financial metrics report
    Metrics {
        ticker: String,
        /// summary, ratios, historical or detailed
        #[arg(long, default_value = "summary")]
        kind: MetricsKind,
    },
    /// M&A activity from recent news
    Ma { ticker: String },
    /// Rule-based SWOT analysis
    Swot { ticker: String },
    /// Run one analysis picked by name
    Analyze {
        ticker: String,
        /// metrics, ma or swot
        #[arg(long = "type", short = 't')]
        analysis: AnalysisType,
    },
    /// Let the keyword router pick ticker and report
    Ask {
        #[arg(required = true, trailing_var_arg = true)]
        text: Vec<String>,
    },
    /// Ask the LLM agent, which calls the analysis tools itself
    Agent {
        /// Print every tool call the agent made
        #[arg(long)]
        steps: bool,
        #[arg(required = true, trailing_var_arg = true)]
        text: Vec<String>,
    },
    /// Popular tickers by sector
    Sectors { name: Option<String> },
    /// Interactive session
    Chat,
}

fn finance_config(cli: &Cli) -> anyhow::Result<FinanceConfig> {
    let mut builder = FinanceConfig::builder();
    if let Some(url) = &cli.quote_base_url {
        builder = builder.quote_base_url(url.clone());
    }
    if let Some(secs) = cli.timeout_secs {
        builder = builder.request_timeout(Duration::from_secs(secs));
    }
    Ok(builder.from_env().build()?)
}

fn llm_agent(analyst: &FinancialAnalyst) -> anyhow::Result<AnalystAgent> {
    let provider = OpenAIProvider::from_env().context("LLM provider is not configured")?;
    Ok(AnalystAgent::with_provider(Arc::new(provider), analyst)?)
}

fn print_sectors(name: Option<&str>) -> anyhow::Result<()> {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL).set_header(vec!["Sector", "Tickers"]);

    match name {
        Some(name) => {
            let tickers = tickers_for(name);
            if tickers.is_empty() {
                bail!("unknown sector '{name}'");
            }
            table.add_row(vec![name.trim().to_string(), tickers.join(", ")]);
        }
        None => {
            for (sector, tickers) in POPULAR_TICKERS {
                table.add_row(vec![(*sector).to_string(), tickers.join(", ")]);
            }
        }
    }

    println!("{table}");
    Ok(())
}

async fn run_agent(analyst: &FinancialAnalyst, question: &str, show_steps: bool) -> anyhow::Result<()> {
    let agent = llm_agent(analyst)?;
    let mut context = Context::new();
    let response = agent.query(question, &mut context).await;

    if show_steps {
        for (i, step) in response.steps.iter().enumerate() {
            let status = if step.is_error { "error" } else { "ok" };
            println!(
                "Step {}: {} {} ({status}, {} ms)",
                i + 1,
                step.tool,
                serde_json::to_string(&step.input)?,
                step.duration_ms
            );
        }
        if !response.steps.is_empty() {
            println!();
        }
    }

    println!("{}", response.output);
    if !response.success {
        bail!("agent query failed");
    }
    Ok(())
}

async fn run_chat(config: FinanceConfig) -> anyhow::Result<()> {
    let bot_config = BotConfig::builder().finance(config).build();
    let mut bot = AnalystBot::from_config(bot_config)?;

    match llm_agent(bot.analyst()) {
        Ok(agent) => bot = bot.with_agent(agent),
        Err(e) => debug!(error = %e, "chat running without LLM agent"),
    }

    println!("{}", bot.welcome());
    if !bot.has_agent() {
        println!("(LLM agent disabled: /agent needs OPENAI_API_KEY)");
    }
    println!();

    let stdin = io::stdin();
    let mut stdout = io::stdout();

    loop {
        print!("{}", bot.prompt());
        stdout.flush()?;

        let mut input = String::new();
        match stdin.lock().read_line(&mut input) {
            Ok(0) => {
                println!("\nGoodbye!");
                break;
            }
            Ok(_) => {}
            Err(e) => {
                eprintln!("Error reading input: {e}");
                continue;
            }
        }

        let input = input.trim();
        if input.is_empty() {
            continue;
        }

        match bot.process_input(input).await {
            Ok(Some(response)) => println!("{response}\n"),
            Ok(None) => {
                println!("Goodbye!");
                break;
            }
            Err(e) => eprintln!("Error: {e}\n"),
        }
    }

    Ok(())
}

async fn run_report(command: Commands, config: FinanceConfig) -> anyhow::Result<()> {
    let analyst = FinancialAnalyst::yahoo(config)?;

    let output = match command {
        Commands::Metrics { ticker, kind } => analyst.financial_metrics(&ticker, kind).await,
        Commands::Ma { ticker } => analyst.ma_analysis(&ticker).await,
        Commands::Swot { ticker } => analyst.swot_analysis(&ticker).await,
        Commands::Analyze { ticker, analysis } => analyst.analyze(&ticker, analysis).await,
        Commands::Ask { text } => {
            let agent = SmartAgent::new(analyst);
            let mut context = Context::new();
            agent.respond(&text.join(" "), &mut context).await
        }
        Commands::Agent { steps, text } => return run_agent(&analyst, &text.join(" "), steps).await,
        Commands::Sectors { .. } | Commands::Chat => bail!("not a report command"),
    };

    println!("{output}");
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing_with(cli.log_format, LOG_FILTER);

    let config = finance_config(&cli)?;
    info!(command = ?cli.command, "starting fin-analyst");

    match cli.command {
        Commands::Chat => run_chat(config).await,
        Commands::Sectors { name } => print_sectors(name.as_deref()),
        command => run_report(command, config).await,
    }
}
