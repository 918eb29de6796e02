//! Insights CLI
//!
//! Terminal front end for the Insights Hub:
//! - Show summary metrics
//! - Ask one-off questions
//! - Hold an interactive chat
//! - Generate a config file

use anyhow::Context;
use clap::{Parser, Subcommand};
use insights_hub::client::{Exchange, InsightsClient, Summary, ViewController, ViewEvent};
use insights_hub::config::{generate_default_config, Config, LoggingConfig};
use insights_hub::format::format_key;
use insights_hub::logging::init_logging;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::broadcast::error::RecvError;

#[derive(Parser)]
#[command(name = "insights")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Fulfilment Insights Hub from the terminal")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// API server URL (overrides the config file)
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    /// Config file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Caller identity sent as X-Scramble-Id
    #[arg(long, global = true)]
    pub scramble_id: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show summary metrics
    Summary,

    /// Ask a single question
    Ask {
        /// Question text
        #[arg(required = true)]
        query: Vec<String>,
    },

    /// Interactive chat (type /summary to reprint metrics, /quit to exit)
    Chat,

    /// Generate default config file
    Config {
        /// Output path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Config { output } => write_config(output.as_deref())?,

        Commands::Summary => {
            let client = connect(cli.config, cli.api_url, cli.scramble_id)?;
            let base_url = client.base_url().to_string();
            let (controller, summary_load) = ViewController::initialize(Arc::new(client));
            summary_load.await?;

            let summary = controller.summary();
            if summary.is_empty() {
                eprintln!("No summary available from {}", base_url);
                std::process::exit(1);
            }
            print_summary(&summary);
        }

        Commands::Ask { query } => {
            let client = connect(cli.config, cli.api_url, cli.scramble_id)?;
            let (controller, _) = ViewController::initialize(Arc::new(client));
            controller.set_query(query.join(" "));

            if let Some(reply) = controller.send_query() {
                reply.await?;
            }
            for exchange in controller.history() {
                print_exchange(&exchange);
            }
        }

        Commands::Chat => {
            let client = connect(cli.config, cli.api_url, cli.scramble_id)?;
            run_chat(client).await?;
        }
    }

    Ok(())
}

/// Resolve config, apply flag overrides, start logging and build the client
fn connect(
    config_path: Option<PathBuf>,
    api_url: Option<String>,
    scramble_id: Option<String>,
) -> anyhow::Result<InsightsClient> {
    let (mut config, source) = Config::resolve(config_path.as_deref())?;
    if let Some(url) = api_url {
        config.client.base_url = url;
    }
    if let Some(id) = scramble_id {
        config.client.scramble_id = Some(id);
    }

    // Keep the terminal for output; diagnostics go to stderr at warn
    init_logging(
        &LoggingConfig {
            level: "warn".to_string(),
            ..config.logging.clone()
        },
        "insights_cli=warn",
    );
    source.log();

    InsightsClient::new(&config.client).context("failed to build HTTP client")
}

async fn run_chat(client: InsightsClient) -> anyhow::Result<()> {
    let (controller, _) = ViewController::initialize(Arc::new(client));
    let mut events = controller.subscribe();

    println!("Insights Hub chat. Type a question, /summary, or /quit.");

    let printer = tokio::spawn(async move {
        loop {
            match events.recv().await {
                Ok(ViewEvent::ExchangeAppended(exchange)) => print_exchange(&exchange),
                Ok(ViewEvent::SummaryLoaded(summary)) => print_summary(&summary),
                Err(RecvError::Lagged(skipped)) => {
                    eprintln!("({} updates skipped)", skipped);
                }
                Err(RecvError::Closed) => break,
            }
        }
    });

    let mut in_flight = Vec::new();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    while let Some(line) = lines.next_line().await? {
        match line.trim() {
            "/quit" | "/exit" => break,
            "/summary" => print_summary(&controller.summary()),
            _ => {
                controller.set_query(line.as_str());
                in_flight.extend(controller.send_query());
            }
        }
    }

    if !in_flight.is_empty() {
        println!("Waiting for {} pending answer(s)...", in_flight.len());
    }
    for handle in in_flight {
        handle.await?;
    }

    // Dropping the last controller handle closes the event channel
    drop(controller);
    printer.await?;

    Ok(())
}

fn print_summary(summary: &Summary) {
    let width = summary
        .keys()
        .map(|key| format_key(key).len())
        .max()
        .unwrap_or(0);

    println!();
    for (key, value) in summary {
        println!("  {:<width$}  {}", format_key(key), value, width = width);
    }
    println!();
}

fn print_exchange(exchange: &Exchange) {
    println!("> {}", exchange.query);
    println!("{}", exchange.answer);
    println!();
}

fn write_config(output: Option<&std::path::Path>) -> anyhow::Result<()> {
    let content = generate_default_config();

    match output {
        Some(path) => {
            std::fs::write(path, content)
                .with_context(|| format!("failed to write {}", path.display()))?;
            println!("Config written to {}", path.display());
        }
        None => print!("{}", content),
    }

    Ok(())
}
