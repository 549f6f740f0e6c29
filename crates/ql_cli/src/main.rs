use std::process::ExitCode;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use ql_client::{Presenter, QiitaClient, Settlement};
use ql_core::config::{DEFAULT_BASE_URL, DEFAULT_ENDPOINT, DEFAULT_PAGE, DEFAULT_PER_PAGE};
use ql_core::ClientConfig;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::info;

mod logging;
mod view;

use view::{LoadingIndicator, TerminalView};

#[derive(Parser, Debug)]
#[command(author, version, about = "Browse the latest Qiita articles", long_about = None)]
struct Cli {
    /// Base URL of the API server
    #[arg(long, global = true, default_value = DEFAULT_BASE_URL)]
    base_url: String,
    /// Path of the items endpoint
    #[arg(long, global = true, default_value = DEFAULT_ENDPOINT)]
    endpoint: String,
    #[arg(long, global = true, default_value_t = DEFAULT_PAGE)]
    page: u32,
    #[arg(long, global = true, default_value_t = DEFAULT_PER_PAGE)]
    per_page: u32,
    /// Request timeout in seconds (no timeout by default)
    #[arg(long, global = true)]
    timeout_secs: Option<u64>,
    /// More output, repeat for more
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(clap::Subcommand, Debug, PartialEq, Eq)]
enum Commands {
    /// Fetch the list once and print it
    List {
        /// Only show articles whose title contains this text (case-insensitive)
        #[arg(short, long)]
        filter: Option<String>,
        /// Print JSON instead of a numbered list
        #[arg(long)]
        json: bool,
    },
    /// Read filter text from stdin, one search per line
    Search {
        /// Filter the first fetched list instead of fetching again on every line
        #[arg(long)]
        local: bool,
        #[arg(long)]
        json: bool,
    },
}

impl Cli {
    fn client_config(&self) -> ClientConfig {
        ClientConfig::new(self.base_url.clone())
            .with_endpoint(self.endpoint.clone())
            .with_page(self.page, self.per_page)
            .with_timeout(self.timeout_secs.map(Duration::from_secs))
    }
}

fn filter_from_line(line: &str) -> Option<String> {
    let line = line.trim();
    (!line.is_empty()).then(|| line.to_string())
}

async fn run_list(client: QiitaClient, filter: Option<String>, json: bool) -> ExitCode {
    let presenter = Presenter::new(client, TerminalView::new(json));
    let indicator = LoadingIndicator::spawn(presenter.is_fetching());

    let settlement = presenter.search(filter).await;
    indicator.stop().await;

    match settlement {
        Settlement::Failed(_) => ExitCode::FAILURE,
        _ => ExitCode::SUCCESS,
    }
}

async fn run_search(client: QiitaClient, local: bool, json: bool) -> anyhow::Result<ExitCode> {
    let presenter = Presenter::new(client, TerminalView::new(json));
    let indicator = LoadingIndicator::spawn(presenter.is_fetching());

    presenter.search(None).await;
    eprintln!("🔎 Type to filter, one search per line (Ctrl-D to quit)");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line.context("failed to read stdin")? else {
                    break;
                };
                let filter = filter_from_line(&line);
                if local {
                    presenter.apply_filter(filter);
                } else {
                    presenter.spawn_search(filter);
                }
            }
            _ = tokio::signal::ctrl_c() => {
                info!("👋 Interrupted");
                presenter.shutdown();
                indicator.stop().await;
                return Ok(ExitCode::SUCCESS);
            }
        }
    }

    let last = presenter.join().await?;
    presenter.shutdown();
    indicator.stop().await;

    Ok(match last {
        Some(Settlement::Failed(_)) => ExitCode::FAILURE,
        _ => ExitCode::SUCCESS,
    })
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();
    logging::init_logging(cli.verbose);

    let client = QiitaClient::new(cli.client_config()).context("failed to build HTTP client")?;
    let config = client.config();
    info!("🌐 Using {}{}", config.base_url, config.endpoint);

    match cli.command.unwrap_or(Commands::List { filter: None, json: false }) {
        Commands::List { filter, json } => Ok(run_list(client, filter, json).await),
        Commands::Search { local, json } => run_search(client, local, json).await,
    }
}
