use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser, Subcommand};

use daybook_core::assistant::DailyAssistant;
use daybook_core::config::{load_config, resolve_state_dir};
use daybook_core::fetch::{visualize_code, CodeFetcher, ErrorSniffing};
use daybook_core::store::JsonStore;

#[derive(Parser)]
#[command(name = "daybook", version, about = "Local daily routine assistant")]
struct Cli {
    /// State directory holding the category JSON files (default: ~/.daily_assistant).
    #[arg(long, global = true)]
    home: Option<PathBuf>,
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Run a daily assistant task: schedule, reminder, note, habit, focus or summary
    Daily {
        task_type: String,
        /// JSON payload (or plain text for notes); omit to show current state
        #[arg(default_value = "")]
        data: String,
    },
    /// Fetch a GitHub file and print the visualization prompt
    Visualize { url: String },
    /// Print version information
    Version,
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing();

    match cli.command {
        Some(Command::Daily { task_type, data }) => {
            let state_dir = resolve_state_dir(cli.home.as_deref())?;
            let assistant = DailyAssistant::new(JsonStore::new(state_dir));
            println!("{}", assistant.run(&task_type, &data));
        }
        Some(Command::Visualize { url }) => {
            let state_dir = resolve_state_dir(cli.home.as_deref())?;
            let config = load_config(&state_dir);
            let fetcher = CodeFetcher::from_config(&config).context("create HTTP client")?;
            let reply = visualize_code(&fetcher, &url, ErrorSniffing::from_config(&config)).await;
            println!("{reply}");
        }
        Some(Command::Version) => {
            println!("daybook {}", daybook_core::version());
        }
        None => {
            Cli::command().print_help()?;
            println!();
        }
    }
    Ok(())
}
