mod tools;
mod version;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use rust_mcp_sdk::error::SdkResult;
use rust_mcp_sdk::schema::{
    Implementation, InitializeResult, ProtocolVersion, ServerCapabilities, ServerCapabilitiesTools,
};
use rust_mcp_sdk::{
    mcp_server::{server_runtime, McpServerOptions},
    McpServer, StdioTransport, ToMcpServerHandler, TransportOptions,
};

use daybook_core::assistant::DailyAssistant;
use daybook_core::config::{load_config, resolve_state_dir};
use daybook_core::fetch::{CodeFetcher, ErrorSniffing};
use daybook_core::store::JsonStore;

use crate::tools::{DaybookServerHandler, McpContext};

#[derive(Parser)]
#[command(name = "daybook-mcp", version = version::FULL)]
struct Args {
    /// State directory holding the category JSON files (default: ~/.daily_assistant).
    #[arg(long)]
    home: Option<PathBuf>,
}

fn init_tracing() {
    // stdout carries protocol frames; logs go to stderr.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();
}

fn build_context(args: &Args) -> Result<McpContext> {
    let state_dir = resolve_state_dir(args.home.as_deref())?;
    let config = load_config(&state_dir);
    let fetcher = CodeFetcher::from_config(&config).context("create HTTP client")?;
    tracing::info!(state_dir = %state_dir.display(), "daybook state directory");
    Ok(McpContext {
        assistant: DailyAssistant::new(JsonStore::new(state_dir)),
        fetcher,
        error_sniffing: ErrorSniffing::from_config(&config),
    })
}

#[tokio::main]
async fn main() -> SdkResult<()> {
    let args = Args::parse();
    init_tracing();

    let context = match build_context(&args) {
        Ok(context) => context,
        Err(err) => {
            eprintln!("daybook-mcp: {err:#}");
            std::process::exit(1);
        }
    };

    let server_details = InitializeResult {
        server_info: Implementation {
            name: "daybook".into(),
            version: version::FULL.into(),
            title: Some("Daybook MCP Server".into()),
            description: Some(
                "Code visualization prompts and a local daily routine assistant".into(),
            ),
            icons: vec![],
            website_url: None,
        },
        capabilities: ServerCapabilities {
            tools: Some(ServerCapabilitiesTools { list_changed: None }),
            ..Default::default()
        },
        meta: None,
        instructions: Some(
            "Use visualize_code with a GitHub file URL; use daily_assistant for schedule, reminder, note, habit, focus and summary.".into(),
        ),
        protocol_version: ProtocolVersion::V2025_11_25.into(),
    };

    let transport = StdioTransport::new(TransportOptions::default())?;
    let handler = DaybookServerHandler { context };

    let server = server_runtime::create_server(McpServerOptions {
        server_details,
        transport,
        handler: handler.to_mcp_server_handler(),
        task_store: None,
        client_task_store: None,
    });

    server.start().await
}
