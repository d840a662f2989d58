use anyhow::Context;
use clap::Parser;
use rbcodegen_engine::cli;
use rbcodegen_engine::config::{CodegenConfig, ConfigLoader};
use rbcodegen_engine::protocol::{BrowserKind, SelectorStyle};
use rbcodegen_engine::resolver::StaticResolver;
use rbcodegen_engine::session::RecordingSession;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tokio::io::BufReader;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "rbcodegen",
    version,
    about = "Turn recorded browser actions into a Ruby Playwright script"
)]
struct Args {
    /// Start URL opened by the generated script
    url: Option<String>,

    /// Browser engine to launch (chromium, firefox, webkit)
    #[arg(short, long)]
    browser: Option<BrowserKind>,

    /// Browser distribution channel, e.g. chrome or msedge
    #[arg(short, long)]
    channel: Option<String>,

    /// Element addressing style (locator, positional)
    #[arg(long)]
    selector_style: Option<SelectorStyle>,

    /// Read recorder events from this file instead of stdin
    #[arg(long)]
    events: Option<PathBuf>,

    /// JSON object mapping reference tokens to structured accessors
    #[arg(long)]
    resolutions: Option<PathBuf>,

    /// Write the script here instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Config file (defaults to ./rbcodegen.yaml, then ~/.rbcodegen/config.yaml)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Keep reference tokens as recorded
    #[arg(long)]
    no_resolve: bool,
}

impl Args {
    fn apply(&self, config: &mut CodegenConfig) {
        if let Some(browser) = self.browser {
            config.script.browser = browser;
        }
        if let Some(channel) = &self.channel {
            config.script.channel = Some(channel.clone());
        }
        if let Some(style) = self.selector_style {
            config.translation.selector_style = style;
        }
        if self.no_resolve {
            config.resolution.enabled = false;
        }
    }
}

async fn load_resolutions(path: &Path) -> anyhow::Result<StaticResolver> {
    let content = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read resolutions from {}", path.display()))?;
    let entries: HashMap<String, String> = serde_json::from_str(&content)
        .with_context(|| format!("Invalid resolutions file {}", path.display()))?;
    Ok(entries.into_iter().collect())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr; stdout carries the generated script.
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => ConfigLoader::load_from(path)
            .await
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => ConfigLoader::load_default().await?,
    };
    args.apply(&mut config);

    let resolver = match &args.resolutions {
        Some(path) => load_resolutions(path).await?,
        None => StaticResolver::new(),
    };
    let session = RecordingSession::with_resolver(
        config.script_config(args.url.clone()),
        config.session_options(),
        resolver,
    );

    let stats = match &args.events {
        Some(path) => {
            let file = tokio::fs::File::open(path)
                .await
                .with_context(|| format!("Failed to open events file {}", path.display()))?;
            cli::run_events(&session, BufReader::new(file), cli::interrupted()).await?
        }
        None => {
            cli::run_events(&session, BufReader::new(tokio::io::stdin()), cli::interrupted())
                .await?
        }
    };
    if stats.handled == 0 {
        tracing::warn!("No recorder events received");
    }

    let script = session.finish().await;
    cli::write_script(args.output.as_deref(), &script).await?;
    Ok(())
}
