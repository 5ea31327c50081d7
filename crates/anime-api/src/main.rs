//! Anime API server CLI application.

use anime_api::{create_router, AppState};
use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use hianime_scraper::{
    AnimeDetailsExtractor, EpisodesExtractor, FetchResult, Fetcher, HomepageExtractor,
    MemoryCache, PageExtractor, SearchExtractor, ServersExtractor, StreamingExtractor,
};
use shared::Config;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Option<Command>,

    /// Path to configuration file
    #[arg(short, long, default_value = "config.toml", global = true)]
    config: PathBuf,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Override the bind host
    #[arg(long, global = true)]
    host: Option<String>,

    /// Override the bind port
    #[arg(long, global = true)]
    port: Option<u16>,

    /// Disable the response cache
    #[arg(long, global = true)]
    no_cache: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the HTTP server (default)
    Serve,
    /// Fetch one upstream path and print what the extractor finds
    Extract {
        /// Page type of the upstream path
        #[arg(value_enum)]
        page: PageKind,
        /// Upstream path, e.g. `/home` or `/search?keyword=naruto`
        path: String,
        /// Server name for streaming pages
        #[arg(long)]
        server: Option<String>,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum PageKind {
    Home,
    Details,
    Episodes,
    Search,
    Suggestions,
    Servers,
    Streaming,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Load configuration
    let mut config = Config::from_file(&args.config)
        .with_context(|| format!("Failed to load config from {}", args.config.display()))?;

    if let Some(host) = &args.host {
        config.server.host = host.clone();
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }
    if args.no_cache {
        config.cache.enabled = false;
    }

    // Initialize logging
    let mut log_config = shared::LogConfig::from_config(&config, "anime-api");
    if args.verbose {
        log_config.default_level = tracing::Level::DEBUG;
    }
    shared::logging::init(log_config)?;

    info!(config_file = %args.config.display(), "Loaded configuration");

    match args.command.unwrap_or(Command::Serve) {
        Command::Serve => serve(config).await,
        Command::Extract { page, path, server } => extract(&config, page, &path, server).await,
    }
}

async fn serve(config: Config) -> Result<()> {
    let address = config.bind_address();
    info!(
        upstream = %config.upstream.base_url,
        cache_enabled = config.cache.enabled,
        "Anime API starting"
    );

    let state = AppState::new(config).context("Failed to build application state")?;
    let app = create_router(state);

    let listener = TcpListener::bind(&address)
        .await
        .with_context(|| format!("Failed to bind {}", address))?;
    info!(address = %address, "Listening");

    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}

async fn extract(config: &Config, page: PageKind, path: &str, server: Option<String>) -> Result<()> {
    let fetcher = Fetcher::from_config(config, Arc::new(MemoryCache::new(false)))
        .context("Failed to create fetcher")?;

    let html = match fetcher.fetch(path, fetcher.options().without_cache()).await {
        FetchResult::Success { body, status_code } => {
            info!(path = path, status_code = status_code, "Fetched upstream page");
            body
        }
        FetchResult::Failure { error, message } => bail!("Fetch failed ({}): {}", error, message),
    };

    let output = match page {
        PageKind::Home => serde_json::to_string_pretty(&HomepageExtractor.extract(&html)),
        PageKind::Details => serde_json::to_string_pretty(&AnimeDetailsExtractor.extract(&html)),
        PageKind::Episodes => serde_json::to_string_pretty(&EpisodesExtractor.extract(&html)),
        PageKind::Search => serde_json::to_string_pretty(&SearchExtractor.extract(&html)),
        PageKind::Suggestions => {
            serde_json::to_string_pretty(&SearchExtractor.extract_suggestions(&html))
        }
        PageKind::Servers => serde_json::to_string_pretty(&ServersExtractor.extract(&html)),
        PageKind::Streaming => serde_json::to_string_pretty(
            &StreamingExtractor { server }.extract(&html),
        ),
    }
    .context("Failed to serialize extracted data")?;

    println!("{}", output);
    Ok(())
}
