//! Seine main entry point
//!
//! Command-line interface for the seine crawler: give it a seed URL and it
//! crawls everything reachable from there into a local sink.

use clap::Parser;
use seine::config::{load_config_with_hash, Config};
use seine::engine::{CrawlEngine, CrawlStats, EngineConfig};
use seine::extract::{HtmlExtractor, PlainTextExtractor};
use seine::sink::{JsonlSink, SqliteSink};
use std::path::{Path, PathBuf};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

/// Seine: a concurrent link-following crawler
///
/// Starting from the seed URL, seine fetches pages under a fixed
/// concurrency ceiling, follows the links it finds, and appends every
/// fetched document to a SQLite database or a JSON Lines file.
#[derive(Parser, Debug)]
#[command(name = "seine")]
#[command(version)]
#[command(about = "A concurrent link-following crawler", long_about = None)]
struct Cli {
    /// Seed URL to start crawling from
    #[arg(value_name = "SEED")]
    seed: String,

    /// Path to a TOML configuration file
    #[arg(short, long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Maximum number of concurrent fetches (overrides the config file)
    #[arg(short = 'n', long)]
    concurrency: Option<usize>,

    /// SQLite database to write results to (overrides the config file)
    #[arg(long, value_name = "PATH")]
    database: Option<PathBuf>,

    /// Write results to a JSON Lines file instead of SQLite
    #[arg(long, value_name = "PATH", conflicts_with = "database")]
    jsonl: Option<PathBuf>,

    /// Store tag-stripped visible text instead of raw HTML
    #[arg(long)]
    text: bool,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let mut config = match &cli.config {
        Some(path) => {
            let (config, hash) = load_config_with_hash(path)?;
            tracing::info!(
                "Configuration loaded from {} (hash: {})",
                path.display(),
                hash
            );
            config
        }
        None => Config::default(),
    };

    if let Some(concurrency) = cli.concurrency {
        config.engine.max_concurrency = concurrency;
    }
    if let Some(database) = &cli.database {
        config.output.database_path = database.display().to_string();
    }

    // Ctrl-C drains in-flight work instead of killing the process mid-write
    let cancel = CancellationToken::new();
    {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                tracing::info!("Interrupt received, draining in-flight work");
                cancel.cancel();
            }
        });
    }

    let engine_config = config.engine.to_engine_config();
    let stats = if cli.text {
        run_text(&cli, &config, engine_config, cancel).await?
    } else {
        run_html(&cli, &config, engine_config, cancel).await?
    };

    report(&stats);
    Ok(())
}

/// Crawls with the HTML extractor into the selected sink
async fn run_html(
    cli: &Cli,
    config: &Config,
    engine_config: EngineConfig,
    cancel: CancellationToken,
) -> anyhow::Result<CrawlStats> {
    let extractor = HtmlExtractor::new(&config.fetcher)?;

    match &cli.jsonl {
        Some(path) => {
            let sink = JsonlSink::new(path)?;
            let engine = CrawlEngine::new(extractor, sink, engine_config);
            Ok(engine.process_with_cancellation(&cli.seed, cancel).await?)
        }
        None => {
            let sink = SqliteSink::new(Path::new(&config.output.database_path))?;
            let engine = CrawlEngine::new(extractor, sink, engine_config);
            Ok(engine.process_with_cancellation(&cli.seed, cancel).await?)
        }
    }
}

/// Crawls with the plain-text extractor into the selected sink
async fn run_text(
    cli: &Cli,
    config: &Config,
    engine_config: EngineConfig,
    cancel: CancellationToken,
) -> anyhow::Result<CrawlStats> {
    let extractor = PlainTextExtractor::new(&config.fetcher)?;

    match &cli.jsonl {
        Some(path) => {
            let sink = JsonlSink::new(path)?;
            let engine = CrawlEngine::new(extractor, sink, engine_config);
            Ok(engine.process_with_cancellation(&cli.seed, cancel).await?)
        }
        None => {
            let sink = SqliteSink::new(Path::new(&config.output.database_path))?;
            let engine = CrawlEngine::new(extractor, sink, engine_config);
            Ok(engine.process_with_cancellation(&cli.seed, cancel).await?)
        }
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("seine=info,warn"),
            1 => EnvFilter::new("seine=debug,info"),
            2 => EnvFilter::new("seine=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Logs the closing run summary
fn report(stats: &CrawlStats) {
    tracing::info!(
        "Done: {} results written, {} empty, {} failed, {} dropped ({:.1}% of {} tasks succeeded) in {:?}",
        stats.written,
        stats.empty,
        stats.failed,
        stats.dropped,
        stats.success_rate(),
        stats.completed,
        stats.elapsed
    );
}
