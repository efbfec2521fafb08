//! tunesync - library synchronization client
//!
//! Subcommands:
//! - `status`: scanned/total file counts and library counts
//! - `scan`: scan all unscanned files in batches (Ctrl+C cancels)
//! - `playlists`: list playlists with their track counts

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use tokio::signal;
use tracing::info;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use tunesync_common::config::{
    load_config, resolve_config_path, LoggingConfig, TomlConfig, DEFAULT_BATCH_SIZE,
};
use tunesync_common::events::LibraryEvent;
use tunesync_ui::library_view::count_text;
use tunesync_ui::{LibrarySession, ScanPhase, UiError};

const VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    " (",
    env!("GIT_HASH"),
    ", ",
    env!("BUILD_PROFILE"),
    ", built ",
    env!("BUILD_TIMESTAMP"),
    ")"
);

/// Command-line arguments for tunesync
#[derive(Parser, Debug)]
#[command(name = "tunesync")]
#[command(about = "Synchronize a music library with its server")]
#[command(version = VERSION)]
struct Args {
    /// Config file (default: $TUNESYNC_CONFIG, then the user config directory)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Library server API base URL
    #[arg(long, env = "TUNESYNC_SERVER_URL")]
    server_url: Option<String>,

    /// Files per scan request
    #[arg(long, env = "TUNESYNC_BATCH_SIZE")]
    batch_size: Option<usize>,

    /// Log level when RUST_LOG is not set
    #[arg(long, env = "TUNESYNC_LOG_LEVEL")]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show scan progress and library counts
    Status {
        /// Print the scan progress as JSON
        #[arg(long)]
        json: bool,
    },
    /// Scan all unscanned files
    Scan,
    /// List playlists
    Playlists,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let config_path = resolve_config_path(args.config.as_deref());
    let mut config = load_config(config_path.as_deref()).context("Failed to load config")?;
    apply_overrides(&mut config, &args)?;

    init_logging(&config.logging)?;

    info!("Starting tunesync {}", VERSION);
    info!(server_url = %config.server_url, batch_size = config.batch_size, "Configuration");

    let session = LibrarySession::from_config(&config).context("Failed to create HTTP client")?;

    match args.command {
        Command::Status { json } => status(&session, json).await,
        Command::Scan => scan(&session).await,
        Command::Playlists => playlists(&session).await,
    }
}

/// CLI flags (and their environment variables) override the TOML values
fn apply_overrides(config: &mut TomlConfig, args: &Args) -> Result<()> {
    if let Some(server_url) = &args.server_url {
        config.server_url = server_url.clone();
    }
    if let Some(batch_size) = args.batch_size {
        if batch_size == 0 || batch_size > DEFAULT_BATCH_SIZE {
            bail!("--batch-size must be between 1 and {}", DEFAULT_BATCH_SIZE);
        }
        config.batch_size = batch_size;
    }
    if let Some(level) = &args.log_level {
        config.logging.level = level.clone();
    }
    Ok(())
}

fn init_logging(logging: &LoggingConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "tunesync={0},tunesync_ui={0},tunesync_common={0}",
            logging.level
        ))
    });

    let (stderr_layer, file_layer) = match &logging.file {
        Some(path) => {
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("Failed to open log file {}", path.display()))?;
            let layer = fmt::layer().with_writer(Arc::new(file)).with_ansi(false);
            (None, Some(layer))
        }
        None => (Some(fmt::layer().with_writer(std::io::stderr)), None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(stderr_layer)
        .with(file_layer)
        .init();
    Ok(())
}

async fn status(session: &LibrarySession, json: bool) -> Result<()> {
    let progress = session
        .current_progress()
        .await
        .context("Failed to load library")?;

    if json {
        println!("{}", serde_json::to_string_pretty(&progress)?);
        return Ok(());
    }

    let library = session.library();
    println!("Scanned {} of {} files", progress.scanned(), progress.total());
    if progress.no_music_available() {
        println!("No music files found");
    } else if progress.to_scan {
        println!("{} waiting to be scanned", count_text(progress.remaining(), "file", "files"));
    }
    println!(
        "Library: {}, {}",
        library.album_count_text().await,
        library.track_count_text().await
    );
    Ok(())
}

async fn scan(session: &LibrarySession) -> Result<()> {
    let progress = session
        .current_progress()
        .await
        .context("Failed to load library")?;

    if !progress.to_scan {
        println!("Nothing to scan ({} files scanned)", progress.scanned());
        return Ok(());
    }

    let mut events = session.event_bus().subscribe();
    let scanner = session.scanner().clone();
    let mut scan_task = tokio::spawn(async move { scanner.start().await });
    let mut cancelled = false;

    let outcome = loop {
        tokio::select! {
            joined = &mut scan_task => break joined.context("Scan task failed")?,
            _ = signal::ctrl_c(), if !cancelled => {
                info!("Received Ctrl+C, cancelling scan after the current batch");
                cancelled = session.scanner().cancel().await;
            }
            event = events.recv() => {
                if let Ok(LibraryEvent::ScanBatchCompleted { scanned, total, .. }) = event {
                    println!("Scanned {} of {} files", scanned, total);
                }
            }
        }
    };

    match outcome {
        Ok(progress) if progress.phase == ScanPhase::Cancelled => {
            println!("Scan cancelled at {} of {} files", progress.scanned(), progress.total());
        }
        Ok(progress) => {
            println!("Scan completed: {} files scanned", progress.scanned());
        }
        Err(UiError::Transport(e)) => {
            bail!("Scan stopped: {}", e.reason());
        }
        Err(e) => return Err(e.into()),
    }

    let library = session.library();
    println!(
        "Library: {}, {}",
        library.album_count_text().await,
        library.track_count_text().await
    );
    Ok(())
}

async fn playlists(session: &LibrarySession) -> Result<()> {
    let library = session.library();
    library.reload().await.context("Failed to load library")?;

    let playlists = library.playlists().await;
    if playlists.is_empty() {
        println!("No playlists");
        return Ok(());
    }

    for playlist in playlists {
        let text = library.playlist_track_count_text(playlist.id).await?;
        println!("{:>6}  {}  ({})", playlist.id, playlist.name, text);
    }
    Ok(())
}
