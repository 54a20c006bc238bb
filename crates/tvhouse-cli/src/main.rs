//! tvhouse - live TV channel browser and player.

/// Application configuration (TOML).
mod config;
/// Screen routes.
mod nav;
/// Terminal UI components.
mod tui;

use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use clap::{ArgGroup, Parser, Subcommand};
use tracing::instrument;
use tracing_subscriber::filter::EnvFilter;
use tracing_subscriber::fmt::writer::BoxMakeWriter;
#[cfg(feature = "otel")]
use tracing_subscriber::layer::SubscriberExt;
#[cfg(feature = "otel")]
use tracing_subscriber::util::SubscriberInitExt;
use tvhouse_catalog::{
    CatalogClient, CatalogLoader, CatalogSource, Channel, IconSource, find_channel,
};
use tvhouse_player::PlaybackSession;

use crate::config::{AppConfig, cache_path, log_path, resolve_config_path, resolve_data_dir};
use crate::nav::Route;
use crate::tui::run_browser;

/// How often `play` checks whether the player is still running.
const PLAYER_POLL_INTERVAL: Duration = Duration::from_millis(500);

/// CLI argument parser.
#[derive(Parser)]
#[command(about, version)]
struct Cli {
    /// Override config/data directory.
    #[arg(long, global = true)]
    dir: Option<PathBuf>,

    /// Subcommand to run.
    #[command(subcommand)]
    command: Commands,
}

/// Available subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Browse channels and watch them via TUI.
    Browse,
    /// Channel catalog operations.
    Channels(ChannelsCommand),
    /// Play a channel directly.
    Play(PlayArgs),
    /// Configuration file operations.
    Config(ConfigCommand),
}

/// Arguments for the `channels` subcommand.
#[derive(clap::Args)]
struct ChannelsCommand {
    /// Channels subcommand to run.
    #[command(subcommand)]
    command: ChannelsSubcommands,
}

/// Available channels subcommands.
#[derive(Subcommand)]
enum ChannelsSubcommands {
    /// Load the catalog and list its channels.
    List,
    /// Download the catalog and report the outcome.
    Refresh,
}

/// Arguments for the `play` subcommand.
#[derive(clap::Args)]
#[command(group(
    ArgGroup::new("target")
        .required(true)
        .args(["channel", "url", "route"]),
))]
struct PlayArgs {
    /// Channel name from the catalog (case-insensitive).
    #[arg(long)]
    channel: Option<String>,
    /// Stream URL.
    #[arg(long)]
    url: Option<String>,
    /// Player route (e.g. "player/?channelUrl=https%3A%2F%2F...").
    #[arg(long)]
    route: Option<String>,
}

/// Arguments for the `config` subcommand.
#[derive(clap::Args)]
struct ConfigCommand {
    /// Config subcommand to run.
    #[command(subcommand)]
    command: ConfigSubcommands,
}

/// Available config subcommands.
#[derive(Subcommand)]
enum ConfigSubcommands {
    /// Write the default configuration file.
    Init(ConfigInitArgs),
}

/// Arguments for the `config init` subcommand.
#[derive(clap::Args)]
struct ConfigInitArgs {
    /// Overwrite an existing file.
    #[arg(long)]
    force: bool,
}

/// Builds the catalog loader from config.
fn build_loader(config: &AppConfig, data_dir: &Path) -> Result<CatalogLoader<CatalogClient>> {
    let client = CatalogClient::builder()
        .catalog_url(config.catalog.endpoint()?)
        .user_agent(concat!(
            env!("CARGO_PKG_NAME"),
            "/",
            env!("CARGO_PKG_VERSION")
        ))
        .build()
        .context("failed to build catalog client")?;

    Ok(CatalogLoader::new(client, cache_path(data_dir))
        .timeout(config.catalog.timeout())
        .keep_stale_cache(config.catalog.keep_stale_cache))
}

/// `resource` or `remote`.
const fn icon_kind(icon: &IconSource) -> &'static str {
    match icon {
        IconSource::Resource(_) => "resource",
        IconSource::Remote(_) => "remote",
    }
}

fn log_channel(channel: &Channel) {
    tracing::info!(
        "{:<12} {:<8} {}",
        channel.name,
        icon_kind(&channel.icon_source()),
        channel.url
    );
}

/// Runs the `browse` subcommand.
///
/// # Errors
///
/// Returns an error if config loading or the TUI fails.
#[instrument(skip_all)]
async fn run_browse(dir: Option<&PathBuf>) -> Result<()> {
    let config = AppConfig::load(&resolve_config_path(dir)?)?;
    let data_dir = resolve_data_dir(dir)?;
    let loader = build_loader(&config, &data_dir)?;
    let backend = config.player.backend();

    run_browser(&loader, &backend, &config.player.surface()).await
}

/// Runs the `channels list` subcommand.
///
/// # Errors
///
/// Returns an error if config loading or client construction fails.
#[instrument(skip_all)]
async fn run_channels_list(dir: Option<&PathBuf>) -> Result<()> {
    let config = AppConfig::load(&resolve_config_path(dir)?)?;
    let data_dir = resolve_data_dir(dir)?;
    let loaded = build_loader(&config, &data_dir)?.load().await;

    if let Some(err) = &loaded.fetch_error {
        tracing::warn!("Remote catalog unavailable: {err}");
    }
    tracing::info!(
        "Channels ({}, source: {}):",
        loaded.channels.len(),
        loaded.source
    );
    for channel in &loaded.channels {
        log_channel(channel);
    }
    Ok(())
}

/// Runs the `channels refresh` subcommand.
///
/// # Errors
///
/// Returns an error if the download fails.
#[instrument(skip_all)]
async fn run_channels_refresh(dir: Option<&PathBuf>) -> Result<()> {
    let config = AppConfig::load(&resolve_config_path(dir)?)?;
    let data_dir = resolve_data_dir(dir)?;
    let loader = build_loader(&config, &data_dir)?;
    let loaded = loader.load().await;

    match (loaded.source, loaded.fetch_error) {
        (CatalogSource::Remote, _) => {
            tracing::info!(
                "Catalog refreshed: {} channels cached at {}",
                loaded.channels.len(),
                loader.cache_path().display()
            );
            Ok(())
        }
        (source, Some(err)) => bail!("catalog refresh failed ({source} in use): {err}"),
        (source, None) => bail!("catalog refresh failed ({source} in use)"),
    }
}

/// Resolves the stream URL for `play`.
async fn resolve_play_url(args: &PlayArgs, config: &AppConfig, data_dir: &Path) -> Result<String> {
    if let Some(url) = &args.url {
        return Ok(url.clone());
    }
    if let Some(route) = &args.route {
        return match Route::parse(route)? {
            Route::Player { url } => Ok(url),
            Route::Home => bail!("route does not name a channel: {route}"),
        };
    }
    let Some(name) = &args.channel else {
        bail!("one of --channel, --url or --route is required");
    };
    let channels = build_loader(config, data_dir)?.load_channels().await;
    let channel =
        find_channel(&channels, name).with_context(|| format!("channel not found: {name}"))?;
    tracing::info!("Channel: {}", channel.name);
    Ok(channel.url.clone())
}

/// Runs the `play` subcommand.
///
/// Blocks until the player exits or Ctrl-C is received. The session is
/// stopped on both paths.
///
/// # Errors
///
/// Returns an error if the channel cannot be resolved or the player fails.
#[instrument(skip_all)]
async fn run_play(args: &PlayArgs, dir: Option<&PathBuf>) -> Result<()> {
    let config = AppConfig::load(&resolve_config_path(dir)?)?;
    let data_dir = resolve_data_dir(dir)?;
    let url = resolve_play_url(args, &config, &data_dir).await?;

    let backend = config.player.backend();
    let mut session = PlaybackSession::start(&backend, &config.player.surface(), &url)
        .with_context(|| format!("failed to play {url}"))?;
    tracing::info!("Playing {url} with {} (Ctrl-C to stop)", backend.command());

    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);
    let mut tick = tokio::time::interval(PLAYER_POLL_INTERVAL);
    loop {
        tokio::select! {
            res = &mut ctrl_c => {
                res.context("failed to listen for Ctrl-C")?;
                tracing::info!("Interrupted");
                break;
            }
            _ = tick.tick() => {
                if !session.is_playing() {
                    tracing::info!("Player exited");
                    break;
                }
            }
        }
    }

    session.stop().context("failed to stop player")
}

/// Runs the `config init` subcommand.
///
/// # Errors
///
/// Returns an error if the file exists (without `--force`) or cannot be written.
fn run_config_init(args: &ConfigInitArgs, dir: Option<&PathBuf>) -> Result<()> {
    let path = resolve_config_path(dir)?;
    if path.exists() && !args.force {
        bail!(
            "{} already exists (use --force to overwrite)",
            path.display()
        );
    }
    AppConfig::default().save(&path)?;
    tracing::info!("Wrote default config to {}", path.display());
    Ok(())
}

/// Log destination: the data-dir log file while the TUI owns the terminal.
fn log_writer(cli: &Cli) -> Result<(BoxMakeWriter, bool)> {
    if !matches!(cli.command, Commands::Browse) {
        return Ok((BoxMakeWriter::new(std::io::stdout), true));
    }
    let data_dir = resolve_data_dir(cli.dir.as_ref())?;
    std::fs::create_dir_all(&data_dir)
        .with_context(|| format!("failed to create directory {}", data_dir.display()))?;
    let path = log_path(&data_dir);
    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("failed to open log file {}", path.display()))?;
    Ok((BoxMakeWriter::new(Mutex::new(file)), false))
}

/// Entry point.
///
/// # Errors
///
/// Returns an error if logging setup or subcommand execution fails.
#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let (writer, ansi) = log_writer(&cli)?;

    #[cfg(not(feature = "otel"))]
    {
        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
            )
            .with_target(false)
            .with_ansi(ansi)
            .with_writer(writer)
            .init();
    }

    #[cfg(feature = "otel")]
    {
        let env_filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
        let fmt_layer = tracing_subscriber::fmt::layer()
            .with_target(false)
            .with_ansi(ansi)
            .with_writer(writer);

        let otel_layer = std::env::var("OTEL_EXPORTER_OTLP_ENDPOINT")
            .ok()
            .and_then(|_| {
                let exporter = opentelemetry_otlp::SpanExporter::builder()
                    .with_http()
                    .build()
                    .ok()?;

                let tracer_provider = opentelemetry_sdk::trace::SdkTracerProvider::builder()
                    .with_simple_exporter(exporter)
                    .build();

                let tracer = opentelemetry::trace::TracerProvider::tracer(
                    &tracer_provider,
                    env!("CARGO_PKG_NAME"),
                );
                opentelemetry::global::set_tracer_provider(tracer_provider);

                Some(tracing_opentelemetry::layer().with_tracer(tracer))
            });

        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt_layer)
            .with(otel_layer)
            .init();
    }

    match cli.command {
        Commands::Browse => run_browse(cli.dir.as_ref()).await,
        Commands::Channels(ch) => match ch.command {
            ChannelsSubcommands::List => run_channels_list(cli.dir.as_ref()).await,
            ChannelsSubcommands::Refresh => run_channels_refresh(cli.dir.as_ref()).await,
        },
        Commands::Play(args) => run_play(&args, cli.dir.as_ref()).await,
        Commands::Config(cfg) => match cfg.command {
            ConfigSubcommands::Init(args) => run_config_init(&args, cli.dir.as_ref()),
        },
    }
}
