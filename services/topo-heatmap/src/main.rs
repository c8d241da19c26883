//! Topography heatmap renderer.
//!
//! Fetches gridded elevation from an ERDDAP server (through an on-disk
//! cache) and paints it as a color or grayscale heatmap:
//! - `render`: one map from command-line flags
//! - `batch`: every map listed in a YAML jobs file

mod jobs;
mod render;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use topo_common::TopoRegion;
use topo_source::{CachedSource, ErddapClient, FileCache, SourceConfig, TopoSource};
use tracing::{error, info, warn, Level};
use tracing_subscriber::FmtSubscriber;

use jobs::{load_jobs, MapJob};
use render::generate_map;

#[derive(Parser, Debug)]
#[command(name = "topo-heatmap")]
#[command(about = "Render topography elevation heatmaps from ERDDAP data")]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Log level
    #[arg(long, global = true, env = "LOG_LEVEL", default_value = "info")]
    log_level: String,

    /// Log output format
    #[arg(long, global = true, value_enum, default_value_t = LogFormat::Text)]
    log_format: LogFormat,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum LogFormat {
    Text,
    Json,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render a single map
    Render(RenderArgs),
    /// Render every map in a YAML jobs file
    Batch(BatchArgs),
}

#[derive(Args, Debug)]
struct RenderArgs {
    /// Southern edge in degrees
    #[arg(long, allow_hyphen_values = true)]
    min_lat: f64,

    /// Northern edge in degrees
    #[arg(long, allow_hyphen_values = true)]
    max_lat: f64,

    /// Latitude stride in dataset steps (0 = derive from image height)
    #[arg(long, default_value = "0")]
    lat_stride: u32,

    /// Western edge in degrees
    #[arg(long, allow_hyphen_values = true)]
    min_lon: f64,

    /// Eastern edge in degrees
    #[arg(long, allow_hyphen_values = true)]
    max_lon: f64,

    /// Longitude stride in dataset steps (0 = derive from image width)
    #[arg(long, default_value = "0")]
    lon_stride: u32,

    /// Image width in pixels
    #[arg(long)]
    width: u32,

    /// Image height in pixels
    #[arg(long)]
    height: u32,

    /// Output file; the extension picks the format (png, jpg, bmp, tif)
    #[arg(short, long)]
    output: PathBuf,

    /// Paint in grayscale instead of relief colors
    #[arg(long)]
    grayscale: bool,

    #[command(flatten)]
    source: SourceArgs,
}

#[derive(Args, Debug)]
struct BatchArgs {
    /// YAML jobs file
    #[arg(short, long, env = "TOPO_JOBS")]
    config: PathBuf,

    #[command(flatten)]
    source: SourceArgs,
}

/// Overrides on top of the environment-derived source configuration.
#[derive(Args, Debug)]
struct SourceArgs {
    /// Directory for cached query results
    #[arg(long)]
    cache_dir: Option<PathBuf>,

    /// ERDDAP server base URL
    #[arg(long)]
    erddap_url: Option<String>,

    /// Always query the server and never write the cache
    #[arg(long)]
    no_cache: bool,
}

impl SourceArgs {
    fn apply(&self, config: &mut SourceConfig) {
        if let Some(dir) = &self.cache_dir {
            config.cache_dir = dir.clone();
        }
        if let Some(url) = &self.erddap_url {
            config.erddap_url = url.clone();
        }
        if self.no_cache {
            config.cache_disabled = true;
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment from .env file if present
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_tracing(&cli.log_level, cli.log_format)?;

    match cli.command {
        Command::Render(args) => run_render(args).await,
        Command::Batch(args) => run_batch(args).await,
    }
}

fn init_tracing(log_level: &str, format: LogFormat) -> Result<()> {
    let level = match log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let builder = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true)
        .with_writer(std::io::stderr);

    match format {
        LogFormat::Json => tracing::subscriber::set_global_default(builder.json().finish())?,
        LogFormat::Text => tracing::subscriber::set_global_default(builder.finish())?,
    }
    Ok(())
}

/// Build the data source stack: ERDDAP, wrapped in the file cache unless
/// caching is off.
fn build_source(config: &SourceConfig) -> Result<Box<dyn TopoSource>> {
    let client = ErddapClient::new(config).context("Failed to create ERDDAP client")?;

    if config.cache_disabled {
        info!(url = %config.erddap_url, "Cache disabled");
        return Ok(Box::new(client));
    }

    info!(
        url = %config.erddap_url,
        cache_dir = %config.cache_dir.display(),
        "Using cached ERDDAP source"
    );
    Ok(Box::new(CachedSource::new(
        FileCache::new(&config.cache_dir),
        client,
    )))
}

async fn run_render(args: RenderArgs) -> Result<()> {
    let mut config = SourceConfig::from_env();
    args.source.apply(&mut config);

    let job = MapJob {
        output: args.output,
        width: args.width,
        height: args.height,
        grayscale: args.grayscale,
        region: TopoRegion::new(
            args.min_lat,
            args.max_lat,
            args.lat_stride,
            args.min_lon,
            args.max_lon,
            args.lon_stride,
        ),
    };
    job.validate().context("Invalid map request")?;

    let source = build_source(&config)?;
    let rendered = generate_map(source.as_ref(), &job)
        .await
        .with_context(|| format!("Failed to render {}", job.output.display()))?;

    info!(
        output = %rendered.output.display(),
        samples = rendered.samples,
        "Done"
    );
    Ok(())
}

async fn run_batch(args: BatchArgs) -> Result<()> {
    let jobs = load_jobs(&args.config)?;

    // Precedence: flag, then jobs file, then environment
    let mut config = SourceConfig::from_env();
    if let Some(dir) = &jobs.cache_dir {
        config.cache_dir = dir.clone();
    }
    if let Some(url) = &jobs.erddap_url {
        config.erddap_url = url.clone();
    }
    args.source.apply(&mut config);

    let source = build_source(&config)?;
    info!(count = jobs.maps.len(), config = %args.config.display(), "Starting batch");

    let mut rendered = 0usize;
    let mut failed = 0usize;
    for job in &jobs.maps {
        match generate_map(source.as_ref(), job).await {
            Ok(_) => rendered += 1,
            Err(e) if e.is_absence() => {
                warn!(output = %job.output.display(), error = %e, "No data for map, skipped");
                failed += 1;
            }
            Err(e) => {
                error!(output = %job.output.display(), error = %e, "Map failed");
                failed += 1;
            }
        }
    }

    info!(rendered, failed, "Batch complete");
    anyhow::ensure!(failed == 0, "{} of {} maps failed", failed, jobs.maps.len());
    Ok(())
}
