//! CLI application for mileage logs.

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use commands::{config, extract, gaps, summary, trips, upload, Context};

/// Mileage log - Track trips, find undocumented mileage, extract trips from documents
#[derive(Parser)]
#[command(name = "mileage")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Path to config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// User id to act as (default: user.default_user from config)
    #[arg(short, long, global = true)]
    user: Option<String>,

    /// Path to the JSON record store
    #[arg(long, global = true)]
    store: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract trip candidates from a document without storing them
    Extract(extract::ExtractArgs),

    /// Upload documents and store the extracted trips
    Upload(upload::UploadArgs),

    /// Manage trips
    Trips(trips::TripsArgs),

    /// Detect and review mileage gaps
    Gaps(gaps::GapsArgs),

    /// Show mileage totals
    Summary(summary::SummaryArgs),

    /// Manage configuration
    Config(config::ConfigArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Set up logging based on verbosity
    let level = match cli.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    let ctx = Context {
        config_path: cli.config,
        user: cli.user,
        store_path: cli.store,
    };

    // Execute command
    match cli.command {
        Commands::Extract(args) => extract::run(args, &ctx).await,
        Commands::Upload(args) => upload::run(args, &ctx).await,
        Commands::Trips(args) => trips::run(args, &ctx).await,
        Commands::Gaps(args) => gaps::run(args, &ctx).await,
        Commands::Summary(args) => summary::run(args, &ctx).await,
        Commands::Config(args) => config::run(args, &ctx).await,
    }
}
