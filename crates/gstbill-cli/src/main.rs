//! CLI application for computing GST invoice documents.

mod commands;

use clap::{Parser, Subcommand};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use commands::{batch, compute, config, gstin, words};

/// GST invoice computation - normalized lines, tax, totals and pages from raw records
#[derive(Parser)]
#[command(name = "gstbill")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Path to config file
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute a single invoice document from a JSON bundle
    Compute(compute::ComputeArgs),

    /// Compute invoice documents for many bundles
    Batch(batch::BatchArgs),

    /// Print an amount in words (Indian numbering)
    Words(words::WordsArgs),

    /// Validate GSTINs and show their state codes
    Gstin(gstin::GstinArgs),

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

    match cli.command {
        Commands::Compute(args) => compute::run(args, cli.config.as_deref()).await,
        Commands::Batch(args) => batch::run(args, cli.config.as_deref()).await,
        Commands::Words(args) => words::run(args, cli.config.as_deref()).await,
        Commands::Gstin(args) => gstin::run(args).await,
        Commands::Config(args) => config::run(args, cli.config.as_deref()).await,
    }
}
