//! CLI application for reading Brazilian fiscal documents.

mod commands;

use clap::{Parser, Subcommand};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use commands::{decode, parse};

/// Fiscal document reader - decode NFC-e codes and parse NF-e documents
#[derive(Parser)]
#[command(name = "leitor")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Decode a QR code or barcode from a receipt photo
    Decode(decode::DecodeArgs),

    /// Parse a fiscal PDF (portal DANFE or rasterized receipt)
    Parse(parse::ParseArgs),
}

fn main() -> anyhow::Result<()> {
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
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    match cli.command {
        Commands::Decode(args) => decode::run(args),
        Commands::Parse(args) => parse::run(args),
    }
}
