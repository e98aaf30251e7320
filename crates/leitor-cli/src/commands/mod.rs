//! CLI command implementations.

pub mod decode;
pub mod parse;

/// Output format shared by the commands.
#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output
    Json,
    /// Plain text summary
    Text,
}
