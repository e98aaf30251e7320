//! Parse command - extract a structured record from a fiscal PDF.

use std::fs;
use std::path::PathBuf;

use anyhow::Context;
use clap::Args;
use tracing::info;

use leitor_core::pipeline::{DocumentInput, MediaKind, Pipeline, ProcessOutcome};

use super::OutputFormat;

/// Arguments for the parse command.
#[derive(Args)]
pub struct ParseArgs {
    /// Input PDF file
    #[arg(required = true)]
    input: PathBuf,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    format: OutputFormat,

    /// Force the portal DANFE text route regardless of filename
    #[arg(long)]
    danfe: bool,

    /// Skip the table image, emit only the text summary
    #[arg(long)]
    no_image: bool,
}

pub fn run(args: ParseArgs) -> anyhow::Result<()> {
    let bytes = fs::read(&args.input)
        .with_context(|| format!("failed to read {}", args.input.display()))?;

    let filename = if args.danfe {
        // The routing hint the pipeline looks for.
        Some("Portal da Nota Fiscal Eletrônica")
    } else {
        args.input.file_name().and_then(|n| n.to_str())
    };

    let media_id = args
        .input
        .file_stem()
        .and_then(|n| n.to_str())
        .unwrap_or("documento")
        .to_string();

    info!(path = %args.input.display(), "parsing document");

    let mut pipeline = Pipeline::new();
    if args.no_image {
        pipeline = pipeline.without_table_image();
    }
    let outcome = pipeline.process(DocumentInput {
        bytes: &bytes,
        kind: MediaKind::Document,
        filename,
        media_id: &media_id,
    })?;

    match outcome {
        ProcessOutcome::Danfe {
            record,
            summary,
            table_image,
        } => {
            match args.format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&record)?),
                OutputFormat::Text => print!("{summary}"),
            }
            if let Some(path) = table_image {
                eprintln!("🖼️  Tabela: {}", path.display());
            }
        }
        ProcessOutcome::Receipt {
            record,
            summary,
            table_image,
        } => {
            match args.format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&record)?),
                OutputFormat::Text => print!("{summary}"),
            }
            if let Some(path) = table_image {
                eprintln!("🖼️  Tabela: {}", path.display());
            }
        }
        ProcessOutcome::Code(_) | ProcessOutcome::NoCodeFound => {
            // The document route never produces these.
            unreachable!("document route returned an image-route outcome")
        }
    }

    Ok(())
}
