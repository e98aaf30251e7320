//! Decode command - extract a QR/barcode payload from a receipt photo.

use std::fs;
use std::path::PathBuf;

use anyhow::Context;
use clap::Args;
use tracing::info;

use leitor_core::decode::decode_image_bytes;

use super::OutputFormat;

/// Arguments for the decode command.
#[derive(Args)]
pub struct DecodeArgs {
    /// Input image file (JPEG/PNG)
    #[arg(required = true)]
    input: PathBuf,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    format: OutputFormat,
}

pub fn run(args: DecodeArgs) -> anyhow::Result<()> {
    let bytes = fs::read(&args.input)
        .with_context(|| format!("failed to read {}", args.input.display()))?;

    info!(path = %args.input.display(), "decoding image");

    let Some(code) = decode_image_bytes(&bytes)? else {
        println!("🚫 Nenhum código legível encontrado. Reenvie a foto.");
        std::process::exit(1);
    };

    match args.format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&code)?);
        }
        OutputFormat::Text => {
            println!("🔍 Payload: {}", code.raw_payload);
            println!("🧾 Tipo: {}", code.tipo);
            match (&code.chave, &code.consulta_url) {
                (Some(chave), Some(url)) => {
                    println!("🔑 Chave: {chave}");
                    println!("🌐 Consulta: {url}");
                }
                _ => println!("❌ Chave da nota não encontrada."),
            }
        }
    }

    Ok(())
}
