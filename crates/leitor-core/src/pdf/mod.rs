//! PDF ingestion: text extraction and page rasterization.
//!
//! Text extraction uses pdf-extract on top of a lopdf structural check
//! so corrupt files surface as a hard parse error instead of garbage
//! text. Rasterization shells out to poppler's `pdftoppm`, the same
//! renderer the upstream media collaborators use.

use image::DynamicImage;
use lopdf::Document;
use std::fs;
use std::process::Command;
use tracing::{debug, warn};

use crate::error::PdfError;

/// Result type for PDF operations.
pub type Result<T> = std::result::Result<T, PdfError>;

/// Filename marker of a DANFE downloaded from the NF-e portal.
///
/// Documents carrying it route to the DANFE text parser; everything
/// else goes through rasterization and OCR.
const PORTAL_FILENAME_MARKER: &str = "Portal da Nota Fiscal Eletrônica";

/// Whether a declared filename routes to the portal DANFE parser.
pub fn is_portal_pdf(filename: &str) -> bool {
    filename.contains(PORTAL_FILENAME_MARKER)
}

/// Extract page-concatenated text from raw PDF bytes.
pub fn extract_text(data: &[u8]) -> Result<String> {
    // Structural pre-check: corrupt bytes and empty documents are hard
    // errors per the pipeline contract.
    let doc = Document::load_mem(data).map_err(|err| PdfError::Parse(err.to_string()))?;
    if doc.get_pages().is_empty() {
        return Err(PdfError::NoPages);
    }

    let text = pdf_extract::extract_text_from_mem(data)
        .map_err(|err| PdfError::TextExtraction(err.to_string()))?;

    debug!(pages = doc.get_pages().len(), chars = text.len(), "extracted PDF text");
    Ok(text)
}

/// Rasterize the first page of a PDF to an image via `pdftoppm`.
pub fn rasterize_first_page(data: &[u8], dpi: u32) -> Result<DynamicImage> {
    let dir = tempfile::tempdir().map_err(|err| PdfError::Raster(err.to_string()))?;
    let pdf_path = dir.path().join("page.pdf");
    fs::write(&pdf_path, data).map_err(|err| PdfError::Raster(err.to_string()))?;

    let prefix = dir.path().join("page");
    let output = Command::new("pdftoppm")
        .arg("-png")
        .arg("-r")
        .arg(dpi.to_string())
        .arg("-f")
        .arg("1")
        .arg("-l")
        .arg("1")
        .arg(&pdf_path)
        .arg(&prefix)
        .output()
        .map_err(|err| PdfError::Raster(format!("pdftoppm unavailable: {err}")))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(PdfError::Raster(format!("pdftoppm failed: {}", stderr.trim())));
    }

    // pdftoppm numbers its output; take the single page it produced.
    let rendered = fs::read_dir(dir.path())
        .map_err(|err| PdfError::Raster(err.to_string()))?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .find(|path| path.extension().is_some_and(|ext| ext == "png"))
        .ok_or_else(|| PdfError::Raster("pdftoppm produced no output".to_string()))?;

    let image = image::open(&rendered).map_err(|err| {
        warn!("failed to load rendered page: {err}");
        PdfError::Raster(err.to_string())
    })?;

    Ok(image)
}
