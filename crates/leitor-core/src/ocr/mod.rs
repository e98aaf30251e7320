//! OCR text recognition seam.
//!
//! The receipt parser consumes plain text, so the engine behind it is a
//! trait. The default implementation shells out to the tesseract CLI
//! with the Portuguese language pack, matching what the production
//! deployment runs.

use image::DynamicImage;
use std::io::Write;
use std::process::Command;
use tracing::debug;

use crate::error::OcrError;

/// Result type for OCR operations.
pub type Result<T> = std::result::Result<T, OcrError>;

/// Turns a document image into plain text.
pub trait TextRecognizer {
    /// Recognize all text on the image, top to bottom.
    fn recognize(&self, image: &DynamicImage) -> Result<String>;
}

/// Recognizer backed by the `tesseract` CLI.
pub struct TesseractCli {
    /// Tesseract language code.
    lang: String,
}

impl TesseractCli {
    /// Recognizer for Brazilian Portuguese receipts.
    pub fn new() -> Self {
        Self {
            lang: "por".to_string(),
        }
    }

    /// Override the language pack.
    pub fn with_lang(mut self, lang: impl Into<String>) -> Self {
        self.lang = lang.into();
        self
    }
}

impl Default for TesseractCli {
    fn default() -> Self {
        Self::new()
    }
}

impl TextRecognizer for TesseractCli {
    fn recognize(&self, image: &DynamicImage) -> Result<String> {
        let mut file = tempfile::Builder::new()
            .prefix("leitor-ocr-")
            .suffix(".png")
            .tempfile()
            .map_err(|err| OcrError::Recognition(err.to_string()))?;

        let mut png = Vec::new();
        image
            .write_to(&mut std::io::Cursor::new(&mut png), image::ImageFormat::Png)
            .map_err(|err| OcrError::Recognition(err.to_string()))?;
        file.write_all(&png)
            .and_then(|_| file.flush())
            .map_err(|err| OcrError::Recognition(err.to_string()))?;

        let output = Command::new("tesseract")
            .arg(file.path())
            .arg("stdout")
            .arg("-l")
            .arg(&self.lang)
            .output()
            .map_err(|err| OcrError::Unavailable(err.to_string()))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(OcrError::Recognition(stderr.trim().to_string()));
        }

        let text = String::from_utf8_lossy(&output.stdout).into_owned();
        debug!(chars = text.len(), "tesseract recognized text");
        Ok(text)
    }
}
