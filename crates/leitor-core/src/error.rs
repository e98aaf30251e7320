//! Error types for the leitor-core library.

use thiserror::Error;

/// Main error type for the leitor library.
#[derive(Error, Debug)]
pub enum LeitorError {
    /// Code decoding error.
    #[error("decode error: {0}")]
    Decode(#[from] DecodeError),

    /// PDF processing error.
    #[error("PDF error: {0}")]
    Pdf(#[from] PdfError),

    /// OCR processing error.
    #[error("OCR error: {0}")]
    Ocr(#[from] OcrError),

    /// Table image rendering error.
    #[error("render error: {0}")]
    Render(#[from] RenderError),

    /// Image processing error.
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors related to decoding machine-readable codes from images.
#[derive(Error, Debug)]
pub enum DecodeError {
    /// The supplied bytes could not be loaded as an image.
    #[error("invalid image: {0}")]
    InvalidImage(String),
}

/// Errors related to PDF processing.
#[derive(Error, Debug)]
pub enum PdfError {
    /// Failed to open/parse the PDF file.
    #[error("failed to parse PDF: {0}")]
    Parse(String),

    /// Failed to extract text from PDF.
    #[error("failed to extract text: {0}")]
    TextExtraction(String),

    /// The PDF is empty or has no pages.
    #[error("PDF has no pages")]
    NoPages,

    /// Failed to rasterize a page to an image.
    #[error("failed to rasterize page: {0}")]
    Raster(String),
}

/// Errors related to OCR text recognition.
#[derive(Error, Debug)]
pub enum OcrError {
    /// The OCR engine is not installed or could not be started.
    #[error("OCR engine unavailable: {0}")]
    Unavailable(String),

    /// Text recognition failed.
    #[error("text recognition failed: {0}")]
    Recognition(String),
}

/// Errors related to rendering the tabular summary image.
#[derive(Error, Debug)]
pub enum RenderError {
    /// None of the preferred fonts could be loaded from the host.
    #[error("no usable font found on host")]
    NoFont,

    /// Drawing or encoding the output image failed.
    #[error("failed to draw table: {0}")]
    Draw(String),
}

/// Result type for the leitor library.
pub type Result<T> = std::result::Result<T, LeitorError>;
