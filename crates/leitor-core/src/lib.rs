//! Core library for Brazilian fiscal document reading.
//!
//! This crate provides:
//! - QR/barcode extraction from receipt photographs (deterministic
//!   transform search over rotation, threshold, and morphology, with a
//!   fixed-priority decoder fallback chain)
//! - Payload classification and 44-digit access-key extraction
//! - NF-e DANFE parsing from portal PDF text
//! - NFC-e thermal receipt parsing from OCR text
//! - Plain-text and tabular-image summaries of parsed records

pub mod decode;
pub mod error;
pub mod models;
pub mod ocr;
pub mod parse;
pub mod pdf;
pub mod pipeline;
pub mod render;

pub use decode::{classify_payload, decode_image_bytes, verification_url, Transform};
pub use error::{LeitorError, Result};
pub use models::{
    CodeKind, DanfeItem, DecodedCode, InvoiceRecord, ReceiptItem, ReceiptRecord, NOT_FOUND,
};
pub use parse::{parse_danfe_text, parse_receipt_text};
pub use pipeline::{DocumentInput, MediaKind, Pipeline, ProcessOutcome};
pub use render::{format_danfe_summary, format_receipt_summary, TableRenderer, TableSpec};
