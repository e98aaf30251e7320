//! End-to-end document processing: one synchronous call per document.
//!
//! A document is routed to exactly one path by its declared media kind:
//! images go through the variant decode search, PDFs through text
//! extraction (portal DANFE) or rasterization plus OCR (thermal
//! receipt). Partial extraction failures never surface here; only
//! unreadable input and a missing OCR engine are hard errors.

use std::path::PathBuf;
use tracing::{info, warn};

use crate::decode;
use crate::error::Result;
use crate::models::{DecodedCode, InvoiceRecord, ReceiptRecord};
use crate::ocr::{TesseractCli, TextRecognizer};
use crate::parse::{parse_danfe_text, parse_receipt_text};
use crate::pdf;
use crate::render::{self, TableRenderer, TableSpec};

/// Declared media kind of an incoming document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    /// A photographed receipt (JPEG/PNG bytes) carrying a code.
    Image,
    /// A PDF document (portal DANFE or rasterizable receipt).
    Document,
}

/// An incoming document with its routing hints.
#[derive(Debug, Clone)]
pub struct DocumentInput<'a> {
    /// Already-downloaded raw bytes.
    pub bytes: &'a [u8],
    /// Declared media kind; selects the processing route.
    pub kind: MediaKind,
    /// Declared filename, used only as a routing hint for PDFs.
    pub filename: Option<&'a str>,
    /// Collision-avoiding identifier for temporary artifacts.
    pub media_id: &'a str,
}

/// Outcome of processing one document.
#[derive(Debug)]
pub enum ProcessOutcome {
    /// The image route decoded a machine-readable code.
    Code(DecodedCode),
    /// The document route parsed a portal DANFE.
    Danfe {
        record: InvoiceRecord,
        summary: String,
        table_image: Option<PathBuf>,
    },
    /// The document route parsed an OCR'd thermal receipt.
    Receipt {
        record: ReceiptRecord,
        summary: String,
        table_image: Option<PathBuf>,
    },
    /// All decode attempts were exhausted; the caller should ask the
    /// user to resend the document.
    NoCodeFound,
}

/// Synchronous per-document processing pipeline.
pub struct Pipeline {
    recognizer: Box<dyn TextRecognizer>,
    renderer: TableRenderer,
    raster_dpi: u32,
    render_images: bool,
}

impl Pipeline {
    /// Pipeline with the tesseract CLI recognizer and default renderer.
    pub fn new() -> Self {
        Self {
            recognizer: Box::new(TesseractCli::new()),
            renderer: TableRenderer::new(),
            raster_dpi: 300,
            render_images: true,
        }
    }

    /// Skip the table image entirely; outcomes carry only the text summary.
    pub fn without_table_image(mut self) -> Self {
        self.render_images = false;
        self
    }

    /// Swap the OCR engine.
    pub fn with_recognizer(mut self, recognizer: Box<dyn TextRecognizer>) -> Self {
        self.recognizer = recognizer;
        self
    }

    /// Swap the table renderer.
    pub fn with_renderer(mut self, renderer: TableRenderer) -> Self {
        self.renderer = renderer;
        self
    }

    /// Process one document end to end.
    pub fn process(&self, input: DocumentInput<'_>) -> Result<ProcessOutcome> {
        match input.kind {
            MediaKind::Image => self.process_image(&input),
            MediaKind::Document => self.process_document(&input),
        }
    }

    fn process_image(&self, input: &DocumentInput<'_>) -> Result<ProcessOutcome> {
        match decode::decode_image_bytes(input.bytes)? {
            Some(code) => {
                info!(tipo = %code.tipo, media_id = input.media_id, "image decoded");
                Ok(ProcessOutcome::Code(code))
            }
            None => {
                info!(media_id = input.media_id, "no code found in image");
                Ok(ProcessOutcome::NoCodeFound)
            }
        }
    }

    fn process_document(&self, input: &DocumentInput<'_>) -> Result<ProcessOutcome> {
        let is_portal = input.filename.is_some_and(pdf::is_portal_pdf);

        if is_portal {
            let text = pdf::extract_text(input.bytes)?;
            let record = parse_danfe_text(&text);
            let summary = render::format_danfe_summary(&record);
            let table_image = self.render_table(&TableSpec::from_invoice(&record), input.media_id);
            return Ok(ProcessOutcome::Danfe {
                record,
                summary,
                table_image,
            });
        }

        let page = pdf::rasterize_first_page(input.bytes, self.raster_dpi)?;
        let text = self.recognizer.recognize(&page)?;
        let record = parse_receipt_text(&text);
        let summary = render::format_receipt_summary(&record);
        let table_image = self.render_table(&TableSpec::from_receipt(&record), input.media_id);

        Ok(ProcessOutcome::Receipt {
            record,
            summary,
            table_image,
        })
    }

    /// Render failure degrades to the text summary, never propagates.
    fn render_table(&self, spec: &TableSpec, media_id: &str) -> Option<PathBuf> {
        if !self.render_images {
            return None;
        }
        match self.renderer.render(spec, media_id) {
            Ok(path) => Some(path),
            Err(err) => {
                warn!("table rendering failed, falling back to text: {err}");
                None
            }
        }
    }
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LeitorError;
    use pretty_assertions::assert_eq;

    #[test]
    fn image_route_rejects_corrupt_bytes() {
        let pipeline = Pipeline::new();
        let input = DocumentInput {
            bytes: b"not an image",
            kind: MediaKind::Image,
            filename: None,
            media_id: "m1",
        };
        assert!(matches!(
            pipeline.process(input),
            Err(LeitorError::Decode(_))
        ));
    }

    #[test]
    fn undecodable_image_signals_absence_not_error() {
        // A blank JPEG-sized canvas carries no code; the pipeline must
        // answer with the explicit failure signal.
        let blank = image::RgbImage::from_pixel(48, 48, image::Rgb([255, 255, 255]));
        let mut bytes = Vec::new();
        blank
            .write_to(&mut std::io::Cursor::new(&mut bytes), image::ImageFormat::Png)
            .unwrap();

        let pipeline = Pipeline::new();
        let input = DocumentInput {
            bytes: &bytes,
            kind: MediaKind::Image,
            filename: None,
            media_id: "m2",
        };

        match pipeline.process(input).unwrap() {
            ProcessOutcome::NoCodeFound => {}
            other => panic!("expected NoCodeFound, got {other:?}"),
        }
    }

    #[test]
    fn document_route_rejects_corrupt_pdf() {
        let pipeline = Pipeline::new();
        let input = DocumentInput {
            bytes: b"not a pdf",
            kind: MediaKind::Document,
            filename: Some("Portal da Nota Fiscal Eletrônica.pdf"),
            media_id: "m3",
        };
        assert!(matches!(pipeline.process(input), Err(LeitorError::Pdf(_))));
    }

    #[test]
    fn filename_hint_selects_the_route() {
        assert!(pdf::is_portal_pdf("Portal da Nota Fiscal Eletrônica (3).pdf"));
        let input = DocumentInput {
            bytes: b"",
            kind: MediaKind::Document,
            filename: None,
            media_id: "m4",
        };
        // No filename means the OCR route; with garbage bytes that is a
        // raster error, not a DANFE parse.
        let pipeline = Pipeline::new();
        assert!(matches!(pipeline.process(input), Err(LeitorError::Pdf(_))));
    }

    #[test]
    fn outcome_code_serializes_wire_contract() {
        let code = crate::decode::classify_payload(
            "12345678901234567890123456789012345678901234",
        );
        let json = serde_json::to_string(&code).unwrap();
        assert!(json.contains("\"tipo\":\"CODE128\""));
        assert_eq!(
            serde_json::from_str::<crate::models::DecodedCode>(&json).unwrap(),
            code
        );
    }
}
