//! Tabular image rendering for parsed records.

use ab_glyph::{FontVec, PxScale};
use chrono::Utc;
use image::{Rgb, RgbImage};
use imageproc::drawing::{draw_filled_rect_mut, draw_text_mut};
use imageproc::rect::Rect;
use std::fs;
use std::path::PathBuf;
use std::thread;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::error::RenderError;
use crate::models::{InvoiceRecord, ReceiptRecord};

/// How long a rendered table lives before best-effort deletion.
pub const CLEANUP_DELAY: Duration = Duration::from_secs(300);

const WHITE: Rgb<u8> = Rgb([255, 255, 255]);
const BLACK: Rgb<u8> = Rgb([20, 20, 20]);
const HEADER_BG: Rgb<u8> = Rgb([225, 225, 225]);
const GRID: Rgb<u8> = Rgb([170, 170, 170]);

const IMAGE_WIDTH: u32 = 900;
const MARGIN: i32 = 20;
const ROW_HEIGHT: i32 = 30;
const TITLE_HEIGHT: i32 = 44;

/// Content of the rendered table, independent of which record built it.
#[derive(Debug, Clone)]
pub struct TableSpec {
    /// Title line above the table.
    pub title: String,
    /// Column headings.
    pub columns: Vec<&'static str>,
    /// Relative column widths, same length as `columns`.
    pub widths: Vec<u32>,
    /// Item rows, one cell per column.
    pub rows: Vec<Vec<String>>,
    /// Footer lines below the table (totals, payment).
    pub footer: Vec<String>,
}

impl TableSpec {
    /// Table content for a DANFE record.
    pub fn from_invoice(record: &InvoiceRecord) -> Self {
        let rows = record
            .items
            .iter()
            .map(|item| {
                vec![
                    item.item_number.clone(),
                    item.description.clone(),
                    item.quantity.clone(),
                    item.unit.clone(),
                    item.value.clone(),
                ]
            })
            .collect();

        Self {
            title: format!("NF-e {} - {}", record.number, record.issuer_name),
            columns: vec!["Item", "Descrição", "Qtd", "Un", "Valor (R$)"],
            widths: vec![60, 420, 100, 80, 200],
            rows,
            footer: vec![
                format!("Total: R$ {}", record.total_value),
                format!("Pagamento: {}", record.payment_description),
                format!("Emissão: {} {}", record.issue_date, record.issue_time),
            ],
        }
    }

    /// Table content for an OCR'd receipt record.
    pub fn from_receipt(record: &ReceiptRecord) -> Self {
        let rows = record
            .items
            .iter()
            .map(|item| {
                vec![
                    item.code.clone(),
                    item.name.clone(),
                    item.quantity.clone(),
                    item.unit_value.clone(),
                    item.line_total.clone(),
                ]
            })
            .collect();

        Self {
            title: format!("Cupom - {}", record.merchant_name),
            columns: vec!["Cód", "Produto", "Qtd", "Unit (R$)", "Total (R$)"],
            widths: vec![80, 400, 100, 140, 140],
            rows,
            footer: vec![
                format!("Total Cupom: R$ {}", record.total_value),
                format!("Pagamento: {}", record.payment_method),
                format!("Emissão: {}", record.issued_at),
            ],
        }
    }

    fn row_count(&self) -> i32 {
        // Title + heading + items + footer lines.
        2 + self.rows.len() as i32 + self.footer.len() as i32
    }
}

/// Renders a [`TableSpec`] to a temporary PNG with timed cleanup.
pub struct TableRenderer {
    font_paths: Vec<PathBuf>,
    output_dir: PathBuf,
    cleanup_delay: Duration,
}

impl TableRenderer {
    /// Renderer with the default host font list and the system temp dir.
    pub fn new() -> Self {
        Self {
            font_paths: default_font_paths(),
            output_dir: std::env::temp_dir(),
            cleanup_delay: CLEANUP_DELAY,
        }
    }

    /// Override the preferred font list.
    pub fn with_font_paths(mut self, paths: Vec<PathBuf>) -> Self {
        self.font_paths = paths;
        self
    }

    /// Override the output directory.
    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }

    /// Override the cleanup delay.
    pub fn with_cleanup_delay(mut self, delay: Duration) -> Self {
        self.cleanup_delay = delay;
        self
    }

    /// Render the table and schedule its deletion.
    ///
    /// The output filename is keyed by `media_id` so concurrent
    /// documents never collide. Any failure here is recoverable: the
    /// caller falls back to the plain-text summary.
    pub fn render(&self, spec: &TableSpec, media_id: &str) -> Result<PathBuf, RenderError> {
        let font = self.load_font()?;

        let height = (TITLE_HEIGHT + spec.row_count() * ROW_HEIGHT + 2 * MARGIN) as u32;
        let mut canvas = RgbImage::from_pixel(IMAGE_WIDTH, height, WHITE);

        let title_scale = PxScale::from(26.0);
        let cell_scale = PxScale::from(17.0);
        let mut y = MARGIN;

        draw_text_mut(&mut canvas, BLACK, MARGIN, y, title_scale, &font, &spec.title);
        y += TITLE_HEIGHT;

        // Heading row on a shaded band.
        draw_filled_rect_mut(
            &mut canvas,
            Rect::at(MARGIN, y).of_size(IMAGE_WIDTH - 2 * MARGIN as u32, ROW_HEIGHT as u32),
            HEADER_BG,
        );
        self.draw_row(&mut canvas, &font, cell_scale, spec, y, &heading_cells(spec));
        y += ROW_HEIGHT;

        for row in &spec.rows {
            // Thin separator above each item row.
            draw_filled_rect_mut(
                &mut canvas,
                Rect::at(MARGIN, y).of_size(IMAGE_WIDTH - 2 * MARGIN as u32, 1),
                GRID,
            );
            self.draw_row(&mut canvas, &font, cell_scale, spec, y, row);
            y += ROW_HEIGHT;
        }

        y += ROW_HEIGHT / 2;
        for line in &spec.footer {
            draw_text_mut(&mut canvas, BLACK, MARGIN, y, cell_scale, &font, line);
            y += ROW_HEIGHT;
        }

        let path = self
            .output_dir
            .join(format!("nota-{media_id}-{}.png", Utc::now().timestamp_millis()));
        canvas
            .save(&path)
            .map_err(|err| RenderError::Draw(err.to_string()))?;

        info!(path = %path.display(), "rendered table image");
        schedule_cleanup(path.clone(), self.cleanup_delay);
        Ok(path)
    }

    fn draw_row(
        &self,
        canvas: &mut RgbImage,
        font: &FontVec,
        scale: PxScale,
        spec: &TableSpec,
        y: i32,
        cells: &[String],
    ) {
        let mut x = MARGIN + 6;
        for (cell, width) in cells.iter().zip(&spec.widths) {
            let text = clip_cell(cell, *width);
            draw_text_mut(canvas, BLACK, x, y + 6, scale, font, &text);
            x += *width as i32;
        }
    }

    fn load_font(&self) -> Result<FontVec, RenderError> {
        for path in &self.font_paths {
            match fs::read(path) {
                Ok(bytes) => match FontVec::try_from_vec(bytes) {
                    Ok(font) => {
                        debug!(path = %path.display(), "loaded table font");
                        return Ok(font);
                    }
                    Err(err) => warn!(path = %path.display(), "unusable font: {err}"),
                },
                Err(_) => continue,
            }
        }
        Err(RenderError::NoFont)
    }
}

impl Default for TableRenderer {
    fn default() -> Self {
        Self::new()
    }
}

fn heading_cells(spec: &TableSpec) -> Vec<String> {
    spec.columns.iter().map(|c| c.to_string()).collect()
}

/// Rough character clipping so long descriptions stay inside their column.
fn clip_cell(text: &str, width: u32) -> String {
    let max_chars = (width / 9).max(4) as usize;
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let clipped: String = text.chars().take(max_chars.saturating_sub(1)).collect();
    format!("{clipped}…")
}

/// Delete the rendered file after the delay, best effort.
fn schedule_cleanup(path: PathBuf, delay: Duration) {
    thread::spawn(move || {
        thread::sleep(delay);
        if let Err(err) = fs::remove_file(&path) {
            warn!(path = %path.display(), "failed to remove rendered table: {err}");
        } else {
            debug!(path = %path.display(), "removed rendered table");
        }
    });
}

/// Fonts tried in order; the first readable one wins.
fn default_font_paths() -> Vec<PathBuf> {
    [
        "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
        "/usr/share/fonts/truetype/dejavu/DejaVuSans-Bold.ttf",
        "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
        "/usr/share/fonts/TTF/DejaVuSans.ttf",
        "/usr/share/fonts/noto/NotoSans-Regular.ttf",
        "/Library/Fonts/Arial.ttf",
    ]
    .iter()
    .map(PathBuf::from)
    .collect()
}
