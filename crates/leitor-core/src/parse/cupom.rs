//! NFC-e thermal receipt parser for OCR output.
//!
//! OCR text is looser than portal PDF text, so the anchors here are
//! deliberately more forgiving and the text is taken as-is, without the
//! whitespace normalization applied to DANFE text.

use regex::Captures;
use tracing::debug;

use super::patterns::*;
use super::{FieldRule, apply_rules};
use crate::models::{ReceiptItem, ReceiptRecord};

/// Parse OCR output of a rasterized receipt page.
pub fn parse_receipt_text(text: &str) -> ReceiptRecord {
    let mut record = ReceiptRecord::default();

    apply_rules(&receipt_rules(), text, &mut record);
    record.items = extract_items(text);

    debug!(
        merchant = %record.merchant_name,
        items = record.items.len(),
        "parsed receipt text"
    );
    record
}

fn receipt_rules() -> Vec<FieldRule<ReceiptRecord>> {
    vec![
        FieldRule {
            name: "merchant_name",
            anchor: &MERCHANT_NAME,
            apply: |caps, record| record.merchant_name = caps[1].trim().to_string(),
        },
        FieldRule {
            name: "cnpj",
            anchor: &CNPJ,
            apply: |caps, record| record.cnpj = caps[1].to_string(),
        },
        FieldRule {
            name: "total",
            anchor: &RECEIPT_TOTAL,
            apply: |caps, record| record.total_value = caps[1].to_string(),
        },
        FieldRule {
            name: "payment_method",
            anchor: &PAYMENT_VOCABULARY,
            apply: |caps, record| record.payment_method = caps[1].trim().to_string(),
        },
        FieldRule {
            name: "issued_at",
            anchor: &ISSUED_AT,
            apply: |caps, record| record.issued_at = caps[1].to_string(),
        },
        FieldRule {
            name: "access_key",
            anchor: &ACCESS_KEY_RUN,
            apply: |caps: &Captures<'_>, record| record.access_key = caps[0].to_string(),
        },
    ]
}

/// Extract product blocks, tolerating blank lines between the name line
/// and its "quantity x unit-price total" line.
fn extract_items(text: &str) -> Vec<ReceiptItem> {
    RECEIPT_ITEM
        .captures_iter(text)
        .map(|caps| ReceiptItem {
            code: caps[1].trim().to_string(),
            name: caps[2].trim().to_string(),
            quantity: normalize_quantity(caps[3].trim()),
            unit_value: caps[4].trim().to_string(),
            line_total: caps[5].trim().to_string(),
        })
        .collect()
}

/// Reinterpret an OCR-misread leading-zero quantity.
///
/// Thermal printers render fractional quantities like "0,45"; OCR often
/// drops the comma, yielding "045". The correction applies only to
/// purely numeric tokens longer than one character that start with a
/// zero; everything else passes through untouched.
pub(crate) fn normalize_quantity(token: &str) -> String {
    let is_numeric = !token.is_empty() && token.bytes().all(|b| b.is_ascii_digit());
    if is_numeric && token.len() > 1 && token.starts_with('0') {
        return format!("0,{}", token.trim_start_matches('0'));
    }
    token.to_string()
}
