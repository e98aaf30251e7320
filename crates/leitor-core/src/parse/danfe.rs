//! NF-e DANFE parser for text extracted from the fiscal portal PDF.

use regex::Captures;
use tracing::debug;

use super::patterns::*;
use super::{FieldRule, apply_rules, normalize_text};
use crate::models::{DanfeItem, InvoiceRecord};

/// Parse the full page-concatenated text of a portal DANFE PDF.
///
/// Every header rule is independent: a missing section leaves its
/// fields at the sentinel without affecting the rest. The function is
/// pure, so repeated parses of the same text are identical.
pub fn parse_danfe_text(text: &str) -> InvoiceRecord {
    let text = normalize_text(text);
    let mut record = InvoiceRecord::default();

    apply_rules(&header_rules(), &text, &mut record);
    record.items = extract_items(&text);

    debug!(
        access_key = %record.access_key,
        items = record.items.len(),
        "parsed DANFE text"
    );
    record
}

fn header_rules() -> Vec<FieldRule<InvoiceRecord>> {
    vec![
        FieldRule {
            name: "access_key",
            anchor: &ACCESS_KEY_LINE,
            apply: apply_access_key,
        },
        FieldRule {
            name: "model_series_number",
            anchor: &MODEL_LINE,
            apply: apply_model_line,
        },
        FieldRule {
            name: "issuer",
            anchor: &ISSUER_BLOCK,
            apply: apply_issuer,
        },
        FieldRule {
            name: "recipient",
            anchor: &RECIPIENT_BLOCK,
            apply: apply_recipient,
        },
        FieldRule {
            name: "operation",
            anchor: &OPERATION_LINE,
            apply: apply_operation,
        },
        FieldRule {
            name: "status",
            anchor: &STATUS_LINE,
            apply: apply_status,
        },
        FieldRule {
            name: "authorization",
            anchor: &AUTHORIZATION_LINE,
            apply: apply_authorization,
        },
        FieldRule {
            name: "payment",
            anchor: &PAYMENT_SECTION,
            apply: apply_payment,
        },
    ]
}

fn apply_access_key(caps: &Captures<'_>, record: &mut InvoiceRecord) {
    let line = caps[1].trim();
    if let Some(first) = line.split_whitespace().next() {
        let cleaned = KEY_PUNCTUATION.replace_all(first, "").to_string();
        if !cleaned.is_empty() {
            record.access_key = cleaned;
        }
    }
}

fn apply_model_line(caps: &Captures<'_>, record: &mut InvoiceRecord) {
    let parts: Vec<&str> = caps[1].split_whitespace().collect();
    let fields: [&mut String; 8] = [
        &mut record.model,
        &mut record.series,
        &mut record.number,
        &mut record.issue_date,
        &mut record.issue_time,
        &mut record.exit_date,
        &mut record.exit_time,
        &mut record.total_value,
    ];
    for (field, part) in fields.into_iter().zip(parts) {
        *field = part.to_string();
    }
}

fn apply_issuer(caps: &Captures<'_>, record: &mut InvoiceRecord) {
    let parts: Vec<&str> = caps[1].split_whitespace().collect();
    if let Some(&cnpj) = parts.first() {
        record.issuer_cnpj = cnpj.to_string();
    }
    if let Some(&uf) = parts.last() {
        record.issuer_uf = uf.to_string();
    }
    if parts.len() >= 2 {
        record.issuer_ie = parts[parts.len() - 2].to_string();
    }
    if parts.len() > 3 {
        record.issuer_name = parts[1..parts.len() - 2].join(" ");
    }
}

fn apply_recipient(caps: &Captures<'_>, record: &mut InvoiceRecord) {
    let parts: Vec<&str> = caps[1].split_whitespace().collect();
    if let Some(&cpf) = parts.first() {
        record.recipient_cpf = cpf.to_string();
    }
    if let Some(&uf) = parts.last() {
        record.recipient_uf = uf.to_string();
    }
    if parts.len() > 2 {
        record.recipient_name = parts[1..parts.len() - 1].join(" ");
    }
}

fn apply_operation(caps: &Captures<'_>, record: &mut InvoiceRecord) {
    let line = caps[1].trim();
    match OPERATION_SPLIT.captures(line) {
        Some(inner) => {
            record.operation_nature = inner[1].trim().to_string();
            record.operation_type = inner[2].trim().to_string();
        }
        None => {
            record.operation_nature = line.to_string();
        }
    }
}

fn apply_status(caps: &Captures<'_>, record: &mut InvoiceRecord) {
    record.status = caps[1].trim().to_string();
}

fn apply_authorization(caps: &Captures<'_>, record: &mut InvoiceRecord) {
    record.authorization_protocol = caps[1].to_string();
    record.authorization_date = caps[2].to_string();
    record.inclusion_date = caps[3].to_string();
}

fn apply_payment(caps: &Captures<'_>, record: &mut InvoiceRecord) {
    if let Some(desc) = PAYMENT_DESCRIPTION.captures(&caps[1]) {
        record.payment_description = desc[1].trim().to_string();
    }
}

/// Pull line items out of the products section span.
///
/// Non-matching lines are skipped silently; source order is preserved.
fn extract_items(text: &str) -> Vec<DanfeItem> {
    let Some(section) = PRODUCTS_SECTION.captures(text) else {
        return Vec::new();
    };

    section[1]
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .filter_map(|line| {
            PRODUCT_LINE.captures(line).map(|caps| DanfeItem {
                item_number: caps[1].to_string(),
                description: caps[2].trim().to_string(),
                quantity: caps[3].to_string(),
                unit: caps[4].to_string(),
                value: caps[5].to_string(),
            })
        })
        .collect()
}
