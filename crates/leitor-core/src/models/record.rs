//! Parsed fiscal document records (NF-e DANFE and NFC-e thermal receipt).

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Sentinel used for any field whose anchoring rule did not match.
///
/// Extraction failures populate fields with this value instead of
/// leaving them absent, so downstream consumers never deal with nulls.
pub const NOT_FOUND: &str = "Não encontrado";

fn not_found() -> String {
    NOT_FOUND.to_string()
}

/// A line item from the DANFE "Dados dos Produtos e Serviços" block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DanfeItem {
    /// Item ordinal as printed on the document.
    pub item_number: String,
    /// Product/service description.
    pub description: String,
    /// Quantity, in the document's own numeric format.
    pub quantity: String,
    /// Commercial unit (UN, KG, ...).
    pub unit: String,
    /// Line value, in the document's own numeric format.
    pub value: String,
}

/// A full NF-e record extracted from DANFE text.
///
/// Every scalar field defaults to [`NOT_FOUND`]; independent extraction
/// rules overwrite only the fields they anchor. Items preserve source
/// document order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceRecord {
    /// 44-digit access key, punctuation stripped.
    pub access_key: String,

    /// Fiscal model code.
    pub model: String,
    /// Series.
    pub series: String,
    /// Document number.
    pub number: String,

    /// Issue date (dd/mm/yyyy).
    pub issue_date: String,
    /// Issue time (hh:mm:ss).
    pub issue_time: String,
    /// Exit/entry date.
    pub exit_date: String,
    /// Exit/entry time.
    pub exit_time: String,

    /// Declared total value of the document.
    pub total_value: String,

    /// Issuer legal name.
    pub issuer_name: String,
    /// Issuer CNPJ.
    pub issuer_cnpj: String,
    /// Issuer state registration (IE).
    pub issuer_ie: String,
    /// Issuer state (UF).
    pub issuer_uf: String,

    /// Recipient name.
    pub recipient_name: String,
    /// Recipient CPF.
    pub recipient_cpf: String,
    /// Recipient state (UF).
    pub recipient_uf: String,

    /// Nature of the operation (e.g. "Venda").
    pub operation_nature: String,
    /// Operation type (e.g. "1 - Saída").
    pub operation_type: String,

    /// Current document status at the tax authority.
    pub status: String,

    /// Authorization protocol number.
    pub authorization_protocol: String,
    /// Authorization timestamp.
    pub authorization_date: String,
    /// Inclusion timestamp.
    pub inclusion_date: String,

    /// Payment method description.
    pub payment_description: String,

    /// Line items, in source order.
    pub items: Vec<DanfeItem>,
}

impl Default for InvoiceRecord {
    fn default() -> Self {
        Self {
            access_key: not_found(),
            model: not_found(),
            series: not_found(),
            number: not_found(),
            issue_date: not_found(),
            issue_time: not_found(),
            exit_date: not_found(),
            exit_time: not_found(),
            total_value: not_found(),
            issuer_name: not_found(),
            issuer_cnpj: not_found(),
            issuer_ie: not_found(),
            issuer_uf: not_found(),
            recipient_name: not_found(),
            recipient_cpf: not_found(),
            recipient_uf: not_found(),
            operation_nature: not_found(),
            operation_type: not_found(),
            status: not_found(),
            authorization_protocol: not_found(),
            authorization_date: not_found(),
            inclusion_date: not_found(),
            payment_description: not_found(),
            items: Vec::new(),
        }
    }
}

impl InvoiceRecord {
    /// Declared total as a decimal, if the field was found and parses.
    pub fn declared_total(&self) -> Option<Decimal> {
        parse_brazilian_amount(&self.total_value)
    }

    /// Issue timestamp, if both date and time fields were found.
    pub fn issue_datetime(&self) -> Option<NaiveDateTime> {
        let combined = format!("{} {}", self.issue_date, self.issue_time);
        NaiveDateTime::parse_from_str(&combined, "%d/%m/%Y %H:%M:%S")
            .or_else(|_| NaiveDateTime::parse_from_str(&combined, "%d/%m/%Y %H:%M"))
            .ok()
    }
}

/// A product line from an OCR'd thermal receipt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReceiptItem {
    /// Product code as printed.
    pub code: String,
    /// Product name.
    pub name: String,
    /// Quantity (after OCR artifact correction).
    pub quantity: String,
    /// Unit price.
    pub unit_value: String,
    /// Line total.
    pub line_total: String,
}

/// A reduced record extracted from OCR'd thermal receipt text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReceiptRecord {
    /// Merchant legal name.
    pub merchant_name: String,
    /// Merchant CNPJ.
    pub cnpj: String,
    /// Receipt total ("Total Cupom").
    pub total_value: String,
    /// Payment method from the fixed vocabulary.
    pub payment_method: String,
    /// Issue timestamp as printed.
    pub issued_at: String,
    /// 44-digit access key, if printed and legible.
    pub access_key: String,
    /// Product lines, in source order.
    pub items: Vec<ReceiptItem>,
}

impl Default for ReceiptRecord {
    fn default() -> Self {
        Self {
            merchant_name: not_found(),
            cnpj: not_found(),
            total_value: not_found(),
            payment_method: not_found(),
            issued_at: not_found(),
            access_key: not_found(),
            items: Vec::new(),
        }
    }
}

impl ReceiptRecord {
    /// Receipt total as a decimal, if the field was found and parses.
    pub fn declared_total(&self) -> Option<Decimal> {
        parse_brazilian_amount(&self.total_value)
    }
}

/// Parse a Brazilian-formatted amount ("1.234,56" or "1234,56") into a decimal.
///
/// Returns `None` for the sentinel or anything that does not read as a
/// number after separator normalization.
pub fn parse_brazilian_amount(value: &str) -> Option<Decimal> {
    let cleaned = value.replace("R$", "");
    let cleaned = cleaned.trim();
    if cleaned.is_empty() || cleaned == NOT_FOUND {
        return None;
    }

    // Thousands dots out, decimal comma to a dot.
    let normalized = cleaned.replace('.', "").replace(',', ".");
    Decimal::from_str(&normalized).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn default_record_is_fully_sentinel() {
        let record = InvoiceRecord::default();
        assert_eq!(record.access_key, NOT_FOUND);
        assert_eq!(record.payment_description, NOT_FOUND);
        assert!(record.items.is_empty());
    }

    #[test]
    fn parses_brazilian_amounts() {
        assert_eq!(parse_brazilian_amount("1.234,56"), Some(dec("1234.56")));
        assert_eq!(parse_brazilian_amount("R$ 19,90"), Some(dec("19.90")));
        assert_eq!(parse_brazilian_amount("0,45"), Some(dec("0.45")));
        assert_eq!(parse_brazilian_amount(NOT_FOUND), None);
        assert_eq!(parse_brazilian_amount(""), None);
    }

    #[test]
    fn issue_datetime_combines_date_and_time() {
        let record = InvoiceRecord {
            issue_date: "15/03/2024".to_string(),
            issue_time: "14:32:05".to_string(),
            ..Default::default()
        };
        let dt = record.issue_datetime().unwrap();
        assert_eq!(dt.format("%d/%m/%Y %H:%M:%S").to_string(), "15/03/2024 14:32:05");

        let missing = InvoiceRecord::default();
        assert!(missing.issue_datetime().is_none());
    }
}
