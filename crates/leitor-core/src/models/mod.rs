//! Data models for decoded codes and parsed fiscal records.

pub mod code;
pub mod record;

pub use code::{CodeKind, DecodedCode};
pub use record::{
    DanfeItem, InvoiceRecord, ReceiptItem, ReceiptRecord, parse_brazilian_amount, NOT_FOUND,
};
