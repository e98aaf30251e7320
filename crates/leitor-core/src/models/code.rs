//! Decoded machine-readable code model.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Logical kind of a decoded payload, derived from its shape.
///
/// The decoder backends never assert the kind; it is inferred by the
/// classifier from the payload content alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CodeKind {
    /// URL payload, as emitted by NFC-e QR codes.
    #[serde(rename = "QRCODE")]
    Qrcode,
    /// Bare 44-digit access key, as encoded by linear barcodes.
    #[serde(rename = "CODE128")]
    Code128,
    /// Anything else.
    #[serde(rename = "Desconhecido")]
    Unknown,
}

impl fmt::Display for CodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            CodeKind::Qrcode => "QRCODE",
            CodeKind::Code128 => "CODE128",
            CodeKind::Unknown => "Desconhecido",
        };
        f.write_str(s)
    }
}

/// A classified decode result.
///
/// `chave`, when present, is always exactly 44 ASCII digits extracted
/// from the raw payload. `consulta_url` is derived from `chave` by
/// substitution into the tax-authority lookup template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecodedCode {
    /// Payload kind.
    pub tipo: CodeKind,

    /// Raw decoded payload as text.
    pub raw_payload: String,

    /// 44-digit document access key, if one was found in the payload.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chave: Option<String>,

    /// Public verification URL for the access key.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub consulta_url: Option<String>,
}
