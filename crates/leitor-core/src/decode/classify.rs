//! Payload classification and access-key extraction.

use lazy_static::lazy_static;
use regex::Regex;
use tracing::debug;

use crate::models::{CodeKind, DecodedCode};

lazy_static! {
    /// 44 consecutive digits anywhere in a payload.
    static ref ACCESS_KEY: Regex = Regex::new(r"\d{44}").unwrap();

    /// Exactly 44 digits and nothing else.
    static ref BARE_KEY: Regex = Regex::new(r"^\d{44}$").unwrap();
}

/// Public lookup endpoint for a decoded access key.
const VERIFICATION_ENDPOINT: &str =
    "https://ww1.receita.fazenda.df.gov.br/DecVisualizador/Nfce/Captcha";

/// Build the verification URL for a 44-digit access key.
pub fn verification_url(access_key: &str) -> String {
    format!("{VERIFICATION_ENDPOINT}?Chave={access_key}")
}

/// Classify a raw decoded payload and extract its access key.
///
/// The kind is derived purely from payload shape: a URL substring marks
/// a QR payload, a bare 44-digit string marks a linear barcode. The
/// access-key search is independent of the kind, since QR payloads
/// carry the key inside a query string. A payload without a key still
/// classifies; callers treat the absent key as "could not identify a
/// document".
pub fn classify_payload(raw_payload: &str) -> DecodedCode {
    let trimmed = raw_payload.trim();

    let tipo = if trimmed.to_lowercase().contains("http") {
        CodeKind::Qrcode
    } else if BARE_KEY.is_match(trimmed) {
        CodeKind::Code128
    } else {
        CodeKind::Unknown
    };

    let chave = ACCESS_KEY
        .find(raw_payload)
        .map(|m| m.as_str().to_string());
    let consulta_url = chave.as_deref().map(verification_url);

    if chave.is_none() {
        debug!(%tipo, "payload carries no 44-digit access key");
    }

    DecodedCode {
        tipo,
        raw_payload: raw_payload.to_string(),
        chave,
        consulta_url,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const KEY: &str = "12345678901234567890123456789012345678901234";

    #[test]
    fn classifies_url_payload_as_qrcode() {
        let payload = format!(
            "https://ww1.receita.fazenda.df.gov.br/nfce/qrcode?Chave={KEY}|2|1|1|abc"
        );
        let code = classify_payload(&payload);

        assert_eq!(code.tipo, CodeKind::Qrcode);
        assert_eq!(code.chave.as_deref(), Some(KEY));
        assert_eq!(
            code.consulta_url.as_deref(),
            Some(verification_url(KEY).as_str())
        );
    }

    #[test]
    fn classifies_bare_44_digits_as_code128() {
        let code = classify_payload(&format!("  {KEY}\n"));
        assert_eq!(code.tipo, CodeKind::Code128);
        assert_eq!(code.chave.as_deref(), Some(KEY));
    }

    #[test]
    fn classifies_everything_else_as_unknown() {
        let code = classify_payload("hello world");
        assert_eq!(code.tipo, CodeKind::Unknown);
        assert_eq!(code.chave, None);
        assert_eq!(code.consulta_url, None);
    }

    #[test]
    fn url_without_key_still_classifies() {
        let code = classify_payload("https://example.com/nota?x=1");
        assert_eq!(code.tipo, CodeKind::Qrcode);
        assert_eq!(code.chave, None);
    }

    #[test]
    fn key_extraction_takes_first_44_digit_run() {
        let other = "99999999999999999999999999999999999999999999";
        let code = classify_payload(&format!("{KEY} {other}"));
        assert_eq!(code.chave.as_deref(), Some(KEY));
    }

    #[test]
    fn serializes_with_wire_field_names() {
        let code = classify_payload(KEY);
        let json = serde_json::to_value(&code).unwrap();
        assert_eq!(json["tipo"], "CODE128");
        assert_eq!(json["chave"], KEY);
        assert!(json["consulta_url"].as_str().unwrap().ends_with(KEY));
    }
}
