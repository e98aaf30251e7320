//! Anchored regex patterns for Brazilian fiscal document extraction.
//!
//! The DANFE patterns target the text layout produced by the NF-e
//! portal PDF; the cupom patterns target OCR output of thermal
//! receipts, which is structurally looser.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // Text normalization
    pub static ref HORIZONTAL_WS: Regex = Regex::new(r"[ \t]+").unwrap();
    pub static ref BLANK_LINES: Regex = Regex::new(r"\n+").unwrap();

    // DANFE header anchors. Each captures the data line that follows a
    // known column-heading line.
    pub static ref ACCESS_KEY_LINE: Regex = Regex::new(
        r"(?i)Chave de Acesso\s+Número\s+NF-e\s+Versão\s*\n([^\n]+)"
    ).unwrap();

    pub static ref MODEL_LINE: Regex = Regex::new(
        r"(?i)Modelo Série Número Data de Emissão[^\n]*\n([^\n]+)"
    ).unwrap();

    pub static ref ISSUER_BLOCK: Regex = Regex::new(
        r"(?i)Emitente\s*\nCNPJ[^\n]*\n([^\n]+)"
    ).unwrap();

    pub static ref RECIPIENT_BLOCK: Regex = Regex::new(
        r"(?i)Destinatário\s*\nCPF[^\n]*\n([^\n]+)"
    ).unwrap();

    pub static ref OPERATION_LINE: Regex = Regex::new(
        r"(?i)Natureza da Operação[^\n]*\n([^\n]+)"
    ).unwrap();

    /// Splits the operation line into nature and "N - direction" type.
    pub static ref OPERATION_SPLIT: Regex = Regex::new(
        r"^(.*?)\s+(\d\s*-\s*\S+)\s+(.*)$"
    ).unwrap();

    pub static ref STATUS_LINE: Regex = Regex::new(
        r"(?i)Situação Atual:\s*(.+)"
    ).unwrap();

    pub static ref AUTHORIZATION_LINE: Regex = Regex::new(
        r"Autorização de Uso\s+(\d+)\s+([\d/]+ às [\d:.\-]+)\s+([\d/]+ às [\d:.\-]+)"
    ).unwrap();

    pub static ref PAYMENT_SECTION: Regex = Regex::new(
        r"(?is)Formas de Pagamento\s*(.*?)(?:\n[ A-Z][a-zA-Z]|\z)"
    ).unwrap();

    pub static ref PAYMENT_DESCRIPTION: Regex = Regex::new(
        r"(?i)Descriç[aã]o\s+do\s+Meio\s+de\s+Pagamento\s+(.+)"
    ).unwrap();

    /// Span between the products heading and the next known section.
    pub static ref PRODUCTS_SECTION: Regex = Regex::new(
        r"(?is)Dados dos Produtos e Serviços\s*(.*?)(?:\n\s*(?:Totais|Dados do Transporte)|\z)"
    ).unwrap();

    /// One product line: item number, description, quantity, unit, value.
    pub static ref PRODUCT_LINE: Regex = Regex::new(
        r"^(\d+)\s+(.+)\s+(\d[\d.,]*)\s+([A-Za-z]+)\s+(\d[\d.,]*)\s*$"
    ).unwrap();

    /// Punctuation stripped out of the formatted access key.
    pub static ref KEY_PUNCTUATION: Regex = Regex::new(r"[.\-/]").unwrap();

    // Cupom (thermal receipt OCR) anchors.
    pub static ref MERCHANT_NAME: Regex = Regex::new(
        r"(?m)^([A-ZÇÃ\s&]+(?:EIRELI|LTDA|ME|EPP|S\.A\.?))"
    ).unwrap();

    pub static ref CNPJ: Regex = Regex::new(
        r"CNPJ:\s?([\d./\-]+)"
    ).unwrap();

    pub static ref RECEIPT_TOTAL: Regex = Regex::new(
        r"Total Cupom\s+R\$ ([\d,]+)"
    ).unwrap();

    pub static ref PAYMENT_VOCABULARY: Regex = Regex::new(
        r"(?i)(Cart[aã]o\s+de\s+(?:Cr[eé]dito|D[eé]bito)|PIX|Dinheiro|Transfer[eê]ncia|Vale\s+(?:Alimenta[cç][aã]o|Refei[cç][aã]o))"
    ).unwrap();

    pub static ref ISSUED_AT: Regex = Regex::new(
        r"Emissão:\s*(\d{2}/\d{2}/\d{4} \d{2}:\d{2})"
    ).unwrap();

    pub static ref ACCESS_KEY_RUN: Regex = Regex::new(r"\d{44}").unwrap();

    /// Product block: "code -- name" line, then (possibly after blank
    /// lines) a "quantity x unit-price total" line.
    pub static ref RECEIPT_ITEM: Regex = Regex::new(
        r"(?i)(\d+)\s*[-—]+\s*(.+?)\s*\n+\s*([\d.,]+)\s*x\s*([\d.,]+)\s+([\d.,]+)"
    ).unwrap();
}
