//! Record formatting: plain-text summaries and the rendered table image.
//!
//! The text summary is the canonical output; the table image is a
//! nicety. Callers fall back to the text form whenever rendering fails,
//! so nothing in here is allowed to take the pipeline down.

mod table;

pub use table::{TableRenderer, TableSpec, CLEANUP_DELAY};

use crate::models::{InvoiceRecord, ReceiptRecord};

/// Human-readable, emoji-annotated summary of a DANFE record.
pub fn format_danfe_summary(record: &InvoiceRecord) -> String {
    let mut out = String::new();

    out.push_str(&format!("🔑 Chave de Acesso: {}\n", record.access_key));
    out.push_str(&format!(
        "🧾 Modelo: {} | Série: {} | Número: {}\n",
        record.model, record.series, record.number
    ));
    out.push_str(&format!(
        "🕒 Emissão: {} {} | Saída: {} {}\n",
        record.issue_date, record.issue_time, record.exit_date, record.exit_time
    ));

    for item in &record.items {
        out.push_str(&format!(
            "🛒 Item {} | {} | Qtd: {} | Unidade: {} | Valor: R$ {}\n",
            item.item_number, item.description, item.quantity, item.unit, item.value
        ));
    }

    out.push_str(&format!("💰 Valor Total: R$ {}\n", record.total_value));
    out.push_str(&format!(
        "🏢 Emitente: {} | CNPJ: {} | IE: {} | UF: {}\n",
        record.issuer_name, record.issuer_cnpj, record.issuer_ie, record.issuer_uf
    ));
    out.push_str(&format!(
        "👤 Destinatário: {} | CPF: {} | UF: {}\n",
        record.recipient_name, record.recipient_cpf, record.recipient_uf
    ));
    out.push_str(&format!(
        "📦 Natureza: {} | Tipo: {}\n",
        record.operation_nature, record.operation_type
    ));
    out.push_str(&format!("💳 Pagamento: {}\n", record.payment_description));
    out.push_str(&format!("📌 Situação: {}\n", record.status));
    out.push_str(&format!("📨 Protocolo: {}\n", record.authorization_protocol));
    out.push_str(&format!(
        "📅 Autorizado em: {} | Inclusão: {}\n",
        record.authorization_date, record.inclusion_date
    ));

    out
}

/// Human-readable summary of an OCR'd receipt record.
pub fn format_receipt_summary(record: &ReceiptRecord) -> String {
    let mut out = String::new();

    out.push_str(&format!("🏪 Loja: {}\n", record.merchant_name));
    out.push_str(&format!("🧾 CNPJ: {}\n", record.cnpj));

    for item in &record.items {
        out.push_str(&format!(
            "🛒 Produto: {} | Qtd: {} | Unit: R$ {} | Total: R$ {}\n",
            item.name, item.quantity, item.unit_value, item.line_total
        ));
    }

    out.push_str(&format!("💰 Total: R$ {}\n", record.total_value));
    out.push_str(&format!("💳 Pagamento: {}\n", record.payment_method));
    out.push_str(&format!("🕒 Emissão: {}\n", record.issued_at));
    out.push_str(&format!("🔑 Chave: {}\n", record.access_key));

    out
}

/// One-line lowercase description fed to the downstream expense
/// categorizer.
pub fn classification_description(
    merchant: &str,
    product_names: &[String],
    total: &str,
    payment: &str,
) -> String {
    let products = if product_names.is_empty() {
        "produto não identificado".to_string()
    } else {
        product_names
            .iter()
            .map(|name| name.to_lowercase())
            .collect::<Vec<_>>()
            .join(" ")
    };
    let total = total.replace("R$", "").trim().to_string();

    format!(
        "compra na loja {} {} valor {} pago com {}",
        merchant.to_lowercase(),
        products,
        total,
        payment.to_lowercase()
    )
}

impl InvoiceRecord {
    /// Classification sentence for this record.
    pub fn classification_description(&self) -> String {
        let names: Vec<String> = self.items.iter().map(|i| i.description.clone()).collect();
        classification_description(
            &self.issuer_name,
            &names,
            &self.total_value,
            &self.payment_description,
        )
    }
}

impl ReceiptRecord {
    /// Classification sentence for this record.
    pub fn classification_description(&self) -> String {
        let names: Vec<String> = self.items.iter().map(|i| i.name.clone()).collect();
        classification_description(
            &self.merchant_name,
            &names,
            &self.total_value,
            &self.payment_method,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DanfeItem, NOT_FOUND};
    use pretty_assertions::assert_eq;

    fn sample_record() -> InvoiceRecord {
        InvoiceRecord {
            access_key: "12345678901234567890123456789012345678901234".to_string(),
            issuer_name: "SUPERMERCADO EXEMPLO LTDA".to_string(),
            total_value: "58,40".to_string(),
            payment_description: "Cartão de Crédito".to_string(),
            items: vec![DanfeItem {
                item_number: "1".to_string(),
                description: "ARROZ TIPO 1 5KG".to_string(),
                quantity: "2".to_string(),
                unit: "UN".to_string(),
                value: "45,90".to_string(),
            }],
            ..Default::default()
        }
    }

    #[test]
    fn danfe_summary_carries_all_groups() {
        let summary = format_danfe_summary(&sample_record());

        assert!(summary.contains("🔑 Chave de Acesso: 1234567890"));
        assert!(summary.contains("🛒 Item 1 | ARROZ TIPO 1 5KG | Qtd: 2"));
        assert!(summary.contains("💰 Valor Total: R$ 58,40"));
        assert!(summary.contains("💳 Pagamento: Cartão de Crédito"));
        // Missing sections show the sentinel instead of disappearing.
        assert!(summary.contains(&format!("📌 Situação: {NOT_FOUND}")));
    }

    #[test]
    fn receipt_summary_lists_products() {
        let record = ReceiptRecord {
            merchant_name: "PADARIA CENTRAL LTDA".to_string(),
            total_value: "7,50".to_string(),
            items: vec![crate::models::ReceiptItem {
                code: "001".to_string(),
                name: "PAO FRANCES".to_string(),
                quantity: "0,45".to_string(),
                unit_value: "16,60".to_string(),
                line_total: "7,50".to_string(),
            }],
            ..Default::default()
        };

        let summary = format_receipt_summary(&record);
        assert!(summary.contains("🏪 Loja: PADARIA CENTRAL LTDA"));
        assert!(summary.contains("🛒 Produto: PAO FRANCES | Qtd: 0,45"));
    }

    #[test]
    fn classification_description_is_lowercase_sentence() {
        let record = sample_record();
        assert_eq!(
            record.classification_description(),
            "compra na loja supermercado exemplo ltda arroz tipo 1 5kg valor 58,40 pago com cartão de crédito"
        );
    }

    #[test]
    fn classification_description_without_products() {
        let desc = classification_description("LOJA X", &[], "R$ 10,00", "PIX");
        assert_eq!(desc, "compra na loja loja x produto não identificado valor 10,00 pago com pix");
    }
}
