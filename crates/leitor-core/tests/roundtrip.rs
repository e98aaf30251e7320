//! End-to-end decode tests with synthesized QR images.

use image::{GrayImage, Luma};
use rxing::{BarcodeFormat, MultiFormatWriter, Writer};

use leitor_core::decode::{self, Morphology, Threshold};
use leitor_core::models::CodeKind;

const KEY: &str = "53240114200580000165650010000012341234567890";

/// Render a QR code for the payload as a clean black-on-white bitmap.
fn qr_image(contents: &str) -> GrayImage {
    let matrix = MultiFormatWriter::default()
        .encode(contents, &BarcodeFormat::QR_CODE, 240, 240)
        .expect("QR encoding failed");

    let mut img = GrayImage::from_pixel(matrix.getWidth(), matrix.getHeight(), Luma([255]));
    for y in 0..matrix.getHeight() {
        for x in 0..matrix.getWidth() {
            if matrix.get(x, y) {
                img.put_pixel(x, y, Luma([0]));
            }
        }
    }
    img
}

fn png_bytes(img: &GrayImage) -> Vec<u8> {
    let mut bytes = Vec::new();
    img.write_to(&mut std::io::Cursor::new(&mut bytes), image::ImageFormat::Png)
        .unwrap();
    bytes
}

#[test]
fn qr_url_payload_decodes_on_first_variant() {
    let payload = format!("https://ww1.receita.fazenda.df.gov.br/nfce/qrcode?Chave={KEY}|2|1");
    let img = qr_image(&payload);

    let outcome = decode::search(&img, &decode::default_chain());
    let hit = outcome.hit.expect("clean QR must decode");

    // First-match priority: the untransformed variant with the first
    // backend wins on a clean image.
    assert_eq!(hit.transform.angle, 0);
    assert_eq!(hit.transform.threshold, Threshold::Otsu);
    assert_eq!(hit.transform.morphology, Morphology::None);
    assert_eq!(hit.backend, "rxing");
    assert_eq!(outcome.attempts, 1);

    let code = decode::classify_payload(&hit.payload);
    assert_eq!(code.tipo, CodeKind::Qrcode);
    assert_eq!(code.chave.as_deref(), Some(KEY));
    assert_eq!(
        code.consulta_url.as_deref(),
        Some(decode::verification_url(KEY).as_str())
    );
}

#[test]
fn rotated_qr_still_yields_the_same_key() {
    let payload = format!("https://ww1.receita.fazenda.df.gov.br/nfce/qrcode?Chave={KEY}");
    let rotated = image::imageops::rotate90(&qr_image(&payload));

    let code = decode::decode_image_bytes(&png_bytes(&rotated))
        .unwrap()
        .expect("rotated QR must decode through some variant");

    // The decoded payload is invariant to which variant/backend found it.
    assert_eq!(code.chave.as_deref(), Some(KEY));
}

#[test]
fn blank_image_reports_absence_after_full_search() {
    let blank = GrayImage::from_pixel(64, 64, Luma([255]));
    let outcome = decode::search(&blank, &decode::default_chain());

    assert!(outcome.hit.is_none());
    assert_eq!(outcome.attempts, 300);
}
