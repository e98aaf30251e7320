//! Decoding backends tried in fixed priority order for each variant.
//!
//! Every backend is total: internal failures (undecodable image, missing
//! external binary, I/O trouble) degrade to `None` so the outer search
//! can move on to the next attempt.

use image::GrayImage;
use std::io::Write;
use std::process::Command;
use tracing::{debug, trace};

/// A single decoding backend in the fallback chain.
pub trait CodeDecoder {
    /// Short backend name used in logs.
    fn name(&self) -> &'static str;

    /// Attempt to decode a payload from a binarized single-channel image.
    ///
    /// Returns `None` on any failure; backends never abort the search.
    fn decode(&self, binarized: &GrayImage) -> Option<String>;
}

/// General-purpose multi-format reader (QR, CODE128, PDF417, ...).
pub struct RxingDecoder;

impl CodeDecoder for RxingDecoder {
    fn name(&self) -> &'static str {
        "rxing"
    }

    fn decode(&self, binarized: &GrayImage) -> Option<String> {
        let (width, height) = binarized.dimensions();
        let luma = binarized.as_raw().clone();

        match rxing::helpers::detect_in_luma(luma, height, width, None) {
            Ok(result) => {
                let text = result.getText().to_string();
                if text.is_empty() {
                    None
                } else {
                    trace!(format = ?result.getBarcodeFormat(), "rxing decoded payload");
                    Some(text)
                }
            }
            Err(err) => {
                trace!("rxing found nothing: {err}");
                None
            }
        }
    }
}

/// Dedicated QR grid detector, catches codes the general reader misses
/// on noisy binarizations.
pub struct RqrrDecoder;

impl CodeDecoder for RqrrDecoder {
    fn name(&self) -> &'static str {
        "rqrr"
    }

    fn decode(&self, binarized: &GrayImage) -> Option<String> {
        let (width, height) = binarized.dimensions();
        let mut prepared = rqrr::PreparedImage::prepare_from_greyscale(
            width as usize,
            height as usize,
            |x, y| binarized.get_pixel(x as u32, y as u32).0[0],
        );

        for grid in prepared.detect_grids() {
            match grid.decode() {
                Ok((_meta, content)) if !content.is_empty() => return Some(content),
                Ok(_) => continue,
                Err(err) => {
                    trace!("rqrr grid did not decode: {err}");
                }
            }
        }

        None
    }
}

/// Last-resort backend shelling out to the `zbarimg` CLI through a
/// temporary PNG, for symbologies the in-process readers miss.
pub struct ZbarCliDecoder;

impl CodeDecoder for ZbarCliDecoder {
    fn name(&self) -> &'static str {
        "zbarimg"
    }

    fn decode(&self, binarized: &GrayImage) -> Option<String> {
        let mut file = tempfile::Builder::new()
            .prefix("leitor-variant-")
            .suffix(".png")
            .tempfile()
            .ok()?;

        let mut png = Vec::new();
        binarized
            .write_to(&mut std::io::Cursor::new(&mut png), image::ImageFormat::Png)
            .ok()?;
        file.write_all(&png).ok()?;
        file.flush().ok()?;

        let output = match Command::new("zbarimg")
            .arg("--quiet")
            .arg("--raw")
            .arg(file.path())
            .output()
        {
            Ok(output) => output,
            Err(err) => {
                // zbarimg not installed; treat as a silent miss.
                debug!("zbarimg unavailable: {err}");
                return None;
            }
        };

        if !output.status.success() {
            return None;
        }

        String::from_utf8_lossy(&output.stdout)
            .lines()
            .map(str::trim)
            .find(|line| !line.is_empty())
            .map(str::to_string)
    }
}

/// The fixed-priority decoder chain: general reader, then the QR
/// detector, then the external CLI.
///
/// The order is a compatibility contract, not a tuning decision; callers
/// that want a different chain can build their own list.
pub fn default_chain() -> Vec<Box<dyn CodeDecoder>> {
    vec![
        Box::new(RxingDecoder),
        Box::new(RqrrDecoder),
        Box::new(ZbarCliDecoder),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn chain_priority_is_fixed() {
        let chain = default_chain();
        let names: Vec<&str> = chain.iter().map(|b| b.name()).collect();
        assert_eq!(names, vec!["rxing", "rqrr", "zbarimg"]);
    }

    #[test]
    fn backends_return_none_on_blank_image() {
        let blank = GrayImage::from_pixel(64, 64, image::Luma([255]));
        assert_eq!(RxingDecoder.decode(&blank), None);
        assert_eq!(RqrrDecoder.decode(&blank), None);
        // zbarimg may or may not be installed; either way a blank image
        // must not decode.
        assert_eq!(ZbarCliDecoder.decode(&blank), None);
    }
}
