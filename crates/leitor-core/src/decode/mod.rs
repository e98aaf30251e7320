//! Machine-readable code extraction from receipt photographs.
//!
//! The search walks the 100 deterministic image variants from
//! [`transform`], trying each backend from [`backend`] in priority
//! order, and stops at the first non-empty payload. First match wins;
//! the enumeration order, not payload quality, decides ties.

pub mod backend;
pub mod classify;
pub mod transform;

pub use backend::{CodeDecoder, default_chain};
pub use classify::{classify_payload, verification_url};
pub use transform::{Morphology, Threshold, Transform};

use image::GrayImage;
use tracing::{debug, info};

use crate::error::{DecodeError, Result};
use crate::models::DecodedCode;

/// A successful decode, with the variant and backend that produced it.
#[derive(Debug, Clone)]
pub struct DecodeHit {
    /// Raw decoded payload.
    pub payload: String,
    /// The transform variant that was decodable.
    pub transform: Transform,
    /// Name of the backend that produced the payload.
    pub backend: &'static str,
}

/// Outcome of the exhaustive variant search.
#[derive(Debug)]
pub struct SearchOutcome {
    /// The first hit, if any variant decoded.
    pub hit: Option<DecodeHit>,
    /// Number of backend invocations performed (bounded by 300).
    pub attempts: usize,
}

/// Run the full first-match search over all variants and backends.
pub fn search(gray: &GrayImage, chain: &[Box<dyn CodeDecoder>]) -> SearchOutcome {
    let mut attempts = 0;

    for variant in Transform::enumerate() {
        let binarized = variant.apply(gray);

        for decoder in chain {
            attempts += 1;
            if let Some(payload) = decoder.decode(&binarized) {
                info!(backend = decoder.name(), %variant, attempts, "decoded payload");
                return SearchOutcome {
                    hit: Some(DecodeHit {
                        payload,
                        transform: variant,
                        backend: decoder.name(),
                    }),
                    attempts,
                };
            }
        }
    }

    debug!(attempts, "no variant decoded");
    SearchOutcome { hit: None, attempts }
}

/// Decode a photographed/scanned document from raw image bytes.
///
/// Corrupt bytes are a hard error. An undecodable image is not: the
/// search exhausting all attempts yields `Ok(None)` and the caller owns
/// the user-facing retry messaging.
pub fn decode_image_bytes(bytes: &[u8]) -> Result<Option<DecodedCode>> {
    let img = image::load_from_memory(bytes)
        .map_err(|err| DecodeError::InvalidImage(err.to_string()))?;
    let gray = img.to_luma8();

    let chain = default_chain();
    let outcome = search(&gray, &chain);

    Ok(outcome.hit.map(|hit| classify_payload(&hit.payload)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    /// A backend that counts how often it is invoked and never decodes.
    struct CountingMiss;

    impl CodeDecoder for CountingMiss {
        fn name(&self) -> &'static str {
            "miss"
        }

        fn decode(&self, _binarized: &GrayImage) -> Option<String> {
            None
        }
    }

    /// A backend that decodes only a specific image width, to pin down
    /// which rotation variant won.
    struct WidthSensitive {
        width: u32,
        payload: &'static str,
    }

    impl CodeDecoder for WidthSensitive {
        fn name(&self) -> &'static str {
            "width-sensitive"
        }

        fn decode(&self, binarized: &GrayImage) -> Option<String> {
            (binarized.width() == self.width).then(|| self.payload.to_string())
        }
    }

    #[test]
    fn undecodable_image_exhausts_exactly_the_bound() {
        let gray = GrayImage::from_pixel(32, 32, image::Luma([255]));
        let chain: Vec<Box<dyn CodeDecoder>> =
            vec![Box::new(CountingMiss), Box::new(CountingMiss), Box::new(CountingMiss)];

        let outcome = search(&gray, &chain);
        assert!(outcome.hit.is_none());
        assert_eq!(outcome.attempts, 300);
    }

    #[test]
    fn first_variant_wins_when_decodable() {
        // Decodes at the source orientation, so the very first attempt
        // of the very first variant must win.
        let gray = GrayImage::from_pixel(20, 10, image::Luma([255]));
        let chain: Vec<Box<dyn CodeDecoder>> = vec![Box::new(WidthSensitive {
            width: 20,
            payload: "payload",
        })];

        let outcome = search(&gray, &chain);
        let hit = outcome.hit.unwrap();
        assert_eq!(outcome.attempts, 1);
        assert_eq!(hit.transform.angle, 0);
        assert_eq!(hit.transform.threshold, Threshold::Otsu);
        assert_eq!(hit.transform.morphology, Morphology::None);
        assert_eq!(hit.payload, "payload");
    }

    #[test]
    fn rotated_variant_still_returns_payload() {
        // Only decodable after a 90/270 rotation (width becomes 10).
        let gray = GrayImage::from_pixel(20, 10, image::Luma([255]));
        let chain: Vec<Box<dyn CodeDecoder>> = vec![Box::new(WidthSensitive {
            width: 10,
            payload: "rotated",
        })];

        let outcome = search(&gray, &chain);
        let hit = outcome.hit.unwrap();
        assert_eq!(hit.transform.angle, 90);
        assert_eq!(hit.payload, "rotated");
        // 25 misses for angle 0, then the first angle-90 attempt.
        assert_eq!(outcome.attempts, 26);
    }

    #[test]
    fn corrupt_bytes_are_a_hard_error() {
        let err = decode_image_bytes(b"definitely not an image").unwrap_err();
        assert!(matches!(
            err,
            crate::error::LeitorError::Decode(DecodeError::InvalidImage(_))
        ));
    }
}
