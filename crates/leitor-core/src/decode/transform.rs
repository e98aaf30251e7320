//! Deterministic enumeration of image transform variants.
//!
//! The decode search walks a fixed Cartesian product of rotation,
//! binarization threshold, and morphological cleanup. The enumeration
//! order decides which variant wins when several would decode, so it is
//! part of the public contract and asserted by tests.

use image::{GrayImage, imageops};
use imageproc::contrast::{ThresholdType, otsu_level, threshold};
use imageproc::distance_transform::Norm;
use imageproc::morphology;
use std::fmt;

/// Binarization threshold applied after rotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Threshold {
    /// Automatic global threshold via Otsu's method.
    Otsu,
    /// Fixed intensity cutoff.
    Fixed(u8),
}

impl fmt::Display for Threshold {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Threshold::Otsu => f.write_str("otsu"),
            Threshold::Fixed(v) => write!(f, "{v}"),
        }
    }
}

/// Morphological cleanup applied to the binarized image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Morphology {
    None,
    Erode,
    Dilate,
    Open,
    Close,
}

impl fmt::Display for Morphology {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Morphology::None => "none",
            Morphology::Erode => "erode",
            Morphology::Dilate => "dilate",
            Morphology::Open => "open",
            Morphology::Close => "close",
        };
        f.write_str(s)
    }
}

/// Rotation angles, outer loop, ascending.
pub const ANGLES: [u16; 4] = [0, 90, 180, 270];

/// Thresholds, middle loop: Otsu first, then ascending fixed cutoffs.
pub const THRESHOLDS: [Threshold; 5] = [
    Threshold::Otsu,
    Threshold::Fixed(50),
    Threshold::Fixed(100),
    Threshold::Fixed(150),
    Threshold::Fixed(200),
];

/// Morphological operations, inner loop.
pub const MORPHOLOGIES: [Morphology; 5] = [
    Morphology::None,
    Morphology::Erode,
    Morphology::Dilate,
    Morphology::Open,
    Morphology::Close,
];

/// One transform descriptor out of the 100-variant search space.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transform {
    /// Rotation angle in degrees, counter-clockwise multiples of 90.
    pub angle: u16,
    /// Binarization threshold.
    pub threshold: Threshold,
    /// Morphological cleanup.
    pub morphology: Morphology,
}

impl fmt::Display for Transform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "angle={} thresh={} morph={}",
            self.angle, self.threshold, self.morphology
        )
    }
}

impl Transform {
    /// The statically ordered list of all 4 x 5 x 5 = 100 variants.
    ///
    /// Angle is the outermost loop, morphology the innermost. The first
    /// element is always the identity-ish variant
    /// (`angle=0 thresh=otsu morph=none`).
    pub fn enumerate() -> Vec<Transform> {
        let mut variants = Vec::with_capacity(ANGLES.len() * THRESHOLDS.len() * MORPHOLOGIES.len());
        for &angle in &ANGLES {
            for &threshold in &THRESHOLDS {
                for &morphology in &MORPHOLOGIES {
                    variants.push(Transform {
                        angle,
                        threshold,
                        morphology,
                    });
                }
            }
        }
        variants
    }

    /// Materialize this variant from the source grayscale image.
    ///
    /// Rotation is exact for the right-angle multiples used here, so no
    /// resampling artifacts are introduced before binarization.
    pub fn apply(&self, gray: &GrayImage) -> GrayImage {
        let rotated = match self.angle {
            90 => imageops::rotate90(gray),
            180 => imageops::rotate180(gray),
            270 => imageops::rotate270(gray),
            _ => gray.clone(),
        };

        let level = match self.threshold {
            Threshold::Otsu => otsu_level(&rotated),
            Threshold::Fixed(v) => v,
        };
        let binarized = threshold(&rotated, level, ThresholdType::Binary);

        // Small fixed structuring element, matching a 2x2-ish kernel.
        match self.morphology {
            Morphology::None => binarized,
            Morphology::Erode => morphology::erode(&binarized, Norm::LInf, 1),
            Morphology::Dilate => morphology::dilate(&binarized, Norm::LInf, 1),
            Morphology::Open => morphology::open(&binarized, Norm::LInf, 1),
            Morphology::Close => morphology::close(&binarized, Norm::LInf, 1),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn enumerates_exactly_one_hundred_variants() {
        assert_eq!(Transform::enumerate().len(), 100);
    }

    #[test]
    fn first_variant_is_untransformed() {
        let variants = Transform::enumerate();
        assert_eq!(
            variants[0],
            Transform {
                angle: 0,
                threshold: Threshold::Otsu,
                morphology: Morphology::None,
            }
        );
    }

    #[test]
    fn enumeration_order_is_morphology_innermost() {
        let variants = Transform::enumerate();

        // The first five share angle and threshold, walking morphology.
        let expected_morphs = [
            Morphology::None,
            Morphology::Erode,
            Morphology::Dilate,
            Morphology::Open,
            Morphology::Close,
        ];
        for (variant, &morph) in variants.iter().take(5).zip(&expected_morphs) {
            assert_eq!(variant.angle, 0);
            assert_eq!(variant.threshold, Threshold::Otsu);
            assert_eq!(variant.morphology, morph);
        }

        // The sixth moves to the next threshold, same angle.
        assert_eq!(
            variants[5],
            Transform {
                angle: 0,
                threshold: Threshold::Fixed(50),
                morphology: Morphology::None,
            }
        );

        // Index 25 is the first rotated variant.
        assert_eq!(
            variants[25],
            Transform {
                angle: 90,
                threshold: Threshold::Otsu,
                morphology: Morphology::None,
            }
        );

        // The last variant is the most destructive one.
        assert_eq!(
            variants[99],
            Transform {
                angle: 270,
                threshold: Threshold::Fixed(200),
                morphology: Morphology::Close,
            }
        );
    }

    #[test]
    fn apply_rotates_dimensions() {
        let gray = GrayImage::from_pixel(4, 8, image::Luma([128]));
        let transform = Transform {
            angle: 90,
            threshold: Threshold::Fixed(100),
            morphology: Morphology::None,
        };
        let out = transform.apply(&gray);
        assert_eq!(out.dimensions(), (8, 4));
    }

    #[test]
    fn apply_binarizes_to_black_and_white() {
        let mut gray = GrayImage::from_pixel(4, 4, image::Luma([30]));
        gray.put_pixel(0, 0, image::Luma([220]));
        let transform = Transform {
            angle: 0,
            threshold: Threshold::Fixed(100),
            morphology: Morphology::None,
        };
        let out = transform.apply(&gray);
        assert_eq!(out.get_pixel(0, 0).0[0], 255);
        assert_eq!(out.get_pixel(1, 1).0[0], 0);
    }
}
