use image::RgbImage;

use crate::mask::{CircularMask, Disk};

/// Blend `blurred` over `working` through a single-channel mask.
///
/// Each channel becomes `blurred * m + working * (1 - m)` with `m = mask / 255`,
/// truncated to `u8`. All three channels share the same mask value.
pub fn blend_masked(working: &RgbImage, blurred: &RgbImage, mask: &CircularMask) -> RgbImage {
    debug_assert_eq!(working.dimensions(), blurred.dimensions());
    debug_assert_eq!(working.dimensions(), (mask.width(), mask.height()));

    let mut output = working.clone();
    let weights = mask.as_image().as_raw();
    let blurred_raw = blurred.as_raw();
    let dst: &mut [u8] = &mut output;

    for (i, &m) in weights.iter().enumerate() {
        if m == 0 {
            continue;
        }
        let alpha = m as f32 / 255.0;
        let inv_alpha = 1.0 - alpha;
        for c in i * 3..i * 3 + 3 {
            dst[c] = (blurred_raw[c] as f32 * alpha + dst[c] as f32 * inv_alpha) as u8;
        }
    }

    output
}

/// Apply every disk in turn, each blend reading the previous blend's output.
///
/// A pixel covered by two disks is blended twice. With binary masks the
/// second blend lands on the same blurred value, so overlaps stay blurred.
/// Zero disks return `original` untouched.
pub fn apply_disks(original: RgbImage, blurred: &RgbImage, disks: &[Disk]) -> RgbImage {
    let (width, height) = original.dimensions();
    disks.iter().fold(original, |working, disk| {
        let mask = CircularMask::render(width, height, disk);
        blend_masked(&working, blurred, &mask)
    })
}
