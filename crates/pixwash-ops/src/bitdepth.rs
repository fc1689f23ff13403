//! Per-channel bit-depth quantization.
//!
//! Posterizing to `2^bits` levels destroys anything encoded below the level
//! spacing - least-significant-bit steganography in particular - while the
//! visible structure survives. Samples are clamped to [0, 1] and snapped to
//! the nearest of the evenly spaced levels `i / (levels - 1)`.

use pixwash_core::FloatImage;

/// Level count used when the caller passes the `bits == 0` default sentinel.
const DEFAULT_BITS: u32 = 6;

/// Clamps a requested bit depth into the supported range.
///
/// `0` is the "default" sentinel and aliases 6 bits (64 levels); everything
/// else clamps into [1, 8].
#[inline]
fn effective_bits(bits: u32) -> u32 {
    if bits == 0 {
        DEFAULT_BITS
    } else {
        bits.clamp(1, 8)
    }
}

/// Quantizes every sample in place to `2^bits` levels.
///
/// The distinct values in the output never exceed the level count, and all
/// outputs lie in [0, 1]. An empty image is a no-op.
///
/// # Example
///
/// ```rust
/// use pixwash_core::FloatImage;
/// use pixwash_ops::bitdepth::quantize;
///
/// let mut img = FloatImage::from_data(2, 1, 1, vec![0.26, 0.74]).unwrap();
/// quantize(&mut img, 1); // two levels: 0.0 and 1.0
/// assert_eq!(img.data(), &[0.0, 1.0]);
/// ```
pub fn quantize(image: &mut FloatImage, bits: u32) {
    let bits = effective_bits(bits);
    let levels = 1u32 << bits;
    let max_level = (levels - 1) as f32;
    let inv_max_level = 1.0 / max_level;

    for value in image.data_mut().iter_mut() {
        let clamped = value.clamp(0.0, 1.0);
        *value = (clamped * max_level).round() * inv_max_level;
    }
}
