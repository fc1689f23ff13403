//! Conversions between the supported pixel formats.
//!
//! The conversion matrix is deliberately small; only the pairings the
//! sanitize pipeline needs are defined:
//!
//! | from      | to        | behavior                              |
//! |-----------|-----------|---------------------------------------|
//! | any       | same      | row-wise byte copy                    |
//! | `U8Rgb`   | `F32Rgb`  | scale by 1/255                        |
//! | `U8Rgba`  | `F32Rgb`  | drop alpha, scale by 1/255            |
//! | `F32Rgb`  | `U8Rgb`   | clamp, x255, round-to-nearest         |
//! | `F32Rgb`  | `U8Rgba`  | as above, alpha forced fully opaque   |
//!
//! Every other pairing returns [`Error::UnsupportedConversion`] without
//! touching the destination. All writes respect each buffer's own stride and
//! cover only the pixel-bearing prefix of each row, so destination stride
//! padding is byte-for-byte unchanged by a successful call.

use crate::buffer::{PixelBuffer, PixelBufferMut};
use crate::error::{Error, Result};
use crate::format::PixelFormat;

/// Reciprocal of the 8-bit full-scale value.
pub(crate) const INV_255: f32 = 1.0 / 255.0;

/// Maps a [0, 1] float sample to an 8-bit level with round-to-nearest.
#[inline]
pub(crate) fn float_to_u8(value: f32) -> u8 {
    let clamped = value.clamp(0.0, 1.0);
    (clamped * 255.0).round().clamp(0.0, 255.0) as u8
}

/// Reads the `i`-th f32 sample from a row of raw bytes.
#[inline]
pub(crate) fn f32_at(row: &[u8], i: usize) -> f32 {
    let base = i * 4;
    f32::from_ne_bytes([row[base], row[base + 1], row[base + 2], row[base + 3]])
}

/// Writes the `i`-th f32 sample into a row of raw bytes.
#[inline]
pub(crate) fn put_f32(row: &mut [u8], i: usize, value: f32) {
    let base = i * 4;
    row[base..base + 4].copy_from_slice(&value.to_ne_bytes());
}

/// Converts pixel data from `src.format()` to `dst.format()`.
///
/// # Errors
///
/// - [`Error::DimensionMismatch`] if the buffers disagree on width/height
/// - [`Error::UnsupportedConversion`] for any pairing outside the matrix
///
/// On error the destination is not mutated.
///
/// # Example
///
/// ```rust
/// use pixwash_core::{convert, PixelBuffer, PixelBufferMut, PixelFormat};
///
/// let src_data = [255u8, 0, 0, 0, 255, 0]; // 2x1 RGB
/// let src = PixelBuffer::packed(PixelFormat::U8Rgb, 2, 1, &src_data).unwrap();
/// let mut dst_data = [0u8; 2 * 12];
/// let mut dst = PixelBufferMut::packed(PixelFormat::F32Rgb, 2, 1, &mut dst_data).unwrap();
/// convert(&src, &mut dst).unwrap();
/// ```
pub fn convert(src: &PixelBuffer<'_>, dst: &mut PixelBufferMut<'_>) -> Result<()> {
    if src.dimensions() != dst.dimensions() {
        return Err(Error::dimension_mismatch(src.dimensions(), dst.dimensions()));
    }

    let (width, height) = src.dimensions();
    match (src.format(), dst.format()) {
        (from, to) if from == to => {
            for y in 0..height {
                dst.row_mut(y).copy_from_slice(src.row(y));
            }
        }
        (PixelFormat::U8Rgb, PixelFormat::F32Rgb) => {
            for y in 0..height {
                let src_row = src.row(y);
                let dst_row = dst.row_mut(y);
                for i in 0..width * 3 {
                    put_f32(dst_row, i, f32::from(src_row[i]) * INV_255);
                }
            }
        }
        (PixelFormat::U8Rgba, PixelFormat::F32Rgb) => {
            for y in 0..height {
                let src_row = src.row(y);
                let dst_row = dst.row_mut(y);
                for x in 0..width {
                    for c in 0..3 {
                        put_f32(dst_row, x * 3 + c, f32::from(src_row[x * 4 + c]) * INV_255);
                    }
                }
            }
        }
        (PixelFormat::F32Rgb, PixelFormat::U8Rgb) => {
            for y in 0..height {
                let src_row = src.row(y);
                let dst_row = dst.row_mut(y);
                for i in 0..width * 3 {
                    dst_row[i] = float_to_u8(f32_at(src_row, i));
                }
            }
        }
        (PixelFormat::F32Rgb, PixelFormat::U8Rgba) => {
            for y in 0..height {
                let src_row = src.row(y);
                let dst_row = dst.row_mut(y);
                for x in 0..width {
                    for c in 0..3 {
                        dst_row[x * 4 + c] = float_to_u8(f32_at(src_row, x * 3 + c));
                    }
                    dst_row[x * 4 + 3] = 255;
                }
            }
        }
        (from, to) => return Err(Error::UnsupportedConversion { from, to }),
    }

    Ok(())
}
