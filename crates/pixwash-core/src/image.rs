//! Owned floating-point working image.
//!
//! Every pipeline stage operates on a [`FloatImage`]: a row-major,
//! interleaved `f32` buffer with an explicit channel count and values
//! nominally in [0, 1] (stages may transiently exceed the range before their
//! clamp). The channel count is fixed at 3 once pixel data crosses the
//! conversion boundary; alpha, when present on input, is dropped there and
//! synthesized as fully opaque on the way back out.

use crate::buffer::{PixelBuffer, PixelBufferMut};
use crate::convert::{f32_at, float_to_u8, put_f32, INV_255};
use crate::error::{Error, Result};
use crate::format::PixelFormat;

/// Owned `height x width x channels` array of f32 samples.
///
/// # Example
///
/// ```rust
/// use pixwash_core::FloatImage;
///
/// let mut img = FloatImage::new(4, 2, 3);
/// img.row_mut(0)[0] = 0.5;
/// assert_eq!(img.data().len(), 4 * 2 * 3);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct FloatImage {
    width: usize,
    height: usize,
    channels: usize,
    data: Vec<f32>,
}

impl FloatImage {
    /// Creates a zero-filled image.
    pub fn new(width: usize, height: usize, channels: usize) -> Self {
        Self {
            width,
            height,
            channels,
            data: vec![0.0; width * height * channels],
        }
    }

    /// Creates an image from existing samples.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DataLengthMismatch`] if `data.len()` is not
    /// `width * height * channels`.
    pub fn from_data(width: usize, height: usize, channels: usize, data: Vec<f32>) -> Result<Self> {
        if data.len() != width * height * channels {
            return Err(Error::DataLengthMismatch {
                len: data.len(),
                width,
                height,
                channels,
            });
        }
        Ok(Self {
            width,
            height,
            channels,
            data,
        })
    }

    /// Converts a pixel buffer into a 3-channel float image.
    ///
    /// `U8Rgb` and `U8Rgba` samples are scaled by 1/255 (alpha dropped);
    /// `F32Rgb` rows are copied through. The source stride is respected and
    /// its padding never read.
    pub fn from_pixels(src: &PixelBuffer<'_>) -> Result<Self> {
        let width = src.width();
        let height = src.height();
        let mut image = Self::new(width, height, 3);

        match src.format() {
            PixelFormat::U8Rgb => {
                for y in 0..height {
                    let src_row = src.row(y);
                    let dst_row = image.row_mut(y);
                    for (dst, &byte) in dst_row.iter_mut().zip(src_row.iter()) {
                        *dst = f32::from(byte) * INV_255;
                    }
                }
            }
            PixelFormat::U8Rgba => {
                for y in 0..height {
                    let src_row = src.row(y);
                    let dst_row = image.row_mut(y);
                    for x in 0..width {
                        for c in 0..3 {
                            dst_row[x * 3 + c] = f32::from(src_row[x * 4 + c]) * INV_255;
                        }
                    }
                }
            }
            PixelFormat::F32Rgb => {
                for y in 0..height {
                    let src_row = src.row(y);
                    let dst_row = image.row_mut(y);
                    for (i, dst) in dst_row.iter_mut().enumerate() {
                        *dst = f32_at(src_row, i);
                    }
                }
            }
        }

        Ok(image)
    }

    /// Writes a 3-channel float image into a pixel buffer.
    ///
    /// Supports `U8Rgb`, `U8Rgba` (alpha forced fully opaque), and `F32Rgb`
    /// destinations. Destination stride padding is left untouched.
    ///
    /// # Errors
    ///
    /// - [`Error::ChannelMismatch`] if the image is not 3-channel
    /// - [`Error::DimensionMismatch`] if the dimensions disagree
    pub fn write_pixels(&self, dst: &mut PixelBufferMut<'_>) -> Result<()> {
        if self.channels != 3 {
            return Err(Error::ChannelMismatch {
                expected: 3,
                got: self.channels,
            });
        }
        if (self.width, self.height) != dst.dimensions() {
            return Err(Error::dimension_mismatch(
                (self.width, self.height),
                dst.dimensions(),
            ));
        }

        match dst.format() {
            PixelFormat::U8Rgb => {
                for y in 0..self.height {
                    let src_row = self.row(y);
                    let dst_row = dst.row_mut(y);
                    for (out, &value) in dst_row.iter_mut().zip(src_row.iter()) {
                        *out = float_to_u8(value);
                    }
                }
            }
            PixelFormat::U8Rgba => {
                for y in 0..self.height {
                    let src_row = self.row(y);
                    let dst_row = dst.row_mut(y);
                    for x in 0..self.width {
                        for c in 0..3 {
                            dst_row[x * 4 + c] = float_to_u8(src_row[x * 3 + c]);
                        }
                        dst_row[x * 4 + 3] = 255;
                    }
                }
            }
            PixelFormat::F32Rgb => {
                for y in 0..self.height {
                    let src_row = self.row(y);
                    let dst_row = dst.row_mut(y);
                    for (i, &value) in src_row.iter().enumerate() {
                        put_f32(dst_row, i, value);
                    }
                }
            }
        }

        Ok(())
    }

    /// Returns the width in pixels.
    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    /// Returns the height in pixels.
    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Returns the dimensions as (width, height).
    #[inline]
    pub fn dimensions(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    /// Returns the channel count.
    #[inline]
    pub fn channels(&self) -> usize {
        self.channels
    }

    /// Returns the number of samples in one row.
    #[inline]
    pub fn row_len(&self) -> usize {
        self.width * self.channels
    }

    /// Returns all samples.
    #[inline]
    pub fn data(&self) -> &[f32] {
        &self.data
    }

    /// Returns all samples, mutably.
    #[inline]
    pub fn data_mut(&mut self) -> &mut [f32] {
        &mut self.data
    }

    /// Returns the samples of row `y`.
    ///
    /// # Panics
    ///
    /// Panics if `y >= height`.
    #[inline]
    pub fn row(&self, y: usize) -> &[f32] {
        let start = y * self.row_len();
        &self.data[start..start + self.row_len()]
    }

    /// Returns the samples of row `y`, mutably.
    ///
    /// # Panics
    ///
    /// Panics if `y >= height`.
    #[inline]
    pub fn row_mut(&mut self, y: usize) -> &mut [f32] {
        let row_len = self.row_len();
        let start = y * row_len;
        &mut self.data[start..start + row_len]
    }

    /// Returns the sample at (x, y, c).
    ///
    /// # Panics
    ///
    /// Panics if the coordinates are out of bounds.
    #[inline]
    pub fn sample(&self, x: usize, y: usize, c: usize) -> f32 {
        debug_assert!(x < self.width && y < self.height && c < self.channels);
        self.data[(y * self.width + x) * self.channels + c]
    }
}
