//! Borrowed, stride-aware pixel buffer views.
//!
//! [`PixelBuffer`] and [`PixelBufferMut`] describe caller-owned byte storage
//! together with its geometry: a [`PixelFormat`], width, height, and an
//! explicit row stride that may include trailing padding. The views are
//! *borrowed* (this crate never frees, reallocates, or retains the memory)
//! and the geometry is validated once, at construction, so downstream code
//! can index rows without re-checking.
//!
//! Stride padding (the bytes of each row past `width * bytes_per_pixel`) is
//! never read and never written by anything in this workspace; [`row`] and
//! [`row_mut`] deliberately expose only the pixel-bearing prefix of a row.
//!
//! [`row`]: PixelBuffer::row
//! [`row_mut`]: PixelBufferMut::row_mut
//!
//! # Example
//!
//! ```rust
//! use pixwash_core::{PixelBuffer, PixelFormat};
//!
//! // A 4x2 RGB image with 2 bytes of padding per row.
//! let data = vec![0u8; 14 * 2];
//! let buf = PixelBuffer::new(PixelFormat::U8Rgb, 4, 2, 14, &data).unwrap();
//! assert_eq!(buf.row(1).len(), 12); // padding excluded
//! ```

use crate::error::{Error, Result};
use crate::format::PixelFormat;

/// Checks a declared buffer geometry against the backing slice length.
fn validate_geometry(
    format: PixelFormat,
    width: usize,
    height: usize,
    stride: usize,
    len: usize,
) -> Result<()> {
    if width == 0 || height == 0 {
        return Err(Error::InvalidDimensions { width, height });
    }
    // Checked size math: the geometry is attacker-controlled.
    let overflow = Error::InvalidDimensions { width, height };
    let row_bytes = width
        .checked_mul(format.bytes_per_pixel())
        .ok_or(overflow)?;
    if stride < row_bytes {
        return Err(Error::InvalidStride {
            stride,
            min_stride: row_bytes,
        });
    }
    let alignment = format.bytes_per_channel();
    if stride % alignment != 0 {
        return Err(Error::MisalignedStride { stride, alignment });
    }
    // The last row only needs its pixel-bearing prefix.
    let required = stride
        .checked_mul(height - 1)
        .and_then(|bulk| bulk.checked_add(row_bytes))
        .ok_or(Error::InvalidDimensions { width, height })?;
    if len < required {
        return Err(Error::BufferTooSmall { len, required });
    }
    Ok(())
}

/// Immutable view over caller-owned pixel bytes.
///
/// See the [module documentation](self) for the geometry contract.
#[derive(Debug, Clone, Copy)]
pub struct PixelBuffer<'a> {
    format: PixelFormat,
    width: usize,
    height: usize,
    stride: usize,
    data: &'a [u8],
}

impl<'a> PixelBuffer<'a> {
    /// Creates a view, validating the declared geometry.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidDimensions`] if width or height is zero
    /// - [`Error::InvalidStride`] if `stride < width * bytes_per_pixel`
    /// - [`Error::MisalignedStride`] if `stride` is not a multiple of the
    ///   format's element size
    /// - [`Error::BufferTooSmall`] if `data` cannot hold the declared rows
    pub fn new(
        format: PixelFormat,
        width: usize,
        height: usize,
        stride: usize,
        data: &'a [u8],
    ) -> Result<Self> {
        validate_geometry(format, width, height, stride, data.len())?;
        Ok(Self {
            format,
            width,
            height,
            stride,
            data,
        })
    }

    /// Creates a view over tightly packed rows (stride = minimum row size).
    pub fn packed(format: PixelFormat, width: usize, height: usize, data: &'a [u8]) -> Result<Self> {
        Self::new(format, width, height, width * format.bytes_per_pixel(), data)
    }

    /// Returns the pixel format.
    #[inline]
    pub fn format(&self) -> PixelFormat {
        self.format
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

    /// Returns the row stride in bytes.
    #[inline]
    pub fn stride(&self) -> usize {
        self.stride
    }

    /// Returns the pixel-bearing bytes per row (stride padding excluded).
    #[inline]
    pub fn row_bytes(&self) -> usize {
        self.width * self.format.bytes_per_pixel()
    }

    /// Returns `true` if rows carry no stride padding.
    #[inline]
    pub fn is_contiguous(&self) -> bool {
        self.stride == self.row_bytes()
    }

    /// Returns the pixel-bearing bytes of row `y`.
    ///
    /// # Panics
    ///
    /// Panics if `y >= height`.
    #[inline]
    pub fn row(&self, y: usize) -> &'a [u8] {
        debug_assert!(y < self.height, "row out of bounds");
        let start = y * self.stride;
        &self.data[start..start + self.row_bytes()]
    }
}

/// Mutable view over caller-owned pixel bytes.
///
/// Identical geometry contract to [`PixelBuffer`]; additionally hands out
/// mutable rows. Writes go only to the pixel-bearing prefix of each row,
/// leaving stride padding byte-for-byte intact.
#[derive(Debug)]
pub struct PixelBufferMut<'a> {
    format: PixelFormat,
    width: usize,
    height: usize,
    stride: usize,
    data: &'a mut [u8],
}

impl<'a> PixelBufferMut<'a> {
    /// Creates a mutable view, validating the declared geometry.
    ///
    /// # Errors
    ///
    /// Same as [`PixelBuffer::new`].
    pub fn new(
        format: PixelFormat,
        width: usize,
        height: usize,
        stride: usize,
        data: &'a mut [u8],
    ) -> Result<Self> {
        validate_geometry(format, width, height, stride, data.len())?;
        Ok(Self {
            format,
            width,
            height,
            stride,
            data,
        })
    }

    /// Creates a mutable view over tightly packed rows.
    pub fn packed(
        format: PixelFormat,
        width: usize,
        height: usize,
        data: &'a mut [u8],
    ) -> Result<Self> {
        Self::new(format, width, height, width * format.bytes_per_pixel(), data)
    }

    /// Returns the pixel format.
    #[inline]
    pub fn format(&self) -> PixelFormat {
        self.format
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

    /// Returns the row stride in bytes.
    #[inline]
    pub fn stride(&self) -> usize {
        self.stride
    }

    /// Returns the pixel-bearing bytes per row (stride padding excluded).
    #[inline]
    pub fn row_bytes(&self) -> usize {
        self.width * self.format.bytes_per_pixel()
    }

    /// Returns the pixel-bearing bytes of row `y`.
    ///
    /// # Panics
    ///
    /// Panics if `y >= height`.
    #[inline]
    pub fn row(&self, y: usize) -> &[u8] {
        debug_assert!(y < self.height, "row out of bounds");
        let start = y * self.stride;
        &self.data[start..start + self.row_bytes()]
    }

    /// Returns the pixel-bearing bytes of row `y`, mutably.
    ///
    /// # Panics
    ///
    /// Panics if `y >= height`.
    #[inline]
    pub fn row_mut(&mut self, y: usize) -> &mut [u8] {
        debug_assert!(y < self.height, "row out of bounds");
        let start = y * self.stride;
        let row_bytes = self.row_bytes();
        &mut self.data[start..start + row_bytes]
    }

    /// Reborrows as an immutable [`PixelBuffer`].
    pub fn as_ref(&self) -> PixelBuffer<'_> {
        PixelBuffer {
            format: self.format,
            width: self.width,
            height: self.height,
            stride: self.stride,
            data: &*self.data,
        }
    }
}
