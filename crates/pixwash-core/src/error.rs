//! Error types for pixwash-core operations.

use crate::format::PixelFormat;
use thiserror::Error;

/// Result type alias using [`Error`] as the error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while validating or converting pixel buffers.
///
/// Every variant names the specific rejection reason; callers can match on
/// them to distinguish, say, an unsupported conversion pairing from a stride
/// that is simply too small.
#[derive(Debug, Error)]
pub enum Error {
    /// Width or height is zero.
    #[error("invalid dimensions: {width}x{height}")]
    InvalidDimensions {
        /// Declared width in pixels
        width: usize,
        /// Declared height in pixels
        height: usize,
    },

    /// Row stride is smaller than the minimum row size for the format.
    #[error("stride {stride} is less than minimum {min_stride} bytes per row")]
    InvalidStride {
        /// Declared stride in bytes
        stride: usize,
        /// Minimum stride for the declared width and format
        min_stride: usize,
    },

    /// Row stride is not a multiple of the format's element size.
    #[error("stride {stride} is not a multiple of the {alignment}-byte element size")]
    MisalignedStride {
        /// Declared stride in bytes
        stride: usize,
        /// Element size the stride must be a multiple of
        alignment: usize,
    },

    /// Backing slice does not cover the declared geometry.
    #[error("buffer of {len} bytes cannot hold {required} bytes of pixel data")]
    BufferTooSmall {
        /// Actual slice length in bytes
        len: usize,
        /// Bytes required by the declared width/height/stride
        required: usize,
    },

    /// Two buffers that must agree on dimensions do not.
    #[error("dimension mismatch: {src_width}x{src_height} vs {dst_width}x{dst_height}")]
    DimensionMismatch {
        /// Source width
        src_width: usize,
        /// Source height
        src_height: usize,
        /// Destination width
        dst_width: usize,
        /// Destination height
        dst_height: usize,
    },

    /// No conversion is defined between the two formats.
    #[error("unsupported conversion: {from} -> {to}")]
    UnsupportedConversion {
        /// Source format
        from: PixelFormat,
        /// Destination format
        to: PixelFormat,
    },

    /// An operation required a specific channel count.
    #[error("channel mismatch: expected {expected}, got {got}")]
    ChannelMismatch {
        /// Required channel count
        expected: usize,
        /// Actual channel count
        got: usize,
    },

    /// A data vector's length does not match the declared geometry.
    #[error("data length {len} does not match {width}x{height}x{channels}")]
    DataLengthMismatch {
        /// Actual element count
        len: usize,
        /// Declared width
        width: usize,
        /// Declared height
        height: usize,
        /// Declared channel count
        channels: usize,
    },

    /// The worker pool could not be (re)built.
    #[error("failed to build worker pool: {reason}")]
    PoolBuild {
        /// Underlying build failure
        reason: String,
    },
}

impl Error {
    /// Creates a [`Error::DimensionMismatch`] from two (width, height) pairs.
    #[inline]
    pub fn dimension_mismatch(src: (usize, usize), dst: (usize, usize)) -> Self {
        Self::DimensionMismatch {
            src_width: src.0,
            src_height: src.1,
            dst_width: dst.0,
            dst_height: dst.1,
        }
    }
}
