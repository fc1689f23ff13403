//! # pixwash
//!
//! Perceptual image laundering: destroys anything hidden in a pixel stream
//! that is not recoverable from coarse visual content - steganographic
//! payloads, polyglot file signatures embedded in pixel bytes,
//! high-frequency generative fingerprints - while preserving how the image
//! looks.
//!
//! This is a best-effort perceptual pipeline, not a provable
//! information-theoretic sanitizer and not a codec.
//!
//! # Pipeline
//!
//! ```text
//! input -> float working image -> 0.25x downscale -> 64-level quantize
//!       -> 8x8 block HF attenuation -> low blend -> upscale to size
//!       -> SR-lite detail synthesis -> final blend -> output
//! ```
//!
//! # Quick start
//!
//! ```rust
//! use pixwash::{sanitize, PixelBuffer, PixelBufferMut, PixelFormat};
//!
//! let input_data = vec![128u8; 32 * 32 * 3];
//! let input = PixelBuffer::packed(PixelFormat::U8Rgb, 32, 32, &input_data).unwrap();
//!
//! let mut output_data = vec![0u8; 32 * 32 * 3];
//! let mut output = PixelBufferMut::packed(PixelFormat::U8Rgb, 32, 32, &mut output_data).unwrap();
//!
//! sanitize(&input, &mut output).unwrap();
//! ```
//!
//! Callers that want control over parallelism hold a [`Sanitizer`] with an
//! explicit [`ThreadPool`]:
//!
//! ```rust
//! use pixwash::{Sanitizer, ThreadPool};
//!
//! let pool = ThreadPool::new(2).unwrap();
//! let sanitizer = Sanitizer::with_pool(pool);
//! # let _ = sanitizer;
//! ```
//!
//! # Security gate
//!
//! [`exceeds_pixel_cap`] and [`suspicious_polyglot_bytes`] are consulted by
//! callers *before* decoding or sanitizing untrusted input; see
//! [`security`].
//!
//! # Error handling
//!
//! Every public function returns [`Result`]; a failed call reports a
//! specific reason (stride/shape mismatch, unsupported conversion or output
//! format, empty target) and never partially mutates the caller's output
//! buffer.

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

mod error;
pub mod pipeline;
pub mod security;

pub use error::{Error, Result};
pub use pipeline::{sanitize, version, Sanitizer};
pub use security::{exceeds_pixel_cap, suspicious_polyglot_bytes};

// Core types are part of the public surface.
pub use pixwash_core::{
    convert, default_pool, FloatImage, PixelBuffer, PixelBufferMut, PixelFormat, ThreadPool,
};

/// The individual pipeline stages, re-exported for direct use.
pub mod ops {
    pub use pixwash_ops::{attenuate, prefilter, quantize, resample, upscale2x};
    pub use pixwash_ops::{OpsError, OpsResult};
}
