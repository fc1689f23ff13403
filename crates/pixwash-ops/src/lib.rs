//! # pixwash-ops
//!
//! The numeric stages of the pixwash sanitization pipeline.
//!
//! Each module is one stage, operating on
//! [`FloatImage`](pixwash_core::FloatImage) working buffers and
//! parallelizing over rows through an explicit
//! [`ThreadPool`](pixwash_core::ThreadPool) handle:
//!
//! - [`prefilter`](mod@prefilter) - Separable cubic B-spline preconditioning pass
//! - [`resample`](mod@resample) - Separable cubic resampling at arbitrary scale factors
//! - [`bitdepth`] - Per-channel bit-depth quantization (posterization)
//! - [`dct`] - 8x8 block-transform high-frequency attenuation
//! - [`srlite`] - Fixed 2x gradient-weighted detail synthesis
//!
//! The stages are deliberately free of shared mutable state; concurrent
//! calls on independent images never interfere.
//!
//! # Example
//!
//! ```rust
//! use pixwash_core::{FloatImage, ThreadPool};
//! use pixwash_ops::resample;
//!
//! let pool = ThreadPool::serial();
//! let src = FloatImage::new(64, 48, 3);
//! let down = resample::resample(&src, 16, 12, &pool).unwrap();
//! assert_eq!(down.dimensions(), (16, 12));
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod bitdepth;
pub mod dct;
mod error;
pub mod prefilter;
pub mod resample;
pub mod srlite;

pub use bitdepth::quantize;
pub use dct::attenuate;
pub use error::{OpsError, OpsResult};
pub use prefilter::prefilter;
pub use resample::resample;
pub use srlite::upscale2x;
