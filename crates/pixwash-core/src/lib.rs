//! # pixwash-core
//!
//! Core types for the pixwash sanitization pipeline.
//!
//! This crate provides the foundational pieces the rest of the workspace
//! builds on:
//!
//! - [`PixelFormat`] - Closed set of supported pixel layouts
//! - [`PixelBuffer`], [`PixelBufferMut`] - Borrowed, stride-aware views over
//!   caller-owned pixel bytes
//! - [`convert`](mod@convert) - Conversions between the supported formats
//! - [`FloatImage`] - The owned floating-point working image every pipeline
//!   stage operates on
//! - [`ThreadPool`] - Explicit fork-join worker pool handle
//!
//! # Design Philosophy
//!
//! Pixel data entering the pipeline is attacker-controlled, so every buffer
//! is validated once, on construction, against its declared geometry (format,
//! dimensions, stride, backing length). Past that boundary the stages only
//! see values the type system already vouched for.
//!
//! Buffers are *borrowed*: this crate never frees, reallocates, or retains
//! caller memory. Stride padding is never read or written.
//!
//! # Crate Structure
//!
//! `pixwash-core` has no internal dependencies. The other pixwash crates
//! depend on it:
//!
//! ```text
//! pixwash-core (this crate)
//!    ^
//!    |
//!    +-- pixwash-ops (resampling, quantization, block transform, SR-lite)
//!    +-- pixwash (pipeline facade, security gate)
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod buffer;
pub mod convert;
pub mod error;
pub mod format;
pub mod image;
pub mod parallel;

pub use buffer::{PixelBuffer, PixelBufferMut};
pub use convert::convert;
pub use error::{Error, Result};
pub use format::PixelFormat;
pub use image::FloatImage;
pub use parallel::{default_pool, ThreadPool};
