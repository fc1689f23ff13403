//! Crate-level error type and `Result` alias.

use pixwash_core::PixelFormat;
use thiserror::Error;

/// Result type alias using [`Error`] as the error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced by the sanitize pipeline.
///
/// Buffer and conversion problems arrive as [`Error::Core`], stage-level
/// problems as [`Error::Ops`]; the remaining variants are pipeline-specific
/// rejections. All of them are raised before the caller's output buffer is
/// written.
#[derive(Debug, Error)]
pub enum Error {
    /// Buffer validation or conversion failure.
    #[error(transparent)]
    Core(#[from] pixwash_core::Error),

    /// Pipeline stage failure.
    #[error(transparent)]
    Ops(#[from] pixwash_ops::OpsError),

    /// The output buffer's format is not a supported 3-channel output.
    #[error("unsupported output format: {format} (expected U8_RGB or F32_RGB)")]
    UnsupportedOutput {
        /// The rejected format
        format: PixelFormat,
    },

    /// Two stage buffers that must agree on sample count do not.
    #[error("blend operands differ: {a} vs {b} samples")]
    BlendMismatch {
        /// Sample count of the first operand
        a: usize,
        /// Sample count of the second operand
        b: usize,
    },
}
