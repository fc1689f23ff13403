//! The orchestrated sanitize pipeline.
//!
//! [`Sanitizer`] composes the stages from `pixwash-ops` into the full
//! laundering sequence. Every stage is its own method so callers (the
//! benchmark in particular) can time or drive them independently; the
//! stages share nothing but the worker pool handle, so concurrent sanitize
//! calls on independent buffers never interfere.

use pixwash_core::{default_pool, FloatImage, PixelBuffer, PixelBufferMut, PixelFormat, ThreadPool};
use pixwash_ops as ops;

use crate::error::{Error, Result};

/// Linear downscale ratio ahead of the destructive stages.
const DOWNSCALE_RATIO: f64 = 0.25;
/// Bit depth of the posterization stage (64 levels).
const QUANTIZE_BITS: u32 = 6;
/// Quality setting of the block-transform attenuation.
const BLOCK_QUALITY: u8 = 60;
/// Share of the attenuated image in the low-frequency blend.
const ATTENUATED_SHARE: f32 = 0.4;
/// Share of the synthesized detail in the final blend.
const DETAIL_SHARE: f32 = 0.15;
/// Share of the plain upscale in the final blend.
const UPSCALED_SHARE: f32 = 0.35;

/// Scales a dimension, rounding to nearest and never below 1.
#[inline]
fn scaled_dimension(value: usize, scale: f64) -> usize {
    let scaled = (value as f64 * scale).round() as usize;
    scaled.max(1)
}

/// Returns the crate's semantic version. No side effects.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

/// Runs the sanitize pipeline with the process-default worker pool.
///
/// Convenience wrapper over [`Sanitizer::sanitize`]; see there for the
/// contract.
pub fn sanitize(input: &PixelBuffer<'_>, output: &mut PixelBufferMut<'_>) -> Result<()> {
    Sanitizer::new().sanitize(input, output)
}

/// The sanitize pipeline, bound to an explicit worker pool.
#[derive(Debug, Clone)]
pub struct Sanitizer {
    pool: ThreadPool,
}

impl Default for Sanitizer {
    fn default() -> Self {
        Self::new()
    }
}

impl Sanitizer {
    /// Creates a sanitizer on the process-default worker pool.
    pub fn new() -> Self {
        Self {
            pool: default_pool().clone(),
        }
    }

    /// Creates a sanitizer on the given pool.
    pub fn with_pool(pool: ThreadPool) -> Self {
        Self { pool }
    }

    /// Returns the worker pool handle this sanitizer runs on.
    pub fn pool(&self) -> &ThreadPool {
        &self.pool
    }

    /// Runs the full pipeline from `input` into `output`.
    ///
    /// Accepts any supported input format (alpha, if present, is dropped);
    /// the output buffer must be `U8Rgb` or `F32Rgb` and match the input
    /// dimensions. On any error the output bytes are untouched.
    ///
    /// # Errors
    ///
    /// - [`Error::UnsupportedOutput`] for a 4-channel output buffer
    /// - [`Error::Core`] for dimension mismatches
    /// - [`Error::Ops`] if a stage rejects its input
    pub fn sanitize(&self, input: &PixelBuffer<'_>, output: &mut PixelBufferMut<'_>) -> Result<()> {
        if output.format() != PixelFormat::U8Rgb && output.format() != PixelFormat::F32Rgb {
            return Err(Error::UnsupportedOutput {
                format: output.format(),
            });
        }
        if input.dimensions() != output.dimensions() {
            return Err(pixwash_core::Error::dimension_mismatch(
                input.dimensions(),
                output.dimensions(),
            )
            .into());
        }

        let (width, height) = input.dimensions();
        tracing::debug!(
            width,
            height,
            input = %input.format(),
            output = %output.format(),
            "sanitizing image"
        );

        let working = self.to_working(input)?;
        let mut low = self.downscale(&working)?;
        self.quantize_levels(&mut low);
        let mut blended = self.attenuate_blocks(&low)?;
        self.blend_low(&mut blended, &low)?;

        let upscaled = self.upscale_to(&blended, width, height)?;
        let sr_input = self.prepare_detail(&blended, width, height)?;
        let mut detail = self.synthesize_detail(&sr_input, width, height)?;
        self.blend_final(&mut detail, &upscaled, &working)?;

        self.to_output(&detail, output)
    }

    /// Stage 1: converts the input buffer to the 3-channel float working
    /// image.
    pub fn to_working(&self, input: &PixelBuffer<'_>) -> Result<FloatImage> {
        Ok(FloatImage::from_pixels(input)?)
    }

    /// Stage 2: downscales the working image by the fixed pipeline ratio.
    pub fn downscale(&self, working: &FloatImage) -> Result<FloatImage> {
        let down_width = scaled_dimension(working.width(), DOWNSCALE_RATIO);
        let down_height = scaled_dimension(working.height(), DOWNSCALE_RATIO);
        Ok(ops::resample(working, down_width, down_height, &self.pool)?)
    }

    /// Stage 3: posterizes the low-resolution image in place.
    pub fn quantize_levels(&self, low: &mut FloatImage) {
        ops::quantize(low, QUANTIZE_BITS);
    }

    /// Stage 4: attenuates high-frequency block content.
    pub fn attenuate_blocks(&self, low: &FloatImage) -> Result<FloatImage> {
        Ok(ops::attenuate(low, BLOCK_QUALITY, &self.pool)?)
    }

    /// Stage 5: blends the attenuated image with its (quantized) input,
    /// in place on `attenuated`, clamped to [0, 1].
    pub fn blend_low(&self, attenuated: &mut FloatImage, low: &FloatImage) -> Result<()> {
        blend_into(attenuated, low, ATTENUATED_SHARE)
    }

    /// Stage 6: upscales the blended low-res image back to target size.
    pub fn upscale_to(&self, image: &FloatImage, width: usize, height: usize) -> Result<FloatImage> {
        Ok(ops::resample(image, width, height, &self.pool)?)
    }

    /// Stage 7: resamples the blended image to half the target size,
    /// producing the detail-synthesis input.
    pub fn prepare_detail(
        &self,
        image: &FloatImage,
        width: usize,
        height: usize,
    ) -> Result<FloatImage> {
        Ok(ops::resample(
            image,
            width.div_ceil(2),
            height.div_ceil(2),
            &self.pool,
        )?)
    }

    /// Stage 8: synthesizes detail at 2x, then resamples to the exact
    /// target size when the doubled size overshoots (odd dimensions).
    pub fn synthesize_detail(
        &self,
        sr_input: &FloatImage,
        width: usize,
        height: usize,
    ) -> Result<FloatImage> {
        let upscaled = ops::upscale2x(sr_input, &self.pool)?;
        if upscaled.dimensions() == (width, height) {
            Ok(upscaled)
        } else {
            Ok(ops::resample(&upscaled, width, height, &self.pool)?)
        }
    }

    /// Stage 9: final three-way blend, in place on `detail`, clamped to
    /// [0, 1].
    pub fn blend_final(
        &self,
        detail: &mut FloatImage,
        upscaled: &FloatImage,
        working: &FloatImage,
    ) -> Result<()> {
        if detail.data().len() != upscaled.data().len() {
            return Err(Error::BlendMismatch {
                a: detail.data().len(),
                b: upscaled.data().len(),
            });
        }
        if detail.data().len() != working.data().len() {
            return Err(Error::BlendMismatch {
                a: detail.data().len(),
                b: working.data().len(),
            });
        }
        let original_share = 1.0 - DETAIL_SHARE - UPSCALED_SHARE;
        for ((value, &up), &orig) in detail
            .data_mut()
            .iter_mut()
            .zip(upscaled.data())
            .zip(working.data())
        {
            *value = (DETAIL_SHARE * *value + UPSCALED_SHARE * up + original_share * orig)
                .clamp(0.0, 1.0);
        }
        Ok(())
    }

    /// Stage 10: converts the float result into the output buffer.
    pub fn to_output(&self, image: &FloatImage, output: &mut PixelBufferMut<'_>) -> Result<()> {
        Ok(image.write_pixels(output)?)
    }
}

/// `a = clamp(share * a + (1 - share) * b)`, sample-wise.
fn blend_into(a: &mut FloatImage, b: &FloatImage, share: f32) -> Result<()> {
    if a.data().len() != b.data().len() {
        return Err(Error::BlendMismatch {
            a: a.data().len(),
            b: b.data().len(),
        });
    }
    let other_share = 1.0 - share;
    for (value, &other) in a.data_mut().iter_mut().zip(b.data()) {
        *value = (share * *value + other_share * other).clamp(0.0, 1.0);
    }
    Ok(())
}
