//! Separable cubic resampling at arbitrary scale factors.
//!
//! Each axis is resampled independently, horizontal pass first. Per output
//! coordinate a phase table is precomputed once and reused for every row
//! (or column): when an axis shrinks, taps carry pixel-coverage (area)
//! weights; when it grows, taps are a 4-wide cubic convolution
//! (Catmull-Rom, a = -0.5). Samples outside the source grid are mirrored at
//! the edges; a one-sample axis mirrors to itself.
//!
//! The same routine serves the pipeline's 0.25x downscale and the upscale
//! back to the original size.

use pixwash_core::{FloatImage, ThreadPool};

use crate::error::{OpsError, OpsResult};

/// Catmull-Rom cubic parameter.
const CUBIC_A: f32 = -0.5;

/// Evaluates the cubic convolution kernel at distance `x`.
#[inline]
fn cubic_kernel(x: f32) -> f32 {
    let x = x.abs();
    let x2 = x * x;
    let x3 = x2 * x;
    if x < 1.0 {
        (CUBIC_A + 2.0) * x3 - (CUBIC_A + 3.0) * x2 + 1.0
    } else if x < 2.0 {
        CUBIC_A * x3 - 5.0 * CUBIC_A * x2 + 8.0 * CUBIC_A * x - 4.0 * CUBIC_A
    } else {
        0.0
    }
}

/// Reflects `idx` into `[0, len)` with mirror-at-edge extension.
///
/// The reflection period is `2 * len - 2`, so edge samples are not
/// duplicated. A length of 0 or 1 maps everything to 0.
#[inline]
pub(crate) fn mirror_index(idx: isize, len: usize) -> usize {
    if len <= 1 {
        return 0;
    }
    let period = (2 * len - 2) as isize;
    let mut value = idx % period;
    if value < 0 {
        value += period;
    }
    if value >= len as isize {
        value = period - value;
    }
    value as usize
}

/// Precomputed taps for one output coordinate along one axis.
#[derive(Debug, Clone, Default)]
struct Phase {
    taps: Vec<(usize, f32)>,
}

/// Builds the per-output-coordinate tap table for one axis.
fn build_phase_table(src_size: usize, dst_size: usize) -> Vec<Phase> {
    let mut table = Vec::with_capacity(dst_size);
    if src_size == 0 || dst_size == 0 {
        return table;
    }

    let scale = dst_size as f32 / src_size as f32;
    let inv_scale = src_size as f32 / dst_size as f32;
    let downscale = scale < 1.0;

    for i in 0..dst_size {
        let mut phase = Phase::default();
        if downscale {
            // Area coverage: weight each source cell by how much of the
            // destination footprint it overlaps.
            let start = i as f32 * inv_scale;
            let end = start + inv_scale;
            let mut current = start;
            let mut idx = start.floor() as i64;
            let mut weight_sum = 0.0f32;
            while current < end {
                let next_edge = (idx + 1) as f32;
                let next = end.min(next_edge);
                let coverage = next - current;
                if coverage > 0.0 {
                    let mapped = mirror_index(idx as isize, src_size);
                    let weight = coverage * scale;
                    phase.taps.push((mapped, weight));
                    weight_sum += weight;
                }
                current = next;
                idx += 1;
            }
            normalize_or_fallback(&mut phase, weight_sum, start, src_size);
        } else {
            let src_pos = (i as f32 + 0.5) * inv_scale - 0.5;
            let base = src_pos.floor() as i64 - 1;
            let mut weight_sum = 0.0f32;
            for tap in 0..4 {
                let idx = base + tap;
                let weight = cubic_kernel(src_pos - idx as f32);
                if weight == 0.0 {
                    continue;
                }
                let mapped = mirror_index(idx as isize, src_size);
                phase.taps.push((mapped, weight));
                weight_sum += weight;
            }
            normalize_or_fallback(&mut phase, weight_sum, src_pos, src_size);
        }
        table.push(phase);
    }

    table
}

/// Normalizes tap weights to unit sum, or degrades to a single
/// nearest-sample tap when all weights cancelled.
fn normalize_or_fallback(phase: &mut Phase, weight_sum: f32, position: f32, src_size: usize) {
    if weight_sum != 0.0 {
        let inv_sum = 1.0 / weight_sum;
        for (_, weight) in phase.taps.iter_mut() {
            *weight *= inv_sum;
        }
    } else {
        phase.taps.clear();
        let mapped = mirror_index(position.round() as isize, src_size);
        phase.taps.push((mapped, 1.0));
    }
}

/// Resamples `src` to `out_width x out_height`.
///
/// Used for both downscale and upscale. Output samples are clamped to
/// [0, 1]. Rows are distributed over `pool`.
///
/// # Errors
///
/// Returns [`OpsError::InvalidDimensions`] if the source or target has a
/// zero dimension or the source has zero channels.
pub fn resample(
    src: &FloatImage,
    out_width: usize,
    out_height: usize,
    pool: &ThreadPool,
) -> OpsResult<FloatImage> {
    let channels = src.channels();
    if src.width() == 0 || src.height() == 0 || channels == 0 {
        return Err(OpsError::InvalidDimensions(format!(
            "source {}x{}x{} cannot be resampled",
            src.width(),
            src.height(),
            channels
        )));
    }
    if out_width == 0 || out_height == 0 {
        return Err(OpsError::InvalidDimensions(format!(
            "target size {out_width}x{out_height} must be positive"
        )));
    }

    tracing::trace!(
        from_width = src.width(),
        from_height = src.height(),
        out_width,
        out_height,
        "resampling"
    );

    let horizontal = build_phase_table(src.width(), out_width);
    let vertical = build_phase_table(src.height(), out_height);

    // Horizontal pass: src rows -> intermediate rows of the target width.
    let mut intermediate = FloatImage::new(out_width, src.height(), channels);
    let inter_row_len = intermediate.row_len();
    pool.parallel_rows(intermediate.data_mut(), inter_row_len, |y, dst_row| {
        let src_row = src.row(y);
        for (x, phase) in horizontal.iter().enumerate() {
            for c in 0..channels {
                let mut accum = 0.0f32;
                for &(src_x, weight) in &phase.taps {
                    accum += weight * src_row[src_x * channels + c];
                }
                dst_row[x * channels + c] = accum;
            }
        }
    });

    // Vertical pass: intermediate columns -> output rows, clamped.
    let mut output = FloatImage::new(out_width, out_height, channels);
    let out_row_len = output.row_len();
    pool.parallel_rows(output.data_mut(), out_row_len, |y, dst_row| {
        let phase = &vertical[y];
        for x in 0..out_width {
            for c in 0..channels {
                let mut accum = 0.0f32;
                for &(src_y, weight) in &phase.taps {
                    accum += weight * intermediate.sample(x, src_y, c);
                }
                dst_row[x * channels + c] = accum.clamp(0.0, 1.0);
            }
        }
    });

    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_mirror_index_reflects_without_duplication() {
        assert_eq!(mirror_index(-1, 5), 1);
        assert_eq!(mirror_index(-2, 5), 2);
        assert_eq!(mirror_index(0, 5), 0);
        assert_eq!(mirror_index(4, 5), 4);
        assert_eq!(mirror_index(5, 5), 3);
        assert_eq!(mirror_index(6, 5), 2);
    }

    #[test]
    fn test_mirror_index_degenerate_lengths() {
        assert_eq!(mirror_index(-3, 1), 0);
        assert_eq!(mirror_index(7, 1), 0);
        assert_eq!(mirror_index(0, 0), 0);
    }

    #[test]
    fn test_cubic_kernel_interpolates() {
        assert_abs_diff_eq!(cubic_kernel(0.0), 1.0, epsilon = 1e-6);
        assert_abs_diff_eq!(cubic_kernel(1.0), 0.0, epsilon = 1e-6);
        assert_abs_diff_eq!(cubic_kernel(2.0), 0.0, epsilon = 1e-6);
        assert_abs_diff_eq!(cubic_kernel(2.5), 0.0, epsilon = 1e-6);
    }

    #[test]
    fn test_identity_size_reproduces_input() {
        let pool = ThreadPool::serial();
        let data: Vec<f32> = (0..6 * 4 * 3).map(|i| (i % 11) as f32 / 10.0).collect();
        let src = FloatImage::from_data(6, 4, 3, data).unwrap();
        let out = resample(&src, 6, 4, &pool).unwrap();
        for (a, b) in src.data().iter().zip(out.data().iter()) {
            assert_abs_diff_eq!(a, b, epsilon = 1e-5);
        }
    }

    #[test]
    fn test_constant_field_survives_round_trip() {
        let pool = ThreadPool::serial();
        let src = FloatImage::from_data(16, 12, 3, vec![0.5; 16 * 12 * 3]).unwrap();
        let down = resample(&src, 4, 3, &pool).unwrap();
        let up = resample(&down, 16, 12, &pool).unwrap();
        for &v in up.data() {
            assert_abs_diff_eq!(v, 0.5, epsilon = 1e-5);
        }
    }

    #[test]
    fn test_downscale_averages_cells() {
        let pool = ThreadPool::serial();
        // 4x1 single-channel: exact 2x shrink averages pairs.
        let src = FloatImage::from_data(4, 1, 1, vec![0.0, 1.0, 0.25, 0.75]).unwrap();
        let down = resample(&src, 2, 1, &pool).unwrap();
        assert_abs_diff_eq!(down.data()[0], 0.5, epsilon = 1e-5);
        assert_abs_diff_eq!(down.data()[1], 0.5, epsilon = 1e-5);
    }

    #[test]
    fn test_output_is_clamped() {
        let pool = ThreadPool::serial();
        // A sharp step can overshoot through the cubic kernel; the output
        // must stay in range.
        let mut data = vec![0.0f32; 16];
        for v in data.iter_mut().skip(8) {
            *v = 1.0;
        }
        let src = FloatImage::from_data(16, 1, 1, data).unwrap();
        let up = resample(&src, 48, 1, &pool).unwrap();
        for &v in up.data() {
            assert!((0.0..=1.0).contains(&v));
        }
    }

    #[test]
    fn test_rejects_zero_target() {
        let pool = ThreadPool::serial();
        let src = FloatImage::new(4, 4, 3);
        assert!(matches!(
            resample(&src, 0, 4, &pool),
            Err(OpsError::InvalidDimensions(_))
        ));
    }

    #[test]
    fn test_single_pixel_axis() {
        let pool = ThreadPool::serial();
        let src = FloatImage::from_data(1, 3, 1, vec![0.2, 0.5, 0.8]).unwrap();
        let out = resample(&src, 5, 3, &pool).unwrap();
        assert_eq!(out.dimensions(), (5, 3));
        // A one-pixel axis mirrors to itself: each output row is constant.
        for y in 0..3 {
            let row = out.row(y);
            for &v in row {
                assert_abs_diff_eq!(v, row[0], epsilon = 1e-6);
            }
        }
    }

    #[test]
    fn test_parallel_matches_serial() {
        let serial = ThreadPool::serial();
        let parallel = ThreadPool::new(4).unwrap();
        let data: Vec<f32> = (0..64 * 48 * 3)
            .map(|i| ((i * 37) % 101) as f32 / 100.0)
            .collect();
        let src = FloatImage::from_data(64, 48, 3, data).unwrap();
        let a = resample(&src, 23, 17, &serial).unwrap();
        let b = resample(&src, 23, 17, &parallel).unwrap();
        assert_eq!(a.data(), b.data());
    }
}
