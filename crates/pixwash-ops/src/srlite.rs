//! Fixed 2x gradient-weighted detail synthesis ("SR-lite").
//!
//! A cheap, data-independent upscaler that restores perceptual crispness
//! lost to the downscale-quantize-attenuate-upscale sequence. For every
//! source pixel the 4-neighborhood (mirrored at borders) and a shared
//! luminance term produce the four output sub-pixels of its 2x2 quadrant
//! through one fixed linear combination - no learning, no iteration, no
//! general resampling.

use pixwash_core::{FloatImage, ThreadPool};

use crate::error::{OpsError, OpsResult};
use crate::resample::mirror_index;

/// Weight on the center sample.
const MAIN_WEIGHT: f32 = 1.2;
/// Weight on the two axis neighbors nearest the quadrant.
const STRONG_WEIGHT: f32 = -0.1;
/// Weight on the two opposite axis neighbors.
const WEAK_WEIGHT: f32 = -0.05;
/// Weight on the channel-mean luminance of the center pixel.
const LUMA_WEIGHT: f32 = 0.05;

/// Neighbor pairs per quadrant, ordered TL, TR, BL, BR.
/// Indices select from [up, down, left, right].
const STRONG_PAIRS: [[usize; 2]; 4] = [
    [0, 2], // top-left emphasises up + left
    [0, 3], // top-right emphasises up + right
    [1, 2], // bottom-left emphasises down + left
    [1, 3], // bottom-right emphasises down + right
];

const WEAK_PAIRS: [[usize; 2]; 4] = [
    [1, 3], // remaining neighbors for TL
    [1, 2], // remaining neighbors for TR
    [0, 3], // remaining neighbors for BL
    [0, 2], // remaining neighbors for BR
];

/// Upscales a 3-channel image by exactly 2x in each dimension.
///
/// Output is clamped to [0, 1] and therefore finite. Rows are distributed
/// over `pool`, two output rows per source row.
///
/// # Errors
///
/// - [`OpsError::InvalidDimensions`] for empty images
/// - [`OpsError::InvalidParameter`] if the image is not 3-channel
pub fn upscale2x(src: &FloatImage, pool: &ThreadPool) -> OpsResult<FloatImage> {
    let (width, height) = src.dimensions();
    if width == 0 || height == 0 {
        return Err(OpsError::InvalidDimensions(format!(
            "cannot upscale a {width}x{height} image"
        )));
    }
    if src.channels() != 3 {
        return Err(OpsError::InvalidParameter(format!(
            "detail synthesis requires 3 channels, got {}",
            src.channels()
        )));
    }

    let out_width = width * 2;
    let out_height = height * 2;
    let mut output = FloatImage::new(out_width, out_height, 3);

    // One band = the two output rows derived from one source row.
    let out_row_len = out_width * 3;
    let band_len = out_row_len * 2;
    pool.parallel_rows(output.data_mut(), band_len, |y, band| {
        let up_row = src.row(mirror_index(y as isize - 1, height));
        let mid_row = src.row(y);
        let down_row = src.row(mirror_index(y as isize + 1, height));

        for x in 0..width {
            let left_x = mirror_index(x as isize - 1, width);
            let right_x = mirror_index(x as isize + 1, width);

            // [channel][center, up, down, left, right]
            let mut samples = [[0.0f32; 5]; 3];
            for (c, sample) in samples.iter_mut().enumerate() {
                sample[0] = mid_row[x * 3 + c];
                sample[1] = up_row[x * 3 + c];
                sample[2] = down_row[x * 3 + c];
                sample[3] = mid_row[left_x * 3 + c];
                sample[4] = mid_row[right_x * 3 + c];
            }
            let luma = (samples[0][0] + samples[1][0] + samples[2][0]) / 3.0;

            for quadrant in 0..4 {
                let dy = quadrant / 2;
                let dx = quadrant % 2;
                let out_base = dy * out_row_len + (x * 2 + dx) * 3;
                for (c, sample) in samples.iter().enumerate() {
                    let neighbors = &sample[1..5];
                    let mut value = MAIN_WEIGHT * sample[0] + LUMA_WEIGHT * luma;
                    for &axis in &STRONG_PAIRS[quadrant] {
                        value += STRONG_WEIGHT * neighbors[axis];
                    }
                    for &axis in &WEAK_PAIRS[quadrant] {
                        value += WEAK_WEIGHT * neighbors[axis];
                    }
                    band[out_base + c] = value.clamp(0.0, 1.0);
                }
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
    fn test_output_dimensions_double() {
        let pool = ThreadPool::serial();
        let src = FloatImage::new(6, 5, 3);
        let out = upscale2x(&src, &pool).unwrap();
        assert_eq!(out.dimensions(), (12, 10));
    }

    #[test]
    fn test_rejects_non_rgb() {
        let pool = ThreadPool::serial();
        let src = FloatImage::new(4, 4, 4);
        assert!(matches!(
            upscale2x(&src, &pool),
            Err(OpsError::InvalidParameter(_))
        ));
    }

    #[test]
    fn test_constant_field_scales_by_weight_sum() {
        let pool = ThreadPool::serial();
        let src = FloatImage::from_data(4, 3, 3, vec![0.5; 4 * 3 * 3]).unwrap();
        let out = upscale2x(&src, &pool).unwrap();
        // All neighbors equal the center, so each sub-pixel is the weight
        // sum (1.2 - 0.2 - 0.1 + 0.05 = 0.95) times the constant.
        for &v in out.data() {
            assert_abs_diff_eq!(v, 0.5 * 0.95, epsilon = 1e-6);
        }
    }

    #[test]
    fn test_matches_quadrant_formula() {
        let pool = ThreadPool::serial();
        let width = 6;
        let height = 5;
        let mut data = Vec::with_capacity(width * height * 3);
        for y in 0..height {
            for x in 0..width {
                let fx = x as f32 / width as f32;
                let fy = y as f32 / height as f32;
                data.push((0.5 + 0.3 * (fx * std::f32::consts::TAU).sin()).clamp(0.0, 1.0));
                data.push((0.25 + 0.5 * fy).clamp(0.0, 1.0));
                data.push((0.75 - 0.4 * fx + 0.2 * fy).clamp(0.0, 1.0));
            }
        }
        let src = FloatImage::from_data(width, height, 3, data).unwrap();
        let out = upscale2x(&src, &pool).unwrap();

        // Independently evaluate the closed-form quadrant combination.
        let m = |i: isize, len: usize| mirror_index(i, len);
        for y in 0..height {
            for x in 0..width {
                let mut neighborhood = [[0.0f32; 5]; 3];
                for (c, entry) in neighborhood.iter_mut().enumerate() {
                    entry[0] = src.sample(x, y, c);
                    entry[1] = src.sample(x, m(y as isize - 1, height), c);
                    entry[2] = src.sample(x, m(y as isize + 1, height), c);
                    entry[3] = src.sample(m(x as isize - 1, width), y, c);
                    entry[4] = src.sample(m(x as isize + 1, width), y, c);
                }
                let luma =
                    (neighborhood[0][0] + neighborhood[1][0] + neighborhood[2][0]) / 3.0;
                for quadrant in 0..4 {
                    let (dy, dx) = (quadrant / 2, quadrant % 2);
                    for (c, entry) in neighborhood.iter().enumerate() {
                        let mut expected = 1.2 * entry[0] + 0.05 * luma;
                        for &axis in &STRONG_PAIRS[quadrant] {
                            expected += -0.1 * entry[1 + axis];
                        }
                        for &axis in &WEAK_PAIRS[quadrant] {
                            expected += -0.05 * entry[1 + axis];
                        }
                        let actual = out.sample(x * 2 + dx, y * 2 + dy, c);
                        assert_abs_diff_eq!(
                            actual,
                            expected.clamp(0.0, 1.0),
                            epsilon = 1e-5
                        );
                    }
                }
            }
        }
    }

    #[test]
    fn test_output_bounded_and_finite() {
        let pool = ThreadPool::serial();
        let data: Vec<f32> = (0..8 * 7 * 3)
            .map(|i| if i % 2 == 0 { 0.0 } else { 1.0 })
            .collect();
        let src = FloatImage::from_data(8, 7, 3, data).unwrap();
        let out = upscale2x(&src, &pool).unwrap();
        assert!(out
            .data()
            .iter()
            .all(|v| v.is_finite() && (0.0..=1.0).contains(v)));
    }

    #[test]
    fn test_parallel_matches_serial() {
        let serial = ThreadPool::serial();
        let parallel = ThreadPool::new(4).unwrap();
        let data: Vec<f32> = (0..24 * 18 * 3)
            .map(|i| ((i * 31) % 89) as f32 / 88.0)
            .collect();
        let src = FloatImage::from_data(24, 18, 3, data).unwrap();
        let a = upscale2x(&src, &serial).unwrap();
        let b = upscale2x(&src, &parallel).unwrap();
        assert_eq!(a.data(), b.data());
    }
}
