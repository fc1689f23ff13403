//! 8x8 block-transform high-frequency attenuation.
//!
//! Each channel plane is tiled into 8x8 blocks and pushed through an
//! orthonormal DCT-II pair. Between the transforms, AC coefficients are
//! quantized against a quality-scaled table: the lower the quality, the
//! coarser the grid and the more high-frequency content collapses to zero.
//! The DC coefficient is never touched, so flat regions pass through
//! exactly, and quality 100 bypasses coefficient quantization entirely -
//! the transform pair alone reproduces its input within float tolerance.
//!
//! This borrows DCT mechanics from JPEG but is not a codec: nothing is
//! entropy-coded, and the only output is the filtered plane.

use std::sync::LazyLock;

use pixwash_core::{FloatImage, ThreadPool};

use crate::error::{OpsError, OpsResult};

/// Base quantization matrix at quality 50 (JPEG luminance, zig-zag
/// unrolled row-major).
const BASE_QUANT_Q50: [i32; 64] = [
    16, 11, 10, 16, 24, 40, 51, 61, //
    12, 12, 14, 19, 26, 58, 60, 55, //
    14, 13, 16, 24, 40, 57, 69, 56, //
    14, 17, 22, 29, 51, 87, 80, 62, //
    18, 22, 37, 56, 68, 109, 103, 77, //
    24, 35, 55, 64, 81, 104, 113, 92, //
    49, 64, 78, 87, 103, 121, 120, 101, //
    72, 92, 95, 98, 112, 100, 103, 99,
];

/// Orthonormal scale factors: sqrt(1/8) for DC, sqrt(2/8) for AC.
const ALPHA: [f32; 8] = [0.353_553_39, 0.5, 0.5, 0.5, 0.5, 0.5, 0.5, 0.5];

static COS_TABLE: LazyLock<[[f32; 8]; 8]> = LazyLock::new(|| {
    let mut table = [[0.0f32; 8]; 8];
    for (u, row) in table.iter_mut().enumerate() {
        for (x, entry) in row.iter_mut().enumerate() {
            let angle = (std::f32::consts::PI / 8.0) * u as f32 * (x as f32 + 0.5);
            *entry = angle.cos();
        }
    }
    table
});

#[inline]
fn fdct_1d(input: &[f32; 8], output: &mut [f32; 8]) {
    let cos = &*COS_TABLE;
    for u in 0..8 {
        let mut sum = 0.0f32;
        for x in 0..8 {
            sum += input[x] * cos[u][x];
        }
        output[u] = sum * ALPHA[u];
    }
}

#[inline]
fn idct_1d(input: &[f32; 8], output: &mut [f32; 8]) {
    let cos = &*COS_TABLE;
    for x in 0..8 {
        let mut sum = 0.0f32;
        for u in 0..8 {
            sum += ALPHA[u] * input[u] * cos[u][x];
        }
        output[x] = sum;
    }
}

/// Forward 2D DCT over one 8x8 block, rows then columns.
fn forward_dct(block: &mut [f32; 64]) {
    let mut tmp = [0.0f32; 64];
    let mut line = [0.0f32; 8];
    let mut transformed = [0.0f32; 8];

    for y in 0..8 {
        line.copy_from_slice(&block[y * 8..y * 8 + 8]);
        fdct_1d(&line, &mut transformed);
        tmp[y * 8..y * 8 + 8].copy_from_slice(&transformed);
    }
    for x in 0..8 {
        for y in 0..8 {
            line[y] = tmp[y * 8 + x];
        }
        fdct_1d(&line, &mut transformed);
        for y in 0..8 {
            block[y * 8 + x] = transformed[y];
        }
    }
}

/// Inverse 2D DCT over one 8x8 block, columns then rows.
fn inverse_dct(block: &mut [f32; 64]) {
    let mut tmp = [0.0f32; 64];
    let mut line = [0.0f32; 8];
    let mut transformed = [0.0f32; 8];

    for x in 0..8 {
        for y in 0..8 {
            line[y] = block[y * 8 + x];
        }
        idct_1d(&line, &mut transformed);
        for y in 0..8 {
            tmp[y * 8 + x] = transformed[y];
        }
    }
    for y in 0..8 {
        line.copy_from_slice(&tmp[y * 8..y * 8 + 8]);
        idct_1d(&line, &mut transformed);
        block[y * 8..y * 8 + 8].copy_from_slice(&transformed);
    }
}

/// Builds the coefficient quantization table for a quality setting.
///
/// Standard JPEG quality fold: `5000 / q` below 50, `200 - 2q` above,
/// entries clamped into [1, 255]. The DC entry is forced to 1. Quality 100
/// yields the all-ones identity table.
fn build_quality_table(quality: u8) -> [f32; 64] {
    let q = i32::from(quality.clamp(1, 100));
    let mut table = [1.0f32; 64];
    if q >= 100 {
        return table;
    }

    let scaled = if q < 50 { 5000 / q } else { 200 - q * 2 };
    for (entry, &base) in table.iter_mut().zip(BASE_QUANT_Q50.iter()) {
        let value = ((base * scaled + 50) / 100).clamp(1, 255);
        *entry = value as f32;
    }
    table[0] = 1.0; // preserve DC
    table
}

/// Attenuates high-frequency content blockwise.
///
/// `quality` clamps into [1, 100]; 100 is an identity round trip through
/// the transform pair, lower values damp progressively more. Edge blocks
/// gather out-of-range samples with clamped coordinates and write back only
/// in-bounds samples. Work is distributed over `pool` in 8-row bands.
///
/// # Errors
///
/// Returns [`OpsError::InvalidDimensions`] for empty images.
pub fn attenuate(src: &FloatImage, quality: u8, pool: &ThreadPool) -> OpsResult<FloatImage> {
    let (width, height) = src.dimensions();
    let channels = src.channels();
    if width == 0 || height == 0 || channels == 0 {
        return Err(OpsError::InvalidDimensions(format!(
            "cannot attenuate a {width}x{height}x{channels} image"
        )));
    }

    let quality = quality.clamp(1, 100);
    let quant = build_quality_table(quality);
    let tiles_x = width.div_ceil(8);

    let mut output = FloatImage::new(width, height, channels);
    let row_len = width * channels;
    let band_len = row_len * 8;

    pool.parallel_rows(output.data_mut(), band_len, |band_index, band| {
        let base_y = band_index * 8;
        let rows_in_band = band.len() / row_len;

        for tile_x in 0..tiles_x {
            let base_x = tile_x * 8;
            for c in 0..channels {
                let mut block = [0.0f32; 64];
                for yy in 0..8 {
                    let src_y = (base_y + yy).min(height - 1);
                    for xx in 0..8 {
                        let src_x = (base_x + xx).min(width - 1);
                        block[yy * 8 + xx] = src.sample(src_x, src_y, c);
                    }
                }

                forward_dct(&mut block);
                if quality < 100 {
                    for (i, coeff) in block.iter_mut().enumerate().skip(1) {
                        let q = quant[i];
                        *coeff = (*coeff / q).round() * q;
                    }
                }
                inverse_dct(&mut block);

                for yy in 0..rows_in_band {
                    for xx in 0..8 {
                        let dst_x = base_x + xx;
                        if dst_x >= width {
                            break;
                        }
                        band[yy * row_len + dst_x * channels + c] = block[yy * 8 + xx];
                    }
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

    fn neighbor_energy(img: &FloatImage) -> f32 {
        let (width, height) = img.dimensions();
        let mut total = 0.0f32;
        for c in 0..img.channels() {
            for y in 0..height {
                for x in 0..width - 1 {
                    let d = img.sample(x + 1, y, c) - img.sample(x, y, c);
                    total += d * d;
                }
            }
            for y in 0..height - 1 {
                for x in 0..width {
                    let d = img.sample(x, y + 1, c) - img.sample(x, y, c);
                    total += d * d;
                }
            }
        }
        total
    }

    #[test]
    fn test_transform_pair_is_identity() {
        let mut block = [0.0f32; 64];
        for (i, v) in block.iter_mut().enumerate() {
            *v = ((i * 7) % 13) as f32 / 13.0;
        }
        let original = block;
        forward_dct(&mut block);
        inverse_dct(&mut block);
        for (a, b) in original.iter().zip(block.iter()) {
            assert_abs_diff_eq!(a, b, epsilon = 1e-5);
        }
    }

    #[test]
    fn test_quality_table_bounds() {
        let table = build_quality_table(10);
        assert_eq!(table[0], 1.0);
        assert!(table.iter().all(|&q| (1.0..=255.0).contains(&q)));
        assert_eq!(build_quality_table(100), [1.0f32; 64]);
    }

    #[test]
    fn test_constant_field_is_invariant() {
        let pool = ThreadPool::serial();
        let src = FloatImage::from_data(16, 16, 3, vec![0.25; 16 * 16 * 3]).unwrap();
        let out = attenuate(&src, 25, &pool).unwrap();
        for &v in out.data() {
            assert_abs_diff_eq!(v, 0.25, epsilon = 1e-5);
        }
    }

    #[test]
    fn test_quality_100_reproduces_input() {
        let pool = ThreadPool::serial();
        let mut data = Vec::new();
        for y in 0..12 {
            for x in 0..20 {
                let base = ((x * 3 + y * 5) % 17) as f32 / 17.0;
                data.push(base);
                data.push(base + 0.01);
            }
        }
        let src = FloatImage::from_data(20, 12, 2, data).unwrap();
        let out = attenuate(&src, 100, &pool).unwrap();
        for (a, b) in src.data().iter().zip(out.data().iter()) {
            assert_abs_diff_eq!(a, b, epsilon = 1e-5);
        }
    }

    #[test]
    fn test_lower_quality_damps_more() {
        let pool = ThreadPool::serial();
        let mut data = Vec::new();
        for y in 0..24 {
            for x in 0..32 {
                data.push(((x + y) as f32 * std::f32::consts::PI / 4.0).sin());
            }
        }
        let src = FloatImage::from_data(32, 24, 1, data).unwrap();
        let high = attenuate(&src, 90, &pool).unwrap();
        let low = attenuate(&src, 10, &pool).unwrap();
        assert!(neighbor_energy(&low) < neighbor_energy(&high));
    }

    #[test]
    fn test_edge_blocks_on_non_multiple_sizes() {
        let pool = ThreadPool::serial();
        let data: Vec<f32> = (0..13 * 11 * 3).map(|i| (i % 7) as f32 / 7.0).collect();
        let src = FloatImage::from_data(13, 11, 3, data).unwrap();
        let out = attenuate(&src, 60, &pool).unwrap();
        assert_eq!(out.dimensions(), (13, 11));
        assert!(out.data().iter().all(|v| v.is_finite()));
    }

    #[test]
    fn test_parallel_matches_serial() {
        let serial = ThreadPool::serial();
        let parallel = ThreadPool::new(4).unwrap();
        let data: Vec<f32> = (0..40 * 33 * 3)
            .map(|i| ((i * 29) % 97) as f32 / 96.0)
            .collect();
        let src = FloatImage::from_data(40, 33, 3, data).unwrap();
        let a = attenuate(&src, 60, &serial).unwrap();
        let b = attenuate(&src, 60, &parallel).unwrap();
        assert_eq!(a.data(), b.data());
    }
}
