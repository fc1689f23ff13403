//! Independent reference bicubic resizer.
//!
//! Deliberately implemented apart from `pixwash-ops`: a classic separable
//! bicubic (Catmull-Rom) with kernel support widened by the scale factor on
//! downscale and clamped edge extension - the behavior of the common
//! antialiased bicubic resizers. The resampling tests hold the pipeline's
//! resampler against this implementation.

use pixwash_core::FloatImage;

/// Catmull-Rom kernel (a = -0.5).
fn catmull_rom(x: f32) -> f32 {
    const A: f32 = -0.5;
    let x = x.abs();
    if x < 1.0 {
        (A + 2.0) * x.powi(3) - (A + 3.0) * x.powi(2) + 1.0
    } else if x < 2.0 {
        A * x.powi(3) - 5.0 * A * x.powi(2) + 8.0 * A * x - 4.0 * A
    } else {
        0.0
    }
}

fn resize_axis_h(src: &FloatImage, dst_w: usize) -> FloatImage {
    let (src_w, src_h) = src.dimensions();
    let channels = src.channels();
    let scale = src_w as f32 / dst_w as f32;
    let filter_scale = scale.max(1.0);
    let support = 2.0 * filter_scale;

    let mut dst = FloatImage::new(dst_w, src_h, channels);
    for y in 0..src_h {
        let src_row = src.row(y);
        let dst_row = dst.row_mut(y);
        for x in 0..dst_w {
            let center = (x as f32 + 0.5) * scale - 0.5;
            let left = (center - support).floor().max(0.0) as usize;
            let right = ((center + support).ceil() as usize).min(src_w - 1);

            let mut sums = vec![0.0f32; channels];
            let mut weight_sum = 0.0f32;
            for sx in left..=right {
                let weight = catmull_rom((sx as f32 - center) / filter_scale);
                if weight == 0.0 {
                    continue;
                }
                weight_sum += weight;
                for (c, sum) in sums.iter_mut().enumerate() {
                    *sum += weight * src_row[sx * channels + c];
                }
            }
            if weight_sum != 0.0 {
                for (c, sum) in sums.iter().enumerate() {
                    dst_row[x * channels + c] = sum / weight_sum;
                }
            }
        }
    }
    dst
}

fn resize_axis_v(src: &FloatImage, dst_h: usize) -> FloatImage {
    let (src_w, src_h) = src.dimensions();
    let channels = src.channels();
    let scale = src_h as f32 / dst_h as f32;
    let filter_scale = scale.max(1.0);
    let support = 2.0 * filter_scale;

    let mut dst = FloatImage::new(src_w, dst_h, channels);
    for y in 0..dst_h {
        let center = (y as f32 + 0.5) * scale - 0.5;
        let top = (center - support).floor().max(0.0) as usize;
        let bottom = ((center + support).ceil() as usize).min(src_h - 1);

        let dst_row = dst.row_mut(y);
        for x in 0..src_w {
            let mut sums = vec![0.0f32; channels];
            let mut weight_sum = 0.0f32;
            for sy in top..=bottom {
                let weight = catmull_rom((sy as f32 - center) / filter_scale);
                if weight == 0.0 {
                    continue;
                }
                weight_sum += weight;
                for (c, sum) in sums.iter_mut().enumerate() {
                    *sum += weight * src.sample(x, sy, c);
                }
            }
            if weight_sum != 0.0 {
                for (c, sum) in sums.iter().enumerate() {
                    dst_row[x * channels + c] = (sum / weight_sum).clamp(0.0, 1.0);
                }
            }
        }
    }
    dst
}

/// Separable antialiased bicubic resize, horizontal then vertical.
pub fn bicubic_resize(src: &FloatImage, out_width: usize, out_height: usize) -> FloatImage {
    let horizontal = resize_axis_h(src, out_width);
    resize_axis_v(&horizontal, out_height)
}
