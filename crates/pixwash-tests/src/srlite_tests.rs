//! Detail synthesis must sharpen relative to naive resampling.

use pixwash_core::{FloatImage, ThreadPool};
use pixwash_ops::upscale2x;

use crate::fixtures::gaussian_blur3;
use crate::metrics::max_row_gradient;
use crate::reference::bicubic_resize;

/// Builds the softened low-resolution rendition of a two-tone vertical step
/// edge, the way a downscale of a sharp source would produce it.
fn soft_step_low_res(width: usize, height: usize) -> FloatImage {
    let hi_width = width * 2;
    let hi_height = height * 2;
    let mut hi = FloatImage::new(hi_width, hi_height, 3);
    for y in 0..hi_height {
        let row = hi.row_mut(y);
        for x in 0..hi_width {
            let value = if x < hi_width / 2 { 0.2 } else { 0.85 };
            for c in 0..3 {
                row[x * 3 + c] = value;
            }
        }
    }

    // 2x2 block means, then a slight blur.
    let mut low = FloatImage::new(width, height, 3);
    for y in 0..height {
        let row = low.row_mut(y);
        for x in 0..width {
            for c in 0..3 {
                let sum = hi.sample(x * 2, y * 2, c)
                    + hi.sample(x * 2 + 1, y * 2, c)
                    + hi.sample(x * 2, y * 2 + 1, c)
                    + hi.sample(x * 2 + 1, y * 2 + 1, c);
                row[x * 3 + c] = sum / 4.0;
            }
        }
    }
    gaussian_blur3(&low)
}

#[test]
fn sharpens_step_edges_beyond_bicubic() {
    let pool = ThreadPool::new(2).unwrap();
    let width = 24;
    let height = 18;
    let low_res = soft_step_low_res(width, height);

    let sr = upscale2x(&low_res, &pool).unwrap();
    let baseline = bicubic_resize(&low_res, width * 2, height * 2);

    let center_row = height; // hi_height / 2
    let sr_grad = max_row_gradient(&sr, center_row, 0);
    let baseline_grad = max_row_gradient(&baseline, center_row, 0);

    assert!(
        sr_grad > baseline_grad * 1.05,
        "sr gradient {sr_grad:.4} not 5% above bicubic {baseline_grad:.4}"
    );

    assert!(sr
        .data()
        .iter()
        .all(|v| v.is_finite() && (0.0..=1.0).contains(v)));
}
