//! Synthetic image fixtures shared across the integration tests.

use pixwash_core::FloatImage;

/// Smooth multi-frequency sine pattern with per-channel modulation.
pub fn sine_pattern(width: usize, height: usize, channels: usize) -> FloatImage {
    let mut data = Vec::with_capacity(width * height * channels);
    for y in 0..height {
        let fy = y as f32 / height as f32;
        for x in 0..width {
            let fx = x as f32 / width as f32;
            let base = 0.5
                + 0.25 * (std::f32::consts::TAU * fx * 3.0).sin()
                + 0.25 * (std::f32::consts::TAU * fy * 5.0).sin();
            for c in 0..channels {
                let modulation = 0.1 * (std::f32::consts::TAU * (c + 1) as f32 * fx).cos();
                data.push((base + modulation).clamp(0.0, 1.0));
            }
        }
    }
    FloatImage::from_data(width, height, channels, data).unwrap()
}

/// Binary checkerboard with the given tile period.
pub fn checkerboard(width: usize, height: usize, channels: usize, period: usize) -> FloatImage {
    let mut data = Vec::with_capacity(width * height * channels);
    for y in 0..height {
        for x in 0..width {
            let value = (((x + y) / period) % 2) as f32;
            for _ in 0..channels {
                data.push(value);
            }
        }
    }
    FloatImage::from_data(width, height, channels, data).unwrap()
}

/// 3x3 binomial blur with edge padding, used to soften fixtures.
pub fn gaussian_blur3(image: &FloatImage) -> FloatImage {
    const KERNEL: [[f32; 3]; 3] = [[1.0, 2.0, 1.0], [2.0, 4.0, 2.0], [1.0, 2.0, 1.0]];
    let (width, height) = image.dimensions();
    let channels = image.channels();
    let mut output = FloatImage::new(width, height, channels);
    for y in 0..height {
        for x in 0..width {
            for c in 0..channels {
                let mut sum = 0.0f32;
                for (ky, row) in KERNEL.iter().enumerate() {
                    let sy = (y + ky).saturating_sub(1).min(height - 1);
                    for (kx, &weight) in row.iter().enumerate() {
                        let sx = (x + kx).saturating_sub(1).min(width - 1);
                        sum += weight * image.sample(sx, sy, c);
                    }
                }
                output.row_mut(y)[x * channels + c] = sum / 16.0;
            }
        }
    }
    output
}
