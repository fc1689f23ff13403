//! Image quality metrics used by the integration tests.

use pixwash_core::FloatImage;

/// Rec. 601 luma weights.
const LUMA: [f32; 3] = [0.299, 0.587, 0.114];

/// Peak signal-to-noise ratio in dB against a [0, 1] full scale.
///
/// Returns infinity for (near-)identical images.
pub fn psnr(a: &FloatImage, b: &FloatImage) -> f64 {
    assert_eq!(a.data().len(), b.data().len(), "psnr needs equal shapes");
    let mse: f64 = a
        .data()
        .iter()
        .zip(b.data())
        .map(|(&x, &y)| {
            let d = f64::from(x) - f64::from(y);
            d * d
        })
        .sum::<f64>()
        / a.data().len() as f64;
    if mse <= 1e-12 {
        return f64::INFINITY;
    }
    10.0 * (1.0 / mse).log10()
}

/// Collapses a 3-channel image to a luma plane.
fn to_grayscale(image: &FloatImage) -> Vec<f32> {
    assert_eq!(image.channels(), 3);
    image
        .data()
        .chunks_exact(3)
        .map(|px| px[0] * LUMA[0] + px[1] * LUMA[1] + px[2] * LUMA[2])
        .collect()
}

/// Mean squared 4-neighbor Laplacian response over the luma plane, with
/// edge padding. A direct noise/high-frequency energy measure.
pub fn laplacian_energy(image: &FloatImage) -> f64 {
    let (width, height) = image.dimensions();
    let gray = to_grayscale(image);
    let at = |x: isize, y: isize| -> f32 {
        let cx = x.clamp(0, width as isize - 1) as usize;
        let cy = y.clamp(0, height as isize - 1) as usize;
        gray[cy * width + cx]
    };

    let mut energy = 0.0f64;
    for y in 0..height as isize {
        for x in 0..width as isize {
            let lap = 4.0 * at(x, y) - at(x - 1, y) - at(x + 1, y) - at(x, y - 1) - at(x, y + 1);
            energy += f64::from(lap) * f64::from(lap);
        }
    }
    energy / (width * height) as f64
}

/// Global (single-window) structural similarity over the luma planes.
pub fn global_ssim(a: &FloatImage, b: &FloatImage) -> f64 {
    let gray_a = to_grayscale(a);
    let gray_b = to_grayscale(b);
    assert_eq!(gray_a.len(), gray_b.len(), "ssim needs equal shapes");

    let n = gray_a.len() as f64;
    let mu_a: f64 = gray_a.iter().map(|&v| f64::from(v)).sum::<f64>() / n;
    let mu_b: f64 = gray_b.iter().map(|&v| f64::from(v)).sum::<f64>() / n;

    let mut sigma_a = 0.0f64;
    let mut sigma_b = 0.0f64;
    let mut sigma_ab = 0.0f64;
    for (&x, &y) in gray_a.iter().zip(gray_b.iter()) {
        let da = f64::from(x) - mu_a;
        let db = f64::from(y) - mu_b;
        sigma_a += da * da;
        sigma_b += db * db;
        sigma_ab += da * db;
    }
    sigma_a /= n;
    sigma_b /= n;
    sigma_ab /= n;

    let c1 = 0.01f64.powi(2);
    let c2 = 0.03f64.powi(2);
    ((2.0 * mu_a * mu_b + c1) * (2.0 * sigma_ab + c2))
        / ((mu_a * mu_a + mu_b * mu_b + c1) * (sigma_a + sigma_b + c2))
}

/// Largest horizontal adjacent-sample difference along one row of one
/// channel.
pub fn max_row_gradient(image: &FloatImage, y: usize, channel: usize) -> f32 {
    let channels = image.channels();
    let row = image.row(y);
    let mut max_grad = 0.0f32;
    for x in 1..image.width() {
        let grad = (row[x * channels + channel] - row[(x - 1) * channels + channel]).abs();
        max_grad = max_grad.max(grad);
    }
    max_grad
}
