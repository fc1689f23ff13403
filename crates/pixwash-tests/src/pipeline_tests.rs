//! End-to-end sanitize pipeline properties.

use pixwash::{PixelBuffer, PixelBufferMut, PixelFormat, Sanitizer, ThreadPool};
use pixwash_core::FloatImage;

use crate::metrics::{global_ssim, laplacian_energy, psnr};

const NOISE_AMPLITUDE: [f32; 3] = [0.08, -0.06, 0.04];

/// 4-pixel checkerboard tiles at 0.25 / 0.75.
fn clean_checkerboard(width: usize, height: usize) -> FloatImage {
    let mut data = Vec::with_capacity(width * height * 3);
    for y in 0..height {
        for x in 0..width {
            let tile = ((x / 4) + (y / 4)) % 2;
            let value = if tile == 0 { 0.25 } else { 0.75 };
            for _ in 0..3 {
                data.push(value);
            }
        }
    }
    FloatImage::from_data(width, height, 3, data).unwrap()
}

/// Adds deterministic per-pixel, per-channel noise.
fn with_noise(base: &FloatImage) -> FloatImage {
    let (width, height) = base.dimensions();
    let mut data = Vec::with_capacity(width * height * 3);
    for y in 0..height {
        for x in 0..width {
            let noise = ((x * 13 + y * 17) % 31) as f32 / 30.0 - 0.5;
            for (c, &amplitude) in NOISE_AMPLITUDE.iter().enumerate() {
                data.push((base.sample(x, y, c) + noise * amplitude).clamp(0.0, 1.0));
            }
        }
    }
    FloatImage::from_data(width, height, 3, data).unwrap()
}

fn to_u8_bytes(image: &FloatImage) -> Vec<u8> {
    image
        .data()
        .iter()
        .map(|&v| (v.clamp(0.0, 1.0) * 255.0).round() as u8)
        .collect()
}

fn from_u8_bytes(width: usize, height: usize, bytes: &[u8]) -> FloatImage {
    let data = bytes.iter().map(|&b| f32::from(b) / 255.0).collect();
    FloatImage::from_data(width, height, 3, data).unwrap()
}

#[test]
fn sanitize_reduces_noise_and_keeps_structure() {
    let width = 96;
    let height = 96;
    let clean = clean_checkerboard(width, height);
    let noisy = with_noise(&clean);

    let input_bytes = to_u8_bytes(&noisy);
    let input = PixelBuffer::packed(PixelFormat::U8Rgb, width, height, &input_bytes).unwrap();
    let mut output_bytes = vec![0u8; width * height * 3];
    let mut output =
        PixelBufferMut::packed(PixelFormat::U8Rgb, width, height, &mut output_bytes).unwrap();

    let sanitizer = Sanitizer::with_pool(ThreadPool::new(4).unwrap());
    sanitizer.sanitize(&input, &mut output).unwrap();

    let result = from_u8_bytes(width, height, &output_bytes);
    assert!(result.data().iter().all(|v| v.is_finite()));

    let input_energy = laplacian_energy(&noisy);
    let output_energy = laplacian_energy(&result);
    assert!(
        output_energy < input_energy,
        "noise energy did not drop: {output_energy:.5} vs {input_energy:.5}"
    );

    let score = global_ssim(&result, &clean);
    assert!(score >= 0.85, "ssim {score:.3} below 0.85");
}

#[test]
fn sanitize_output_tracks_input() {
    // The sanitized image must still resemble its own input.
    let width = 64;
    let height = 64;
    let clean = clean_checkerboard(width, height);
    let input_bytes = to_u8_bytes(&clean);
    let input = PixelBuffer::packed(PixelFormat::U8Rgb, width, height, &input_bytes).unwrap();
    let mut output_bytes = vec![0u8; width * height * 3];
    let mut output =
        PixelBufferMut::packed(PixelFormat::U8Rgb, width, height, &mut output_bytes).unwrap();

    Sanitizer::with_pool(ThreadPool::serial())
        .sanitize(&input, &mut output)
        .unwrap();

    let result = from_u8_bytes(width, height, &output_bytes);
    let score = psnr(&result, &clean);
    assert!(score >= 15.0, "output diverged from input: {score:.2} dB");
}

#[test]
fn representation_can_be_overridden_both_ways() {
    let width = 32;
    let height = 24;
    let clean = clean_checkerboard(width, height);
    let sanitizer = Sanitizer::with_pool(ThreadPool::serial());

    // u8 input, f32 output.
    let input_bytes = to_u8_bytes(&clean);
    let input = PixelBuffer::packed(PixelFormat::U8Rgb, width, height, &input_bytes).unwrap();
    let mut f32_bytes = vec![0u8; width * height * 12];
    let mut f32_output =
        PixelBufferMut::packed(PixelFormat::F32Rgb, width, height, &mut f32_bytes).unwrap();
    sanitizer.sanitize(&input, &mut f32_output).unwrap();
    let float_result = FloatImage::from_pixels(&f32_output.as_ref()).unwrap();
    assert!(float_result
        .data()
        .iter()
        .all(|v| (0.0..=1.0).contains(v)));

    // f32 input, u8 output.
    let mut float_in_bytes = vec![0u8; width * height * 12];
    {
        let mut view =
            PixelBufferMut::packed(PixelFormat::F32Rgb, width, height, &mut float_in_bytes)
                .unwrap();
        clean.write_pixels(&mut view).unwrap();
    }
    let float_input =
        PixelBuffer::packed(PixelFormat::F32Rgb, width, height, &float_in_bytes).unwrap();
    let mut u8_bytes = vec![0u8; width * height * 3];
    let mut u8_output =
        PixelBufferMut::packed(PixelFormat::U8Rgb, width, height, &mut u8_bytes).unwrap();
    sanitizer.sanitize(&float_input, &mut u8_output).unwrap();

    // Matching representations must agree up to rounding.
    let from_float = from_u8_bytes(width, height, &u8_bytes);
    let from_u8 = {
        let mut bytes = vec![0u8; width * height * 3];
        let mut out =
            PixelBufferMut::packed(PixelFormat::U8Rgb, width, height, &mut bytes).unwrap();
        sanitizer.sanitize(&input, &mut out).unwrap();
        from_u8_bytes(width, height, &bytes)
    };
    let score = psnr(&from_float, &from_u8);
    assert!(score >= 40.0, "representations diverged: {score:.2} dB");
}

#[test]
fn strided_output_padding_untouched() {
    let width = 16;
    let height = 16;
    let clean = clean_checkerboard(width, height);
    let input_bytes = to_u8_bytes(&clean);
    let input = PixelBuffer::packed(PixelFormat::U8Rgb, width, height, &input_bytes).unwrap();

    let stride = width * 3 + 5;
    let mut output_bytes = vec![0x7Fu8; stride * height];
    let mut output =
        PixelBufferMut::new(PixelFormat::U8Rgb, width, height, stride, &mut output_bytes).unwrap();
    Sanitizer::with_pool(ThreadPool::serial())
        .sanitize(&input, &mut output)
        .unwrap();

    for y in 0..height {
        for pad in width * 3..stride {
            assert_eq!(output_bytes[y * stride + pad], 0x7F);
        }
    }
}
