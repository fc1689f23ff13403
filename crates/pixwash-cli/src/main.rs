//! pixwash - sanitize raster images before forwarding them downstream.
//!
//! Loads an image file, consults the security gate (pixel cap, polyglot
//! signature scan over the decoded pixels), runs the sanitize pipeline, and
//! writes the result.

use anyhow::{bail, Context, Result};
use clap::{Parser, ValueEnum};
use std::path::{Path, PathBuf};

use pixwash::{
    exceeds_pixel_cap, suspicious_polyglot_bytes, PixelBuffer, PixelBufferMut, PixelFormat,
    Sanitizer, ThreadPool,
};

#[derive(Parser)]
#[command(name = "pixwash")]
#[command(author, version, about = "Sanitize raster images for safe forwarding")]
#[command(long_about = "
Destroys data hidden in an image's pixel stream (steganographic payloads,
embedded polyglot signatures, generative high-frequency fingerprints) while
preserving its perceptual appearance.

Examples:
  pixwash photo.png clean.png
  pixwash photo.png clean.png --threads 4
  pixwash render.exr clean.exr --output-format f32
  pixwash suspicious.png clean.png --max-megapixels 24
")]
struct Cli {
    /// Input image file
    input: PathBuf,

    /// Destination for the sanitized image
    output: PathBuf,

    /// Output sample representation
    #[arg(long, value_enum, default_value = "auto")]
    output_format: OutputFormatArg,

    /// Number of worker threads (0 = auto)
    #[arg(short = 'j', long, default_value_t = 0)]
    threads: usize,

    /// Reject inputs larger than this many megapixels
    #[arg(long, default_value_t = 12.0)]
    max_megapixels: f64,

    /// Refuse inputs whose decoded pixels carry a foreign file signature
    /// instead of sanitizing them
    #[arg(long)]
    reject_suspicious: bool,

    /// Skip the downscale stage (currently informational)
    #[arg(long)]
    no_down: bool,

    /// Skip the bit-depth squeeze stage (currently informational)
    #[arg(long)]
    no_squeeze: bool,

    /// Skip the block-transform stage (currently informational)
    #[arg(long)]
    no_dct: bool,

    /// Skip the SR-lite refinement stage (currently informational)
    #[arg(long)]
    no_sr: bool,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormatArg {
    /// Match the input's representation
    Auto,
    /// 8-bit integer channels
    U8,
    /// 32-bit float channels
    F32,
}

fn init_logging(verbose: bool) {
    use tracing_subscriber::EnvFilter;

    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn warn_inert_toggles(cli: &Cli) {
    let disabled: Vec<&str> = [
        ("down", cli.no_down),
        ("squeeze", cli.no_squeeze),
        ("dct", cli.no_dct),
        ("sr", cli.no_sr),
    ]
    .iter()
    .filter_map(|&(name, set)| set.then_some(name))
    .collect();

    if !disabled.is_empty() {
        tracing::warn!(
            "stage toggles {} are currently informational; running the full sanitize pipeline",
            disabled.join(", ")
        );
    }
}

fn build_pool(threads: usize) -> Result<ThreadPool> {
    if threads == 0 {
        Ok(pixwash::default_pool().clone())
    } else {
        ThreadPool::new(threads).context("failed to start worker threads")
    }
}

/// Packs an f32 sample vector into native-endian bytes for the pipeline's
/// buffer views.
fn f32_to_bytes(samples: &[f32]) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(samples.len() * 4);
    for sample in samples {
        bytes.extend_from_slice(&sample.to_ne_bytes());
    }
    bytes
}

fn bytes_to_f32(bytes: &[u8]) -> Vec<f32> {
    bytes
        .chunks_exact(4)
        .map(|chunk| f32::from_ne_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]))
        .collect()
}

fn save_u8(path: &Path, width: u32, height: u32, data: Vec<u8>) -> Result<()> {
    let img = image::RgbImage::from_raw(width, height, data)
        .context("sanitized buffer does not match output dimensions")?;
    img.save(path)
        .with_context(|| format!("failed to write '{}'", path.display()))
}

fn save_f32(path: &Path, width: u32, height: u32, data: Vec<f32>) -> Result<()> {
    let img = image::Rgb32FImage::from_raw(width, height, data)
        .context("sanitized buffer does not match output dimensions")?;
    image::DynamicImage::ImageRgb32F(img)
        .save(path)
        .with_context(|| format!("failed to write '{}' (float output needs an EXR target)", path.display()))
}

fn run(cli: Cli) -> Result<()> {
    warn_inert_toggles(&cli);

    let decoded = image::open(&cli.input)
        .with_context(|| format!("failed to load '{}'", cli.input.display()))?;
    let width = decoded.width() as usize;
    let height = decoded.height() as usize;

    if exceeds_pixel_cap(width, height, cli.max_megapixels) {
        bail!(
            "input is {width}x{height}, above the {} megapixel cap",
            cli.max_megapixels
        );
    }

    let float_input = matches!(
        decoded,
        image::DynamicImage::ImageRgb32F(_) | image::DynamicImage::ImageRgba32F(_)
    );
    let float_output = match cli.output_format {
        OutputFormatArg::Auto => float_input,
        OutputFormatArg::U8 => false,
        OutputFormatArg::F32 => true,
    };

    // Decode to a packed RGB buffer in the input's representation class.
    let input_bytes: Vec<u8> = if float_input {
        f32_to_bytes(decoded.to_rgb32f().as_raw())
    } else {
        decoded.to_rgb8().into_raw()
    };
    let input_format = if float_input {
        PixelFormat::F32Rgb
    } else {
        PixelFormat::U8Rgb
    };

    if suspicious_polyglot_bytes(&input_bytes) {
        if cli.reject_suspicious {
            bail!("decoded pixels carry a foreign file signature");
        }
        tracing::warn!("decoded pixels carry a foreign file signature; sanitizing");
    }

    let input = PixelBuffer::packed(input_format, width, height, &input_bytes)
        .context("decoded image has an invalid geometry")?;

    let output_format = if float_output {
        PixelFormat::F32Rgb
    } else {
        PixelFormat::U8Rgb
    };
    let mut output_bytes = vec![0u8; width * height * output_format.bytes_per_pixel()];
    let mut output = PixelBufferMut::packed(output_format, width, height, &mut output_bytes)
        .context("output geometry is invalid")?;

    let sanitizer = Sanitizer::with_pool(build_pool(cli.threads)?);
    sanitizer
        .sanitize(&input, &mut output)
        .context("sanitize pipeline failed")?;

    tracing::info!(
        "sanitized {}x{} image ({} -> {})",
        width,
        height,
        input_format,
        output_format
    );

    if float_output {
        save_f32(&cli.output, width as u32, height as u32, bytes_to_f32(&output_bytes))
    } else {
        save_u8(&cli.output, width as u32, height as u32, output_bytes)
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    run(cli)
}
