//! Benchmark support for the pixwash pipeline.
//!
//! The benchmarks live in `benches/pipeline.rs`; this library only carries
//! the shared workload generator so the fixture is identical everywhere.

/// Builds the fixed benchmark workload: a `width x height` RGB byte image
/// with interleaved diagonal gradients per channel.
pub fn gradient_workload(width: usize, height: usize) -> Vec<u8> {
    let mut data = vec![0u8; width * height * 3];
    for y in 0..height {
        for x in 0..width {
            let idx = (y * width + x) * 3;
            data[idx] = ((x + y) % 256) as u8;
            data[idx + 1] = ((x * 2 + y) % 256) as u8;
            data[idx + 2] = ((x + y * 2) % 256) as u8;
        }
    }
    data
}
