//! Pre-pipeline security gate.
//!
//! Two pure, stateless checks callers run against untrusted input before
//! committing resources to it:
//!
//! - [`exceeds_pixel_cap`] rejects decompression-bomb-scale dimensions
//!   before any allocation happens.
//! - [`suspicious_polyglot_bytes`] flags byte buffers carrying the magic
//!   signature of another file format - an image that is also parseable as
//!   a PDF, archive, or executable is exactly the kind of payload the
//!   pipeline exists to destroy.

/// Pixels per megapixel.
const MEGAPIXEL: f64 = 1_000_000.0;

/// Magic prefixes of file formats an image buffer has no business
/// containing: PDF, ZIP, 7-Zip/XZ, RAR, XML declaration, HTML doctype,
/// Windows PE, ELF.
const SIGNATURES: [&[u8]; 8] = [
    b"%PDF-",
    b"PK\x03\x04",
    b"7zXZ",
    b"Rar!",
    b"<?xml",
    b"<!DOCTYPE",
    b"MZ",
    b"ELF",
];

/// Returns `true` iff `width * height` exceeds `cap_megapixels` megapixels.
///
/// A straight arithmetic comparison in f64: zero dimensions and
/// non-positive caps get no special treatment beyond what the
/// multiplication itself produces.
///
/// # Example
///
/// ```rust
/// use pixwash::exceeds_pixel_cap;
///
/// assert!(!exceeds_pixel_cap(4000, 3000, 12.0));
/// assert!(exceeds_pixel_cap(6000, 4000, 12.0));
/// ```
pub fn exceeds_pixel_cap(width: usize, height: usize, cap_megapixels: f64) -> bool {
    (width as f64) * (height as f64) > cap_megapixels * MEGAPIXEL
}

/// Returns `true` if `buffer` contains a known foreign-format magic
/// signature anywhere in its contents.
///
/// Operates on a contiguous byte slice and never reads past its length;
/// non-contiguous views cannot reach this function without being copied
/// into one.
///
/// # Example
///
/// ```rust
/// use pixwash::suspicious_polyglot_bytes;
///
/// assert!(suspicious_polyglot_bytes(b"%PDF-1.7\n"));
/// assert!(!suspicious_polyglot_bytes(b"plain pixel data"));
/// ```
pub fn suspicious_polyglot_bytes(buffer: &[u8]) -> bool {
    SIGNATURES.iter().any(|sig| contains(buffer, sig))
}

/// Substring search over raw bytes.
fn contains(haystack: &[u8], needle: &[u8]) -> bool {
    if needle.is_empty() || haystack.len() < needle.len() {
        return false;
    }
    haystack.windows(needle.len()).any(|window| window == needle)
}
