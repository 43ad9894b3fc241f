//! Download naming and human-readable sizes for extracted payloads.

use crate::signature::FileKind;

/// Stem given to every extracted payload.
pub const EXTRACTED_STEM: &str = "extracted_data";

const UNITS: [&str; 4] = ["Bytes", "KB", "MB", "GB"];

/// `extracted_data` followed by `ext` (which carries its own dot).
pub fn download_name(ext: &str) -> String {
    format!("{EXTRACTED_STEM}{ext}")
}

pub fn download_name_for(kind: FileKind) -> String {
    download_name(kind.extension())
}

/// Base-1024 size with at most two decimals and no trailing zeros.
/// Sizes of 1 TiB and above stay in GB.
pub fn format_bytes(bytes: u64) -> String {
    if bytes == 0 {
        return "0 Bytes".to_string();
    }
    let mut unit = 0;
    let mut value = bytes as f64;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    format!("{} {}", trim_decimals(value), UNITS[unit])
}

/// Capacity line shown next to the raw byte count, e.g.
/// `1048576 bytes (~1.0 MB)`.
pub fn capacity_summary(bytes: u64) -> String {
    format!("{} bytes (~{:.1} MB)", bytes, bytes as f64 / 1024.0 / 1024.0)
}

fn trim_decimals(value: f64) -> String {
    let fixed = format!("{value:.2}");
    let trimmed = fixed.trim_end_matches('0').trim_end_matches('.');
    trimmed.to_string()
}
