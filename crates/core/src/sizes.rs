//! Byte-count parsing and compression arithmetic.
//!
//! Sizes are persisted as decimal strings and turned back into numbers at
//! read time. The helpers here define that conversion once so the list
//! endpoint and the dashboard agree on what "not a number" means.

/// Stored value used when the client did not report an original size.
pub const UNKNOWN_SIZE: &str = "0";

/// Parse a byte count stored as a decimal string.
///
/// - `None` or a blank string yields `Some(0.0)`.
/// - A string that is not a number yields `None`.
/// - Surrounding whitespace is ignored.
pub fn parse_stored_size(raw: Option<&str>) -> Option<f64> {
    let trimmed = match raw {
        None => return Some(0.0),
        Some(s) => s.trim(),
    };
    if trimmed.is_empty() {
        return Some(0.0);
    }
    trimmed.parse::<f64>().ok()
}

/// Normalize a client-submitted original size before it is stored.
///
/// Blank input is stored as [`UNKNOWN_SIZE`]; anything else is kept verbatim
/// (trimmed) so the stored value reflects what the client reported.
pub fn normalize_submitted_size(raw: Option<&str>) -> String {
    match raw.map(str::trim) {
        Some(s) if !s.is_empty() => s.to_string(),
        _ => UNKNOWN_SIZE.to_string(),
    }
}

/// Percentage saved by compression: `round((1 - compressed / original) * 100)`.
///
/// Returns `None` when `original` is zero (or negative) or when either size
/// is not a finite number. The result is negative if the "compressed" asset
/// is larger than the original.
pub fn compression_percentage(original: f64, compressed: f64) -> Option<i64> {
    if !original.is_finite() || !compressed.is_finite() || original <= 0.0 {
        return None;
    }
    let ratio = (1.0 - compressed / original) * 100.0;
    Some(round_half_up(ratio) as i64)
}

/// Round to the nearest integer, with ties going towards positive infinity.
pub fn round_half_up(value: f64) -> f64 {
    (value + 0.5).floor()
}
