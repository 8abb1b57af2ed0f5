//! Human-readable size specifications ("512KB", "16MB") and byte formatting

use crate::error::SizeError;
use crate::protocol::MAX_DATA_SIZE;

const KIB: u64 = 1024;
const MIB: u64 = 1024 * 1024;
const GIB: u64 = 1024 * 1024 * 1024;

/// Unit suffixes in match order. "B" must come last since every other
/// suffix also ends with it.
const UNITS: &[(&str, u64)] = &[("KB", KIB), ("MB", MIB), ("GB", GIB), ("B", 1)];

/// Parse a size specification into a byte count.
///
/// The input is trimmed and uppercased, an optional `B`, `KB`, `MB` or `GB`
/// suffix selects a binary multiplier, and the remaining prefix must be an
/// unsigned 32-bit decimal integer. The product must not exceed
/// [`MAX_DATA_SIZE`].
pub fn parse_size(input: &str) -> Result<u32, SizeError> {
    let normalized = input.trim().to_uppercase();

    let (digits, multiplier) = UNITS
        .iter()
        .find_map(|(suffix, factor)| normalized.strip_suffix(suffix).map(|rest| (rest, *factor)))
        .unwrap_or((normalized.as_str(), 1));

    let number = parse_number(digits).ok_or_else(|| SizeError::Malformed {
        input: input.to_string(),
    })?;

    let bytes = u64::from(number) * multiplier;
    if bytes > u64::from(MAX_DATA_SIZE) {
        return Err(SizeError::TooLarge {
            bytes,
            max: MAX_DATA_SIZE,
        });
    }

    // Bounded by MAX_DATA_SIZE above
    Ok(bytes as u32)
}

/// Plain decimal digits only: no sign, no whitespace, no radix prefix.
fn parse_number(digits: &str) -> Option<u32> {
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse::<u32>().ok()
}

/// Format a byte count using the largest fitting binary unit, e.g. `1.50 MB`
pub fn format_bytes(bytes: u64) -> String {
    if bytes >= GIB {
        format!("{:.2} GB", bytes as f64 / GIB as f64)
    } else if bytes >= MIB {
        format!("{:.2} MB", bytes as f64 / MIB as f64)
    } else if bytes >= KIB {
        format!("{:.2} KB", bytes as f64 / KIB as f64)
    } else {
        format!("{} B", bytes)
    }
}

/// Bytes as fractional mebibytes
pub fn to_mib(bytes: u64) -> f64 {
    bytes as f64 / MIB as f64
}
