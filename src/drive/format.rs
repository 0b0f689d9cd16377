//! Formatting and identifier helpers for drive records.

use chrono::Utc;
use rand::Rng;
use uuid::Uuid;

/// Size units used by [`format_file_size`].
const SIZE_UNITS: [&str; 4] = ["Bytes", "KB", "MB", "GB"];

/// Characters used for the random part of generated IDs.
const ID_ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Length of the random part of generated IDs.
const ID_RANDOM_LEN: usize = 9;

/// Format a byte count with 1024-based units, at most two decimals and no
/// trailing zeros. Sizes of 1 TiB and above are expressed in GB.
///
/// # Examples
///
/// ```
/// use clouddrive::drive::format_file_size;
///
/// assert_eq!(format_file_size(0), "0 Bytes");
/// assert_eq!(format_file_size(1536), "1.5 KB");
/// assert_eq!(format_file_size(2_097_152), "2 MB");
/// ```
pub fn format_file_size(bytes: u64) -> String {
    if bytes == 0 {
        return "0 Bytes".to_string();
    }

    let mut unit = 0;
    let mut scale: u64 = 1;
    while unit + 1 < SIZE_UNITS.len() && bytes >= scale * 1024 {
        scale *= 1024;
        unit += 1;
    }

    let value = (bytes as f64 / scale as f64 * 100.0).round() / 100.0;
    format!("{} {}", trim_decimal(value), SIZE_UNITS[unit])
}

/// Print a value rounded to two decimals without trailing zeros.
fn trim_decimal(value: f64) -> String {
    let text = format!("{value:.2}");
    text.trim_end_matches('0').trim_end_matches('.').to_string()
}

/// Generate a record ID: the current time in milliseconds followed by nine
/// random base-36 characters.
pub fn generate_id() -> String {
    let mut rng = rand::rng();
    let suffix: String = (0..ID_RANDOM_LEN)
        .map(|_| ID_ALPHABET[rng.random_range(0..ID_ALPHABET.len())] as char)
        .collect();
    format!("{}{suffix}", Utc::now().timestamp_millis())
}

/// Generate an opaque object URL standing in for uploaded content.
pub fn generate_object_url() -> String {
    format!("blob:clouddrive/{}", Uuid::new_v4())
}
