//! Lossy number parsing for counters scraped out of display text.

/// Parse the digits of `text` as a single number.
///
/// Every non-digit character is dropped and the remaining digits are read
/// as one value, so `"Sub: 2 4"` gives 24. Returns 0 when no digits are
/// left or the value does not fit in a `u32`.
pub fn parse_number(text: &str) -> u32 {
    let digits: String = text.chars().filter(|c| c.is_ascii_digit()).collect();
    digits.parse().unwrap_or(0)
}
