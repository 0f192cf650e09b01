//! Swim time parsing.
//!
//! Converts provider-supplied duration strings ("1:05.32" or "58.10") into
//! seconds. Unparseable input never errors — it maps to [`UNPARSEABLE`],
//! which compares greater than any legitimate time, so a minimum-selection
//! over a list of swims degrades gracefully instead of failing.

/// Sentinel returned for unparseable or absent input.
///
/// Must stay above [`USABLE_CUTOFF`] so downstream filtering discards it.
pub const UNPARSEABLE: f64 = 9999.99;

/// Parsed values at or above this threshold are placeholders, not real swims.
/// No collegiate result in any sampled event approaches 999 seconds.
pub const USABLE_CUTOFF: f64 = 999.0;

/// Parse a time string into seconds.
///
/// "MM:SS.ss" splits on the colon into minutes and seconds; anything else
/// parses as plain seconds. Whitespace is trimmed. Every failure mode
/// (absent input, extra colons, non-numeric parts, non-finite values)
/// returns [`UNPARSEABLE`].
pub fn parse_seconds(raw: Option<&str>) -> f64 {
    let Some(raw) = raw else {
        return UNPARSEABLE;
    };
    let raw = raw.trim();

    let value = if raw.contains(':') {
        let mut parts = raw.split(':');
        let (Some(min), Some(sec), None) = (parts.next(), parts.next(), parts.next()) else {
            return UNPARSEABLE;
        };
        match (min.trim().parse::<f64>(), sec.trim().parse::<f64>()) {
            (Ok(m), Ok(s)) => m * 60.0 + s,
            _ => return UNPARSEABLE,
        }
    } else {
        match raw.parse::<f64>() {
            Ok(s) => s,
            Err(_) => return UNPARSEABLE,
        }
    };

    if value.is_finite() {
        value
    } else {
        UNPARSEABLE
    }
}

/// True when a parsed value represents a real swim rather than a placeholder.
pub fn is_usable(seconds: f64) -> bool {
    seconds < USABLE_CUTOFF
}
