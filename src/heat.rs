//! Popularity ("heat") normalization
//!
//! Trending lists print popularity with Chinese or pinyin unit suffixes: `948.1w` is 948.1
//! 万 (ten-thousands), `1.2千万` is 1.2 × 10^7. [`parse_heat`] turns these into plain integers.

/// Unit markers, checked in order. `千万` must come before `万` and `千`, which it contains.
const UNITS: [(&str, u64); 5] = [
    ("千万", 10_000_000),
    ("w", 10_000),
    ("万", 10_000),
    ("千", 1_000),
    ("k", 1_000),
];

/// Fraction digits beyond this cannot change the result
const MAX_FRACTION_DIGITS: usize = 18;

/// Parse a heat string into an absolute integer
///
/// Returns `None` for anything that is not a non-negative decimal number, optionally followed
/// by a unit marker. Fractional results are truncated toward zero.
///
/// # Examples
///
/// ```
/// use hotlist_dl::heat::parse_heat;
///
/// assert_eq!(parse_heat("948.1w"), Some(9_481_000));
/// assert_eq!(parse_heat("1000"), Some(1000));
/// assert_eq!(parse_heat("abc"), None);
/// assert_eq!(parse_heat(""), None);
/// ```
#[must_use]
pub fn parse_heat(text: &str) -> Option<u64> {
    let text = text.trim().to_lowercase();
    if text.is_empty() {
        return None;
    }

    for (marker, multiplier) in UNITS {
        if text.contains(marker)
            && let Some(value) = scale(&text.replace(marker, ""), multiplier)
        {
            return Some(value);
        }
    }

    scale(&text, 1)
}

/// Multiply a plain decimal by `multiplier` in integer arithmetic
///
/// `52.3` × 10^4 must be exactly 523000, which a float product does not guarantee.
fn scale(number: &str, multiplier: u64) -> Option<u64> {
    let number = number.trim();
    let (whole, fraction) = number.split_once('.').unwrap_or((number, ""));
    if whole.is_empty() && fraction.is_empty() {
        return None;
    }
    if !whole.bytes().chain(fraction.bytes()).all(|b| b.is_ascii_digit()) {
        return None;
    }

    let multiplier = u128::from(multiplier);
    let whole: u128 = if whole.is_empty() { 0 } else { whole.parse().ok()? };
    let fraction = &fraction[..fraction.len().min(MAX_FRACTION_DIGITS)];
    let fraction_part = if fraction.is_empty() {
        0
    } else {
        let digits: u128 = fraction.parse().ok()?;
        digits.checked_mul(multiplier)? / 10u128.pow(fraction.len() as u32)
    };

    let total = whole.checked_mul(multiplier)?.checked_add(fraction_part)?;
    u64::try_from(total).ok()
}
