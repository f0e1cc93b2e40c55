//! Number → display text.
//!
//! Rounding follows fixed-point `toFixed` semantics: the exact binary value is
//! rounded to nearest, and exact ties round away from zero. Grouping only touches
//! the integer digit run, so a leading minus sign is never split from its number.

use tracing::debug;

use crate::config::FormatOptions;
use crate::error::{ConfigError, MAX_DECIMALS};

/// Validated, precomputed form of [`FormatOptions`].
#[derive(Clone, Debug, PartialEq)]
pub struct NumberFormat {
    decimals: usize,
    decimal_separator: String,
    /// `None` when the separator is empty or parses as a number.
    grouping: Option<String>,
    prefix: String,
    suffix: String,
    per_character_wrap: Option<String>,
}

impl NumberFormat {
    pub fn new(options: &FormatOptions) -> Result<Self, ConfigError> {
        if options.decimals < 0 {
            return Err(ConfigError::NegativeDecimals(options.decimals));
        }
        if options.decimals > MAX_DECIMALS {
            return Err(ConfigError::DecimalsOutOfRange {
                got: options.decimals,
            });
        }

        let sep = options.thousands_separator.as_str();
        let grouping = if sep.is_empty() {
            None
        } else if parses_as_number(sep) {
            debug!(separator = sep, "numeric thousands separator suppressed");
            None
        } else {
            Some(sep.to_string())
        };

        Ok(Self {
            decimals: options.decimals as usize,
            decimal_separator: options.decimal_separator.clone(),
            grouping,
            prefix: options.prefix.clone(),
            suffix: options.suffix.clone(),
            per_character_wrap: options
                .per_character_wrap
                .clone()
                .filter(|tag| !tag.is_empty()),
        })
    }

    #[inline]
    pub fn decimals(&self) -> usize {
        self.decimals
    }

    /// Separator actually inserted between digit groups, if any.
    #[inline]
    pub fn grouping(&self) -> Option<&str> {
        self.grouping.as_deref()
    }

    #[inline]
    pub fn per_character_wrap(&self) -> Option<&str> {
        self.per_character_wrap.as_deref()
    }

    #[inline]
    pub fn format(&self, value: f64) -> String {
        format_number(value, self)
    }

    /// Host-facing markup for already formatted text: per-character wrapped when a
    /// wrap tag is configured, otherwise the text itself.
    pub fn render(&self, text: &str) -> String {
        match &self.per_character_wrap {
            Some(tag) => wrap_per_character(text, tag),
            None => text.to_string(),
        }
    }
}

impl Default for NumberFormat {
    fn default() -> Self {
        Self {
            decimals: 0,
            decimal_separator: ".".into(),
            grouping: Some(",".into()),
            prefix: String::new(),
            suffix: String::new(),
            per_character_wrap: None,
        }
    }
}

/// Format `value` as `prefix + grouped integer + decimal part + suffix`.
pub fn format_number(value: f64, format: &NumberFormat) -> String {
    if !value.is_finite() {
        let word = if value.is_nan() {
            "NaN"
        } else if value > 0.0 {
            "Infinity"
        } else {
            "-Infinity"
        };
        return format!("{}{}{}", format.prefix, word, format.suffix);
    }

    let fixed = to_fixed(value, format.decimals);
    let (int_part, frac_part) = match fixed.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (fixed.as_str(), None),
    };

    let mut out =
        String::with_capacity(fixed.len() + format.prefix.len() + format.suffix.len() + 8);
    out.push_str(&format.prefix);
    match &format.grouping {
        Some(sep) => push_grouped(&mut out, int_part, sep),
        None => out.push_str(int_part),
    }
    if let Some(frac) = frac_part {
        out.push_str(&format.decimal_separator);
        out.push_str(frac);
    }
    out.push_str(&format.suffix);
    out
}

/// Wrap each character of `text` in `<tag>…</tag>`.
pub fn wrap_per_character(text: &str, tag: &str) -> String {
    let mut out = String::with_capacity(text.len() * (tag.len() * 2 + 6));
    for ch in text.chars() {
        out.push('<');
        out.push_str(tag);
        out.push('>');
        out.push(ch);
        out.push_str("</");
        out.push_str(tag);
        out.push('>');
    }
    out
}

/// Fixed-point rendering of a finite value with `decimals` fractional digits.
fn to_fixed(value: f64, decimals: usize) -> String {
    let magnitude = value.abs();
    let mut digits = if is_binary_tie(magnitude, decimals) {
        round_tie_away(magnitude, decimals)
    } else {
        format!("{magnitude:.decimals$}")
    };
    // "-0" and "-0.00" collapse to their unsigned form.
    if value.is_sign_negative() && digits.bytes().any(|b| matches!(b, b'1'..=b'9')) {
        digits.insert(0, '-');
    }
    digits
}

/// True when `x` lies exactly halfway between two values with `decimals` digits.
///
/// With `x = m * 2^e` and `m` odd, `2 * x * 10^d = m * 5^d * 2^(e + d + 1)` is an odd
/// integer exactly when `e + d + 1 == 0`.
fn is_binary_tie(x: f64, decimals: usize) -> bool {
    if x == 0.0 || !x.is_finite() {
        return false;
    }
    let bits = x.to_bits();
    let biased = ((bits >> 52) & 0x7ff) as i64;
    let fraction = bits & ((1u64 << 52) - 1);
    let (mantissa, exponent) = if biased == 0 {
        (fraction, -1074)
    } else {
        (fraction | (1u64 << 52), biased - 1075)
    };
    let exponent = exponent + i64::from(mantissa.trailing_zeros());
    exponent + decimals as i64 + 1 == 0
}

/// Round an exact tie away from zero. One extra digit renders the tie exactly
/// (ending in `5`); dropping it and bumping the last kept digit gives the result.
fn round_tie_away(magnitude: f64, decimals: usize) -> String {
    let mut exact = format!("{:.*}", decimals + 1, magnitude);
    exact.pop();
    if exact.ends_with('.') {
        exact.pop();
    }

    let mut bytes = exact.into_bytes();
    let mut carry = true;
    for b in bytes.iter_mut().rev() {
        match *b {
            b'.' => continue,
            b'9' => *b = b'0',
            d => {
                *b = d + 1;
                carry = false;
                break;
            }
        }
    }
    if carry {
        bytes.insert(0, b'1');
    }
    bytes.into_iter().map(char::from).collect()
}

/// Insert `sep` every three digits from the right of the digit run in `int_part`.
fn push_grouped(out: &mut String, int_part: &str, sep: &str) {
    let digits = match int_part.strip_prefix('-') {
        Some(rest) => {
            out.push('-');
            rest
        }
        None => int_part,
    };
    let len = digits.len();
    for (i, ch) in digits.char_indices() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push_str(sep);
        }
        out.push(ch);
    }
}

/// `parseFloat`-style check: does `s` begin with something numeric?
fn parses_as_number(s: &str) -> bool {
    let s = s.trim_start();
    let s = s.strip_prefix(|c: char| c == '+' || c == '-').unwrap_or(s);
    if s.starts_with("Infinity") {
        return true;
    }
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_digit() => true,
        Some('.') => chars.next().is_some_and(|c| c.is_ascii_digit()),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn to_fixed_rounds_ties_away_from_zero() {
        assert_eq!(to_fixed(0.5, 0), "1");
        assert_eq!(to_fixed(2.5, 0), "3");
        assert_eq!(to_fixed(-2.5, 0), "-3");
        assert_eq!(to_fixed(0.25, 1), "0.3");
        assert_eq!(to_fixed(0.125, 2), "0.13");
        assert_eq!(to_fixed(9.5, 0), "10");
        // 99.95 is stored just above the tie.
        assert_eq!(to_fixed(99.95, 1), "100.0");
    }

    #[test]
    fn to_fixed_uses_exact_binary_value_off_ties() {
        // 1.005 is stored just below the tie.
        assert_eq!(to_fixed(1.005, 2), "1.00");
        // 0.15 is stored just below 0.15 as well.
        assert_eq!(to_fixed(0.15, 1), "0.1");
        assert_eq!(to_fixed(1.45, 1), "1.4");
        assert_eq!(to_fixed(0.75, 0), "1");
    }

    #[test]
    fn to_fixed_carries_through_nines() {
        assert_eq!(round_tie_away(99.5, 0), "100");
        assert_eq!(round_tie_away(9.75, 1), "9.8");
        assert_eq!(round_tie_away(0.875, 2), "0.88");
        assert_eq!(round_tie_away(1.9375, 3), "1.938");
    }

    #[test]
    fn to_fixed_drops_sign_of_zero() {
        assert_eq!(to_fixed(-0.0, 0), "0");
        assert_eq!(to_fixed(-0.4, 0), "0");
        assert_eq!(to_fixed(-0.001, 2), "0.00");
        assert_eq!(to_fixed(-0.6, 0), "-1");
    }

    #[test]
    fn tie_detection() {
        assert!(is_binary_tie(0.5, 0));
        assert!(is_binary_tie(0.25, 1));
        assert!(!is_binary_tie(0.25, 2));
        assert!(!is_binary_tie(1234567.5, 1));
        assert!(!is_binary_tie(0.15, 1));
        assert!(!is_binary_tie(3.0, 0));
    }

    #[test]
    fn numeric_separator_detection() {
        for s in ["5", "0", " 3", "-1", "+2", ".5", "1abc", "Infinity", "-Infinity"] {
            assert!(parses_as_number(s), "{s:?} should parse");
        }
        for s in [",", ".", " ", "-", "e5", "'", "\u{a0}x", "inf"] {
            assert!(!parses_as_number(s), "{s:?} should not parse");
        }
    }

    #[test]
    fn grouping_keeps_sign_outside() {
        let mut out = String::new();
        push_grouped(&mut out, "-1234567", ",");
        assert_eq!(out, "-1,234,567");
        let mut out = String::new();
        push_grouped(&mut out, "123", ",");
        assert_eq!(out, "123");
        let mut out = String::new();
        push_grouped(&mut out, "1000", "'");
        assert_eq!(out, "1'000");
    }

    #[test]
    fn wrap_each_char() {
        assert_eq!(
            wrap_per_character("1,2", "i"),
            "<i>1</i><i>,</i><i>2</i>"
        );
        assert_eq!(wrap_per_character("", "span"), "");
    }
}
