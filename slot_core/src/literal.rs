//! Literal scanning: quote escapes and numeric-literal shapes.
//!
//! The field re-segmentation rules need to know whether the text
//! before a freshly typed `.`, `+` or `-` looks like the prefix of a
//! floating-point literal; if it does, the character is absorbed into
//! the field instead of becoming an operator. Both decimal (`1.0e-5`)
//! and hex-float (`0x5.fp+3`) prefixes are recognised. Digit runs may
//! contain underscores.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum EscapeStatus {
    Normal,
    AfterBackslash,
}

/// Escape state after scanning `text`; a quote typed while
/// `AfterBackslash` does not close the literal.
pub(crate) fn escape_status(text: &str) -> EscapeStatus {
    let mut status = EscapeStatus::Normal;
    for c in text.chars() {
        status = match status {
            EscapeStatus::AfterBackslash => EscapeStatus::Normal,
            EscapeStatus::Normal if c == '\\' => EscapeStatus::AfterBackslash,
            s => s,
        };
    }
    status
}

fn strip_sign(s: &str) -> &str {
    s.strip_prefix(['+', '-']).unwrap_or(s)
}

fn strip_hex_prefix(s: &str) -> Option<&str> {
    s.strip_prefix("0x").or_else(|| s.strip_prefix("0X"))
}

/// A run of digits, possibly with underscores, containing at least
/// one digit.
fn is_digit_run(s: &str, hex: bool) -> bool {
    let digit = |c: char| {
        if hex {
            c.is_ascii_hexdigit()
        } else {
            c.is_ascii_digit()
        }
    };
    !s.is_empty() && s.chars().all(|c| digit(c) || c == '_') && s.chars().any(digit)
}

/// True if `s` reads as everything before the dot of a floating-point
/// literal: `[+-]?digits` or a hex prefix with optional hex digits.
pub(crate) fn precedes_dot_in_floating_point_literal(s: &str) -> bool {
    if let Some(rest) = strip_hex_prefix(s) {
        return rest.is_empty() || is_digit_run(rest, true);
    }
    is_digit_run(strip_sign(s), false)
}

/// True if `s` reads as everything before the sign of an exponent:
/// `[+-]?digits(.digits?)?[eE]`, or the hex-float form ending `p`/`P`.
pub(crate) fn precedes_plus_minus_in_floating_point_literal(s: &str) -> bool {
    if let Some(rest) = strip_hex_prefix(s) {
        ends_with_exponent_marker(rest, true)
    } else {
        ends_with_exponent_marker(strip_sign(s), false)
    }
}

fn ends_with_exponent_marker(s: &str, hex: bool) -> bool {
    let Some(last) = s.chars().last() else {
        return false;
    };
    let marker = if hex {
        last == 'p' || last == 'P'
    } else {
        last == 'e' || last == 'E'
    };
    if !marker {
        return false;
    }
    let body = &s[..s.len() - 1];
    let (int_part, frac_part) = match body.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (body, None),
    };
    if !is_digit_run(int_part, hex) {
        return false;
    }
    match frac_part {
        None => true,
        Some(f) => f.is_empty() || is_digit_run(f, hex),
    }
}

/// True if text starting a field after a typed `+`/`-` makes the sign
/// part of a numeric literal (it begins with a digit).
pub(crate) fn succeeds_opening_plus_minus(s: &str) -> bool {
    s.chars().next().is_some_and(|c| c.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_status() {
        assert_eq!(escape_status(""), EscapeStatus::Normal);
        assert_eq!(escape_status("abc"), EscapeStatus::Normal);
        assert_eq!(escape_status("a\\"), EscapeStatus::AfterBackslash);
        assert_eq!(escape_status("a\\\\"), EscapeStatus::Normal);
        assert_eq!(escape_status("\\n"), EscapeStatus::Normal);
    }

    #[test]
    fn test_precedes_dot() {
        assert!(precedes_dot_in_floating_point_literal("0"));
        assert!(precedes_dot_in_floating_point_literal("123"));
        assert!(precedes_dot_in_floating_point_literal("+1"));
        assert!(precedes_dot_in_floating_point_literal("-42"));
        assert!(precedes_dot_in_floating_point_literal("1_000"));
        assert!(precedes_dot_in_floating_point_literal("0x"));
        assert!(precedes_dot_in_floating_point_literal("0x5f"));
        assert!(!precedes_dot_in_floating_point_literal(""));
        assert!(!precedes_dot_in_floating_point_literal("a"));
        assert!(!precedes_dot_in_floating_point_literal("+"));
        assert!(!precedes_dot_in_floating_point_literal("1.0"));
        assert!(!precedes_dot_in_floating_point_literal("x1"));
    }

    #[test]
    fn test_precedes_plus_minus() {
        assert!(precedes_plus_minus_in_floating_point_literal("1e"));
        assert!(precedes_plus_minus_in_floating_point_literal("+1.0e"));
        assert!(precedes_plus_minus_in_floating_point_literal("1.e"));
        assert!(precedes_plus_minus_in_floating_point_literal("3E"));
        assert!(precedes_plus_minus_in_floating_point_literal("0x5.fp"));
        assert!(precedes_plus_minus_in_floating_point_literal("0x5P"));
        assert!(!precedes_plus_minus_in_floating_point_literal("1.0p"));
        assert!(!precedes_plus_minus_in_floating_point_literal("1ex"));
        assert!(!precedes_plus_minus_in_floating_point_literal("x1e"));
        assert!(!precedes_plus_minus_in_floating_point_literal("e"));
        assert!(!precedes_plus_minus_in_floating_point_literal(""));
    }

    #[test]
    fn test_succeeds_opening_plus_minus() {
        assert!(succeeds_opening_plus_minus("1"));
        assert!(succeeds_opening_plus_minus("6x"));
        assert!(!succeeds_opening_plus_minus(""));
        assert!(!succeeds_opening_plus_minus("x1"));
    }
}
