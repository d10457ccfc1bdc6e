//! Numeric-literal absorption: dots, signs and exponents that stay
//! inside one field, and the re-segmentation that runs whenever a
//! field's text changes.

#[cfg(test)]
mod tests {
    use crate::harness::*;

    #[test]
    fn test_decimal_point_is_absorbed_after_digits() {
        check_insert("1.0", "{1.0$}");
        check_insert("0.5", "{0.5$}");
        check_insert("1_000.25", "{1_000.25$}");
    }

    #[test]
    fn test_dot_after_non_number_is_an_operator() {
        check_insert("a.b", "{a}.{b$}");
        check_insert("getWorld.x", "{getWorld}.{x$}");
        // A second dot ends the number: "1.0" is complete, so the
        // next dot splits.
        check_insert("1.0.y", "{1.0}.{y$}");
    }

    #[test]
    fn test_exponent_sign_is_absorbed() {
        check_insert("1e-6", "{1e-6$}");
        check_insert("1.0e-5", "{1.0e-5$}");
        check_insert("+1.0e+5", "{+1.0e+5$}");
        check_insert("3E+8", "{3E+8$}");
    }

    #[test]
    fn test_hex_float_literals() {
        check_insert("0x5.fp+3", "{0x5.fp+3$}");
        check_insert("0xAB.CD", "{0xAB.CD$}");
    }

    #[test]
    fn test_leading_sign_merges_into_number() {
        check_insert("-1", "{-1$}");
        check_insert("+1", "{+1$}");
        check_insert("1++1", "{1}+{+1$}");
        check_insert("5==--6", "{5}=={}-{-6$}");
    }

    #[test]
    fn test_sign_after_identifier_is_an_operator() {
        check_insert("y-1", "{y}-{1$}");
        check_insert("x+2", "{x}+{2$}");
    }

    #[test]
    fn test_sign_after_bracket_is_an_operator() {
        check_insert("getY()+-1", "{getY}_({})_{}+{-1$}");
    }

    #[test]
    fn test_insert_into_existing_number_resegments() {
        // Typing 'e' between "1" and "-6" fuses the whole thing into
        // one exponent literal.
        check_multi_insert("1{e}-6", "{1e$-6}");
        // An 'x' breaks the literal shape: the '-' becomes an
        // operator again.
        check_multi_insert("1e{x}-6", "{1ex$}-{6}");
        check_multi_insert("{x}1e-6", "{x$1e}-{6}");
    }

    #[test]
    fn test_backspace_resegments_number() {
        // "1.." is {1}..{}; deleting one dot leaves "1." as a number
        // prefix that absorbs the remaining dot.
        check_keys("1..\u{8}0", "{1.0$}");
        check_keys("1.\u{8}.0", "{1.0$}");
    }
}
