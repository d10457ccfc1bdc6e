//! Operator display bands over whole typed expressions.

#[cfg(test)]
mod tests {
    use crate::harness::check_precedence;
    use slot_core::Precedence::{Comma, Dot, High, Low, Medium, New};

    #[test]
    fn test_simple_arithmetic() {
        check_precedence("1+2*3", &[Some(Medium), Some(High)]);
        check_precedence("1*2+3", &[Some(High), Some(Medium)]);
        check_precedence("1+2+3", &[Some(High), Some(High)]);
    }

    #[test]
    fn test_three_band_comparison_chain() {
        check_precedence(
            "1<2&&3<=4&&5==6+8",
            &[
                Some(High),
                Some(Low),
                Some(High),
                Some(Low),
                Some(Medium),
                Some(High),
            ],
        );
    }

    #[test]
    fn test_structural_operators() {
        check_precedence("a.b+c", &[Some(Dot), Some(High)]);
        check_precedence("f,g", &[Some(Comma)]);
        check_precedence("new Foo", &[Some(New)]);
        check_precedence("a,b..c", &[Some(Comma), Some(High)]);
    }

    #[test]
    fn test_bracket_juxtaposition_has_no_band() {
        check_precedence(
            "getX()+6*4",
            &[None, None, Some(Medium), Some(High)],
        );
    }

    #[test]
    fn test_unary_binds_tightest() {
        check_precedence("false!=!false", &[Some(Medium), Some(High)]);
        check_precedence("-x", &[Some(High)]);
    }
}
