//! Operator tokens, slot kinds, and character classification.
//!
//! The operator table is fixed per slot kind and consulted with exact
//! matches; multi-character operators grow by joining a typed
//! character onto an adjacent operator (`=` then `=` gives `==`), so
//! transient prefixes like `=` are themselves table entries.

use slot_types::Precedence;

/// Which flavour of slot is being edited. Replaces subclassing: the
/// kind value is the whole behaviour configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SlotKind {
    /// Full expression: all operators, `(`/`[`/`{` brackets, string
    /// and char literals, floating-point literal absorption.
    Expression,
    /// Type name: only `.` and `,` operators, `<`/`[` brackets, no
    /// literals; every other character is silently dropped.
    TypeName,
}

const EXPRESSION_OPERATORS: &[&str] = &[
    ">>>", "<<", ">>", "<=", ">=", "==", "!=", "&&", "||", "<:", "..", "new ", "+", "-", "*", "/",
    "%", "<", ">", "&", "|", "^", "!", "~", ".", ",", "=",
];

const TYPE_OPERATORS: &[&str] = &[".", ","];

// Characters that can start an operator token. 'n' is deliberately
// absent: `new ` is only formed by the whitespace rule, never by
// splitting a field at an 'n'.
const EXPRESSION_OPERATOR_STARTS: &str = "+-*/%=!<>&|^~.,";
const TYPE_OPERATOR_STARTS: &str = ".,";

impl SlotKind {
    pub(crate) fn is_operator(self, s: &str) -> bool {
        let table = match self {
            SlotKind::Expression => EXPRESSION_OPERATORS,
            SlotKind::TypeName => TYPE_OPERATORS,
        };
        table.contains(&s)
    }

    pub(crate) fn begins_operator(self, c: char) -> bool {
        let starts = match self {
            SlotKind::Expression => EXPRESSION_OPERATOR_STARTS,
            SlotKind::TypeName => TYPE_OPERATOR_STARTS,
        };
        starts.contains(c)
    }

    pub(crate) fn is_opening_bracket(self, c: char) -> bool {
        match self {
            SlotKind::Expression => c == '(' || c == '[' || c == '{',
            SlotKind::TypeName => c == '<' || c == '[',
        }
    }

    pub(crate) fn is_closing_bracket(self, c: char) -> bool {
        match self {
            SlotKind::Expression => c == ')' || c == ']' || c == '}',
            SlotKind::TypeName => c == '>' || c == ']',
        }
    }

    pub(crate) fn supports_literals(self) -> bool {
        matches!(self, SlotKind::Expression)
    }

    pub(crate) fn supports_float_literals(self) -> bool {
        matches!(self, SlotKind::Expression)
    }

    /// Characters an insert drops outright (outside literals).
    pub(crate) fn is_disallowed(self, c: char) -> bool {
        match self {
            SlotKind::Expression => c == ';',
            SlotKind::TypeName => {
                !(c.is_alphanumeric()
                    || c == '_'
                    || c == '$'
                    || c == '.'
                    || c == ','
                    || c == '<'
                    || c == '>'
                    || c == '['
                    || c == ']')
            }
        }
    }
}

/// One operator occurrence in a field list. The text is always a
/// table entry for the owning slot's kind, or a transient prefix of
/// one mid-edit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Operator {
    pub(crate) text: String,
}

impl Operator {
    pub(crate) fn new(text: impl Into<String>) -> Self {
        Operator { text: text.into() }
    }
}

/// Binding rank of a binary operator occurrence; higher binds tighter.
/// A unary occurrence (empty left operand) always binds tightest.
fn operator_rank(op: &str, unary: bool) -> i32 {
    if unary {
        return 12;
    }
    match op {
        "." => 13,
        "*" | "/" | "%" => 11,
        "+" | "-" => 10,
        "<<" | ">>" | ">>>" => 9,
        "<" | "<=" | ">" | ">=" | "<:" => 8,
        "==" | "!=" => 7,
        "&" => 6,
        "^" => 5,
        "|" => 4,
        "&&" => 3,
        "||" => 2,
        ".." | "=" => 1,
        _ => 0,
    }
}

struct RangePrec {
    /// Rank of the loosest operator in the range, -1 for none.
    rank: i32,
    /// Nesting level assigned to that operator.
    level: u32,
}

/// Computes a display band for every operator occurrence.
///
/// `ops[i]` is the operator between fields `i` and `i + 1` (`None`
/// for the invisible juxtaposition flanking brackets and literals);
/// `unary[i]` is true when the left operand of `ops[i]` is an empty
/// field. `.`/`,`/`new ` get their structural bands directly; the
/// rest are banded by a recursive walk that finds the leftmost
/// loosest operator, splits there, and gives an operator a deeper
/// level than its subexpressions only when they bind strictly
/// tighter. Level 0 maps to `High`, 1 to `Medium`, 2 and deeper to
/// `Low`.
///
/// Pure function of its arguments; nothing is cached or stored.
pub fn calculate_precedences(
    ops: &[Option<&str>],
    unary: &[bool],
) -> Vec<Option<Precedence>> {
    debug_assert_eq!(ops.len(), unary.len());
    let mut out = vec![None; ops.len()];
    calculate_range(ops, unary, 0, ops.len(), &mut out);
    out
}

fn calculate_range(
    ops: &[Option<&str>],
    unary: &[bool],
    start: usize,
    end: usize,
    out: &mut Vec<Option<Precedence>>,
) -> RangePrec {
    let mut lowest_rank = i32::MAX;
    let mut lowest_index = None;
    for i in start..end {
        let Some(op) = ops[i] else { continue };
        match op {
            "." => {
                out[i] = Some(Precedence::Dot);
                continue;
            }
            "," => {
                out[i] = Some(Precedence::Comma);
                continue;
            }
            "new " => {
                out[i] = Some(Precedence::New);
                continue;
            }
            _ => {}
        }
        let r = operator_rank(op, unary[i]);
        if r < lowest_rank {
            lowest_rank = r;
            lowest_index = Some(i);
        }
    }

    let Some(idx) = lowest_index else {
        return RangePrec { rank: -1, level: 0 };
    };

    let lhs = calculate_range(ops, unary, start, idx, out);
    let rhs = calculate_range(ops, unary, idx + 1, end, out);
    let level = if lhs.rank == lowest_rank || rhs.rank == lowest_rank || (lhs.rank == -1 && rhs.rank == -1)
    {
        lhs.level.max(rhs.level)
    } else {
        1 + lhs.level.max(rhs.level)
    };
    out[idx] = Some(Precedence::from_level(level));
    RangePrec {
        rank: lowest_rank,
        level,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use slot_types::Precedence::*;

    #[test]
    fn test_operator_tables() {
        assert!(SlotKind::Expression.is_operator("=="));
        assert!(SlotKind::Expression.is_operator("new "));
        assert!(SlotKind::Expression.is_operator("="));
        assert!(!SlotKind::Expression.is_operator("==="));
        assert!(SlotKind::TypeName.is_operator(","));
        assert!(!SlotKind::TypeName.is_operator("+"));
    }

    #[test]
    fn test_operator_start_chars() {
        assert!(SlotKind::Expression.begins_operator('<'));
        assert!(SlotKind::Expression.begins_operator('!'));
        // 'n' never starts an operator; `new ` comes from the
        // whitespace rule.
        assert!(!SlotKind::Expression.begins_operator('n'));
        assert!(!SlotKind::Expression.begins_operator(':'));
        assert!(!SlotKind::TypeName.begins_operator('<'));
    }

    #[test]
    fn test_brackets_per_kind() {
        assert!(SlotKind::Expression.is_opening_bracket('('));
        assert!(!SlotKind::Expression.is_opening_bracket('<'));
        assert!(SlotKind::TypeName.is_opening_bracket('<'));
        assert!(SlotKind::TypeName.is_closing_bracket('>'));
    }

    #[test]
    fn test_type_slot_drops_most_chars() {
        assert!(SlotKind::TypeName.is_disallowed('+'));
        assert!(SlotKind::TypeName.is_disallowed(' '));
        assert!(SlotKind::TypeName.is_disallowed('"'));
        assert!(!SlotKind::TypeName.is_disallowed('a'));
        assert!(!SlotKind::TypeName.is_disallowed('.'));
        assert!(!SlotKind::Expression.is_disallowed(' '));
        assert!(SlotKind::Expression.is_disallowed(';'));
    }

    fn prec(ops: &[Option<&str>], unary: &[bool]) -> Vec<Option<Precedence>> {
        calculate_precedences(ops, unary)
    }

    fn binary(ops: &[&str]) -> Vec<Option<Precedence>> {
        let o: Vec<Option<&str>> = ops.iter().map(|s| Some(*s)).collect();
        let u = vec![false; ops.len()];
        prec(&o, &u)
    }

    #[test]
    fn test_single_operator_is_high() {
        assert_eq!(binary(&["+"]), vec![Some(High)]);
        assert_eq!(binary(&["=="]), vec![Some(High)]);
    }

    #[test]
    fn test_mixed_ranks_nest() {
        assert_eq!(binary(&["+", "*"]), vec![Some(Medium), Some(High)]);
        assert_eq!(binary(&["*", "+"]), vec![Some(High), Some(Medium)]);
        assert_eq!(binary(&["+", "+"]), vec![Some(High), Some(High)]);
    }

    #[test]
    fn test_three_band_chain() {
        // 1<2 && 3<=4 && 5==6+8
        assert_eq!(
            binary(&["<", "&&", "<=", "&&", "==", "+"]),
            vec![
                Some(High),
                Some(Low),
                Some(High),
                Some(Low),
                Some(Medium),
                Some(High)
            ]
        );
    }

    #[test]
    fn test_equal_depth_chain_stays_medium() {
        // a<b && c<=d && e==f
        assert_eq!(
            binary(&["<", "&&", "<=", "&&", "=="]),
            vec![
                Some(High),
                Some(Medium),
                Some(High),
                Some(Medium),
                Some(High)
            ]
        );
    }

    #[test]
    fn test_structural_bands() {
        assert_eq!(binary(&["."]), vec![Some(Dot)]);
        assert_eq!(binary(&[","]), vec![Some(Comma)]);
        assert_eq!(binary(&["new "]), vec![Some(New)]);
        assert_eq!(binary(&[".", "+"]), vec![Some(Dot), Some(High)]);
    }

    #[test]
    fn test_bracket_juxtaposition_is_unbanded() {
        // getX() + 6*4 : [None, None, +, *]
        assert_eq!(
            prec(&[None, None, Some("+"), Some("*")], &[false; 4]),
            vec![None, None, Some(Medium), Some(High)]
        );
    }

    #[test]
    fn test_unary_binds_tightest() {
        // -x alone
        assert_eq!(prec(&[Some("-")], &[true]), vec![Some(High)]);
        // false != !false : the '!' is unary, '!=' binary
        assert_eq!(
            prec(&[Some("!="), Some("!")], &[false, true]),
            vec![Some(Medium), Some(High)]
        );
    }
}
