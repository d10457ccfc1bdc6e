//! Tree components: plain fields, bracket pairs, and literals.

use slot_types::CaretPos;

use crate::infix::Infix;
use crate::literal::{self, EscapeStatus};
use crate::operator::SlotKind;
use crate::text::{char_len, substring};

/// One entry in a field list. Brackets and literals are always
/// directly flanked by `Field`s (with `None` operators between), so
/// a caret can sit on either side of any compound.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Component {
    Field(String),
    Bracket(BracketPair),
    Literal(StringLiteral),
}

/// A matched bracket pair owning one nested tree. The closing
/// character is derived from the opening one and rendered whether or
/// not the user has typed it yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct BracketPair {
    pub(crate) open: char,
    pub(crate) content: Infix,
}

impl BracketPair {
    pub(crate) fn new(kind: SlotKind, open: char) -> Self {
        BracketPair {
            open,
            content: Infix::new_nested(kind, closing_for(open)),
        }
    }

    pub(crate) fn close(&self) -> char {
        closing_for(self.open)
    }
}

pub(crate) fn closing_for(open: char) -> char {
    match open {
        '(' => ')',
        '[' => ']',
        '{' => '}',
        '<' => '>',
        other => other,
    }
}

/// A string (`"`) or char (`'`) literal. The content is raw text —
/// no nested structure — and the closing quote is rendered whether or
/// not it has been typed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct StringLiteral {
    pub(crate) quote: char,
    pub(crate) content: String,
}

impl StringLiteral {
    /// Rendered form with both quotes. Content ending in an unescaped
    /// backslash would swallow the synthesized closing quote, so the
    /// trailing escape is neutralized with an extra backslash; the
    /// neutralized form is its own parse fixed point.
    pub(crate) fn rendered(&self) -> String {
        let mut out = String::new();
        out.push(self.quote);
        out.push_str(&self.content);
        if literal::escape_status(&self.content) == EscapeStatus::AfterBackslash {
            out.push('\\');
        }
        out.push(self.quote);
        out
    }
}

impl Component {
    pub(crate) fn empty_field() -> Self {
        Component::Field(String::new())
    }

    pub(crate) fn is_field_and_empty(&self) -> bool {
        matches!(self, Component::Field(t) if t.is_empty())
    }

    /// Leaf text a caret offset indexes into: field text or literal
    /// content. Brackets have no leaf text of their own.
    pub(crate) fn leaf_text(&self) -> Option<&str> {
        match self {
            Component::Field(t) => Some(t),
            Component::Literal(l) => Some(&l.content),
            Component::Bracket(_) => None,
        }
    }

    /// Copyable text between two caret bounds (`None` = that edge of
    /// the component). A literal copied whole keeps its quotes; a
    /// partial copy is raw content. Brackets always render both
    /// delimiters.
    pub(crate) fn copy_text(&self, from: Option<&CaretPos>, to: Option<&CaretPos>) -> String {
        match self {
            Component::Field(t) => {
                let a = from.map(leaf_offset).unwrap_or(0);
                let b = to.map(leaf_offset).unwrap_or_else(|| char_len(t));
                substring(t, a, b)
            }
            Component::Literal(l) => {
                if from.is_none() && to.is_none() {
                    l.rendered()
                } else {
                    let a = from.map(leaf_offset).unwrap_or(0);
                    let b = to.map(leaf_offset).unwrap_or_else(|| char_len(&l.content));
                    substring(&l.content, a, b)
                }
            }
            Component::Bracket(b) => {
                let mut out = String::new();
                out.push(b.open);
                out.push_str(&b.content.copy_text(from, to));
                out.push(b.close());
                out
            }
        }
    }
}

/// Terminal offset of a leaf address; descends are ignored because
/// callers have already matched the component level.
pub(crate) fn leaf_offset(pos: &CaretPos) -> usize {
    match pos {
        CaretPos::Leaf(k) => *k,
        _ => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_closing_pairs() {
        assert_eq!(closing_for('('), ')');
        assert_eq!(closing_for('['), ']');
        assert_eq!(closing_for('<'), '>');
    }

    #[test]
    fn test_field_copy_text() {
        let f = Component::Field("hello".to_string());
        assert_eq!(f.copy_text(None, None), "hello");
        assert_eq!(f.copy_text(Some(&CaretPos::leaf(1)), Some(&CaretPos::leaf(4))), "ell");
        assert_eq!(f.copy_text(Some(&CaretPos::leaf(2)), None), "llo");
    }

    #[test]
    fn test_literal_copy_text_quotes() {
        let l = Component::Literal(StringLiteral {
            quote: '"',
            content: "hi".to_string(),
        });
        assert_eq!(l.copy_text(None, None), "\"hi\"");
        assert_eq!(l.copy_text(Some(&CaretPos::leaf(0)), Some(&CaretPos::leaf(1))), "h");
    }

    #[test]
    fn test_trailing_backslash_is_neutralized_when_rendered() {
        let l = StringLiteral {
            quote: '"',
            content: "a\\".to_string(),
        };
        assert_eq!(l.rendered(), "\"a\\\\\"");
        assert_eq!(Component::Literal(l).copy_text(None, None), "\"a\\\\\"");
        let even = StringLiteral {
            quote: '"',
            content: "a\\\\".to_string(),
        };
        assert_eq!(even.rendered(), "\"a\\\\\"");
    }
}
