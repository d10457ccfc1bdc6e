//! Rendering a tree as target-language source text.
//!
//! The surface form and the target form differ in two ways: operators
//! pick up conventional spacing (`a+b` renders as `a + b`, `<:`
//! renders as ` instanceof `), and the range operator has no target
//! equivalent, so `lo..hi` renders as a library call
//! `lang.struct.makeRange(lo, hi)`. Ranges group everything since the
//! previous comma (or the start of the level), and chained ranges
//! nest: `6..7..8` becomes
//! `lang.struct.makeRange(6, lang.struct.makeRange(7, 8))`.

use crate::component::Component;
use crate::infix::Infix;

/// Call prefix injected for the range operator. The helper lives
/// under this engine's own runtime-support namespace; embedders whose
/// runtime hosts it elsewhere rewrite the prefix when post-processing
/// generated code.
pub(crate) const RANGE_PREFIX: &str = "lang.struct.makeRange(";

/// Target spelling of one operator occurrence. `unary` is true when
/// the operand to its left is an empty field.
pub(crate) fn operator_target_text(op: &str, unary: bool) -> String {
    match op {
        "." => ".".to_string(),
        "," => ", ".to_string(),
        "new " => "new ".to_string(),
        "<:" => " instanceof ".to_string(),
        _ if unary => op.to_string(),
        _ => format!(" {} ", op),
    }
}

fn component_target_text(comp: &Component) -> String {
    match comp {
        Component::Field(t) => t.clone(),
        Component::Literal(l) => l.rendered(),
        Component::Bracket(b) => {
            let mut out = String::new();
            out.push(b.open);
            out.push_str(&target_text(&b.content));
            out.push(b.close());
            out
        }
    }
}

pub(crate) fn target_text(tree: &Infix) -> String {
    let mut out = String::new();
    // Byte position where the current comma-group began; a range
    // operator inserts its call prefix there.
    let mut group_start = 0usize;
    let mut closing = 0usize;
    for i in 0..tree.fields.len() {
        out.push_str(&component_target_text(&tree.fields[i]));
        if i >= tree.operators.len() {
            continue;
        }
        match tree.operators[i].as_ref().map(|o| o.text.as_str()) {
            Some("..") => {
                out.insert_str(group_start, RANGE_PREFIX);
                out.push_str(", ");
                group_start = out.len();
                closing += 1;
            }
            Some(",") => {
                for _ in 0..closing {
                    out.push(')');
                }
                closing = 0;
                out.push_str(", ");
                group_start = out.len();
            }
            Some(op) => {
                out.push_str(&operator_target_text(op, tree.is_unary_operand(i)));
            }
            None => {}
        }
    }
    for _ in 0..closing {
        out.push(')');
    }
    out
}
