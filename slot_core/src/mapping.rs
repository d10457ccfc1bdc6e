//! Caret-address / text-offset mapping for both text spaces.
//!
//! Each query rebuilds a fresh list of `PosMap` entries — one per
//! leaf (plain field or literal content), in tree order — giving the
//! leaf's character range in the rendered text and the path to it.
//! Nothing is cached; the maps are a pure function of the current
//! tree, so they can never go stale.
//!
//! The target walk mirrors the grouping logic of the target renderer:
//! a range operator shifts its whole comma-group right by the length
//! of the `makeRange(` call prefix and owes a closing parenthesis at
//! the end of the group.

use slot_types::{CaretPos, SpanMapping, TextRange};

use crate::component::Component;
use crate::infix::Infix;
use crate::target::{operator_target_text, RANGE_PREFIX};
use crate::text::char_len;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct PosMap {
    pub(crate) path: Vec<usize>,
    pub(crate) start: usize,
    pub(crate) end: usize,
}

impl PosMap {
    fn new(path: Vec<usize>, start: usize, end: usize) -> Self {
        PosMap { path, start, end }
    }
}

pub(crate) fn surface_maps(tree: &Infix) -> Vec<PosMap> {
    let mut out = Vec::new();
    let mut off = 0usize;
    surface_walk(tree, &mut Vec::new(), &mut off, &mut out);
    out
}

fn surface_walk(tree: &Infix, path: &mut Vec<usize>, off: &mut usize, out: &mut Vec<PosMap>) {
    for i in 0..tree.fields.len() {
        path.push(i);
        match &tree.fields[i] {
            Component::Field(t) => {
                let n = char_len(t);
                out.push(PosMap::new(path.clone(), *off, *off + n));
                *off += n;
            }
            Component::Literal(l) => {
                let n = char_len(&l.content);
                *off += 1;
                out.push(PosMap::new(path.clone(), *off, *off + n));
                // Past the content, any neutralizing backslash, and
                // the closing quote.
                *off += char_len(&l.rendered()) - 1;
            }
            Component::Bracket(b) => {
                *off += 1;
                surface_walk(&b.content, path, off, out);
                *off += 1;
            }
        }
        path.pop();
        if i < tree.operators.len() {
            if let Some(op) = &tree.operators[i] {
                *off += char_len(&op.text);
            }
        }
    }
}

pub(crate) fn target_maps(tree: &Infix) -> Vec<PosMap> {
    let mut out = Vec::new();
    let mut off = 0usize;
    target_walk(tree, &mut Vec::new(), &mut off, &mut out);
    out
}

fn target_walk(tree: &Infix, path: &mut Vec<usize>, off: &mut usize, out: &mut Vec<PosMap>) {
    let mut last = 0usize;
    let mut closing = 0usize;
    for i in 0..tree.operators.len() {
        match tree.operators[i].as_ref().map(|o| o.text.as_str()) {
            Some("..") => {
                // The call prefix lands before everything in the
                // group, none of which has been emitted yet.
                *off += char_len(RANGE_PREFIX);
                emit_group(tree, last, i + 1, path, off, out);
                *off += 2;
                closing += 1;
                last = i + 1;
            }
            Some(",") => {
                emit_group(tree, last, i + 1, path, off, out);
                *off += closing + 2;
                closing = 0;
                last = i + 1;
            }
            _ => {}
        }
    }
    emit_group(tree, last, tree.fields.len(), path, off, out);
    *off += closing;
}

/// Emits fields `lo..hi` and the operators strictly between them.
fn emit_group(
    tree: &Infix,
    lo: usize,
    hi: usize,
    path: &mut Vec<usize>,
    off: &mut usize,
    out: &mut Vec<PosMap>,
) {
    for i in lo..hi {
        path.push(i);
        match &tree.fields[i] {
            Component::Field(t) => {
                let n = char_len(t);
                out.push(PosMap::new(path.clone(), *off, *off + n));
                *off += n;
            }
            Component::Literal(l) => {
                let n = char_len(&l.content);
                *off += 1;
                out.push(PosMap::new(path.clone(), *off, *off + n));
                *off += char_len(&l.rendered()) - 1;
            }
            Component::Bracket(b) => {
                *off += 1;
                target_walk(&b.content, path, off, out);
                *off += 1;
            }
        }
        path.pop();
        if i + 1 < hi {
            if let Some(op) = &tree.operators[i] {
                *off += char_len(&operator_target_text(&op.text, tree.is_unary_operand(i)));
            }
        }
    }
}

/// Offset of a caret address in the rendered text, if the address
/// names a leaf present in the maps.
pub(crate) fn caret_to_offset(maps: &[PosMap], pos: &CaretPos) -> Option<usize> {
    for m in maps {
        if let Some(k) = pos.following(&m.path) {
            return Some(m.start + k);
        }
    }
    None
}

/// Caret address for a text offset. Offsets between tokens (on a
/// bracket delimiter, inside an operator, inside injected target
/// text) have no exact leaf; with `lenient` they snap to the start of
/// the next leaf, otherwise they map to `None`.
pub(crate) fn offset_to_caret(maps: &[PosMap], offset: usize, lenient: bool) -> Option<CaretPos> {
    for m in maps {
        if offset <= m.end {
            if offset >= m.start {
                return Some(CaretPos::path(&m.path, offset - m.start));
            }
            if lenient {
                return Some(CaretPos::path(&m.path, 0));
            }
            return None;
        }
    }
    None
}

/// Pairs up the surface and target range of every leaf. Both walks
/// visit leaves in the same order, so the lists zip cleanly.
pub(crate) fn span_mappings(tree: &Infix) -> Vec<SpanMapping> {
    let surface = surface_maps(tree);
    let target = target_maps(tree);
    surface
        .into_iter()
        .zip(target)
        .map(|(s, t)| SpanMapping {
            source: TextRange::new(s.start, s.end),
            target: TextRange::new(t.start, t.end),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::operator::SlotKind;
    use crate::target::target_text;

    fn typed(s: &str) -> Infix {
        let mut t = Infix::new(SlotKind::Expression);
        let _ = t.insert_str(&CaretPos::path(&[0], 0), s);
        t
    }

    #[test]
    fn test_surface_offsets_roundtrip() {
        // a+(bc)  → {a}+{}_({bc})_{}
        let t = typed("a+(bc)");
        let maps = surface_maps(&t);
        assert_eq!(caret_to_offset(&maps, &CaretPos::path(&[0], 0)), Some(0));
        assert_eq!(caret_to_offset(&maps, &CaretPos::path(&[0], 1)), Some(1));
        assert_eq!(caret_to_offset(&maps, &CaretPos::path(&[2, 0], 1)), Some(4));
        assert_eq!(caret_to_offset(&maps, &CaretPos::path(&[3], 0)), Some(6));
        assert_eq!(
            offset_to_caret(&maps, 4, false),
            Some(CaretPos::path(&[2, 0], 1))
        );
        // Offset 3 is just after the open bracket: start of the inner
        // field.
        assert_eq!(
            offset_to_caret(&maps, 3, false),
            Some(CaretPos::path(&[2, 0], 0))
        );
        assert_eq!(offset_to_caret(&maps, 99, false), None);
    }

    #[test]
    fn test_trailing_backslash_literal_offsets() {
        // "a\  renders as "a\\" with the neutralizing backslash; the
        // trailing field sits after the real closer.
        let t = typed("\"a\\");
        let maps = surface_maps(&t);
        assert_eq!(maps[1], PosMap::new(vec![1], 1, 3));
        assert_eq!(maps[2].start, 5);
    }

    #[test]
    fn test_literal_content_offsets() {
        // "hi"  → {}_"hi"_{}: content starts after the open quote.
        let t = typed("\"hi\"");
        let maps = surface_maps(&t);
        assert_eq!(caret_to_offset(&maps, &CaretPos::path(&[1], 0)), Some(1));
        assert_eq!(caret_to_offset(&maps, &CaretPos::path(&[1], 2)), Some(3));
        assert_eq!(
            offset_to_caret(&maps, 2, false),
            Some(CaretPos::path(&[1], 1))
        );
    }

    #[test]
    fn test_target_offsets_account_for_spacing() {
        // a+b renders as "a + b".
        let t = typed("a+b");
        let maps = target_maps(&t);
        assert_eq!(caret_to_offset(&maps, &CaretPos::path(&[1], 0)), Some(4));
        assert_eq!(
            offset_to_caret(&maps, 4, false),
            Some(CaretPos::path(&[1], 0))
        );
        // Offset 2 sits inside " + ": no exact leaf.
        assert_eq!(offset_to_caret(&maps, 2, false), None);
        assert_eq!(
            offset_to_caret(&maps, 2, true),
            Some(CaretPos::path(&[1], 0))
        );
    }

    #[test]
    fn test_target_offsets_in_range_call() {
        // 6..7..8 → lang.struct.makeRange(6, lang.struct.makeRange(7, 8))
        let t = typed("6..7..8");
        let maps = target_maps(&t);
        let rendered = target_text(&t);
        assert_eq!(caret_to_offset(&maps, &CaretPos::path(&[0], 0)), Some(22));
        assert_eq!(caret_to_offset(&maps, &CaretPos::path(&[1], 0)), Some(47));
        assert_eq!(caret_to_offset(&maps, &CaretPos::path(&[2], 1)), Some(51));
        // The walk's final offset equals the rendered length.
        let last = maps.last().unwrap();
        assert_eq!(last.end + 2, char_len(&rendered));
    }

    #[test]
    fn test_span_mappings_zip_leaves_in_order() {
        let t = typed("a+(b)");
        let spans = span_mappings(&t);
        // Leaves: {a}, {}, inner {b}, {} after bracket.
        assert_eq!(spans.len(), 4);
        assert_eq!(spans[0].source, TextRange::new(0, 1));
        assert_eq!(spans[0].target, TextRange::new(0, 1));
        assert_eq!(spans[2].source, TextRange::new(3, 4));
        assert_eq!(spans[2].target, TextRange::new(5, 6));
    }
}
