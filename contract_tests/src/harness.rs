//! Replay harness for the behavioural contract tests.
//!
//! Cases are written as key streams: every character of the stream is
//! fed to the slot at the tracked caret, with two control characters
//! standing in for edit keys. Expectations are the canonical state
//! string (`{field}op{field}`, `_(…)_`, `_"…"_`) with `$` marking the
//! final caret.
//!
//! `check_insert` additionally re-checks the engine contracts on
//! every case: the final state is invariant under splitting the
//! stream at any point, the rendered surface text is bracket- and
//! quote-balanced after every prefix, and caret/offset mapping round
//! trips in both text spaces.

use slot_core::{CaretPos, Precedence, SlotKind, StructuredSlot, TextSpace};

/// Edit key: delete the character before the caret.
pub const BACKSPACE: char = '\u{0008}';
/// Edit key: delete the character after the caret.
pub const DELETE: char = '\u{007f}';

/// Replays a key stream into a fresh slot, returning it with the
/// tracked caret.
pub fn build(kind: SlotKind, keys: &str) -> (StructuredSlot, CaretPos) {
    let mut slot = StructuredSlot::new(kind);
    let mut pos = slot.start_pos();
    for c in keys.chars() {
        pos = match c {
            BACKSPACE => slot.backspace(&pos).expect("backspace at tracked caret"),
            DELETE => slot.delete(&pos).expect("delete at tracked caret"),
            _ => slot
                .insert(&pos, &c.to_string())
                .expect("insert at tracked caret"),
        };
    }
    (slot, pos)
}

/// Pins the state after typing `keys` into an expression slot, plus
/// the standing engine contracts for pure insert streams.
pub fn check_insert(keys: &str, expected: &str) {
    check_insert_kind(SlotKind::Expression, keys, expected);
}

/// As [`check_insert`] for a type-name slot.
pub fn check_type_insert(keys: &str, expected: &str) {
    check_insert_kind(SlotKind::TypeName, keys, expected);
}

fn check_insert_kind(kind: SlotKind, keys: &str, expected: &str) {
    assert!(
        !keys.contains(BACKSPACE) && !keys.contains(DELETE),
        "edit keys belong in check_keys cases"
    );
    let (slot, pos) = build(kind, keys);
    assert_eq!(slot.state_string(Some(&pos)), expected, "typing {keys:?}");
    check_split_invariance(kind, keys);
    check_balanced_prefixes(kind, keys);
    check_caret_round_trips(&slot);
}

/// Pins the state after a key stream that may contain edit keys.
pub fn check_keys(keys: &str, expected: &str) {
    let (slot, pos) = build(SlotKind::Expression, keys);
    assert_eq!(slot.state_string(Some(&pos)), expected, "keys {keys:?}");
}

/// Types the text outside `{…}`, then inserts the marked text at the
/// marker's surface offset. The outer text must round-trip so the
/// marker offset is meaningful.
pub fn check_multi_insert(case: &str, expected: &str) {
    let open = case.find('{').expect("case has a {marker}");
    let close = case.find('}').expect("case has a {marker}");
    let inner = case[open + 1..close].to_string();
    let outer = format!("{}{}", &case[..open], &case[close + 1..]);
    let (mut slot, _) = build(SlotKind::Expression, &outer);
    assert_eq!(slot.surface_text(), outer, "outer text must round-trip");
    let marker = case[..open].chars().count();
    let at = slot
        .offset_to_caret(marker, TextSpace::Surface)
        .expect("marker offset in range")
        .expect("marker lands on a leaf");
    let pos = slot.insert(&at, &inner).expect("insert at marker");
    assert_eq!(
        slot.state_string(Some(&pos)),
        expected,
        "multi-insert {case:?}"
    );
}

/// Builds from `keys`, presses backspace at `at`, pins the result.
pub fn check_backspace_at(keys: &str, at: CaretPos, expected: &str) {
    let (mut slot, _) = build(SlotKind::Expression, keys);
    let pos = slot.backspace(&at).expect("backspace at given caret");
    assert_eq!(
        slot.state_string(Some(&pos)),
        expected,
        "backspace in {keys:?}"
    );
}

/// Builds from `keys`, presses delete at `at`, pins the result.
pub fn check_delete_at(keys: &str, at: CaretPos, expected: &str) {
    let (mut slot, _) = build(SlotKind::Expression, keys);
    let pos = slot.delete(&at).expect("delete at given caret");
    assert_eq!(
        slot.state_string(Some(&pos)),
        expected,
        "delete in {keys:?}"
    );
}

/// Deletes the selection `a..b` after typing `keys`.
pub fn check_delete_selection(keys: &str, a: CaretPos, b: CaretPos, expected: &str) {
    let (mut slot, _) = build(SlotKind::Expression, keys);
    let pos = slot.delete_selection(&a, &b).expect("selection resolves");
    assert_eq!(
        slot.state_string(Some(&pos)),
        expected,
        "selection delete in {keys:?}"
    );
}

/// Replaces the selection `a..b` with the single character `c`.
pub fn check_replace_selection(keys: &str, a: CaretPos, b: CaretPos, c: char, expected: &str) {
    let (mut slot, _) = build(SlotKind::Expression, keys);
    let pos = slot
        .insert_with_selection(&a, &b, c)
        .expect("selection resolves");
    assert_eq!(
        slot.state_string(Some(&pos)),
        expected,
        "selection replace in {keys:?}"
    );
}

/// Pins the generated target text for a typed expression.
pub fn check_target(keys: &str, expected: &str) {
    let (slot, _) = build(SlotKind::Expression, keys);
    assert_eq!(slot.target_text(), expected, "target of {keys:?}");
}

/// Pins the display band of every operator position.
pub fn check_precedence(keys: &str, expected: &[Option<Precedence>]) {
    let (slot, _) = build(SlotKind::Expression, keys);
    assert_eq!(slot.precedences(), expected, "precedences of {keys:?}");
}

/// The final state must not depend on how the stream was chunked.
fn check_split_invariance(kind: SlotKind, keys: &str) {
    let chars: Vec<char> = keys.chars().collect();
    let (full, _) = build(kind, keys);
    let reference = full.state_string(None);
    for k in 0..=chars.len() {
        let first: String = chars[..k].iter().collect();
        let second: String = chars[k..].iter().collect();
        let mut slot = StructuredSlot::new(kind);
        let start = slot.start_pos();
        let p = slot.insert(&start, &first).expect("first chunk");
        slot.insert(&p, &second).expect("second chunk");
        assert_eq!(
            slot.state_string(None),
            reference,
            "split at {k} of {keys:?}"
        );
    }
}

/// The rendered surface text is balanced after every prefix of the
/// stream; closers are synthesized, so this holds mid-edit.
fn check_balanced_prefixes(kind: SlotKind, keys: &str) {
    let chars: Vec<char> = keys.chars().collect();
    for k in 1..=chars.len() {
        let prefix: String = chars[..k].iter().collect();
        let (slot, _) = build(kind, &prefix);
        assert_balanced(kind, &slot.surface_text());
    }
}

fn assert_balanced(kind: SlotKind, s: &str) {
    let mut stack: Vec<char> = Vec::new();
    let mut quote: Option<char> = None;
    let mut escaped = false;
    for c in s.chars() {
        if let Some(q) = quote {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == q {
                quote = None;
            }
            continue;
        }
        match c {
            '"' | '\'' if kind == SlotKind::Expression => quote = Some(c),
            '(' | '[' | '{' => stack.push(c),
            '<' if kind == SlotKind::TypeName => stack.push('<'),
            ')' => assert_eq!(stack.pop(), Some('('), "unbalanced ')' in {s:?}"),
            ']' => assert_eq!(stack.pop(), Some('['), "unbalanced ']' in {s:?}"),
            '}' => assert_eq!(stack.pop(), Some('{'), "unbalanced closer in {s:?}"),
            '>' if kind == SlotKind::TypeName => {
                assert_eq!(stack.pop(), Some('<'), "unbalanced '>' in {s:?}")
            }
            _ => {}
        }
    }
    assert!(stack.is_empty(), "unclosed brackets in {s:?}");
    assert!(quote.is_none(), "unclosed literal in {s:?}");
}

/// Caret/offset mapping round-trips: exact both ways on the surface,
/// forward-snapping but stable in the target space.
pub fn check_caret_round_trips(slot: &StructuredSlot) {
    let surface_len = slot.surface_text().chars().count();
    for off in 0..=surface_len {
        if let Some(p) = slot
            .offset_to_caret(off, TextSpace::Surface)
            .expect("offset in range")
        {
            assert_eq!(
                slot.caret_to_offset(&p, TextSpace::Surface)
                    .expect("caret maps back"),
                off
            );
        }
    }
    let target_len = slot.target_text().chars().count();
    for off in 0..=target_len {
        if let Some(p) = slot
            .offset_to_caret(off, TextSpace::Target)
            .expect("offset in range")
        {
            let t = slot
                .caret_to_offset(&p, TextSpace::Target)
                .expect("caret maps back");
            assert!(t >= off, "target snap went backwards at {off}");
            assert_eq!(
                slot.offset_to_caret(t, TextSpace::Target)
                    .expect("offset in range"),
                Some(p)
            );
        }
    }
}
