//! The public slot facade.
//!
//! `StructuredSlot` owns one root tree and exposes the whole edit
//! surface behind validated entry points: every caret address coming
//! in from a caller is normalised and checked against the current
//! tree first, and a stale address fails fast with
//! [`SlotError::InvalidAddress`] leaving the tree untouched. Inside
//! that boundary the engine never rejects input — unknown characters
//! are dropped, boundary edits are no-ops, and every operation
//! returns the caret to continue from.

use std::fmt;

use slot_types::{CaretPos, Precedence, SlotError, SpanMapping, TextSpace};

use crate::infix::{EditOutcome, Infix, InsertOutcome};
use crate::mapping;
use crate::operator::SlotKind;
use crate::target;
use crate::text::char_len;

pub struct StructuredSlot {
    kind: SlotKind,
    root: Infix,
}

impl StructuredSlot {
    pub fn new(kind: SlotKind) -> Self {
        StructuredSlot {
            kind,
            root: Infix::new(kind),
        }
    }

    /// Constructs a slot by replaying `text` into an empty one; the
    /// surface text round-trips for all well-formed inputs.
    pub fn from_surface_text(kind: SlotKind, text: &str) -> Self {
        let mut slot = StructuredSlot::new(kind);
        let _ = slot.root.insert_str(&Infix::start_pos(), text);
        slot
    }

    pub fn kind(&self) -> SlotKind {
        self.kind
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_empty()
    }

    pub fn start_pos(&self) -> CaretPos {
        Infix::start_pos()
    }

    pub fn end_pos(&self) -> CaretPos {
        self.root.end_pos()
    }

    /// Normalises and validates a caller-supplied address against the
    /// current tree.
    fn resolve(&self, pos: &CaretPos) -> Result<CaretPos, SlotError> {
        let p = pos.normalise();
        if p.is_resolved() && self.root.validate(&p) {
            Ok(p)
        } else {
            Err(SlotError::InvalidAddress(pos.clone()))
        }
    }

    /// Inserts `text` character by character at `pos`, returning the
    /// caret after the last character.
    pub fn insert(&mut self, pos: &CaretPos, text: &str) -> Result<CaretPos, SlotError> {
        let p = self.resolve(pos)?;
        match self.root.insert_str(&p, text) {
            InsertOutcome::At(q) => Ok(q.normalise()),
            // The root has no closing bracket, so text cannot escape
            // it; the end is still a safe caret.
            InsertOutcome::Overflow(_) => Ok(self.root.end_pos()),
        }
    }

    /// Deletes the character before `pos`; a backspace at the very
    /// start of the slot is a no-op.
    pub fn backspace(&mut self, pos: &CaretPos) -> Result<CaretPos, SlotError> {
        let p = self.resolve(pos)?;
        match self.root.backspace_at(&p) {
            EditOutcome::Pos(q, _) => Ok(q.normalise()),
            EditOutcome::Boundary => Ok(p),
        }
    }

    /// Deletes the character after `pos`; a delete at the very end of
    /// the slot is a no-op.
    pub fn delete(&mut self, pos: &CaretPos) -> Result<CaretPos, SlotError> {
        let p = self.resolve(pos)?;
        match self.root.delete_at(&p) {
            EditOutcome::Pos(q, _) => Ok(q.normalise()),
            EditOutcome::Boundary => Ok(p),
        }
    }

    /// Selection endpoints must address leaves of the same tree level
    /// (siblings, possibly nested equally deep); a pair at mismatched
    /// depths has no well-defined spanned region and fails fast like
    /// any stale address.
    fn check_same_level(&self, a: &CaretPos, b: &CaretPos) -> Result<(), SlotError> {
        let (pa, pb) = (leaf_field_path(a), leaf_field_path(b));
        if pa.len() == pb.len() && pa[..pa.len() - 1] == pb[..pb.len() - 1] {
            Ok(())
        } else {
            Err(SlotError::InvalidAddress(b.clone()))
        }
    }

    /// Removes everything between the two addresses (either order,
    /// same level) and returns the junction caret.
    pub fn delete_selection(
        &mut self,
        a: &CaretPos,
        b: &CaretPos,
    ) -> Result<CaretPos, SlotError> {
        let a = self.resolve(a)?;
        let b = self.resolve(b)?;
        self.check_same_level(&a, &b)?;
        let (start, end) = if b.before(&a) { (b, a) } else { (a, b) };
        Ok(self.root.delete_selection(&start, &end).normalise())
    }

    /// Replaces the selection with `c`; an opening bracket or quote
    /// wraps the selected text instead of discarding it.
    pub fn insert_with_selection(
        &mut self,
        a: &CaretPos,
        b: &CaretPos,
        c: char,
    ) -> Result<CaretPos, SlotError> {
        let a = self.resolve(a)?;
        let b = self.resolve(b)?;
        self.check_same_level(&a, &b)?;
        let (start, end) = if b.before(&a) { (b, a) } else { (a, b) };
        Ok(self.root.insert_with_selection(&start, &end, c).normalise())
    }

    /// What the user sees: fields, operators and delimiters, with
    /// closers synthesized for unterminated brackets and literals.
    pub fn surface_text(&self) -> String {
        self.root.surface_text()
    }

    /// Generated target-language text (spaced operators, range calls).
    pub fn target_text(&self) -> String {
        target::target_text(&self.root)
    }

    /// Canonical debug rendering, `$` marking the caret if given.
    pub fn state_string(&self, caret: Option<&CaretPos>) -> String {
        self.root.state_string(caret)
    }

    /// Display band for each operator position, freshly computed.
    pub fn precedences(&self) -> Vec<Option<Precedence>> {
        self.root.precedences()
    }

    fn maps(&self, space: TextSpace) -> Vec<mapping::PosMap> {
        match space {
            TextSpace::Surface => mapping::surface_maps(&self.root),
            TextSpace::Target => mapping::target_maps(&self.root),
        }
    }

    fn rendered_len(&self, space: TextSpace) -> usize {
        match space {
            TextSpace::Surface => char_len(&self.surface_text()),
            TextSpace::Target => char_len(&self.target_text()),
        }
    }

    /// Character offset of a caret address in the rendered text of
    /// the given space.
    pub fn caret_to_offset(&self, pos: &CaretPos, space: TextSpace) -> Result<usize, SlotError> {
        let p = self.resolve(pos)?;
        mapping::caret_to_offset(&self.maps(space), &p)
            .ok_or_else(|| SlotError::InvalidAddress(pos.clone()))
    }

    /// Caret address for a character offset in the rendered text.
    /// Surface offsets between tokens yield `Ok(None)`; target
    /// offsets snap to the start of the next leaf. Offsets past the
    /// end of the text are an error.
    pub fn offset_to_caret(
        &self,
        offset: usize,
        space: TextSpace,
    ) -> Result<Option<CaretPos>, SlotError> {
        let len = self.rendered_len(space);
        if offset > len {
            return Err(SlotError::OffsetOutOfRange { offset, len, space });
        }
        Ok(mapping::offset_to_caret(
            &self.maps(space),
            offset,
            space == TextSpace::Target,
        ))
    }

    /// Surface-to-target range pairs for every leaf, for translating
    /// error locations reported against the target text back to the
    /// slot.
    pub fn target_spans(&self) -> Vec<SpanMapping> {
        mapping::span_mappings(&self.root)
    }
}

/// Field-index path of a resolved leaf address (everything above the
/// terminal offset).
fn leaf_field_path(pos: &CaretPos) -> Vec<usize> {
    let mut out = Vec::new();
    let mut cur = pos;
    while let CaretPos::Field(i, sub) = cur {
        out.push(*i);
        cur = sub;
    }
    out
}

impl fmt::Debug for StructuredSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StructuredSlot")
            .field("kind", &self.kind)
            .field("state", &self.state_string(None))
            .finish()
    }
}
