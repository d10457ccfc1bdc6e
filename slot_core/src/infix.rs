//! The alternating field/operator tree and the edit state machine.
//!
//! An `Infix` holds `fields` (one more than `operators`); a `None`
//! operator is the invisible juxtaposition flanking a bracket or
//! literal component. The first and last component are always plain
//! fields, and every compound is directly flanked by plain fields, so
//! a caret can sit on either side of anything.
//!
//! Edits are value-returning recursion over this structure: a typed
//! character classifies into field text, operator, bracket, quote or
//! drop; deletions across compound boundaries flatten the pair and
//! re-insert its raw text, re-tokenizing at the junction. Outcomes
//! that escape a nested level (`Ascend`, `Boundary`, overflow text)
//! are explicit enum variants handled by the enclosing level, never
//! sentinel values.

use slot_types::{CaretPos, Precedence};

use crate::component::{leaf_offset, BracketPair, Component, StringLiteral};
use crate::literal::{self, EscapeStatus};
use crate::operator::{calculate_precedences, Operator, SlotKind};
use crate::text::{char_len, insert_char_at, prefix, remove_char_at, suffix};

/// Result of inserting one character at some level.
pub(crate) enum CharOutcome {
    /// Character handled; caret is now here (local coordinates).
    At(CaretPos),
    /// A closing bracket matched this level's closer at its end; the
    /// caret leaves the bracket. Handled by the enclosing level.
    Ascend,
}

/// Result of inserting a string at some level.
pub(crate) enum InsertOutcome {
    At(CaretPos),
    /// The remainder of the string ascended past this level's closing
    /// bracket and belongs to the enclosing level.
    Overflow(String),
}

/// Result of a backspace/delete at some level.
pub(crate) enum EditOutcome {
    /// Caret position, plus any text that escaped this level while a
    /// flattened compound's content was re-inserted.
    Pos(CaretPos, Option<String>),
    /// The edit hit this level's boundary; the enclosing level
    /// flattens the bracket (or the root ignores it).
    Boundary,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Infix {
    pub(crate) fields: Vec<Component>,
    pub(crate) operators: Vec<Option<Operator>>,
    kind: SlotKind,
    /// Set on the nested tree inside a bracket: typing this character
    /// at the very end ascends out. Root: `None`.
    closing_char: Option<char>,
}

impl Infix {
    pub(crate) fn new(kind: SlotKind) -> Self {
        Infix {
            fields: vec![Component::empty_field()],
            operators: Vec::new(),
            kind,
            closing_char: None,
        }
    }

    pub(crate) fn new_nested(kind: SlotKind, closing: char) -> Self {
        Infix {
            fields: vec![Component::empty_field()],
            operators: Vec::new(),
            kind,
            closing_char: Some(closing),
        }
    }

    pub(crate) fn start_pos() -> CaretPos {
        CaretPos::path(&[0], 0)
    }

    pub(crate) fn end_pos(&self) -> CaretPos {
        let i = self.fields.len() - 1;
        CaretPos::field(i, CaretPos::leaf(char_len(&self.field_text(i))))
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.fields.len() == 1 && self.fields[0].is_field_and_empty()
    }

    /// True if the address resolves to a real leaf offset in this
    /// tree.
    pub(crate) fn validate(&self, pos: &CaretPos) -> bool {
        let CaretPos::Field(i, sub) = pos else {
            return false;
        };
        match self.fields.get(*i) {
            Some(Component::Bracket(b)) => b.content.validate(sub),
            Some(comp) => match comp.leaf_text() {
                Some(t) => matches!(&**sub, CaretPos::Leaf(k) if *k <= char_len(t)),
                None => false,
            },
            None => false,
        }
    }

    fn field_text(&self, index: usize) -> String {
        self.fields
            .get(index)
            .and_then(|f| f.leaf_text())
            .unwrap_or("")
            .to_string()
    }

    fn set_field_text(&mut self, index: usize, t: String) {
        if let Some(Component::Field(f)) = self.fields.get_mut(index) {
            *f = t;
        }
    }

    fn next_op_text(&self, index: usize) -> Option<String> {
        self.operators
            .get(index)
            .and_then(|o| o.as_ref())
            .map(|o| o.text.clone())
    }

    fn remove_leaf_char(&mut self, index: usize, off: usize) {
        match &mut self.fields[index] {
            Component::Field(t) => remove_char_at(t, off),
            Component::Literal(l) => remove_char_at(&mut l.content, off),
            Component::Bracket(_) => {}
        }
    }

    // ----- insertion -----

    pub(crate) fn insert_str(&mut self, pos: &CaretPos, s: &str) -> InsertOutcome {
        let mut pos = pos.clone();
        let chars: Vec<char> = s.chars().collect();
        for (i, &c) in chars.iter().enumerate() {
            match self.insert_char(&pos, c) {
                CharOutcome::At(p) => pos = p,
                CharOutcome::Ascend => {
                    return InsertOutcome::Overflow(chars[i + 1..].iter().collect())
                }
            }
        }
        InsertOutcome::At(pos)
    }

    pub(crate) fn insert_char(&mut self, pos: &CaretPos, c: char) -> CharOutcome {
        let CaretPos::Field(index, sub) = pos else {
            return CharOutcome::At(pos.clone());
        };
        let index = *index;
        if index >= self.fields.len() {
            return CharOutcome::At(pos.clone());
        }
        if matches!(self.fields[index], Component::Bracket(_)) {
            let inner = match &mut self.fields[index] {
                Component::Bracket(b) => b.content.insert_char(sub, c),
                _ => unreachable!(),
            };
            return match inner {
                CharOutcome::Ascend => CharOutcome::At(CaretPos::path(&[index + 1], 0)),
                CharOutcome::At(p) => CharOutcome::At(CaretPos::field(index, p)),
            };
        }
        if matches!(self.fields[index], Component::Literal(_)) {
            return self.insert_char_in_literal(index, leaf_offset(sub), c);
        }
        self.insert_char_in_plain_field(index, leaf_offset(sub), c)
    }

    fn insert_char_in_literal(&mut self, index: usize, off: usize, c: char) -> CharOutcome {
        let (quote, len, status) = match &self.fields[index] {
            Component::Literal(l) => (
                l.quote,
                char_len(&l.content),
                literal::escape_status(&prefix(&l.content, off)),
            ),
            _ => return CharOutcome::At(CaretPos::field(index, CaretPos::leaf(off))),
        };
        if c == quote && status == EscapeStatus::Normal {
            if off == len {
                // Closing quote: step out of the literal.
                return CharOutcome::At(CaretPos::path(&[index + 1], 0));
            }
            // An unescaped quote mid-literal would break the nesting;
            // dropped.
            return CharOutcome::At(CaretPos::field(index, CaretPos::leaf(off)));
        }
        if let Component::Literal(l) = &mut self.fields[index] {
            insert_char_at(&mut l.content, off, c);
        }
        CharOutcome::At(CaretPos::field(index, CaretPos::leaf(off + 1)))
    }

    fn insert_char_in_plain_field(&mut self, index: usize, pos_in_field: usize, c: char) -> CharOutcome {
        let kind = self.kind;
        let text = self.field_text(index);
        let here = CaretPos::field(index, CaretPos::leaf(pos_in_field));

        if kind.is_disallowed(c) {
            return CharOutcome::At(here);
        }

        let before = prefix(&text, pos_in_field);
        let following = suffix(&text, pos_in_field);

        if c.is_whitespace() && before != "new" {
            return CharOutcome::At(here);
        }

        // Grow the operator to the left of the caret.
        if pos_in_field == 0 && index > 0 {
            let joined = self.operators[index - 1]
                .as_ref()
                .map(|op| format!("{}{}", op.text, c));
            if let Some(j) = joined {
                if kind.is_operator(&j) {
                    if let Some(op) = &mut self.operators[index - 1] {
                        op.text = j;
                    }
                    return CharOutcome::At(here);
                }
            }
        }

        // Grow the operator to the right of the caret.
        if pos_in_field == char_len(&text) && index < self.operators.len() {
            let joined = self.operators[index]
                .as_ref()
                .map(|op| format!("{}{}", c, op.text));
            if let Some(j) = joined {
                if kind.is_operator(&j) {
                    if let Some(op) = &mut self.operators[index] {
                        op.text = j;
                    }
                    return CharOutcome::At(here);
                }
            }
        }

        // Comma overtype: skip an existing comma with nothing after it.
        if c == ','
            && pos_in_field == char_len(&text)
            && index < self.operators.len()
            && self.operators[index].as_ref().is_some_and(|op| op.text == ",")
            && self.fields[index + 1].copy_text(None, None).is_empty()
        {
            return CharOutcome::At(CaretPos::path(&[index + 1], 0));
        }

        // Operator characters split the field. Dot, plus and minus go
        // in as text first; check_field_change decides whether they
        // are literal parts or operators.
        if kind.begins_operator(c) && c != '.' && c != '+' && c != '-' {
            self.set_field_text(index, before);
            self.operators.insert(index, Some(Operator::new(c.to_string())));
            self.fields.insert(index + 1, Component::Field(following));
            return CharOutcome::At(CaretPos::path(&[index + 1], 0));
        }

        if kind.is_opening_bracket(c) {
            // Overtype a matching bracket directly ahead.
            if following.is_empty() && index + 1 < self.fields.len() {
                if let Component::Bracket(b) = &self.fields[index + 1] {
                    if b.open == c {
                        return CharOutcome::At(CaretPos::path(&[index + 1, 0], 0));
                    }
                }
            }
            self.set_field_text(index, before);
            self.operators.insert(index, None);
            self.fields
                .insert(index + 1, Component::Bracket(BracketPair::new(kind, c)));
            if index + 1 >= self.operators.len()
                || self.operators[index + 1].is_some()
                || !matches!(self.fields[index + 2], Component::Field(_))
            {
                self.operators.insert(index + 1, None);
                self.fields.insert(index + 2, Component::Field(following));
            } else if let Component::Field(t) = &mut self.fields[index + 2] {
                t.insert_str(0, &following);
            }
            return CharOutcome::At(CaretPos::path(&[index + 1, 0], 0));
        }

        if kind.is_closing_bracket(c) {
            if self.closing_char == Some(c)
                && following.is_empty()
                && index == self.fields.len() - 1
            {
                return CharOutcome::Ascend;
            }
            // Unmatched closer: dropped.
            return CharOutcome::At(here);
        }

        if kind.supports_literals() && (c == '"' || c == '\'') {
            self.set_field_text(index, before);
            self.operators.insert(index, None);
            self.fields.insert(
                index + 1,
                Component::Literal(StringLiteral {
                    quote: c,
                    content: String::new(),
                }),
            );
            if index + 1 >= self.operators.len()
                || self.operators[index + 1].is_some()
                || !matches!(self.fields[index + 2], Component::Field(_))
            {
                self.operators.insert(index + 1, None);
                self.fields.insert(index + 2, Component::Field(following));
            } else if let Component::Field(t) = &mut self.fields[index + 2] {
                t.insert_str(0, &following);
            }
            return CharOutcome::At(CaretPos::path(&[index + 1], 0));
        }

        if before == "new" && c.is_whitespace() {
            self.set_field_text(index, String::new());
            self.operators.insert(index, Some(Operator::new("new ")));
            self.fields.insert(index + 1, Component::Field(following));
            return CharOutcome::At(CaretPos::path(&[index + 1], 0));
        }

        if let Some(Component::Field(t)) = self.fields.get_mut(index) {
            insert_char_at(t, pos_in_field, c);
        }
        let p = CaretPos::field(index, CaretPos::leaf(pos_in_field + 1));
        CharOutcome::At(self.check_field_change(index, p))
    }

    // ----- field re-segmentation -----

    /// Re-segments a plain field after its text changed: dots and
    /// signs become operators, numeric-literal prefixes absorb them
    /// back, and a sign stranded behind an empty field merges into the
    /// number it precedes. Returns the caret adjusted for every move.
    pub(crate) fn check_field_change(&mut self, index: usize, pos: CaretPos) -> CaretPos {
        if !matches!(self.fields.get(index), Some(Component::Field(_))) {
            return pos;
        }
        let kind = self.kind;
        let mut pos = pos;

        let prev_op: Option<String> = if index > 0 {
            self.operators[index - 1].as_ref().map(|o| o.text.clone())
        } else {
            None
        };
        let preceding_bracket = index > 0 && self.operators[index - 1].is_none();
        let prev_field: Option<String> = if index > 0 {
            match &self.fields[index - 1] {
                Component::Field(t) => Some(t.clone()),
                _ => None,
            }
        } else {
            None
        };
        let bracket_before_prev_field =
            index > 1 && prev_field.is_some() && self.operators[index - 2].is_none();

        // Dots split the field unless they extend a numeric literal.
        let chars: Vec<char> = self.field_text(index).chars().collect();
        for ci in 0..chars.len() {
            if chars[ci] != '.' {
                continue;
            }
            let before_dot: String = chars[..ci].iter().collect();
            let after_dot: String = chars[ci + 1..].iter().collect();
            let is_double = kind.is_operator("..") && after_dot.starts_with('.');
            if !kind.supports_float_literals()
                || !literal::precedes_dot_in_floating_point_literal(&before_dot)
                || is_double
            {
                let (op_text, rest, op_len) = if is_double {
                    ("..", after_dot.chars().skip(1).collect::<String>(), 2)
                } else {
                    (".", after_dot, 1)
                };
                self.set_field_text(index, before_dot);
                self.operators.insert(index, Some(Operator::new(op_text)));
                self.fields.insert(index + 1, Component::Field(rest));
                pos = shift_after_split(pos, index, ci, op_len);
                pos = self.check_field_change(index, pos);
                return self.check_field_change(index + 1, pos);
            }
        }

        // A numeric field absorbs a '.' operator to its right.
        let text = self.field_text(index);
        if kind.supports_float_literals()
            && literal::precedes_dot_in_floating_point_literal(&text)
            && self.next_op_text(index).as_deref() == Some(".")
        {
            pos = self.merge_operator_into_field(index, pos);
        }

        // Plus/minus splits unless it is a leading sign or an
        // exponent sign.
        let chars: Vec<char> = self.field_text(index).chars().collect();
        for ci in 0..chars.len() {
            let c = chars[ci];
            if c != '+' && c != '-' {
                continue;
            }
            let before_pm: String = chars[..ci].iter().collect();
            let after_pm: String = chars[ci + 1..].iter().collect();
            let at_beginning_and_unary = before_pm.is_empty()
                && !preceding_bracket
                && (prev_op.is_some() || prev_field.as_deref().map_or(true, |t| t.is_empty()))
                && literal::succeeds_opening_plus_minus(&after_pm);
            let midway = kind.supports_float_literals()
                && literal::precedes_plus_minus_in_floating_point_literal(&before_pm);
            if !at_beginning_and_unary && !midway {
                self.set_field_text(index, before_pm);
                self.operators.insert(index, Some(Operator::new(c.to_string())));
                self.fields.insert(index + 1, Component::Field(after_pm));
                return shift_after_split(pos, index, ci, 1);
            }
        }

        // An exponent-ending field absorbs a '+'/'-' operator to its
        // right.
        let text = self.field_text(index);
        if kind.supports_float_literals()
            && literal::precedes_plus_minus_in_floating_point_literal(&text)
            && matches!(self.next_op_text(index).as_deref(), Some("+") | Some("-"))
        {
            pos = self.merge_operator_into_field(index, pos);
        }

        // A sign operator behind an empty field merges into the digits
        // that follow it ("{1}+{}+{2}" becomes "{1}+{+2}").
        let text = self.field_text(index);
        if matches!(prev_op.as_deref(), Some("+") | Some("-"))
            && literal::succeeds_opening_plus_minus(&text)
            && prev_field.as_deref() == Some("")
            && !bracket_before_prev_field
        {
            let mut merged = prev_op.unwrap_or_default();
            merged.push_str(&text);
            self.operators.remove(index - 1);
            self.fields.remove(index - 1);
            self.set_field_text(index - 1, merged);
            pos = match pos {
                CaretPos::Field(i, sub) => {
                    CaretPos::field(i.saturating_sub(1), CaretPos::leaf(leaf_offset(&sub) + 1))
                }
                p => p,
            };
        }
        pos
    }

    /// Merges `fields[index]`, `operators[index]` and
    /// `fields[index + 1]` into one field, adjusting the caret.
    fn merge_operator_into_field(&mut self, index: usize, pos: CaretPos) -> CaretPos {
        let Some(op) = self.operators[index].clone().map(|o| o.text) else {
            return pos;
        };
        let prev_len = char_len(&self.field_text(index));
        let next_text = self.field_text(index + 1);
        let mut t = self.field_text(index);
        t.push_str(&op);
        t.push_str(&next_text);
        self.set_field_text(index, t);
        self.operators.remove(index);
        self.fields.remove(index + 1);
        match pos {
            CaretPos::Field(i, sub) if i == index + 1 => CaretPos::field(
                index,
                CaretPos::leaf(leaf_offset(&sub) + prev_len + char_len(&op)),
            ),
            CaretPos::Field(i, sub) if i > index + 1 => CaretPos::field(i - 1, *sub),
            p => p,
        }
    }

    // ----- backspace / delete -----

    pub(crate) fn backspace_at(&mut self, pos: &CaretPos) -> EditOutcome {
        let CaretPos::Field(index, sub) = pos else {
            return EditOutcome::Boundary;
        };
        let index = *index;
        if matches!(self.fields.get(index), Some(Component::Bracket(_))) {
            let inner = match &mut self.fields[index] {
                Component::Bracket(b) => b.content.backspace_at(sub),
                _ => unreachable!(),
            };
            return match inner {
                EditOutcome::Pos(p, spill) => {
                    self.absorb_spill(index, CaretPos::field(index, p), spill)
                }
                EditOutcome::Boundary => {
                    let (p, spill) = self.flatten_compound(index, false);
                    EditOutcome::Pos(p, spill)
                }
            };
        }
        self.backspace_in_field(index, leaf_offset(sub))
    }

    fn backspace_in_field(&mut self, index: usize, off: usize) -> EditOutcome {
        if off > 0 {
            self.remove_leaf_char(index, off - 1);
            let p = self.check_field_change(index, CaretPos::field(index, CaretPos::leaf(off - 1)));
            return EditOutcome::Pos(p, None);
        }
        if index == 0 {
            return EditOutcome::Boundary;
        }
        match self.operators[index - 1].clone() {
            None => {
                // Caret at the start of a literal deletes its opening
                // quote; at the start of the field after a compound it
                // deletes the compound's closer. Either way the pair
                // goes and the content merges in.
                let in_string = matches!(self.fields[index], Component::Literal(_));
                let target = if in_string { index } else { index - 1 };
                let (p, spill) = self.flatten_compound(target, !in_string);
                EditOutcome::Pos(p, spill)
            }
            Some(op) => {
                if char_len(&op.text) > 1 && op.text != "new " {
                    // Multi-character operator loses its last char.
                    if let Some(o) = &mut self.operators[index - 1] {
                        let n = char_len(&o.text);
                        o.text = prefix(&o.text, n - 1);
                    }
                    let p =
                        self.check_field_change(index - 1, CaretPos::field(index, CaretPos::leaf(0)));
                    EditOutcome::Pos(p, None)
                } else {
                    let residue = if op.text == "new " { "new" } else { "" };
                    let prev_len = char_len(&self.field_text(index - 1));
                    let cur_text = self.field_text(index);
                    self.operators.remove(index - 1);
                    self.fields.remove(index);
                    let mut t = self.field_text(index - 1);
                    t.push_str(residue);
                    t.push_str(&cur_text);
                    self.set_field_text(index - 1, t);
                    let new_off = prev_len + char_len(residue);
                    let p = self.check_field_change(
                        index - 1,
                        CaretPos::field(index - 1, CaretPos::leaf(new_off)),
                    );
                    EditOutcome::Pos(p, None)
                }
            }
        }
    }

    pub(crate) fn delete_at(&mut self, pos: &CaretPos) -> EditOutcome {
        let CaretPos::Field(index, sub) = pos else {
            return EditOutcome::Boundary;
        };
        let index = *index;
        if matches!(self.fields.get(index), Some(Component::Bracket(_))) {
            let inner = match &mut self.fields[index] {
                Component::Bracket(b) => b.content.delete_at(sub),
                _ => unreachable!(),
            };
            return match inner {
                EditOutcome::Pos(p, spill) => {
                    self.absorb_spill(index, CaretPos::field(index, p), spill)
                }
                EditOutcome::Boundary => {
                    let (p, spill) = self.flatten_compound(index, true);
                    EditOutcome::Pos(p, spill)
                }
            };
        }
        self.delete_in_field(index, leaf_offset(sub))
    }

    fn delete_in_field(&mut self, index: usize, off: usize) -> EditOutcome {
        let text = self.field_text(index);
        let len = char_len(&text);
        if off < len {
            self.remove_leaf_char(index, off);
            let p = self.check_field_change(index, CaretPos::field(index, CaretPos::leaf(off)));
            return EditOutcome::Pos(p, None);
        }
        if index == self.fields.len() - 1 {
            return EditOutcome::Boundary;
        }
        match self.operators[index].clone() {
            None => {
                let in_string = matches!(self.fields[index], Component::Literal(_));
                let target = if in_string { index } else { index + 1 };
                let (p, spill) = self.flatten_compound(target, in_string);
                EditOutcome::Pos(p, spill)
            }
            Some(op) => {
                let tail: String = op.text.chars().skip(1).collect();
                if char_len(&op.text) > 1 && self.kind.is_operator(&tail) {
                    self.operators[index] = Some(Operator::new(tail));
                    let p =
                        self.check_field_change(index, CaretPos::field(index, CaretPos::leaf(off)));
                    EditOutcome::Pos(p, None)
                } else {
                    let residue = if op.text == "new " { "ew" } else { "" };
                    let next_text = self.field_text(index + 1);
                    self.operators.remove(index);
                    self.fields.remove(index + 1);
                    let mut t = text;
                    t.push_str(residue);
                    t.push_str(&next_text);
                    self.set_field_text(index, t);
                    let p =
                        self.check_field_change(index, CaretPos::field(index, CaretPos::leaf(off)));
                    EditOutcome::Pos(p, None)
                }
            }
        }
    }

    /// Inserts text that escaped a nested level into the field after
    /// the bracket at `index`.
    fn absorb_spill(&mut self, index: usize, pos: CaretPos, spill: Option<String>) -> EditOutcome {
        let mut remaining = None;
        if let Some(s) = spill {
            match self.insert_str(&CaretPos::path(&[index + 1], 0), &s) {
                InsertOutcome::At(_) => {}
                InsertOutcome::Overflow(rest) => remaining = Some(rest),
            }
        }
        EditOutcome::Pos(pos, remaining)
    }

    /// Removes the compound at `index` with its flanking `None`
    /// operators and following field, then re-inserts the compound's
    /// raw content (re-tokenizing it) and the following field's text.
    /// Caret lands between the two if `at_end`, else at the junction
    /// before the content.
    fn flatten_compound(&mut self, index: usize, at_end: bool) -> (CaretPos, Option<String>) {
        let content = match &self.fields[index] {
            Component::Bracket(b) => b.content.copy_text(None, None),
            Component::Literal(l) => l.content.clone(),
            Component::Field(t) => t.clone(),
        };
        let following = self.field_text(index + 1);
        self.fields.remove(index + 1);
        self.operators.remove(index);
        self.fields.remove(index);
        self.operators.remove(index - 1);
        let before_len = char_len(&self.field_text(index - 1));
        let mut spill = None;
        let mid = match self.insert_str(
            &CaretPos::field(index - 1, CaretPos::leaf(before_len)),
            &content,
        ) {
            InsertOutcome::At(p) => p,
            InsertOutcome::Overflow(rest) => {
                spill = Some(rest);
                self.end_pos()
            }
        };
        if let Some(s) = &mut spill {
            s.push_str(&following);
        } else {
            match self.insert_str(&mid, &following) {
                InsertOutcome::At(_) => {}
                InsertOutcome::Overflow(rest) => spill = Some(rest),
            }
        }
        let result = if at_end {
            mid
        } else {
            CaretPos::field(index - 1, CaretPos::leaf(before_len))
        };
        (result, spill)
    }

    // ----- selections -----

    /// Removes the selected span; both addresses must be ordered and
    /// resolve at this level. Returns the junction caret.
    pub(crate) fn delete_selection(&mut self, start: &CaretPos, end: &CaretPos) -> CaretPos {
        let (CaretPos::Field(si, ssub), CaretPos::Field(ei, esub)) = (start, end) else {
            return start.clone();
        };
        let (si, ei) = (*si, *ei);
        if si == ei {
            match &mut self.fields[si] {
                Component::Bracket(b) => {
                    let p = b.content.delete_selection(ssub, esub);
                    return CaretPos::field(si, p);
                }
                Component::Literal(l) => {
                    let a = leaf_offset(ssub);
                    let b_off = leaf_offset(esub);
                    l.content = format!("{}{}", prefix(&l.content, a), suffix(&l.content, b_off));
                    return CaretPos::field(si, CaretPos::leaf(a));
                }
                Component::Field(_) => {}
            }
        }
        let a = leaf_offset(ssub);
        let b_off = leaf_offset(esub);
        let start_text = self.field_text(si);
        let end_text = self.field_text(ei);
        let merged = format!("{}{}", prefix(&start_text, a), suffix(&end_text, b_off));
        for _ in si..ei {
            self.operators.remove(si);
            self.fields.remove(si + 1);
        }
        self.fields[si] = Component::Field(merged);
        self.check_field_change(si, CaretPos::field(si, CaretPos::leaf(a)))
    }

    /// Replaces the selection with `c`. A bracket or quote wraps the
    /// selection instead of discarding it.
    pub(crate) fn insert_with_selection(
        &mut self,
        start: &CaretPos,
        end: &CaretPos,
        c: char,
    ) -> CaretPos {
        let wraps = self.kind.is_opening_bracket(c)
            || (self.kind.supports_literals() && (c == '"' || c == '\''));
        if !wraps {
            let p = self.delete_selection(start, end);
            return match self.insert_str(&p, &c.to_string()) {
                InsertOutcome::At(q) => q,
                InsertOutcome::Overflow(_) => p,
            };
        }
        self.wrap_selection(start, end, c)
    }

    fn wrap_selection(&mut self, start: &CaretPos, end: &CaretPos, c: char) -> CaretPos {
        let (CaretPos::Field(si, ssub), CaretPos::Field(ei, esub)) = (start, end) else {
            return end.clone();
        };
        let (si, ei) = (*si, *ei);
        if si == ei && matches!(self.fields[si], Component::Bracket(_)) {
            let p = match &mut self.fields[si] {
                Component::Bracket(b) => b.content.wrap_selection(ssub, esub, c),
                _ => unreachable!(),
            };
            return CaretPos::field(si, p);
        }
        if !matches!(self.fields[ei], Component::Field(_)) {
            // Selections ending inside a literal do not wrap; the
            // character inserts (or is dropped) at the end position.
            return match self.insert_char(end, c) {
                CharOutcome::At(q) => q,
                CharOutcome::Ascend => end.clone(),
            };
        }
        let content = self.copy_text(Some(start), Some(end));
        let p = self.delete_selection(start, end);
        let p2 = match self.insert_char(&p, c) {
            CharOutcome::At(q) => q,
            CharOutcome::Ascend => return p,
        };
        let _ = self.insert_str(&p2, &content);
        match &p2 {
            CaretPos::Field(j, _) => CaretPos::path(&[j + 1], 0),
            _ => p2,
        }
    }

    // ----- queries -----

    /// Copyable text between two caret bounds (`None` = that end of
    /// this tree).
    pub(crate) fn copy_text(&self, start: Option<&CaretPos>, end: Option<&CaretPos>) -> String {
        let (si, ssub) = match start {
            Some(CaretPos::Field(i, s)) => (*i, Some(&**s)),
            _ => (0, None),
        };
        let (ei, esub) = match end {
            Some(CaretPos::Field(i, s)) => (*i, Some(&**s)),
            _ => (self.fields.len() - 1, None),
        };
        let mut out = String::new();
        for i in si..=ei {
            let from = if i == si { ssub } else { None };
            let to = if i == ei { esub } else { None };
            out.push_str(&self.fields[i].copy_text(from, to));
            if i < ei {
                if let Some(op) = &self.operators[i] {
                    out.push_str(&op.text);
                }
            }
        }
        out
    }

    pub(crate) fn surface_text(&self) -> String {
        self.copy_text(None, None)
    }

    /// Canonical debug form: `{field}` per plain field, `_(…)_` per
    /// bracket, `_"…"_` per literal, `$` at the caret.
    pub(crate) fn state_string(&self, caret: Option<&CaretPos>) -> String {
        let mut out = String::new();
        for (i, comp) in self.fields.iter().enumerate() {
            let sub: Option<&CaretPos> = match caret {
                Some(CaretPos::Field(j, s)) if *j == i => Some(s),
                _ => None,
            };
            match comp {
                Component::Field(t) => {
                    out.push('{');
                    out.push_str(&with_caret_marker(t, sub));
                    out.push('}');
                }
                Component::Literal(l) => {
                    out.push(l.quote);
                    out.push_str(&with_caret_marker(&l.content, sub));
                    out.push(l.quote);
                }
                Component::Bracket(b) => {
                    out.push(b.open);
                    out.push_str(&b.content.state_string(sub));
                    out.push(b.close());
                }
            }
            if i < self.operators.len() {
                match &self.operators[i] {
                    Some(op) => out.push_str(&op.text),
                    None => out.push('_'),
                }
            }
        }
        out
    }

    /// True when `operators[i]`'s left operand is an empty field. An
    /// empty field reached by juxtaposition does not count: there the
    /// real operand is the bracket or literal before it.
    pub(crate) fn is_unary_operand(&self, i: usize) -> bool {
        self.fields[i].is_field_and_empty() && (i == 0 || self.operators[i - 1].is_some())
    }

    /// Display bands for every operator slot, freshly computed.
    pub(crate) fn precedences(&self) -> Vec<Option<Precedence>> {
        let ops: Vec<Option<&str>> = self
            .operators
            .iter()
            .map(|o| o.as_ref().map(|o| o.text.as_str()))
            .collect();
        let unary: Vec<bool> = (0..self.operators.len())
            .map(|i| self.is_unary_operand(i))
            .collect();
        calculate_precedences(&ops, &unary)
    }
}

fn with_caret_marker(t: &str, sub: Option<&CaretPos>) -> String {
    match sub {
        Some(p) => {
            let k = leaf_offset(p).min(char_len(t));
            format!("{}${}", prefix(t, k), suffix(t, k))
        }
        None => t.to_string(),
    }
}

/// Caret adjustment after `fields[index]` split at `before_len` with
/// an operator of `op_len` characters between the halves.
fn shift_after_split(pos: CaretPos, index: usize, before_len: usize, op_len: usize) -> CaretPos {
    match pos {
        CaretPos::Field(i, sub) if i == index => {
            let k = leaf_offset(&sub);
            if k <= before_len {
                CaretPos::field(i, *sub)
            } else {
                CaretPos::field(index + 1, CaretPos::leaf(k.saturating_sub(before_len + op_len)))
            }
        }
        CaretPos::Field(i, sub) if i > index => CaretPos::field(i + 1, *sub),
        p => p,
    }
}
