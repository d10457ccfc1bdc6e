//! Structured-expression editing engine.
//!
//! A slot holds an expression as an alternating field/operator tree
//! rather than flat text, so brackets, string literals and generic
//! angle brackets can never become unbalanced, while the user still
//! experiences ordinary text editing. The engine classifies every
//! typed character (field text, operator, bracket, quote), re-segments
//! fields as numeric literals grow and shrink, and renders the tree
//! both as the user-visible surface text and as generated target text
//! with a position mapping between the two.
//!
//! Philosophy:
//! - Never reject input: any character stream produces a valid tree;
//!   unwanted characters are dropped, never errored.
//! - Fail fast on stale addresses: a caret path that does not resolve
//!   is a caller bug and reported as an error before any mutation.
//! - No ambient authority: no I/O, no globals, no logging; every
//!   outcome is a return value.

mod component;
mod infix;
mod literal;
mod mapping;
mod operator;
mod slot;
mod target;
mod text;

pub use operator::{calculate_precedences, SlotKind};
pub use slot::StructuredSlot;
pub use slot_types::{CaretPos, Precedence, SlotError, SpanMapping, TextRange, TextSpace};
