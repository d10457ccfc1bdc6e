//! Shared value types for the structured slot engine.
//!
//! Philosophy:
//! - Plain data: every type here is a small value type with derived
//!   serde support, no behaviour beyond what the type itself owns.
//! - No ambient authority: nothing in this crate touches I/O, clocks,
//!   or globals; errors and positions are explicit values.
//! - Stable shapes: the serialized forms are pinned by contract tests
//!   and must not change silently.

pub mod caret;
pub mod error;
pub mod precedence;
pub mod span;

pub use caret::CaretPos;
pub use error::SlotError;
pub use precedence::Precedence;
pub use span::{SpanMapping, TextRange, TextSpace};
