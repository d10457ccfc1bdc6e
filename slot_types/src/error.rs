//! Error type for the public slot API.
//!
//! Edits never reject *input* (any character stream is legal); the
//! only failures are caller contract violations: a caret address that
//! no longer resolves in the tree, or an offset past the end of a
//! rendered text. Both fail fast and leave the tree unchanged.

use crate::{CaretPos, TextSpace};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SlotError {
    #[error("caret address {0:?} does not resolve in the current tree")]
    InvalidAddress(CaretPos),
    #[error("offset {offset} is past the end of the {space:?} text (length {len})")]
    OffsetOutOfRange {
        offset: usize,
        len: usize,
        space: TextSpace,
    },
}
