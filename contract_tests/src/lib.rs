//! # Edit Behaviour Contract Tests
//!
//! This crate provides "golden" tests for the slot edit engine to
//! ensure its observable behaviour doesn't drift accidentally over
//! time.
//!
//! ## Philosophy
//!
//! - **Explicit over implicit**: Expected tree states are written out
//!   as literal `{field}op{field}` strings
//! - **Testability first**: Every case replays a key stream and pins
//!   the exact resulting state and caret
//! - **Mechanism not policy**: The harness checks the engine's
//!   contracts (round trips, split invariance, bracket balance), not
//!   how a UI should use it
//!
//! ## Structure
//!
//! Each behaviour area has a module of contract tests:
//! - `editing` — operator splitting, joining, overtyping, `new `
//! - `floats` — numeric-literal absorption and re-segmentation
//! - `strings` — quote literals and escapes
//! - `brackets` — bracket nesting, flattening, spill-out
//! - `selections` — selection delete / replace / wrap
//! - `positions` — caret/offset mapping in both text spaces
//! - `precedence` — operator display bands
//! - `types` — the type-name slot kind
//! - `serde_contract` — JSON shapes of the shared value types

pub mod harness;

mod brackets;
mod editing;
mod floats;
mod positions;
mod precedence;
mod selections;
mod serde_contract;
mod strings;
mod types;
