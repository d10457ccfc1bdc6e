//! Bracket nesting: opening, closing, overtyping, flattening on
//! delete, and text spilling out of a flattened level.
