//! Caret/offset mapping in both text spaces and the generated target
//! text, including the range-call restructuring.
