//! Selection delete, replace, and bracket/quote wrapping.
