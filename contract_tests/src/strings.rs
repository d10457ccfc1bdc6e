//! String and char literals: quotes, escapes, and the inertness of
//! structure characters inside a literal.
