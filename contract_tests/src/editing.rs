//! Operator splitting, joining, overtyping, and the `new ` keyword
//! operator.
