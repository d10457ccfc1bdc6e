//! Caret addressing inside a nested field/operator tree.
//!
//! A caret address is a path: descend into the component at each
//! `Field` index, ending at a character offset inside a leaf. `Up`
//! expresses a position relative to the *enclosing* tree; it appears
//! when an edit inside a nested level resolves to a position one level
//! out (for example deleting the opening bracket the caret sits in).
//! `normalise` cancels `Up` nodes against the path above them, so every
//! address handed to the engine is a plain `Field*`/`Leaf` chain.

use serde::{Deserialize, Serialize};

/// A caret address inside a slot tree.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CaretPos {
    /// Character offset inside a leaf field or literal.
    Leaf(usize),
    /// Descend into the component at this index.
    Field(usize, Box<CaretPos>),
    /// The wrapped position is expressed in the coordinates of the
    /// enclosing tree; cancelled by [`CaretPos::normalise`].
    Up(Box<CaretPos>),
}

impl CaretPos {
    pub fn leaf(offset: usize) -> Self {
        CaretPos::Leaf(offset)
    }

    pub fn field(index: usize, sub: CaretPos) -> Self {
        CaretPos::Field(index, Box::new(sub))
    }

    pub fn up(sub: CaretPos) -> Self {
        CaretPos::Up(Box::new(sub))
    }

    /// Builds `Field(indexes[0], … Field(indexes[n-1], Leaf(offset)))`.
    pub fn path(indexes: &[usize], offset: usize) -> Self {
        match indexes.split_first() {
            Some((&i, rest)) => CaretPos::field(i, CaretPos::path(rest, offset)),
            None => CaretPos::Leaf(offset),
        }
    }

    /// Cancels `Up` nodes bottom-up. `Field(i, Up(p))` collapses to
    /// `p`; an `Up` that survives to the head escapes the tree the
    /// address was written against and is left in place (see
    /// [`CaretPos::is_resolved`]).
    pub fn normalise(&self) -> CaretPos {
        match self {
            CaretPos::Leaf(k) => CaretPos::Leaf(*k),
            CaretPos::Up(inner) => CaretPos::up(inner.normalise()),
            CaretPos::Field(i, sub) => match sub.normalise() {
                CaretPos::Up(inner) => *inner,
                s => CaretPos::field(*i, s),
            },
        }
    }

    /// True if normalising leaves no `Up` nodes.
    pub fn is_resolved(&self) -> bool {
        !matches!(self.normalise(), CaretPos::Up(_))
    }

    /// Flattens a normalised address into its number sequence: field
    /// indexes followed by the leaf offset. A leftover `Up` head stops
    /// the walk.
    fn key(&self) -> Vec<usize> {
        let mut out = Vec::new();
        let mut cur = self.normalise();
        loop {
            match cur {
                CaretPos::Field(i, sub) => {
                    out.push(i);
                    cur = *sub;
                }
                CaretPos::Leaf(k) => {
                    out.push(k);
                    break;
                }
                CaretPos::Up(_) => break,
            }
        }
        out
    }

    /// Strict lexicographic order on normalised paths. Field indexes
    /// and leaf offsets compare uniformly, so a position inside the
    /// component at index `i` sorts between offsets `i` and `i + 1` of
    /// the surrounding level.
    pub fn before(&self, other: &CaretPos) -> bool {
        self.key() < other.key()
    }

    /// Inclusive containment: `start <= self <= end` in path order.
    pub fn between(&self, start: &CaretPos, end: &CaretPos) -> bool {
        let k = self.key();
        k >= start.key() && k <= end.key()
    }

    /// Path composition: replaces the terminal `Leaf(k)` with
    /// `Field(k, tail)`, turning the leaf offset into an index for the
    /// deeper address.
    pub fn append(&self, tail: CaretPos) -> CaretPos {
        match self {
            CaretPos::Leaf(k) => CaretPos::field(*k, tail),
            CaretPos::Field(i, sub) => CaretPos::field(*i, sub.append(tail)),
            CaretPos::Up(sub) => CaretPos::up(sub.append(tail)),
        }
    }

    /// If this address is exactly `prefix` followed by a leaf, yields
    /// the leaf offset.
    pub fn following(&self, prefix: &[usize]) -> Option<usize> {
        fn walk(pos: &CaretPos, prefix: &[usize]) -> Option<usize> {
            match (pos, prefix.split_first()) {
                (CaretPos::Field(i, sub), Some((&p, rest))) if *i == p => walk(sub, rest),
                (CaretPos::Leaf(k), None) => Some(*k),
                _ => None,
            }
        }
        walk(&self.normalise(), prefix)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_path_builds_nested_fields() {
        assert_eq!(
            CaretPos::path(&[1, 0], 2),
            CaretPos::field(1, CaretPos::field(0, CaretPos::leaf(2)))
        );
        assert_eq!(CaretPos::path(&[], 3), CaretPos::leaf(3));
    }

    #[test]
    fn test_normalise_cancels_up() {
        let p = CaretPos::field(2, CaretPos::up(CaretPos::path(&[0], 5)));
        assert_eq!(p.normalise(), CaretPos::path(&[0], 5));
    }

    #[test]
    fn test_normalise_cancels_stacked_ups() {
        // Two Ups cancel two enclosing Field levels.
        let p = CaretPos::field(
            3,
            CaretPos::field(1, CaretPos::up(CaretPos::up(CaretPos::leaf(7)))),
        );
        assert_eq!(p.normalise(), CaretPos::leaf(7));
        assert!(p.is_resolved());
    }

    #[test]
    fn test_normalise_keeps_escaping_up() {
        let p = CaretPos::up(CaretPos::leaf(0));
        assert_eq!(p.normalise(), p);
        assert!(!p.is_resolved());
    }

    #[test]
    fn test_before_is_lexicographic() {
        let a = CaretPos::path(&[0], 1);
        let b = CaretPos::path(&[0], 2);
        let c = CaretPos::path(&[1, 0], 0);
        assert!(a.before(&b));
        assert!(b.before(&c));
        assert!(!b.before(&a));
        assert!(!a.before(&a));
        // Inside component 0 sorts after offset 0 of the outer level.
        assert!(CaretPos::path(&[0], 0).before(&CaretPos::path(&[0, 0], 1)));
    }

    #[test]
    fn test_between_is_inclusive() {
        let start = CaretPos::path(&[0], 1);
        let end = CaretPos::path(&[2], 0);
        assert!(start.between(&start, &end));
        assert!(end.between(&start, &end));
        assert!(CaretPos::path(&[1, 0], 3).between(&start, &end));
        assert!(!CaretPos::path(&[0], 0).between(&start, &end));
        assert!(!CaretPos::path(&[2], 1).between(&start, &end));
    }

    #[test]
    fn test_append_extends_leaf_into_index() {
        let p = CaretPos::path(&[1], 2);
        assert_eq!(p.append(CaretPos::leaf(4)), CaretPos::path(&[1, 2], 4));
    }

    #[test]
    fn test_following_matches_exact_prefix() {
        let p = CaretPos::path(&[1, 0], 3);
        assert_eq!(p.following(&[1, 0]), Some(3));
        assert_eq!(p.following(&[1]), None);
        assert_eq!(p.following(&[0, 0]), None);
        assert_eq!(CaretPos::leaf(2).following(&[]), Some(2));
    }

    #[test]
    fn test_following_sees_through_up() {
        let p = CaretPos::field(9, CaretPos::up(CaretPos::path(&[1], 4)));
        assert_eq!(p.following(&[1]), Some(4));
    }
}
