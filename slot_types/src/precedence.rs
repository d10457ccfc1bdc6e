//! Display precedence bands for operators.

use serde::{Deserialize, Serialize};

/// Band an operator occurrence renders in. `Dot`, `Comma` and `New`
/// are structural; the remaining three express how loosely the
/// operator binds relative to its neighbours (loosest binds get the
/// most visual separation).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Precedence {
    Dot,
    Comma,
    New,
    High,
    Medium,
    Low,
}

impl Precedence {
    /// Maps a nesting level from the precedence walk to a band:
    /// 0 is the tightest binding found, 1 the next, everything deeper
    /// shares the loosest band.
    pub fn from_level(level: u32) -> Self {
        match level {
            0 => Precedence::High,
            1 => Precedence::Medium,
            _ => Precedence::Low,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_banding() {
        assert_eq!(Precedence::from_level(0), Precedence::High);
        assert_eq!(Precedence::from_level(1), Precedence::Medium);
        assert_eq!(Precedence::from_level(2), Precedence::Low);
        assert_eq!(Precedence::from_level(9), Precedence::Low);
    }
}
