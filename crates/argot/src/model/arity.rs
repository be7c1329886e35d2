//! Argument arity.

use std::fmt;

use serde::{Deserialize, Serialize};

/// How many values an argument accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Arity {
    /// A flag: presence is the value.
    Zero,
    /// At most one value.
    ZeroOrOne,
    /// One value.
    ExactlyOne,
    /// Any number of values.
    ZeroOrMore,
}

impl Arity {
    /// Minimum number of values.
    pub fn min(self) -> usize {
        match self {
            Arity::ExactlyOne => 1,
            _ => 0,
        }
    }

    /// Maximum number of values, `None` when unbounded.
    pub fn max(self) -> Option<usize> {
        match self {
            Arity::Zero => Some(0),
            Arity::ZeroOrOne | Arity::ExactlyOne => Some(1),
            Arity::ZeroOrMore => None,
        }
    }

    /// True for flags.
    pub fn allows_none(self) -> bool {
        self.max() == Some(0)
    }

    /// True when more than one value may be given.
    pub fn allows_many(self) -> bool {
        self.max().is_none()
    }

    /// True when at most one value may be given.
    pub fn allows_zero_or_one(self) -> bool {
        self.max() == Some(1)
    }
}

impl fmt::Display for Arity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.max() {
            Some(max) => write!(f, "{}..{}", self.min(), max),
            None => write!(f, "{}..", self.min()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn predicates() {
        assert!(Arity::Zero.allows_none());
        assert!(!Arity::Zero.allows_many());
        assert!(Arity::ZeroOrOne.allows_zero_or_one());
        assert!(Arity::ExactlyOne.allows_zero_or_one());
        assert!(Arity::ZeroOrMore.allows_many());
        assert!(!Arity::ZeroOrMore.allows_none());
    }

    #[test]
    fn display() {
        assert_eq!(Arity::ExactlyOne.to_string(), "1..1");
        assert_eq!(Arity::ZeroOrMore.to_string(), "0..");
    }
}
