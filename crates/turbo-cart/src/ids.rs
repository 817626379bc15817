//! Newtype ID for type-safe product identifiers.
//!
//! Product ids are integers on the wire. Wrapping them prevents accidentally
//! passing a quantity where an id is expected.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A catalog product identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(u64);

impl ProductId {
    /// Create a new ID from an integer.
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Get the inner integer.
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for ProductId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl FromStr for ProductId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse().map(Self)
    }
}
