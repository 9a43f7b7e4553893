use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// Width of a sequence key in decimal digits.
pub const SEQUENCE_WIDTH: usize = 8;

/// Fixed-width, zero-padded decimal rendering of a page's physical order.
///
/// This is the per-volume sort and range key under which pages are
/// persisted, so lexicographic order equals numeric order for every order
/// below 10^8. Larger orders render wider than [`SEQUENCE_WIDTH`] and lose
/// that property.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SequenceKey(String);

impl SequenceKey {
    /// Derive the key for a 1-based page order.
    pub fn from_order(order: u32) -> Self {
        Self(format!("{order:0width$}", width = SEQUENCE_WIDTH))
    }

    /// Parse a stored key. Accepts exactly [`SEQUENCE_WIDTH`] ASCII digits.
    pub fn parse(s: &str) -> Result<Self, TypeError> {
        if s.len() == SEQUENCE_WIDTH && s.bytes().all(|b| b.is_ascii_digit()) {
            Ok(Self(s.to_owned()))
        } else {
            Err(TypeError::InvalidSequenceKey(s.to_owned()))
        }
    }

    /// The page order this key encodes.
    pub fn order(&self) -> u32 {
        self.0.parse().unwrap_or(0)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for SequenceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SequenceKey({})", self.0)
    }
}

impl fmt::Display for SequenceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
