use serde::{Deserialize, Serialize};

/// Occurrences of one term in one document: term frequency plus the
/// strictly non-decreasing token-position list those occurrences were
/// found at.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Posting {
    pub tf: u32,
    pub positions: Vec<u32>,
}

impl Posting {
    pub fn new() -> Self {
        Posting::default()
    }

    /// Merge another posting's positions in, summing `tf` and concatenating
    /// `positions` (used when the write buffer flushes into the main index).
    pub fn merge(&mut self, other: Posting) {
        self.tf += other.tf;
        self.positions.extend(other.positions);
    }

    pub fn from_positions(positions: Vec<u32>) -> Self {
        Posting {
            tf: positions.len() as u32,
            positions,
        }
    }
}
