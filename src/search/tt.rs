//! Transposition Table for caching search results
//!
//! Entries are keyed by the board's Zobrist hash. The table is
//! insert-until-full: nothing is ever evicted, and once `capacity` entries are
//! held further stores are dropped until the next `clear()`.
//!
//! # Example
//!
//! ```
//! use connect_four::search::{Bound, TranspositionTable};
//!
//! let mut tt = TranspositionTable::new(1024);
//! tt.store(0x1234_5678_9ABC_DEF0, 120, 6, Bound::Exact, Some(3));
//!
//! let entry = tt.lookup(0x1234_5678_9ABC_DEF0).unwrap();
//! assert_eq!(entry.score, 120);
//! assert_eq!(entry.column, Some(3));
//! ```

use std::collections::HashMap;

use log::debug;

/// How the stored score relates to the true value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bound {
    /// Exact score - the search completed inside the window
    Exact,
    /// Lower bound - true score >= stored value (beta cutoff)
    Lower,
    /// Upper bound - true score <= stored value (alpha fail-low)
    Upper,
}

impl Bound {
    /// Classify a node result against the window it was searched with.
    #[inline]
    pub fn classify(score: i32, alpha: i32, beta: i32) -> Bound {
        if score <= alpha {
            Bound::Upper
        } else if score >= beta {
            Bound::Lower
        } else {
            Bound::Exact
        }
    }
}

/// Transposition table entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TTEntry {
    /// Score relative to the side to move at the stored node
    pub score: i32,
    /// Remaining depth the node was searched to
    pub depth: i32,
    pub bound: Bound,
    /// Best column found at the node, if any
    pub column: Option<usize>,
}

/// Capacity-bounded transposition table.
pub struct TranspositionTable {
    entries: HashMap<u64, TTEntry>,
    capacity: usize,
    saturated_logged: bool,
}

impl TranspositionTable {
    /// Default entry limit
    pub const DEFAULT_CAPACITY: usize = 1_000_000;

    /// Create an empty table holding at most `capacity` entries.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: HashMap::with_capacity(capacity.min(1 << 16)),
            capacity,
            saturated_logged: false,
        }
    }

    /// Entry for `hash`, if one was stored.
    #[inline]
    #[must_use]
    pub fn lookup(&self, hash: u64) -> Option<TTEntry> {
        self.entries.get(&hash).copied()
    }

    /// Best column recorded for `hash`, for move ordering.
    #[inline]
    #[must_use]
    pub fn best_column(&self, hash: u64) -> Option<usize> {
        self.entries.get(&hash).and_then(|e| e.column)
    }

    /// Record a finished node. Dropped once the table is full.
    pub fn store(&mut self, hash: u64, score: i32, depth: i32, bound: Bound, column: Option<usize>) {
        if self.entries.len() >= self.capacity {
            if !self.saturated_logged {
                debug!("transposition table full at {} entries; dropping stores", self.capacity);
                self.saturated_logged = true;
            }
            return;
        }
        self.entries.insert(
            hash,
            TTEntry {
                score,
                depth,
                bound,
                column,
            },
        );
    }

    /// Remove every entry.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.saturated_logged = false;
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[inline]
    pub fn is_full(&self) -> bool {
        self.entries.len() >= self.capacity
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Get statistics about table usage.
    #[must_use]
    pub fn stats(&self) -> TTStats {
        let used = self.entries.len();
        TTStats {
            capacity: self.capacity,
            used,
            usage_percent: (used as f64 / self.capacity.max(1) as f64 * 100.0) as u8,
        }
    }
}

impl Default for TranspositionTable {
    fn default() -> Self {
        Self::new(Self::DEFAULT_CAPACITY)
    }
}

/// Statistics about transposition table usage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TTStats {
    /// Maximum number of entries
    pub capacity: usize,
    /// Entries currently stored
    pub used: usize,
    /// Percentage of capacity in use (0-100)
    pub usage_percent: u8,
}
