//! Zobrist hashing for position identification
//!
//! One 64-bit constant per (column, row, player). Placing a chip XORs its
//! constant into the running hash, so the hash of a position depends only on
//! which cells are occupied and by whom, never on the order of placement.
//!
//! # Example
//!
//! ```
//! use connect_four::board::{BoardState, Cell, Player};
//! use connect_four::search::zobrist::ZOBRIST;
//!
//! let mut board = BoardState::new();
//! let cell = board.place(Player::One, 3).unwrap();
//! assert_eq!(board.hash(), ZOBRIST.key(cell, Player::One));
//! ```

use std::sync::LazyLock;

use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256PlusPlus;

use crate::board::{BoardState, Cell, Player, COLUMNS, ROWS};

/// Fixed seed so hashes are reproducible across runs
const ZOBRIST_SEED: u64 = 0x0C4F_0DE5_7A7E_5EED;

/// Process-wide immutable key table, built on first use.
pub static ZOBRIST: LazyLock<ZobristTable> = LazyLock::new(ZobristTable::new);

/// Zobrist key table indexed by `[player][column][row]`.
pub struct ZobristTable {
    keys: [[[u64; ROWS]; COLUMNS]; 2],
}

impl ZobristTable {
    /// Build the table from the fixed seed.
    #[must_use]
    pub fn new() -> Self {
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(ZOBRIST_SEED);
        let mut keys = [[[0u64; ROWS]; COLUMNS]; 2];
        for player in keys.iter_mut() {
            for column in player.iter_mut() {
                for key in column.iter_mut() {
                    *key = rng.random();
                }
            }
        }
        Self { keys }
    }

    /// Key for a chip of `player` on `cell`
    #[inline]
    #[must_use]
    pub fn key(&self, cell: Cell, player: Player) -> u64 {
        self.keys[player.index()][cell.column as usize][cell.row as usize]
    }

    /// Full recomputation from the board's occupancy.
    ///
    /// `BoardState` maintains its hash incrementally; this is the reference
    /// used to check that.
    #[must_use]
    pub fn hash(&self, board: &BoardState) -> u64 {
        let mut h = 0u64;
        for player in [Player::One, Player::Two] {
            for cell in board.bitboard(player).iter_ones() {
                h ^= self.key(cell, player);
            }
        }
        h
    }
}

impl Default for ZobristTable {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deterministic_table() {
        let a = ZobristTable::new();
        let b = ZobristTable::new();
        let cell = Cell::new(4, 2);
        assert_eq!(a.key(cell, Player::One), b.key(cell, Player::One));
        assert_eq!(a.key(cell, Player::Two), ZOBRIST.key(cell, Player::Two));
    }

    #[test]
    fn test_keys_distinct() {
        let mut seen = std::collections::HashSet::new();
        for player in [Player::One, Player::Two] {
            for col in 0..COLUMNS as u8 {
                for row in 0..ROWS as u8 {
                    assert!(seen.insert(ZOBRIST.key(Cell::new(col, row), player)));
                }
            }
        }
    }

    #[test]
    fn test_empty_board_hash_is_zero() {
        assert_eq!(ZOBRIST.hash(&BoardState::new()), 0);
    }

    #[test]
    fn test_incremental_matches_full() {
        let mut board = BoardState::new();
        for (i, col) in [3, 3, 2, 4, 0, 6, 3].into_iter().enumerate() {
            let player = if i % 2 == 0 { Player::One } else { Player::Two };
            board.place(player, col).unwrap();
            assert_eq!(board.hash(), ZOBRIST.hash(&board));
        }
    }
}
