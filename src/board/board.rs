//! Board state with incremental hashing and win tracking

use std::fmt;

use smallvec::SmallVec;

use super::bitboard::{self, Bitboard, DIRECTIONS, PLAYABLE_MASK};
use super::{Cell, Player, COLUMNS, COLUMN_STRIDE, ROWS, TOTAL_CELLS};
use crate::error::MoveError;
use crate::search::zobrist::ZOBRIST;

/// Legal columns of a position, natural order
pub type ColumnList = SmallVec<[usize; COLUMNS]>;

/// Position of a 7x7 Connect Four game.
///
/// Value type: `clone()` yields an independent copy. `place` is the only
/// mutator and never removes chips.
#[derive(Debug, Clone)]
pub struct BoardState {
    /// Chips per player, indexed by `Player::index()`
    bits: [Bitboard; 2],
    /// Chips per column (0..=ROWS)
    heights: [u8; COLUMNS],
    /// XOR of the Zobrist keys of every occupied cell
    hash: u64,
    /// First player to complete four, with the run that did it
    winner: Option<Player>,
    winning_cells: Option<[Cell; 4]>,
    /// Play-order log, `column | player_index << 4`
    log: [u8; TOTAL_CELLS],
    ply: u8,
}

impl BoardState {
    pub fn new() -> Self {
        Self {
            bits: [Bitboard::new(); 2],
            heights: [0; COLUMNS],
            hash: 0,
            winner: None,
            winning_cells: None,
            log: [0; TOTAL_CELLS],
            ply: 0,
        }
    }

    /// Drop a chip for `player` into `column`.
    ///
    /// Returns the cell it landed in, or `ColumnFull` with the board untouched.
    pub fn place(&mut self, player: Player, column: usize) -> Result<Cell, MoveError> {
        debug_assert!(column < COLUMNS, "column {column} out of range");
        let row = self.heights[column] as usize;
        if row >= ROWS {
            return Err(MoveError::ColumnFull { column });
        }

        let cell = Cell::new(column as u8, row as u8);
        let idx = player.index();
        self.bits[idx].set(cell);
        self.heights[column] += 1;
        self.hash ^= ZOBRIST.key(cell, player);
        self.log[self.ply as usize] = column as u8 | ((idx as u8) << 4);
        self.ply += 1;

        if self.winner.is_none() && self.bits[idx].has_four() {
            self.winner = Some(player);
            self.winning_cells = Self::run_through(self.bits[idx].bits(), cell);
        }

        Ok(cell)
    }

    /// The four-cell run in `bits` that contains `cell`.
    fn run_through(bits: u64, cell: Cell) -> Option<[Cell; 4]> {
        let placed = cell.to_bit();
        for &shift in DIRECTIONS.iter() {
            let mut starts = bitboard::run_starts(bits, shift);
            while starts != 0 {
                let start = starts.trailing_zeros() as usize;
                starts &= starts - 1;
                let step = shift as usize;
                if (start..=start + 3 * step).step_by(step).any(|b| b == placed) {
                    return Some([
                        Cell::from_bit(start),
                        Cell::from_bit(start + step),
                        Cell::from_bit(start + 2 * step),
                        Cell::from_bit(start + 3 * step),
                    ]);
                }
            }
        }
        None
    }

    /// Does `player` have four in a row?
    #[inline]
    pub fn is_win(&self, player: Player) -> bool {
        self.bits[player.index()].has_four()
    }

    /// Would `player` complete four by dropping into `column`?
    #[inline]
    pub fn is_winning_move(&self, player: Player, column: usize) -> bool {
        match self.next_cell(column) {
            Some(cell) => {
                let bits = self.bits[player.index()].bits() | (1u64 << cell.to_bit());
                bitboard::has_four(bits)
            }
            None => false,
        }
    }

    #[inline]
    pub fn is_full(&self) -> bool {
        self.heights.iter().all(|&h| h as usize == ROWS)
    }

    #[inline]
    pub fn winner(&self) -> Option<Player> {
        self.winner
    }

    #[inline]
    pub fn winning_cells(&self) -> Option<[Cell; 4]> {
        self.winning_cells
    }

    #[inline]
    pub fn height(&self, column: usize) -> usize {
        self.heights[column] as usize
    }

    #[inline]
    pub fn is_playable(&self, column: usize) -> bool {
        column < COLUMNS && (self.heights[column] as usize) < ROWS
    }

    /// Cell the next chip in `column` would land in
    #[inline]
    pub fn next_cell(&self, column: usize) -> Option<Cell> {
        if self.is_playable(column) {
            Some(Cell::new(column as u8, self.heights[column]))
        } else {
            None
        }
    }

    pub fn legal_columns(&self) -> ColumnList {
        (0..COLUMNS).filter(|&c| self.is_playable(c)).collect()
    }

    /// Occupant of a cell
    #[inline]
    pub fn cell(&self, column: usize, row: usize) -> Option<Player> {
        let cell = Cell::new(column as u8, row as u8);
        if self.bits[0].get(cell) {
            Some(Player::One)
        } else if self.bits[1].get(cell) {
            Some(Player::Two)
        } else {
            None
        }
    }

    #[inline]
    pub fn bits(&self, player: Player) -> u64 {
        self.bits[player.index()].bits()
    }

    #[inline]
    pub fn bitboard(&self, player: Player) -> Bitboard {
        self.bits[player.index()]
    }

    /// Both players' chips
    #[inline]
    pub fn occupied(&self) -> u64 {
        self.bits[0].bits() | self.bits[1].bits()
    }

    /// Empty playable cells
    #[inline]
    pub fn empty(&self) -> u64 {
        !self.occupied() & PLAYABLE_MASK
    }

    /// One bit per column: the cell the next chip would land in
    #[inline]
    pub fn playable_cells(&self) -> u64 {
        let mut mask = 0u64;
        for (col, &h) in self.heights.iter().enumerate() {
            if (h as usize) < ROWS {
                mask |= 1u64 << (col * COLUMN_STRIDE + h as usize);
            }
        }
        mask
    }

    #[inline]
    pub fn hash(&self) -> u64 {
        self.hash
    }

    /// Plies played so far
    #[inline]
    pub fn ply(&self) -> usize {
        self.ply as usize
    }

    /// Player whose turn it is when players alternate from `Player::One`
    #[inline]
    pub fn to_move(&self) -> Player {
        if self.ply % 2 == 0 {
            Player::One
        } else {
            Player::Two
        }
    }

    /// Moves in play order
    pub fn moves(&self) -> impl Iterator<Item = (usize, Player)> + '_ {
        self.log[..self.ply as usize]
            .iter()
            .map(|&m| ((m & 0x0F) as usize, Player::from_index((m >> 4) as usize)))
    }

    /// Opening-book key: column digit then player digit (1 or 2) per ply.
    pub fn sequence_key(&self) -> String {
        let mut key = String::with_capacity(self.ply() * 2);
        for (column, player) in self.moves() {
            key.push(char::from(b'0' + column as u8));
            key.push(char::from(b'0' + player.digit()));
        }
        key
    }
}

impl Default for BoardState {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for BoardState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in (0..ROWS).rev() {
            for col in 0..COLUMNS {
                let ch = match self.cell(col, row) {
                    Some(Player::One) => 'X',
                    Some(Player::Two) => 'O',
                    None => '.',
                };
                write!(f, " {ch}")?;
            }
            writeln!(f)?;
        }
        for col in 0..COLUMNS {
            write!(f, " {col}")?;
        }
        Ok(())
    }
}
