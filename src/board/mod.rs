//! Board representation for Connect Four

pub mod bitboard;
pub mod board;


// Re-exports
pub use bitboard::Bitboard;
pub use board::BoardState;

/// Number of columns (7)
pub const COLUMNS: usize = 7;
/// Number of playable rows per column (7)
pub const ROWS: usize = 7;
/// Bits per column: playable rows plus one guard row
pub const COLUMN_STRIDE: usize = ROWS + 1;
pub const TOTAL_CELLS: usize = COLUMNS * ROWS; // 49

/// Center column index
pub const CENTER_COLUMN: usize = COLUMNS / 2;

/// Player identity. `One` moves first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Player {
    One,
    Two,
}

impl Player {
    /// Get opponent
    #[inline]
    pub fn opponent(self) -> Player {
        match self {
            Player::One => Player::Two,
            Player::Two => Player::One,
        }
    }

    /// Table index (0 or 1)
    #[inline]
    pub fn index(self) -> usize {
        match self {
            Player::One => 0,
            Player::Two => 1,
        }
    }

    /// Player number as written in opening-book keys (1 or 2)
    #[inline]
    pub fn digit(self) -> u8 {
        match self {
            Player::One => 1,
            Player::Two => 2,
        }
    }

    #[inline]
    pub fn from_index(idx: usize) -> Player {
        if idx == 0 {
            Player::One
        } else {
            Player::Two
        }
    }
}

/// A cell on the board. Row 0 is the bottom row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Cell {
    pub column: u8,
    pub row: u8,
}

impl Cell {
    #[inline]
    pub fn new(column: u8, row: u8) -> Self {
        debug_assert!((column as usize) < COLUMNS && (row as usize) < ROWS);
        Self { column, row }
    }

    /// Bit index in the column-major layout
    #[inline]
    pub fn to_bit(self) -> usize {
        self.column as usize * COLUMN_STRIDE + self.row as usize
    }

    /// Inverse of `to_bit`. Guard-row bits map to row `ROWS`.
    #[inline]
    pub fn from_bit(bit: usize) -> Self {
        Self {
            column: (bit / COLUMN_STRIDE) as u8,
            row: (bit % COLUMN_STRIDE) as u8,
        }
    }

    #[inline]
    pub fn is_valid(column: i32, row: i32) -> bool {
        column >= 0 && column < COLUMNS as i32 && row >= 0 && row < ROWS as i32
    }
}
