//! Bitboard implementation for fast line detection

use super::{Cell, COLUMNS, COLUMN_STRIDE, ROWS};

/// Shift offsets for the four line directions in the column-major layout.
///
/// A guard row above every column keeps shifted bits from bleeding into the
/// neighbouring column.
pub const VERTICAL: u32 = 1;
pub const HORIZONTAL: u32 = COLUMN_STRIDE as u32;
pub const DIAGONAL_DOWN: u32 = COLUMN_STRIDE as u32 - 1;
pub const DIAGONAL_UP: u32 = COLUMN_STRIDE as u32 + 1;

pub const DIRECTIONS: [u32; 4] = [VERTICAL, HORIZONTAL, DIAGONAL_DOWN, DIAGONAL_UP];

/// Mask of every playable cell (guard rows excluded)
pub const PLAYABLE_MASK: u64 = {
    let mut mask = 0u64;
    let mut col = 0;
    while col < COLUMNS {
        mask |= ((1u64 << ROWS) - 1) << (col * COLUMN_STRIDE);
        col += 1;
    }
    mask
};

/// Mask of a single column's playable cells
#[inline]
pub const fn column_mask(column: usize) -> u64 {
    ((1u64 << ROWS) - 1) << (column * COLUMN_STRIDE)
}

/// Single-word bitboard for one player's chips
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct Bitboard {
    bits: u64,
}

impl Bitboard {
    /// Create empty bitboard
    pub const fn new() -> Self {
        Self { bits: 0 }
    }

    #[inline]
    pub const fn from_bits(bits: u64) -> Self {
        Self { bits }
    }

    #[inline]
    pub const fn bits(self) -> u64 {
        self.bits
    }

    /// Set a bit at cell
    #[inline]
    pub fn set(&mut self, cell: Cell) {
        self.bits |= 1u64 << cell.to_bit();
    }

    /// Check if bit is set at cell
    #[inline]
    pub fn get(&self, cell: Cell) -> bool {
        (self.bits >> cell.to_bit()) & 1 == 1
    }

    /// Count total set bits (popcount)
    #[inline]
    pub fn count(&self) -> u32 {
        self.bits.count_ones()
    }

    /// Check if empty
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bits == 0
    }

    /// True if the bitboard contains four in a row in any direction.
    ///
    /// For each direction `s`, `m = b & (b >> s)` marks pairs; `m & (m >> 2s)`
    /// is non-zero exactly when four consecutive bits exist.
    #[inline]
    pub fn has_four(&self) -> bool {
        has_four(self.bits)
    }

    /// Iterate over set cells
    pub fn iter_ones(&self) -> BitboardIter {
        BitboardIter { bits: self.bits }
    }
}

/// Four-in-a-row test on a raw word
#[inline]
pub fn has_four(bits: u64) -> bool {
    DIRECTIONS.iter().any(|&s| {
        let m = bits & (bits >> s);
        m & (m >> (2 * s)) != 0
    })
}

/// Starting bits of every four-in-a-row run in direction `shift`
#[inline]
pub fn run_starts(bits: u64, shift: u32) -> u64 {
    let m = bits & (bits >> shift);
    m & (m >> (2 * shift))
}

/// Iterator over set bits in a Bitboard
pub struct BitboardIter {
    bits: u64,
}

impl Iterator for BitboardIter {
    type Item = Cell;

    fn next(&mut self) -> Option<Self::Item> {
        if self.bits == 0 {
            return None;
        }
        let bit = self.bits.trailing_zeros() as usize;
        self.bits &= self.bits - 1;
        Some(Cell::from_bit(bit))
    }
}
