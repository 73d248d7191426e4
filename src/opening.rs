//! Opening book
//!
//! A fixed table from move sequences to a recommended column, consulted only
//! in the first plies of a game. Keys concatenate a column digit and a player
//! digit (1 or 2) for every ply in play order, so after player 1 opens in the
//! center and player 2 answers on top the key is `"3132"`.

use std::collections::HashMap;
use std::sync::LazyLock;

use crate::board::BoardState;

/// Default ply limit for book lookups
pub const DEFAULT_PLY_LIMIT: usize = 15;

/// Book lines. Each key appears once.
const BOOK_LINES: &[(&str, usize)] = &[
    // Empty board
    ("", 3),
    // Player 1 opens anywhere: answer in the center
    ("01", 3),
    ("11", 3),
    ("21", 3),
    ("31", 3),
    ("41", 3),
    ("51", 3),
    ("61", 3),
    // Player 1's second move after a center reply
    ("3132", 3),
    ("0132", 3),
    ("1132", 3),
    ("2132", 3),
    ("4132", 3),
    ("5132", 3),
    ("6132", 3),
    // Two-move sequences: stay next to the center
    ("313241", 2),
    ("313251", 4),
    ("313211", 2),
    ("313221", 2),
    ("313261", 4),
    ("313231", 3),
    ("31323132", 3),
    ("3132113122", 2),
    ("3132413242", 4),
    ("3132513252", 4),
    ("3132213222", 2),
    // Edge openings: contest the edge
    ("0131", 0),
    ("013101", 0),
    ("6131", 6),
    ("613161", 6),
    ("010111", 0),
    ("616161", 6),
    // Vertical stacks
    ("4142", 4),
    ("414241", 4),
    ("2122", 2),
    ("5152", 5),
];

static BOOK: LazyLock<HashMap<&'static str, usize>> =
    LazyLock::new(|| BOOK_LINES.iter().copied().collect());

/// Read-only opening lookup with a ply limit.
#[derive(Debug, Clone, Copy)]
pub struct OpeningBook {
    ply_limit: usize,
}

impl OpeningBook {
    pub fn new(ply_limit: usize) -> Self {
        Self { ply_limit }
    }

    #[inline]
    pub fn ply_limit(&self) -> usize {
        self.ply_limit
    }

    /// Book column for the raw sequence key, ignoring legality.
    pub fn entry(&self, key: &str) -> Option<usize> {
        BOOK.get(key).copied()
    }

    /// Book column for `board`, if the position is early enough, has an
    /// entry, and the recommended column is still playable.
    pub fn lookup(&self, board: &BoardState) -> Option<usize> {
        if board.ply() > self.ply_limit {
            return None;
        }
        let column = self.entry(&board.sequence_key())?;
        board.is_playable(column).then_some(column)
    }

    /// Number of book lines
    pub fn len(&self) -> usize {
        BOOK.len()
    }

    pub fn is_empty(&self) -> bool {
        BOOK.is_empty()
    }
}

impl Default for OpeningBook {
    fn default() -> Self {
        Self::new(DEFAULT_PLY_LIMIT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Player;

    fn play(moves: &[(Player, usize)]) -> BoardState {
        let mut board = BoardState::new();
        for &(player, col) in moves {
            board.place(player, col).unwrap();
        }
        board
    }

    #[test]
    fn test_keys_are_unique() {
        assert_eq!(BOOK.len(), BOOK_LINES.len());
    }

    #[test]
    fn test_empty_board_center() {
        let book = OpeningBook::default();
        assert_eq!(book.lookup(&BoardState::new()), Some(3));
    }

    #[test]
    fn test_reply_to_first_move() {
        let book = OpeningBook::default();
        for col in 0..7 {
            let board = play(&[(Player::One, col)]);
            assert_eq!(book.lookup(&board), Some(3));
        }
    }

    #[test]
    fn test_duplicate_lines_keep_center() {
        let book = OpeningBook::default();
        assert_eq!(book.entry("1132"), Some(3));
        assert_eq!(book.entry("5132"), Some(3));
    }

    #[test]
    fn test_edge_contest() {
        let book = OpeningBook::default();
        let board = play(&[(Player::One, 0), (Player::Two, 3), (Player::One, 0)]);
        assert_eq!(board.sequence_key(), "013201");
        assert_eq!(book.lookup(&board), None);
        assert_eq!(book.entry("0131"), Some(0));
    }

    #[test]
    fn test_center_stack_line() {
        let book = OpeningBook::default();
        let board = play(&[
            (Player::One, 3),
            (Player::Two, 3),
            (Player::One, 3),
            (Player::Two, 3),
        ]);
        assert_eq!(book.lookup(&board), Some(3));
    }

    #[test]
    fn test_unknown_sequence() {
        let book = OpeningBook::default();
        let board = play(&[(Player::One, 0), (Player::Two, 6)]);
        assert_eq!(book.lookup(&board), None);
    }

    #[test]
    fn test_ply_limit() {
        let book = OpeningBook::new(0);
        assert_eq!(book.lookup(&BoardState::new()), Some(3));
        let board = play(&[(Player::One, 3)]);
        assert_eq!(book.lookup(&board), None);
    }

    #[test]
    fn test_player_digits_in_key() {
        let book = OpeningBook::default();
        let board = play(&[(Player::One, 3), (Player::Two, 3), (Player::One, 4)]);
        assert_eq!(book.lookup(&board), Some(2));
    }
}
