//! Heuristic evaluation for Connect Four positions
//!
//! Leaf positions are scored from the side to move. Every term is computed
//! for both players and combined as `(mover - opponent) * weight`:
//! - double threats (pairs of playable winning columns)
//! - open threes and open twos
//! - center-column occupancy
//! - row parity of three-in-a-row threats
//! - mobility (four-cell windows still winnable)
//! - vertical stacking threats, weighted up for the opponent

use crate::board::bitboard::{DIRECTIONS, PLAYABLE_MASK};
use crate::board::{BoardState, Cell, Player, CENTER_COLUMN, COLUMNS, COLUMN_STRIDE, ROWS};

use super::weights::{EvalWeights, WIN_SCORE};

/// Line directions as (column step, row step)
const LINES: [(i32, i32); 4] = [
    (1, 0),  // Horizontal
    (0, 1),  // Vertical
    (1, 1),  // Rising diagonal
    (1, -1), // Falling diagonal
];

/// Rows 0, 2, 4, 6 of every column (odd rows counted from 1)
const ODD_ROWS_MASK: u64 = {
    let mut row_bits = 0u64;
    let mut row = 0;
    while row < ROWS {
        row_bits |= 1u64 << row;
        row += 2;
    }
    let mut mask = 0u64;
    let mut col = 0;
    while col < COLUMNS {
        mask |= row_bits << (col * COLUMN_STRIDE);
        col += 1;
    }
    mask
};

/// Number of four-cell windows on a 7x7 board
const WINDOW_COUNT: usize = 88;

/// Every four-cell window as a bit mask
const WINDOWS: [u64; WINDOW_COUNT] = {
    let mut windows = [0u64; WINDOW_COUNT];
    let mut n = 0;
    let mut col = 0i32;
    while col < COLUMNS as i32 {
        let mut row = 0i32;
        while row < ROWS as i32 {
            let mut d = 0;
            while d < 4 {
                let (dc, dr) = LINES[d];
                let end_c = col + 3 * dc;
                let end_r = row + 3 * dr;
                if end_c < COLUMNS as i32 && end_r >= 0 && end_r < ROWS as i32 {
                    let mut mask = 0u64;
                    let mut k = 0;
                    while k < 4 {
                        let c = col + k * dc;
                        let r = row + k * dr;
                        mask |= 1u64 << (c as usize * COLUMN_STRIDE + r as usize);
                        k += 1;
                    }
                    windows[n] = mask;
                    n += 1;
                }
                d += 1;
            }
            row += 1;
        }
        col += 1;
    }
    windows
};

/// Score of a finished game from `perspective`, or `None` if play continues.
///
/// A win is worth `WIN_SCORE + remaining_depth` so shallower wins rank higher.
#[inline]
pub fn terminal_score(board: &BoardState, perspective: Player, remaining_depth: i32) -> Option<i32> {
    if let Some(winner) = board.winner() {
        let score = WIN_SCORE + remaining_depth.max(0);
        return Some(if winner == perspective { score } else { -score });
    }
    if board.is_full() {
        return Some(0);
    }
    None
}

/// Evaluate a non-terminal position for `mover`.
///
/// The result stays strictly inside `±WIN_SCORE`.
#[must_use]
pub fn evaluate(board: &BoardState, mover: Player, weights: &EvalWeights) -> i32 {
    let opp = mover.opponent();
    let mut score = 0i64;

    let terms = [
        (double_threats(board, mover) - double_threats(board, opp), weights.double_threat),
        (count_open_runs(board, mover, 3) - count_open_runs(board, opp, 3), weights.threat),
        (center_chips(board, mover) - center_chips(board, opp), weights.center),
        (parity_balance(board, mover) - parity_balance(board, opp), weights.odd_even),
        (count_open_runs(board, mover, 2) - count_open_runs(board, opp, 2), weights.potential),
        (mobility(board, mover) - mobility(board, opp), weights.mobility),
    ];
    for (diff, weight) in terms {
        score += diff as i64 * weight as i64;
    }

    let vertical_mine = vertical_threats(board, mover) as i64 * weights.vertical as i64;
    let vertical_theirs = vertical_threats(board, opp) as i64
        * weights.vertical as i64
        * weights.vertical_defense_percent as i64
        / 100;
    score += vertical_mine - vertical_theirs;

    let bound = (WIN_SCORE - 1) as i64;
    score.clamp(-bound, bound) as i32
}

/// Playable columns where `player` would complete four
pub fn winning_columns(board: &BoardState, player: Player) -> i32 {
    (0..COLUMNS)
        .filter(|&col| board.is_winning_move(player, col))
        .count() as i32
}

/// Pairs of simultaneous winning columns: `floor(k / 2)`
pub fn double_threats(board: &BoardState, player: Player) -> i32 {
    winning_columns(board, player) / 2
}

/// Count maximal runs of exactly `len` chips with at least one open end.
pub fn count_open_runs(board: &BoardState, player: Player, len: i32) -> i32 {
    let mut count = 0;
    for cell in board.bitboard(player).iter_ones() {
        let col = cell.column as i32;
        let row = cell.row as i32;
        for &(dc, dr) in &LINES {
            // Only measure from the first chip of a run
            if owns(board, player, col - dc, row - dr) {
                continue;
            }
            let mut n = 1;
            while owns(board, player, col + n * dc, row + n * dr) {
                n += 1;
            }
            if n != len {
                continue;
            }
            let after = is_open_end(board, col + n * dc, row + n * dr, dr);
            let before = is_open_end(board, col - dc, row - dr, dr);
            if after || before {
                count += 1;
            }
        }
    }
    count
}

#[inline]
fn owns(board: &BoardState, player: Player, col: i32, row: i32) -> bool {
    Cell::is_valid(col, row) && board.cell(col as usize, row as usize) == Some(player)
}

/// Whether a run can be extended through (`col`, `row`).
///
/// Vertical and rising lines need the cell empty; horizontal and falling
/// lines need it to be the next landing cell of its column.
#[inline]
fn is_open_end(board: &BoardState, col: i32, row: i32, dr: i32) -> bool {
    if !Cell::is_valid(col, row) {
        return false;
    }
    let (c, r) = (col as usize, row as usize);
    if dr > 0 {
        board.cell(c, r).is_none()
    } else {
        board.height(c) == r
    }
}

/// Chips in the center column
pub fn center_chips(board: &BoardState, player: Player) -> i32 {
    (0..board.height(CENTER_COLUMN))
        .filter(|&row| board.cell(CENTER_COLUMN, row) == Some(player))
        .count() as i32
}

/// Parity score: threats on the player's favoured rows minus the others.
///
/// The first player is favoured on odd rows counted from 1 (0, 2, 4, 6 here),
/// the second player on even rows. Crediting the first player on rows 1, 3, 5
/// here instead would invert classical Connect Four parity.
pub fn parity_balance(board: &BoardState, player: Player) -> i32 {
    let bits = board.bits(player);
    let mut odd = 0i32;
    let mut even = 0i32;
    for &s in DIRECTIONS.iter() {
        let ends = bits & (bits << s) & (bits << (2 * s)) & PLAYABLE_MASK;
        odd += (ends & ODD_ROWS_MASK).count_ones() as i32;
        even += (ends & !ODD_ROWS_MASK).count_ones() as i32;
    }
    match player {
        Player::One => odd - even,
        Player::Two => even - odd,
    }
}

/// Four-cell windows with no opponent chip and at least one own chip
pub fn mobility(board: &BoardState, player: Player) -> i32 {
    let mine = board.bits(player);
    let theirs = board.bits(player.opponent());
    WINDOWS
        .iter()
        .filter(|&&w| w & theirs == 0 && w & mine != 0)
        .count() as i32
}

/// Vertical stacking threats: per column with room left and height >= 2,
/// one point when the top two chips are the player's, two more for three.
pub fn vertical_threats(board: &BoardState, player: Player) -> i32 {
    let mut threats = 0;
    for col in 0..COLUMNS {
        let height = board.height(col);
        if height < 2 || height >= ROWS {
            continue;
        }
        let consecutive = (0..height)
            .rev()
            .take_while(|&row| board.cell(col, row) == Some(player))
            .count();
        if consecutive >= 2 {
            threats += 1;
            if consecutive >= 3 {
                threats += 2;
            }
        }
    }
    threats
}
