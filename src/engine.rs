//! Move selection integrating all search components
//!
//! The engine answers one question: which column should `mover` play? It
//! tries progressively more expensive sources:
//!
//! 1. **Forced move**: an immediate win, a block of the opponent's only
//!    winning column, a desperate block when there are several, or the only
//!    legal column
//! 2. **Opening book**: a fixed reply for early, known sequences
//! 3. **Search**: iterative-deepening alpha-beta
//!
//! # Example
//!
//! ```
//! use connect_four::{BoardState, Engine, EngineConfig, Player};
//!
//! let mut config = EngineConfig::default();
//! config.search.min_depth = 2;
//! config.search.max_depth = 4;
//! let mut engine = Engine::new(config);
//!
//! let board = BoardState::new();
//! let result = engine.choose_move(&board, Player::One, 4, &mut |_| {});
//! assert_eq!(result.map(|r| r.column), Some(3));
//! ```

use std::time::Instant;

use log::{debug, info};

use crate::board::{BoardState, Player};
use crate::config::EngineConfig;
use crate::eval::{is_win_score, WIN_SCORE};
use crate::opening::OpeningBook;
use crate::search::{SearchResult, SearchStats, Searcher, TTStats};

/// Which stage produced the move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveKind {
    /// Completes four in a row immediately
    ForcedWin,
    /// Blocks the opponent's single winning column
    Block,
    /// Blocks one of several opponent winning columns; the game is lost
    DesperateBlock,
    /// The only legal column
    OnlyMove,
    /// Taken from the opening book
    OpeningBook,
    /// Iterative-deepening search result
    Search,
}

/// A forced decision found without searching.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ForcedMove {
    pub column: usize,
    pub kind: MoveKind,
}

/// Chosen column with search metadata.
#[derive(Debug, Clone)]
pub struct MoveResult {
    pub column: usize,
    /// Score from the mover's perspective
    pub score: i32,
    pub kind: MoveKind,
    /// Deepest completed iteration (0 when no search ran)
    pub depth: i32,
    pub nodes: u64,
    pub time_ms: u64,
    /// The mover can force a win
    pub win_is_forced: bool,
    /// The opponent can force a win whatever the mover does
    pub loss_unavoidable: bool,
    pub stats: SearchStats,
}

impl MoveResult {
    fn forced(forced: ForcedMove, time_ms: u64) -> Self {
        let score = match forced.kind {
            MoveKind::ForcedWin => WIN_SCORE,
            MoveKind::DesperateBlock => -WIN_SCORE,
            _ => 0,
        };
        Self {
            column: forced.column,
            score,
            kind: forced.kind,
            depth: 0,
            nodes: 0,
            time_ms,
            win_is_forced: forced.kind == MoveKind::ForcedWin,
            loss_unavoidable: forced.kind == MoveKind::DesperateBlock,
            stats: SearchStats::default(),
        }
    }

    fn opening(column: usize, time_ms: u64) -> Self {
        Self {
            column,
            score: 0,
            kind: MoveKind::OpeningBook,
            depth: 0,
            nodes: 0,
            time_ms,
            win_is_forced: false,
            loss_unavoidable: false,
            stats: SearchStats::default(),
        }
    }

    fn from_search(column: usize, result: &SearchResult) -> Self {
        let decided = is_win_score(result.score);
        Self {
            column,
            score: result.score,
            kind: MoveKind::Search,
            depth: result.depth,
            nodes: result.nodes,
            time_ms: result.elapsed.as_millis() as u64,
            win_is_forced: decided && result.score > 0,
            loss_unavoidable: decided && result.score < 0,
            stats: result.stats,
        }
    }
}

/// Scan legal columns in natural order for a move that must be played.
///
/// An own win beats everything. Otherwise a single opponent winning column
/// is blocked; with several, the first is blocked anyway. With no threats
/// either way, a lone legal column is forced.
pub fn find_forced_move(board: &BoardState, mover: Player) -> Option<ForcedMove> {
    let legal = board.legal_columns();

    if let Some(&column) = legal.iter().find(|&&c| board.is_winning_move(mover, c)) {
        return Some(ForcedMove {
            column,
            kind: MoveKind::ForcedWin,
        });
    }

    let opponent = mover.opponent();
    let mut threats = legal.iter().filter(|&&c| board.is_winning_move(opponent, c));
    if let Some(&column) = threats.next() {
        let kind = if threats.next().is_some() {
            MoveKind::DesperateBlock
        } else {
            MoveKind::Block
        };
        return Some(ForcedMove { column, kind });
    }

    match legal.as_slice() {
        [column] => Some(ForcedMove {
            column: *column,
            kind: MoveKind::OnlyMove,
        }),
        _ => None,
    }
}

/// Connect Four engine.
///
/// Owns the transposition table, killer and history tables for the lifetime
/// of a game; they carry over between calls to [`Engine::choose_move`] until
/// [`Engine::clear`].
pub struct Engine {
    searcher: Searcher,
    book: OpeningBook,
    config: EngineConfig,
}

impl Engine {
    #[must_use]
    pub fn new(config: EngineConfig) -> Self {
        Self {
            searcher: Searcher::new(config.search.clone(), config.eval.clone()),
            book: OpeningBook::new(config.search.opening_ply_limit),
            config,
        }
    }

    /// Pick a column for `mover`.
    ///
    /// `depth_hint` is clamped to the configured depth range. `progress` is
    /// called with each root column while searching. Returns `None` only
    /// when no column is playable.
    pub fn choose_move(
        &mut self,
        board: &BoardState,
        mover: Player,
        depth_hint: i32,
        progress: &mut dyn FnMut(usize),
    ) -> Option<MoveResult> {
        debug_assert!(depth_hint > 0, "depth hint must be positive");
        let start = Instant::now();

        if board.legal_columns().is_empty() {
            debug!("no legal columns");
            return None;
        }

        if let Some(forced) = find_forced_move(board, mover) {
            debug!("forced move: column {} ({:?})", forced.column, forced.kind);
            let result = MoveResult::forced(forced, start.elapsed().as_millis() as u64);
            log_choice(&result);
            return Some(result);
        }

        if self.config.search.use_opening_book {
            if let Some(column) = self.book.lookup(board) {
                debug!("opening book: '{}' -> {column}", board.sequence_key());
                let result = MoveResult::opening(column, start.elapsed().as_millis() as u64);
                log_choice(&result);
                return Some(result);
            }
        }

        let max_depth = self.config.search.bounded_depth(depth_hint);
        let search = self.searcher.search(board, mover, max_depth, progress);
        let result = MoveResult::from_search(search.best_move?, &search);
        log_choice(&result);
        Some(result)
    }

    /// Column only, without progress reporting.
    #[must_use]
    pub fn best_column(&mut self, board: &BoardState, mover: Player, depth_hint: i32) -> Option<usize> {
        self.choose_move(board, mover, depth_hint, &mut |_| {})
            .map(|r| r.column)
    }

    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    #[must_use]
    pub fn book(&self) -> &OpeningBook {
        &self.book
    }

    /// Transposition table usage
    #[must_use]
    pub fn tt_stats(&self) -> TTStats {
        self.searcher.tt_stats()
    }

    /// Forget everything learned this game.
    pub fn clear(&mut self) {
        self.searcher.clear();
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

fn log_choice(result: &MoveResult) {
    info!(
        "column {} ({:?}) score {} depth {} nodes {} in {}ms",
        result.column, result.kind, result.score, result.depth, result.nodes, result.time_ms
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{COLUMNS, ROWS};

    fn quick_engine() -> Engine {
        let mut config = EngineConfig::default();
        config.search.min_depth = 1;
        config.search.max_depth = 5;
        config.search.tt_capacity = 100_000;
        Engine::new(config)
    }

    fn play(columns: &[usize]) -> BoardState {
        let mut board = BoardState::new();
        for &col in columns {
            let player = board.to_move();
            board.place(player, col).unwrap();
        }
        board
    }

    /// Board with no four anywhere, optionally leaving the top of column 6 open.
    fn drawn_board(leave_last: bool) -> BoardState {
        let mut board = BoardState::new();
        for row in 0..ROWS {
            for col in 0..COLUMNS {
                if leave_last && col == 6 && row == ROWS - 1 {
                    continue;
                }
                let player = if (row / 2 + col) % 2 == 0 {
                    Player::One
                } else {
                    Player::Two
                };
                board.place(player, col).unwrap();
            }
        }
        board
    }

    #[test]
    fn test_engine_finds_immediate_win() {
        let board = play(&[0, 6, 1, 6, 2, 5]);
        let result = quick_engine().choose_move(&board, Player::One, 9, &mut |_| {}).unwrap();
        assert_eq!(result.column, 3);
        assert_eq!(result.kind, MoveKind::ForcedWin);
        assert!(result.win_is_forced);
        assert_eq!(result.nodes, 0);
    }

    #[test]
    fn test_forced_win_ignores_time_budget() {
        let mut config = EngineConfig::default();
        config.search.time_budget_ms = 1;
        let mut engine = Engine::new(config);
        let board = play(&[0, 6, 1, 6, 2, 5]);
        let result = engine.choose_move(&board, Player::One, 1, &mut |_| {}).unwrap();
        assert_eq!(result.column, 3);
        assert_eq!(result.kind, MoveKind::ForcedWin);
    }

    #[test]
    fn test_search_loss_flags_unavoidable() {
        let search = SearchResult {
            best_move: Some(2),
            score: -WIN_SCORE,
            depth: 2,
            nodes: 10,
            column_scores: [None; COLUMNS],
            elapsed: std::time::Duration::ZERO,
            stats: SearchStats::default(),
        };
        let result = MoveResult::from_search(2, &search);
        assert!(result.loss_unavoidable);
        assert!(!result.win_is_forced);
        assert_eq!(result.kind, MoveKind::Search);
    }

    #[test]
    fn test_engine_blocks_opponent_win() {
        let board = play(&[6, 0, 6, 1, 5, 2]);
        let result = quick_engine().choose_move(&board, Player::One, 9, &mut |_| {}).unwrap();
        assert_eq!(result.column, 3);
        assert_eq!(result.kind, MoveKind::Block);
        assert!(!result.loss_unavoidable);
    }

    #[test]
    fn test_engine_prefers_win_over_block() {
        let board = play(&[0, 4, 1, 4, 2, 4]);
        assert!(board.is_winning_move(Player::Two, 4));
        let result = quick_engine().choose_move(&board, Player::One, 9, &mut |_| {}).unwrap();
        assert_eq!(result.column, 3);
        assert_eq!(result.kind, MoveKind::ForcedWin);
    }

    #[test]
    fn test_desperate_block_takes_first_threat() {
        let board = play(&[6, 1, 6, 2, 5, 3]);
        let forced = find_forced_move(&board, Player::One).unwrap();
        assert_eq!(forced.column, 0);
        assert_eq!(forced.kind, MoveKind::DesperateBlock);

        let result = quick_engine().choose_move(&board, Player::One, 9, &mut |_| {}).unwrap();
        assert!(result.loss_unavoidable);
        assert_eq!(result.score, -WIN_SCORE);
    }

    #[test]
    fn test_only_move() {
        let board = drawn_board(true);
        assert_eq!(board.legal_columns().as_slice(), &[6]);
        let result = quick_engine().choose_move(&board, Player::One, 9, &mut |_| {}).unwrap();
        assert_eq!(result.column, 6);
        assert_eq!(result.kind, MoveKind::OnlyMove);
    }

    #[test]
    fn test_full_board_returns_none() {
        let board = drawn_board(false);
        assert!(board.is_full());
        assert!(quick_engine().choose_move(&board, Player::One, 9, &mut |_| {}).is_none());
    }

    #[test]
    fn test_no_forced_move_on_quiet_board() {
        let board = play(&[3, 3]);
        assert_eq!(find_forced_move(&board, Player::One), None);
    }

    #[test]
    fn test_empty_board_uses_book() {
        let result = quick_engine()
            .choose_move(&BoardState::new(), Player::One, 9, &mut |_| {})
            .unwrap();
        assert_eq!(result.column, 3);
        assert_eq!(result.kind, MoveKind::OpeningBook);
    }

    #[test]
    fn test_empty_board_search_plays_center() {
        let mut config = EngineConfig::default();
        config.search.min_depth = 1;
        config.search.max_depth = 4;
        config.search.use_opening_book = false;
        let mut engine = Engine::new(config);

        let mut seen = Vec::new();
        let result = engine
            .choose_move(&BoardState::new(), Player::One, 4, &mut |c| seen.push(c))
            .unwrap();
        assert_eq!(result.column, 3);
        assert_eq!(result.kind, MoveKind::Search);
        assert!(result.depth >= 1);
        assert!(!seen.is_empty());
    }

    #[test]
    fn test_search_outside_book() {
        let board = play(&[0, 6]);
        let mut engine = quick_engine();
        let result = engine.choose_move(&board, Player::One, 3, &mut |_| {}).unwrap();
        assert_eq!(result.kind, MoveKind::Search);
        assert!(board.is_playable(result.column));
        assert!(result.nodes > 0);
    }

    #[test]
    fn test_never_returns_full_column() {
        let board = play(&[3, 3, 3, 3, 3, 3, 3]);
        let mut engine = quick_engine();
        let column = engine.best_column(&board, Player::Two, 3).unwrap();
        assert_ne!(column, 3);
    }

    #[test]
    fn test_tables_persist_until_clear() {
        let board = play(&[0, 6]);
        let mut engine = quick_engine();
        engine.choose_move(&board, Player::One, 3, &mut |_| {});
        assert!(engine.tt_stats().used > 0);
        engine.clear();
        assert_eq!(engine.tt_stats().used, 0);
    }
}
