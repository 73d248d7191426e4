//! Game session: the host-facing boundary
//!
//! A session owns the current board and the engine (with its tables) for one
//! game. Hosts submit human moves, ask the engine to move for its player, and
//! reset between games.

use log::debug;

use crate::board::{BoardState, Cell, Player};
use crate::config::EngineConfig;
use crate::engine::{Engine, MoveResult};
use crate::error::SessionError;

/// Board status after a placement attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveOutcome {
    /// Where the chip landed; `None` when the column was full or the game
    /// had already been decided
    pub placement: Option<Cell>,
    pub is_win: bool,
    pub winning_cells: Option<[Cell; 4]>,
    pub is_board_full: bool,
}

/// A move made by the engine.
#[derive(Debug, Clone)]
pub struct EngineMove {
    pub outcome: MoveOutcome,
    pub win_is_forced: bool,
    pub loss_unavoidable: bool,
    pub result: MoveResult,
}

pub struct GameSession {
    board: BoardState,
    engine: Engine,
    engine_player: Player,
}

impl GameSession {
    /// New game with the engine playing second.
    #[must_use]
    pub fn new(config: EngineConfig) -> Self {
        Self {
            board: BoardState::new(),
            engine: Engine::new(config),
            engine_player: Player::Two,
        }
    }

    #[must_use]
    pub fn with_engine_player(mut self, player: Player) -> Self {
        self.engine_player = player;
        self
    }

    /// Fresh board; transposition, killer and history tables are cleared.
    pub fn reset(&mut self) {
        self.board = BoardState::new();
        self.engine.clear();
        debug!("session reset");
    }

    /// Drop a chip for `player`. A full column is not an error: the outcome
    /// simply has no placement.
    pub fn submit_move(&mut self, player: Player, column: usize) -> MoveOutcome {
        if self.board.winner().is_some() {
            return self.outcome(None);
        }
        let placement = match self.board.place(player, column) {
            Ok(cell) => Some(cell),
            Err(e) => {
                debug!("rejected move for {player:?}: {e}");
                None
            }
        };
        self.outcome(placement)
    }

    /// Let the engine pick and play a column for the engine player.
    pub fn choose_move(&mut self, depth_hint: i32) -> Result<EngineMove, SessionError> {
        self.choose_move_with_progress(depth_hint, &mut |_| {})
    }

    /// As [`GameSession::choose_move`], reporting each root column searched.
    pub fn choose_move_with_progress(
        &mut self,
        depth_hint: i32,
        progress: &mut dyn FnMut(usize),
    ) -> Result<EngineMove, SessionError> {
        if self.board.winner().is_some() {
            return Err(SessionError::GameOver);
        }
        let result = self
            .engine
            .choose_move(&self.board, self.engine_player, depth_hint, progress)
            .ok_or(SessionError::BoardFull)?;

        let placement = self.board.place(self.engine_player, result.column).ok();
        Ok(EngineMove {
            outcome: self.outcome(placement),
            win_is_forced: result.win_is_forced,
            loss_unavoidable: result.loss_unavoidable,
            result,
        })
    }

    fn outcome(&self, placement: Option<Cell>) -> MoveOutcome {
        MoveOutcome {
            placement,
            is_win: self.board.winner().is_some(),
            winning_cells: self.board.winning_cells(),
            is_board_full: self.board.is_full(),
        }
    }

    #[must_use]
    pub fn board(&self) -> &BoardState {
        &self.board
    }

    #[must_use]
    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    #[inline]
    pub fn engine_player(&self) -> Player {
        self.engine_player
    }

    /// Hand the engine the other side (or the same one) mid-game.
    pub fn set_engine_player(&mut self, player: Player) {
        self.engine_player = player;
    }

    /// Player whose turn it is by ply parity
    #[inline]
    pub fn to_move(&self) -> Player {
        self.board.to_move()
    }

    #[inline]
    pub fn is_over(&self) -> bool {
        self.board.winner().is_some() || self.board.is_full()
    }
}

impl Default for GameSession {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::ROWS;
    use crate::engine::MoveKind;

    fn quick_session() -> GameSession {
        let mut config = EngineConfig::default();
        config.search.min_depth = 1;
        config.search.max_depth = 4;
        config.search.tt_capacity = 50_000;
        GameSession::new(config)
    }

    #[test]
    fn test_submit_move_reports_placement() {
        let mut session = quick_session();
        let outcome = session.submit_move(Player::One, 3);
        assert_eq!(outcome.placement, Some(Cell::new(3, 0)));
        assert!(!outcome.is_win);
        assert!(!outcome.is_board_full);
        assert_eq!(session.to_move(), Player::Two);
    }

    #[test]
    fn test_full_column_is_not_a_fault() {
        let mut session = quick_session();
        for i in 0..ROWS {
            let player = if i % 2 == 0 { Player::One } else { Player::Two };
            assert!(session.submit_move(player, 0).placement.is_some());
        }
        let hash = session.board().hash();
        let outcome = session.submit_move(Player::One, 0);
        assert_eq!(outcome.placement, None);
        assert_eq!(session.board().hash(), hash);
    }

    #[test]
    fn test_human_win_reports_cells() {
        let mut session = quick_session();
        for col in 0..3 {
            session.submit_move(Player::One, col);
            session.submit_move(Player::Two, 6);
        }
        let outcome = session.submit_move(Player::One, 3);
        assert!(outcome.is_win);
        let cells = outcome.winning_cells.unwrap();
        for (col, cell) in cells.iter().enumerate() {
            assert_eq!(*cell, Cell::new(col as u8, 0));
        }
        assert!(session.is_over());

        // Nothing more is accepted
        assert_eq!(session.submit_move(Player::Two, 5).placement, None);
        assert!(matches!(session.choose_move(4), Err(SessionError::GameOver)));
    }

    #[test]
    fn test_engine_reply_applied() {
        let mut session = quick_session();
        session.submit_move(Player::One, 0);
        let reply = session.choose_move(4).unwrap();
        // Book answer to any first move is the center
        assert_eq!(reply.result.kind, MoveKind::OpeningBook);
        assert_eq!(reply.outcome.placement, Some(Cell::new(3, 0)));
        assert_eq!(session.board().cell(3, 0), Some(Player::Two));
    }

    #[test]
    fn test_engine_takes_win() {
        let mut session = quick_session();
        for col in [0, 1, 2] {
            session.submit_move(Player::One, col);
            session.submit_move(Player::Two, 6);
        }
        session.submit_move(Player::One, 5);
        // Both sides threaten; the engine holds three in column 6 and moves first
        let reply = session.choose_move(4).unwrap();
        assert_eq!(reply.result.kind, MoveKind::ForcedWin);
        assert!(reply.win_is_forced);
        assert!(reply.outcome.is_win);
        assert_eq!(reply.outcome.placement, Some(Cell::new(6, 3)));
    }

    #[test]
    fn test_engine_first() {
        let mut session = quick_session().with_engine_player(Player::One);
        assert_eq!(session.engine_player(), Player::One);
        let reply = session.choose_move(4).unwrap();
        assert_eq!(reply.outcome.placement, Some(Cell::new(3, 0)));

        // Self-play: the engine answers for the other side too
        session.set_engine_player(Player::Two);
        let reply = session.choose_move(4).unwrap();
        assert_eq!(reply.outcome.placement, Some(Cell::new(3, 1)));
    }

    #[test]
    fn test_board_full_error() {
        let mut session = quick_session();
        for row in 0..ROWS {
            for col in 0..7 {
                let player = if (row / 2 + col) % 2 == 0 {
                    Player::One
                } else {
                    Player::Two
                };
                session.submit_move(player, col);
            }
        }
        assert!(session.board().is_full());
        assert!(session.is_over());
        assert!(matches!(session.choose_move(4), Err(SessionError::BoardFull)));
    }

    #[test]
    fn test_progress_and_reset() {
        let mut session = quick_session();
        session.submit_move(Player::One, 0);
        session.submit_move(Player::Two, 6);
        session.submit_move(Player::One, 6);
        let mut seen = Vec::new();
        let reply = session
            .choose_move_with_progress(3, &mut |c| seen.push(c))
            .unwrap();
        assert_eq!(reply.result.kind, MoveKind::Search);
        assert!(!seen.is_empty());
        assert!(session.engine().tt_stats().used > 0);

        session.reset();
        assert_eq!(session.board().ply(), 0);
        assert_eq!(session.engine().tt_stats().used, 0);
    }

    #[test]
    fn test_max_depth_below_default_min_depth() {
        let mut config = EngineConfig::default();
        config.search.max_depth = 4;
        let mut session = GameSession::new(config);
        session.submit_move(Player::One, 0);
        session.submit_move(Player::Two, 6);
        session.submit_move(Player::One, 0);
        let reply = session.choose_move(9).unwrap();
        assert_eq!(reply.result.kind, MoveKind::Search);
        assert!(reply.result.depth <= 4);
        assert!(reply.outcome.placement.is_some());
    }
}
