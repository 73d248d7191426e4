//! Connect Four move-selection engine
//!
//! A near-optimal engine for four-in-a-row on a 7×7 grid:
//! - Bitboard positions with incremental Zobrist hashing
//! - Transposition table, killer and history move ordering
//! - Principal-variation alpha-beta with iterative deepening, aspiration
//!   windows and late-move reductions
//! - Forced-move shortcut and a small opening book
//!
//! # Architecture
//!
//! The engine is organized into several modules:
//! - [`board`]: Board representation with bitboards
//! - [`eval`]: Terminal scoring and heuristic evaluation
//! - [`search`]: Hashing, transposition table, move ordering and alpha-beta
//! - [`opening`]: Opening book
//! - [`engine`]: Move selection integrating all components
//! - [`session`]: Game session for hosts
//! - [`config`]: TOML configuration
//!
//! # Quick Start
//!
//! ```
//! use connect_four::{EngineConfig, GameSession, Player};
//!
//! let mut config = EngineConfig::default();
//! config.search.min_depth = 2;
//! config.search.max_depth = 4;
//! let mut session = GameSession::new(config);
//!
//! session.submit_move(Player::One, 3);
//! let reply = session.choose_move(4).unwrap();
//! println!("engine plays column {}", reply.result.column);
//! ```
//!
//! # Move Priority
//!
//! 1. Immediate win
//! 2. Block the opponent's immediate win
//! 3. The only legal column
//! 4. Opening book (early plies)
//! 5. Iterative-deepening alpha-beta

pub mod board;
pub mod config;
pub mod engine;
pub mod error;
pub mod eval;
pub mod opening;
pub mod search;
pub mod session;

// Re-export commonly used types for convenience
pub use board::{BoardState, Cell, Player, COLUMNS, ROWS};
pub use config::{EngineConfig, SearchConfig};
pub use engine::{find_forced_move, Engine, ForcedMove, MoveKind, MoveResult};
pub use error::{ConfigError, MoveError, SessionError};
pub use eval::{EvalWeights, WIN_SCORE};
pub use opening::OpeningBook;
pub use search::{SearchResult, SearchStats, Searcher};
pub use session::{EngineMove, GameSession, MoveOutcome};
