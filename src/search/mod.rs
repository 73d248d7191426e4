//! Search module for Connect Four
//!
//! Contains:
//! - Zobrist hashing for position identification
//! - Transposition table for caching search results
//! - Move ordering with killer and history heuristics
//! - Principal-variation alpha-beta with iterative deepening

pub mod alphabeta;
pub mod ordering;
pub mod tt;
pub mod zobrist;

pub use alphabeta::{preference_rank, SearchResult, SearchStats, Searcher, ROOT_PREFERENCE};
pub use ordering::{HistoryTable, KillerTable, MoveList, MoveOrderer};
pub use tt::{Bound, TTEntry, TTStats, TranspositionTable};
pub use zobrist::{ZobristTable, ZOBRIST};
