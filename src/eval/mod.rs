//! Evaluation module for Connect Four positions
//!
//! This module provides terminal scoring and the heuristic leaf evaluation.
//! The heuristic considers:
//! - Immediate double threats
//! - Open threes and twos
//! - Center control and row parity
//! - Mobility and vertical stacking threats

pub mod heuristic;
pub mod weights;

pub use heuristic::{evaluate, terminal_score};
pub use weights::{is_win_score, EvalWeights, INF, WIN_SCORE};
