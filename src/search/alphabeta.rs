//! Alpha-Beta search with iterative deepening and transposition table
//!
//! Negamax principal-variation search over `BoardState` values. Each node
//! consults the transposition table, orders its columns with the
//! `MoveOrderer`, and scores leaves with the heuristic evaluator.
//!
//! # Features
//!
//! - Iterative deepening under a wall-clock budget checked between iterations
//! - Aspiration windows around the previous iteration's score
//! - Principal variation search with null-window probes
//! - Late move reductions with full-depth re-search
//! - Killer and history move ordering
//! - Center-outward tie-break between equally scored root columns
//!
//! # Example
//!
//! ```
//! use connect_four::board::{BoardState, Player};
//! use connect_four::config::SearchConfig;
//! use connect_four::eval::EvalWeights;
//! use connect_four::search::Searcher;
//!
//! let config = SearchConfig { min_depth: 1, max_depth: 4, ..SearchConfig::default() };
//! let mut searcher = Searcher::new(config, EvalWeights::default());
//! let board = BoardState::new();
//!
//! let result = searcher.search(&board, Player::One, 4, &mut |_| {});
//! assert_eq!(result.best_move, Some(3));
//! ```

use std::time::{Duration, Instant};

use log::{debug, trace};

use crate::board::{BoardState, Player, COLUMNS};
use crate::config::SearchConfig;
use crate::eval::{evaluate, is_win_score, terminal_score, EvalWeights, INF, WIN_SCORE};

use super::ordering::MoveOrderer;
use super::tt::{Bound, TTStats, TranspositionTable};

/// Root tie-break: center first, then outward, left before right
pub const ROOT_PREFERENCE: [usize; COLUMNS] = [3, 2, 4, 1, 5, 0, 6];

/// Position of `column` in the root tie-break order
#[inline]
pub fn preference_rank(column: usize) -> usize {
    ROOT_PREFERENCE
        .iter()
        .position(|&c| c == column)
        .unwrap_or(COLUMNS)
}

/// Search statistics for diagnostics and tuning.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchStats {
    /// Total beta cutoffs (fail-high)
    pub beta_cutoffs: u64,
    /// Beta cutoffs on the first move tried (measures move ordering quality)
    pub first_move_cutoffs: u64,
    /// Total TT probes
    pub tt_probes: u64,
    /// TT probes that ended the node with the cached score
    pub tt_hits: u64,
    /// PVS and LMR re-searches
    pub researches: u64,
    /// Iterations whose aspiration window failed
    pub aspiration_failures: u64,
}

impl SearchStats {
    /// First-move cutoff rate in percent
    pub fn first_move_rate(&self) -> f64 {
        if self.beta_cutoffs == 0 {
            0.0
        } else {
            self.first_move_cutoffs as f64 / self.beta_cutoffs as f64 * 100.0
        }
    }

    /// TT hit rate in percent
    pub fn tt_hit_rate(&self) -> f64 {
        if self.tt_probes == 0 {
            0.0
        } else {
            self.tt_hits as f64 / self.tt_probes as f64 * 100.0
        }
    }
}

/// Search result containing the best move found and associated statistics.
#[derive(Debug, Clone)]
pub struct SearchResult {
    /// Best column found, `None` only for a board with no legal move
    pub best_move: Option<usize>,
    /// Score of the best column for the side to move
    pub score: i32,
    /// Last completed iteration depth
    pub depth: i32,
    /// Total nodes searched
    pub nodes: u64,
    /// Root score per column from the last iteration (`None` if not searched)
    pub column_scores: [Option<i32>; COLUMNS],
    pub elapsed: Duration,
    /// Search diagnostics
    pub stats: SearchStats,
}

/// Outcome of one root iteration
#[derive(Debug, Clone)]
struct RootOutcome {
    column: Option<usize>,
    score: i32,
    column_scores: [Option<i32>; COLUMNS],
}

/// Single-threaded searcher owning the transposition table and the
/// killer/history tables for one game session.
pub struct Searcher {
    tt: TranspositionTable,
    orderer: MoveOrderer,
    config: SearchConfig,
    weights: EvalWeights,
    nodes: u64,
    stats: SearchStats,
}

impl Searcher {
    #[must_use]
    pub fn new(config: SearchConfig, weights: EvalWeights) -> Self {
        Self {
            tt: TranspositionTable::new(config.tt_capacity),
            orderer: MoveOrderer::new(config.use_killers, config.use_history),
            config,
            weights,
            nodes: 0,
            stats: SearchStats::default(),
        }
    }

    /// Iterative deepening from depth 1 to `max_depth`.
    ///
    /// The time budget is checked before every iteration after the first;
    /// an iteration that starts always completes. Deepening stops early once
    /// the score is decisive. An iteration that proves a loss still reports
    /// its score, but the column from the iteration before it is kept. `progress` is called with each root column as
    /// it is searched.
    pub fn search(
        &mut self,
        board: &BoardState,
        mover: Player,
        max_depth: i32,
        progress: &mut dyn FnMut(usize),
    ) -> SearchResult {
        let start = Instant::now();
        let budget = self.config.time_budget();
        self.nodes = 0;
        self.stats = SearchStats::default();

        let mut best = SearchResult {
            best_move: None,
            score: 0,
            depth: 0,
            nodes: 0,
            column_scores: [None; COLUMNS],
            elapsed: Duration::ZERO,
            stats: SearchStats::default(),
        };

        for depth in 1..=max_depth.max(1) {
            if depth > 1 && start.elapsed() >= budget {
                debug!("time budget spent after depth {}", depth - 1);
                break;
            }

            let outcome = if self.config.use_aspiration && depth > 1 {
                let window = self.config.aspiration_window;
                let (alpha, beta) = (best.score - window, best.score + window);
                let outcome = self.search_root(board, mover, depth, alpha, beta, progress);
                if outcome.score <= alpha || outcome.score >= beta {
                    self.stats.aspiration_failures += 1;
                    trace!(
                        "aspiration miss at depth {depth}: {} outside [{alpha}, {beta}]",
                        outcome.score
                    );
                    self.search_root(board, mover, depth, -INF, INF, progress)
                } else {
                    outcome
                }
            } else {
                self.search_root(board, mover, depth, -INF, INF, progress)
            };

            if outcome.column.is_none() {
                break;
            }

            // A proven loss keeps the previous iteration's column
            let proven_loss = outcome.score <= -WIN_SCORE;
            if !proven_loss || best.best_move.is_none() {
                best.best_move = outcome.column;
            }
            best.score = outcome.score;
            best.depth = depth;
            best.column_scores = outcome.column_scores;

            debug!(
                "depth {depth}: column {:?} score {} nodes {} ({} ms)",
                best.best_move,
                best.score,
                self.nodes,
                start.elapsed().as_millis()
            );

            if self.is_decisive(best.score) {
                break;
            }
        }

        best.nodes = self.nodes;
        best.elapsed = start.elapsed();
        best.stats = self.stats;
        best
    }

    /// Proven result, or a score past the decisive threshold
    #[inline]
    fn is_decisive(&self, score: i32) -> bool {
        is_win_score(score) || score.abs() > self.config.decisive_threshold
    }

    /// Root node: no TT cutoff, progress per column, center-first tie-break.
    fn search_root(
        &mut self,
        board: &BoardState,
        mover: Player,
        depth: i32,
        mut alpha: i32,
        beta: i32,
        progress: &mut dyn FnMut(usize),
    ) -> RootOutcome {
        let orig_alpha = alpha;
        let hash = board.hash();
        let tt_column = self.tt.best_column(hash);
        let moves = self.orderer.order(board, mover, depth, tt_column);

        let mut best_column = None;
        let mut best_score = -INF;
        let mut column_scores = [None; COLUMNS];

        for (i, &col) in moves.iter().enumerate() {
            progress(col);
            let mut child = board.clone();
            if child.place(mover, col).is_err() {
                continue;
            }

            // One below alpha so a column equal to the best gets an exact score
            let lower = if i == 0 { alpha } else { alpha - 1 };
            let score = self.search_move(&child, mover, depth, i, lower, beta);
            column_scores[col] = Some(score);

            let better = score > best_score
                || (score == best_score
                    && best_column.is_some_and(|b| preference_rank(col) < preference_rank(b)));
            if better {
                best_score = score;
                best_column = Some(col);
            }
            if score > alpha {
                alpha = score;
            }
            if score >= beta {
                self.stats.beta_cutoffs += 1;
                if i == 0 {
                    self.stats.first_move_cutoffs += 1;
                }
                self.orderer.record_cutoff(depth, col);
                break;
            }
        }

        if best_column.is_some() {
            let bound = Bound::classify(best_score, orig_alpha, beta);
            self.tt.store(hash, best_score, depth, bound, best_column);
        }

        RootOutcome {
            column: best_column,
            score: best_score,
            column_scores,
        }
    }

    /// Search one child of a node at `index` in move order.
    ///
    /// Returns the child's score from the parent's point of view.
    fn search_move(
        &mut self,
        child: &BoardState,
        mover: Player,
        depth: i32,
        index: usize,
        alpha: i32,
        beta: i32,
    ) -> i32 {
        let opp = mover.opponent();
        let full = depth - 1;

        if index == 0 {
            return -self.alpha_beta(child, opp, full, -beta, -alpha);
        }

        let reduction = if self.config.use_lmr && index >= 3 && depth >= 3 {
            if index >= 6 {
                2
            } else {
                1
            }
        } else {
            0
        };

        let mut score = if self.config.use_pvs {
            -self.alpha_beta(child, opp, full - reduction, -alpha - 1, -alpha)
        } else {
            -self.alpha_beta(child, opp, full - reduction, -beta, -alpha)
        };

        // Reduced results above alpha, and null-window results inside the
        // window, are re-searched at full depth with the full window.
        let needs_research = if reduction > 0 {
            score > alpha
        } else {
            self.config.use_pvs && score > alpha && score < beta
        };
        if needs_research {
            self.stats.researches += 1;
            score = -self.alpha_beta(child, opp, full, -beta, -alpha);
        }
        score
    }

    fn alpha_beta(
        &mut self,
        board: &BoardState,
        mover: Player,
        depth: i32,
        mut alpha: i32,
        mut beta: i32,
    ) -> i32 {
        self.nodes += 1;

        if let Some(score) = terminal_score(board, mover, depth) {
            return score;
        }
        if depth <= 0 {
            return evaluate(board, mover, &self.weights);
        }

        let (orig_alpha, orig_beta) = (alpha, beta);
        let hash = board.hash();

        self.stats.tt_probes += 1;
        let mut tt_column = None;
        if let Some(entry) = self.tt.lookup(hash) {
            tt_column = entry.column;
            if entry.depth >= depth {
                match entry.bound {
                    Bound::Exact => {
                        self.stats.tt_hits += 1;
                        return entry.score;
                    }
                    Bound::Lower => alpha = alpha.max(entry.score),
                    Bound::Upper => beta = beta.min(entry.score),
                }
                if alpha >= beta {
                    self.stats.tt_hits += 1;
                    return entry.score;
                }
            }
        }

        let moves = self.orderer.order(board, mover, depth, tt_column);

        let mut best_score = -INF;
        let mut best_column = None;

        for (i, &col) in moves.iter().enumerate() {
            let mut child = board.clone();
            if child.place(mover, col).is_err() {
                continue;
            }

            let score = self.search_move(&child, mover, depth, i, alpha, beta);

            if score > best_score {
                best_score = score;
                best_column = Some(col);
            }
            if score > alpha {
                alpha = score;
            }
            if alpha >= beta {
                self.stats.beta_cutoffs += 1;
                if i == 0 {
                    self.stats.first_move_cutoffs += 1;
                }
                self.orderer.record_cutoff(depth, col);
                break;
            }
        }

        let bound = Bound::classify(best_score, orig_alpha, orig_beta);
        self.tt.store(hash, best_score, depth, bound, best_column);
        best_score
    }

    #[must_use]
    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    #[must_use]
    pub fn weights(&self) -> &EvalWeights {
        &self.weights
    }

    #[must_use]
    pub fn orderer(&self) -> &MoveOrderer {
        &self.orderer
    }

    /// Get transposition table statistics.
    #[must_use]
    pub fn tt_stats(&self) -> TTStats {
        self.tt.stats()
    }

    /// Clear transposition table, killer moves and history.
    pub fn clear(&mut self) {
        self.tt.clear();
        self.orderer.clear();
    }
}
