//! Move ordering with killer and history heuristics
//!
//! Legal columns are scored once per node and tried best-first. The weights
//! are additive; ties keep natural column order.

use smallvec::SmallVec;

use crate::board::{BoardState, Player, COLUMNS};
use crate::eval::heuristic::{count_open_runs, double_threats};

/// Ordered list of columns for one node
pub type MoveList = SmallVec<[usize; COLUMNS]>;

const WIN_BONUS: i32 = 100_000;
const BLOCK_BONUS: i32 = 90_000;
const TT_MOVE_BONUS: i32 = 5_000;
const KILLER_BONUS: [i32; 2] = [900, 800];
/// History never outranks the TT move
const HISTORY_CAP: u32 = 4_000;
const CENTER_BONUS: [i32; COLUMNS] = [5, 10, 15, 20, 15, 10, 5];
const OPP_THREE_BONUS: i32 = 3_000;
const OPP_DOUBLE_THREAT_BONUS: i32 = 7_000;
const OWN_THREE_BONUS: i32 = 2_000;

/// Number of killer slots (indexed by remaining depth)
pub const MAX_KILLER_DEPTH: usize = 64;

/// Two most recent distinct cutoff columns per remaining depth.
#[derive(Debug, Clone)]
pub struct KillerTable {
    slots: [[Option<u8>; 2]; MAX_KILLER_DEPTH],
}

impl KillerTable {
    pub fn new() -> Self {
        Self {
            slots: [[None; 2]; MAX_KILLER_DEPTH],
        }
    }

    /// Record a cutoff column, most recent first. Out-of-range depths are ignored.
    pub fn record(&mut self, depth: i32, column: usize) {
        let Some(slot) = usize::try_from(depth).ok().and_then(|d| self.slots.get_mut(d)) else {
            return;
        };
        let col = Some(column as u8);
        if slot[0] != col {
            slot[1] = slot[0];
            slot[0] = col;
        }
    }

    /// Killer bonus for `column` at `depth`
    pub fn bonus(&self, depth: i32, column: usize) -> i32 {
        let Some(slot) = usize::try_from(depth).ok().and_then(|d| self.slots.get(d)) else {
            return 0;
        };
        let col = Some(column as u8);
        let mut bonus = 0;
        for (i, &killer) in slot.iter().enumerate() {
            if killer == col {
                bonus += KILLER_BONUS[i];
            }
        }
        bonus
    }

    pub fn get(&self, depth: usize) -> [Option<u8>; 2] {
        self.slots.get(depth).copied().unwrap_or([None; 2])
    }

    pub fn clear(&mut self) {
        self.slots = [[None; 2]; MAX_KILLER_DEPTH];
    }
}

impl Default for KillerTable {
    fn default() -> Self {
        Self::new()
    }
}

/// Per-column cutoff weight, `depth²` per cutoff.
#[derive(Debug, Clone, Default)]
pub struct HistoryTable {
    weights: [u32; COLUMNS],
}

impl HistoryTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, depth: i32, column: usize) {
        let d = depth.max(0) as u32;
        self.weights[column] = self.weights[column].saturating_add(d * d);
    }

    #[inline]
    pub fn get(&self, column: usize) -> u32 {
        self.weights[column]
    }

    /// Ordering bonus, capped below the TT move bonus
    #[inline]
    pub fn bonus(&self, column: usize) -> i32 {
        self.weights[column].min(HISTORY_CAP) as i32
    }

    pub fn clear(&mut self) {
        self.weights = [0; COLUMNS];
    }
}

/// Scores and sorts legal columns for a search node.
#[derive(Debug, Clone)]
pub struct MoveOrderer {
    killers: KillerTable,
    history: HistoryTable,
    use_killers: bool,
    use_history: bool,
}

impl MoveOrderer {
    pub fn new(use_killers: bool, use_history: bool) -> Self {
        Self {
            killers: KillerTable::new(),
            history: HistoryTable::new(),
            use_killers,
            use_history,
        }
    }

    /// Legal columns of `board`, best first for `mover`.
    pub fn order(
        &self,
        board: &BoardState,
        mover: Player,
        depth: i32,
        tt_column: Option<usize>,
    ) -> MoveList {
        let mut scored: SmallVec<[(usize, i32); COLUMNS]> = board
            .legal_columns()
            .into_iter()
            .map(|col| (col, self.score_column(board, mover, depth, tt_column, col)))
            .collect();

        // Stable: equal scores keep column order
        scored.sort_by(|a, b| b.1.cmp(&a.1));
        scored.into_iter().map(|(col, _)| col).collect()
    }

    fn score_column(
        &self,
        board: &BoardState,
        mover: Player,
        depth: i32,
        tt_column: Option<usize>,
        col: usize,
    ) -> i32 {
        let opp = mover.opponent();
        let mut score = 0;

        if board.is_winning_move(mover, col) {
            score += WIN_BONUS;
        }
        if board.is_winning_move(opp, col) {
            score += BLOCK_BONUS;
        }
        if tt_column == Some(col) {
            score += TT_MOVE_BONUS;
        }
        if self.use_killers {
            score += self.killers.bonus(depth, col);
        }
        if self.use_history {
            score += self.history.bonus(col);
        }
        score += CENTER_BONUS[col];
        score += threat_bonus(board, mover, col);
        score
    }

    /// Update killer and history tables for the move that caused a cutoff.
    pub fn record_cutoff(&mut self, depth: i32, column: usize) {
        if self.use_killers {
            self.killers.record(depth, column);
        }
        if self.use_history {
            self.history.record(depth, column);
        }
    }

    pub fn killers(&self) -> &KillerTable {
        &self.killers
    }

    pub fn history(&self) -> &HistoryTable {
        &self.history
    }

    pub fn set_toggles(&mut self, use_killers: bool, use_history: bool) {
        self.use_killers = use_killers;
        self.use_history = use_history;
    }

    /// Reset killer and history tables
    pub fn clear(&mut self) {
        self.killers.clear();
        self.history.clear();
    }
}

impl Default for MoveOrderer {
    fn default() -> Self {
        Self::new(true, true)
    }
}

/// Threat-prevention bonus: how much the opponent would gain by playing
/// `col`, plus the open threes the mover would make there.
fn threat_bonus(board: &BoardState, mover: Player, col: usize) -> i32 {
    let opp = mover.opponent();
    let mut bonus = 0;

    let mut theirs = board.clone();
    if theirs.place(opp, col).is_ok() {
        bonus += OPP_THREE_BONUS * count_open_runs(&theirs, opp, 3);
        if double_threats(&theirs, opp) > 0 {
            bonus += OPP_DOUBLE_THREAT_BONUS;
        }
    }

    let mut mine = board.clone();
    if mine.place(mover, col).is_ok() {
        bonus += OWN_THREE_BONUS * count_open_runs(&mine, mover, 3);
    }
    bonus
}

#[cfg(test)]
mod tests {
    use super::*;

    fn play(columns: &[usize]) -> BoardState {
        let mut board = BoardState::new();
        for &col in columns {
            let player = board.to_move();
            board.place(player, col).unwrap();
        }
        board
    }

    fn orderer_moves(board: &BoardState, mover: Player) -> MoveList {
        MoveOrderer::default().order(board, mover, 3, None)
    }

    #[test]
    fn test_empty_board_center_first() {
        let orderer = MoveOrderer::default();
        let moves = orderer.order(&BoardState::new(), Player::One, 4, None);
        assert_eq!(moves.as_slice(), &[3, 2, 4, 1, 5, 0, 6]);
    }

    #[test]
    fn test_win_ordered_before_block() {
        // X holds 0,1,2 on the bottom row, O stacks three in column 6
        let board = play(&[0, 6, 1, 6, 2, 6]);
        let moves = orderer_moves(&board, Player::One);
        assert_eq!(moves[0], 3);
        assert_eq!(moves[1], 6);
    }

    #[test]
    fn test_tt_move_promoted() {
        let orderer = MoveOrderer::default();
        let moves = orderer.order(&BoardState::new(), Player::One, 4, Some(0));
        assert_eq!(moves[0], 0);
    }

    #[test]
    fn test_killer_record_and_shift() {
        let mut killers = KillerTable::new();
        killers.record(5, 2);
        killers.record(5, 4);
        killers.record(5, 4);
        assert_eq!(killers.get(5), [Some(4), Some(2)]);
        assert_eq!(killers.bonus(5, 4), 900);
        assert_eq!(killers.bonus(5, 2), 800);
        assert_eq!(killers.bonus(4, 4), 0);

        // Out of range depths are ignored
        killers.record(64, 1);
        killers.record(-1, 1);
        assert_eq!(killers.bonus(64, 1), 0);
    }

    #[test]
    fn test_history_accumulates_depth_squared() {
        let mut history = HistoryTable::new();
        history.record(3, 1);
        history.record(4, 1);
        assert_eq!(history.get(1), 25);
        for _ in 0..100 {
            history.record(10, 1);
        }
        assert_eq!(history.bonus(1), 4_000);
    }

    #[test]
    fn test_record_cutoff_respects_toggles() {
        let mut orderer = MoveOrderer::new(false, true);
        orderer.record_cutoff(3, 6);
        assert_eq!(orderer.killers().get(3), [None, None]);
        assert_eq!(orderer.history().get(6), 9);

        let mut orderer = MoveOrderer::new(true, false);
        orderer.record_cutoff(3, 6);
        assert_eq!(orderer.killers().get(3), [Some(6), None]);
        assert_eq!(orderer.history().get(6), 0);
    }

    #[test]
    fn test_history_reorders_quiet_moves() {
        let mut orderer = MoveOrderer::default();
        orderer.record_cutoff(10, 0);
        let moves = orderer.order(&BoardState::new(), Player::One, 2, None);
        assert_eq!(moves[0], 0);
    }

    #[test]
    fn test_clear() {
        let mut orderer = MoveOrderer::default();
        orderer.record_cutoff(4, 2);
        orderer.clear();
        assert_eq!(orderer.killers().get(4), [None, None]);
        assert_eq!(orderer.history().get(2), 0);
    }

    #[test]
    fn test_full_columns_excluded() {
        let board = play(&[3, 3, 3, 3, 3, 3, 3]);
        let moves = orderer_moves(&board, Player::Two);
        assert_eq!(moves.len(), 6);
        assert!(!moves.contains(&3));
    }
}
