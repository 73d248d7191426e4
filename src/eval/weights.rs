//! Evaluation weights
//!
//! Scores for terminal positions are fixed; the heuristic term weights are
//! configurable through `EvalWeights` (the `[eval]` table of the config file).

use serde::{Deserialize, Serialize};

/// Base score of a won position. Terminal scores add the remaining depth so
/// quicker wins and slower losses are preferred.
pub const WIN_SCORE: i32 = 1_000_000;

/// Search window bound, above any reachable score
pub const INF: i32 = 2 * WIN_SCORE;

/// True for scores produced by `terminal_score` on a won or lost position.
#[inline]
pub fn is_win_score(score: i32) -> bool {
    score.abs() >= WIN_SCORE
}

/// Heuristic term weights. Each term is scored `(mover - opponent) * weight`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvalWeights {
    /// Per pair of playable winning columns (`floor(k / 2)`)
    pub double_threat: i32,
    /// Per open three-in-a-row
    pub threat: i32,
    /// Per chip in the center column
    pub center: i32,
    /// Per favoured-minus-unfavoured row-parity threat
    pub odd_even: i32,
    /// Per open two-in-a-row
    pub potential: i32,
    /// Per four-cell window still winnable
    pub mobility: i32,
    /// Per vertical stacking threat point of the mover
    pub vertical: i32,
    /// Multiplier applied to the opponent's vertical threats, in percent
    pub vertical_defense_percent: i32,
}

impl Default for EvalWeights {
    fn default() -> Self {
        Self {
            double_threat: 50_000,
            threat: 5_000,
            center: 200,
            odd_even: 600,
            potential: 500,
            mobility: 20,
            vertical: 1_500,
            vertical_defense_percent: 150,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_weights() {
        let w = EvalWeights::default();
        assert_eq!(w.double_threat, 50_000);
        assert_eq!(w.threat, 5_000);
        assert_eq!(w.vertical * w.vertical_defense_percent / 100, 2_250);
    }

    #[test]
    fn test_win_score_detection() {
        assert!(is_win_score(WIN_SCORE + 3));
        assert!(is_win_score(-WIN_SCORE));
        assert!(!is_win_score(WIN_SCORE - 1));
        assert!(INF > WIN_SCORE + 64);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let w: EvalWeights = toml::from_str("threat = 4000").unwrap();
        assert_eq!(w.threat, 4_000);
        assert_eq!(w.center, 200);
    }
}
