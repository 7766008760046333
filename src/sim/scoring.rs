//! Score, multiplier and combo tracking

use serde::{Deserialize, Serialize};

/// Score state for a run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreState {
    pub score: u64,
    /// Current multiplier, `1..=cap`
    pub multiplier: u32,
    /// Consecutive passes without a combo timeout
    pub combo: u32,
    /// Ticks left before the combo lapses
    pub combo_timer: u32,
}

impl Default for ScoreState {
    fn default() -> Self {
        Self {
            score: 0,
            multiplier: 1,
            combo: 0,
            combo_timer: 0,
        }
    }
}

impl ScoreState {
    /// Multiplier earned by a combo streak
    #[inline]
    pub fn combo_multiplier(combo: u32, cap: u32) -> u32 {
        (1 + combo / 3).min(cap)
    }

    /// Award a pipe pass: points at the current multiplier, then extend the
    /// combo. Returns the points actually added.
    pub fn award_pass(&mut self, base: u64, cap: u32, window: u32) -> u64 {
        let points = base * self.multiplier as u64;
        self.score += points;
        self.combo += 1;
        self.combo_timer = window;
        self.multiplier = self
            .multiplier
            .max(Self::combo_multiplier(self.combo, cap))
            .min(cap.max(1));
        points
    }

    /// Score bonus outside the combo chain
    pub fn add_flat(&mut self, points: u64) {
        self.score += points;
    }

    /// Raise the multiplier by one, capped
    pub fn bump_multiplier(&mut self, cap: u32) {
        self.multiplier = (self.multiplier + 1).min(cap.max(1));
    }

    /// Tick the combo countdown. Returns true when the combo just lapsed.
    pub fn decay(&mut self) -> bool {
        if self.combo_timer == 0 {
            return false;
        }
        self.combo_timer -= 1;
        if self.combo_timer == 0 {
            self.combo = 0;
            self.multiplier = 1;
            return true;
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pass_at_multiplier_three() {
        let mut score = ScoreState {
            multiplier: 3,
            ..Default::default()
        };
        let added = score.award_pass(1, 5, 120);
        assert_eq!(added, 3);
        assert_eq!(score.score, 3);
        assert_eq!(score.combo, 1);
        assert_eq!(score.combo_timer, 120);
        assert_eq!(score.multiplier, 3);
    }

    #[test]
    fn test_third_pass_raises_multiplier_for_next() {
        let mut score = ScoreState::default();
        score.award_pass(1, 5, 120);
        score.award_pass(1, 5, 120);
        assert_eq!(score.multiplier, 1);
        score.award_pass(1, 5, 120);
        assert_eq!(score.combo, 3);
        assert_eq!(score.multiplier, 2);
        assert_eq!(score.score, 3);
        score.award_pass(1, 5, 120);
        assert_eq!(score.score, 5);
    }

    #[test]
    fn test_multiplier_capped() {
        let mut score = ScoreState::default();
        for _ in 0..30 {
            score.award_pass(1, 3, 120);
        }
        assert_eq!(score.multiplier, 3);
        score.bump_multiplier(3);
        assert_eq!(score.multiplier, 3);
    }

    #[test]
    fn test_combo_timeout_resets() {
        let mut score = ScoreState::default();
        for _ in 0..6 {
            score.award_pass(1, 5, 10);
        }
        assert_eq!(score.multiplier, 3);
        let mut lapsed = false;
        for _ in 0..10 {
            lapsed |= score.decay();
        }
        assert!(lapsed);
        assert_eq!(score.combo, 0);
        assert_eq!(score.multiplier, 1);
        // Idle timer does nothing
        assert!(!score.decay());
    }

    #[test]
    fn test_bump_multiplier() {
        let mut score = ScoreState::default();
        score.bump_multiplier(5);
        assert_eq!(score.multiplier, 2);
        // Passing keeps a bumped multiplier
        score.award_pass(2, 5, 120);
        assert_eq!(score.score, 4);
        assert_eq!(score.multiplier, 2);
    }
}
