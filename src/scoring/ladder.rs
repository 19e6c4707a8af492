use serde::Serialize;

use crate::models::{Rank, DIVISIONED_RANK_COUNT};
use super::ScoringConfig;

/// Maps each rank to its base tier-score value.
#[derive(Debug, Clone)]
pub struct RankLadder {
    division_step: i64,
    apex_gap: i64,
    apex_step: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct LadderEntry {
    pub rank: Rank,
    pub ordinal: usize,
    pub base_value: i64,
}

impl RankLadder {
    pub fn new(config: &ScoringConfig) -> Self {
        Self {
            division_step: config.division_step,
            apex_gap: config.apex_gap,
            apex_step: config.apex_step,
        }
    }

    /// `ordinal * division_step` for divisioned ranks. Apex ranks start
    /// `apex_gap` above diamond I and climb by `apex_step`.
    ///
    /// Saturates instead of overflowing; [`ScoringConfig::validate`] rejects
    /// steps large enough to reach that.
    pub fn base_value(&self, rank: Rank) -> i64 {
        let ordinal = rank.ordinal() as i64;
        let top_divisioned = (DIVISIONED_RANK_COUNT as i64 - 1).saturating_mul(self.division_step);

        if rank.is_apex() {
            let apex_index = ordinal - DIVISIONED_RANK_COUNT as i64;
            top_divisioned
                .saturating_add(self.apex_gap)
                .saturating_add(apex_index.saturating_mul(self.apex_step))
        } else {
            ordinal.saturating_mul(self.division_step)
        }
    }

    pub fn entries(&self) -> Vec<LadderEntry> {
        Rank::ALL
            .iter()
            .map(|rank| LadderEntry {
                rank: *rank,
                ordinal: rank.ordinal(),
                base_value: self.base_value(*rank),
            })
            .collect()
    }
}

impl Default for RankLadder {
    fn default() -> Self {
        Self::new(&ScoringConfig::default())
    }
}
