pub mod algorithm;
pub mod ladder;
pub mod weights;

pub use algorithm::{ScoreBreakdown, TierScoreCalculator};
pub use ladder::{LadderEntry, RankLadder};
pub use weights::ScoringConfig;
