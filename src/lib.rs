pub mod models;
pub mod config;
pub mod scoring;
pub mod store;
pub mod jobs;

pub use models::{MemberRecord, PerformanceStats, Rank, RecomputationSummary, TierScoreError, Result};
pub use config::Settings;
pub use scoring::{RankLadder, ScoringConfig, TierScoreCalculator};
pub use jobs::RecomputationJob;
