pub mod recompute;

pub use recompute::{RecomputationJob, RecomputeOptions};
