pub mod memory;
pub mod resilience;
pub mod sqlite;

use async_trait::async_trait;

use crate::models::{MemberRecord, Result};

pub use memory::InMemoryMemberStore;
pub use resilience::{retry_with_backoff, RetryConfig};
pub use sqlite::SqliteMemberStore;

/// Persistent roster the recomputation job reads from and writes back to.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MemberStore: Send + Sync {
    /// Every active member, in a stable order, as one logical read.
    async fn fetch_active_members(&self) -> Result<Vec<MemberRecord>>;

    /// Set the tier score of member `id` to `new_score`, but only while its
    /// stored score (missing counts as 0) still equals `expected`.
    async fn update_tier_score(&self, id: &str, expected: i64, new_score: i64) -> Result<()>;
}
