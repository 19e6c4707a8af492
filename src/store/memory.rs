use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::RwLock;

use crate::models::{MemberRecord, Result, TierScoreError};
use super::MemberStore;

/// Member store held in process memory, in insertion order.
///
/// Failures can be injected per operation, which makes it the store of
/// choice for exercising the recomputation job.
#[derive(Default)]
pub struct InMemoryMemberStore {
    members: RwLock<Vec<MemberRecord>>,
    failing_writes: RwLock<HashSet<String>>,
    fail_fetch: AtomicBool,
    writes: AtomicUsize,
}

impl InMemoryMemberStore {
    pub fn new(members: Vec<MemberRecord>) -> Self {
        Self {
            members: RwLock::new(members),
            ..Default::default()
        }
    }

    /// Make every write for member `id` fail.
    pub fn fail_writes_for(&self, id: impl Into<String>) {
        self.failing_writes
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .insert(id.into());
    }

    pub fn set_fail_fetch(&self, fail: bool) {
        self.fail_fetch.store(fail, Ordering::SeqCst);
    }

    /// Successful writes since construction.
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    pub fn get(&self, id: &str) -> Option<MemberRecord> {
        self.members
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .iter()
            .find(|m| m.id == id)
            .cloned()
    }

    /// Replace or append a member, standing in for edits made elsewhere in
    /// the application.
    pub fn upsert(&self, member: MemberRecord) {
        let mut members = self.members.write().unwrap_or_else(|e| e.into_inner());
        match members.iter_mut().find(|m| m.id == member.id) {
            Some(existing) => *existing = member,
            None => members.push(member),
        }
    }
}

#[async_trait]
impl MemberStore for InMemoryMemberStore {
    async fn fetch_active_members(&self) -> Result<Vec<MemberRecord>> {
        if self.fail_fetch.load(Ordering::SeqCst) {
            return Err(TierScoreError::StoreError {
                operation: "fetch_active_members".to_string(),
                message: "member store unavailable".to_string(),
            });
        }

        Ok(self.members.read().unwrap_or_else(|e| e.into_inner()).clone())
    }

    async fn update_tier_score(&self, id: &str, expected: i64, new_score: i64) -> Result<()> {
        let failing = self
            .failing_writes
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .contains(id);
        if failing {
            return Err(TierScoreError::StoreError {
                operation: "update_tier_score".to_string(),
                message: format!("write rejected for member {}", id),
            });
        }

        let mut members = self.members.write().unwrap_or_else(|e| e.into_inner());
        let member = members
            .iter_mut()
            .find(|m| m.id == id)
            .ok_or_else(|| TierScoreError::MemberNotFound(id.to_string()))?;

        if member.stored_score() != expected {
            return Err(TierScoreError::StaleRecord { id: id.to_string() });
        }

        member.tier_score = Some(new_score);
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
