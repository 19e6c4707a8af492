use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{MemberRecord, Rank};

/// Outcome of one member within a recomputation sweep.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecomputationResult {
    pub id: String,
    pub name: String,
    pub rank: Rank,
    pub wins: i64,
    pub losses: i64,
    pub old_score: i64,
    pub new_score: i64,
    pub difference: i64,
    pub updated: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl RecomputationResult {
    pub fn new(member: &MemberRecord, new_score: i64) -> Self {
        let old_score = member.stored_score();
        Self {
            id: member.id.clone(),
            name: member.name.clone(),
            rank: member.rank,
            wins: member.total_wins,
            losses: member.total_losses,
            old_score,
            new_score,
            difference: new_score.saturating_sub(old_score),
            updated: false,
            error: None,
        }
    }

    /// Result for a member whose processing never produced a score.
    pub fn aborted(member: &MemberRecord, reason: impl Into<String>) -> Self {
        let old_score = member.stored_score();
        Self {
            new_score: old_score,
            difference: 0,
            error: Some(reason.into()),
            ..Self::new(member, old_score)
        }
    }

    pub fn is_unchanged(&self) -> bool {
        self.error.is_none() && self.old_score == self.new_score
    }

    pub fn is_failed(&self) -> bool {
        self.error.is_some()
    }
}

/// Report for one full recomputation sweep.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecomputationSummary {
    pub total_members: usize,
    pub updated_count: usize,
    pub unchanged_count: usize,
    pub failed_count: usize,
    pub dry_run: bool,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub results: Vec<RecomputationResult>,
}

impl RecomputationSummary {
    pub fn from_results(
        results: Vec<RecomputationResult>,
        dry_run: bool,
        started_at: DateTime<Utc>,
        finished_at: DateTime<Utc>,
    ) -> Self {
        let updated_count = results.iter().filter(|r| r.updated).count();
        let unchanged_count = results.iter().filter(|r| r.is_unchanged()).count();
        let failed_count = results.iter().filter(|r| r.is_failed()).count();

        Self {
            total_members: results.len(),
            updated_count,
            unchanged_count,
            failed_count,
            dry_run,
            started_at,
            finished_at,
            results,
        }
    }

    /// Members whose score differs from the stored one, updated or not.
    pub fn changed(&self) -> impl Iterator<Item = &RecomputationResult> {
        self.results.iter().filter(|r| r.difference != 0)
    }
}

/// Success/failure envelope returned by the administrative command.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobOutcome {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<RecomputationSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl JobOutcome {
    pub fn succeeded(summary: RecomputationSummary) -> Self {
        Self {
            success: true,
            summary: Some(summary),
            error: None,
        }
    }

    pub fn failed(cause: impl std::fmt::Display) -> Self {
        Self {
            success: false,
            summary: None,
            error: Some(cause.to_string()),
        }
    }
}
