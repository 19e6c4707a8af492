use chrono::Utc;
use futures::stream::{self, StreamExt};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

use crate::{
    config::Settings,
    models::{JobOutcome, MemberRecord, RecomputationResult, RecomputationSummary, Result},
    scoring::TierScoreCalculator,
    store::{retry_with_backoff, MemberStore, RetryConfig},
};

/// Options for one recomputation sweep.
#[derive(Debug, Clone)]
pub struct RecomputeOptions {
    /// Members processed concurrently. Values below 1 are treated as 1.
    pub concurrency: usize,
    /// Compute and diff without writing anything back.
    pub dry_run: bool,
    pub fetch_retry: RetryConfig,
}

impl Default for RecomputeOptions {
    fn default() -> Self {
        Self {
            concurrency: 8,
            dry_run: false,
            fetch_retry: RetryConfig::default(),
        }
    }
}

impl From<&Settings> for RecomputeOptions {
    fn from(settings: &Settings) -> Self {
        Self {
            concurrency: settings.job.concurrency,
            dry_run: settings.job.dry_run,
            fetch_retry: RetryConfig::from(&settings.job.fetch_retry),
        }
    }
}

/// Re-derives every active member's tier score and writes back the ones
/// that drifted.
///
/// A sweep keeps no state between invocations. A failed fetch aborts the
/// sweep before any write. Everything after the fetch is isolated per
/// member: a failed write or a panic only marks that member's result.
pub struct RecomputationJob {
    store: Arc<dyn MemberStore>,
    calculator: Arc<TierScoreCalculator>,
    options: RecomputeOptions,
}

impl RecomputationJob {
    pub fn new(
        store: Arc<dyn MemberStore>,
        calculator: Arc<TierScoreCalculator>,
        options: RecomputeOptions,
    ) -> Self {
        Self {
            store,
            calculator,
            options,
        }
    }

    pub async fn recompute_all(&self) -> Result<RecomputationSummary> {
        let started_at = Utc::now();

        let members = self.fetch_population().await?;
        info!(
            "Recomputing tier scores for {} members (dry run: {})",
            members.len(),
            self.options.dry_run
        );

        // `buffered` keeps input order, so results line up with the fetch
        // without any shared accumulator.
        let results: Vec<RecomputationResult> = stream::iter(members)
            .map(|member| self.spawn_member(member))
            .buffered(self.options.concurrency.max(1))
            .collect()
            .await;

        let summary = RecomputationSummary::from_results(results, self.options.dry_run, started_at, Utc::now());
        info!(
            "Recomputation finished: {} members, {} updated, {} unchanged, {} failed",
            summary.total_members, summary.updated_count, summary.unchanged_count, summary.failed_count
        );

        Ok(summary)
    }

    /// Runs a sweep and folds a fatal error into the failure envelope.
    pub async fn run(&self) -> JobOutcome {
        match self.recompute_all().await {
            Ok(summary) => JobOutcome::succeeded(summary),
            Err(e) => {
                error!("Recomputation aborted: {}", e);
                JobOutcome::failed(e)
            }
        }
    }

    async fn fetch_population(&self) -> Result<Vec<MemberRecord>> {
        let store = Arc::clone(&self.store);
        retry_with_backoff(&self.options.fetch_retry, "fetch_active_members", || {
            let store = Arc::clone(&store);
            async move { store.fetch_active_members().await }
        })
        .await
    }

    async fn spawn_member(&self, member: MemberRecord) -> RecomputationResult {
        let store = Arc::clone(&self.store);
        let calculator = Arc::clone(&self.calculator);
        let dry_run = self.options.dry_run;
        let fallback = member.clone();

        match tokio::spawn(process_member(store, calculator, member, dry_run)).await {
            Ok(result) => result,
            Err(e) => {
                error!("Processing member {} aborted: {}", fallback.id, e);
                RecomputationResult::aborted(&fallback, format!("member processing aborted: {}", e))
            }
        }
    }
}

async fn process_member(
    store: Arc<dyn MemberStore>,
    calculator: Arc<TierScoreCalculator>,
    member: MemberRecord,
    dry_run: bool,
) -> RecomputationResult {
    let new_score = calculator.calculate_tier_score(member.rank, &member.stats());
    let mut result = RecomputationResult::new(&member, new_score);

    if result.old_score == new_score {
        debug!("Member {} unchanged at {}", member.id, new_score);
        return result;
    }

    if dry_run {
        debug!(
            "Member {} would change {} -> {} (dry run)",
            member.id, result.old_score, new_score
        );
        return result;
    }

    match store.update_tier_score(&member.id, result.old_score, new_score).await {
        Ok(()) => {
            debug!("Member {} updated {} -> {}", member.id, result.old_score, new_score);
            result.updated = true;
        }
        Err(e) => {
            warn!("Failed to store tier score for member {}: {}", member.id, e);
            result.error = Some(e.to_string());
        }
    }

    result
}
