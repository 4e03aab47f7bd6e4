//! Crawl engine - bounded worker pool driving the fetch/extract loop
//!
//! This module contains the main crawl loop that:
//! - Admits each URL at most once through the seen-set
//! - Dispatches admitted URLs to extractor tasks under a concurrency ceiling
//! - Writes every produced result to the sink
//! - Feeds discovered outlinks back into the pool
//! - Terminates once no in-flight or pending work remains
//!
//! One loop owns completion handling, submission, and the termination
//! check, so a completion's discoveries are always fully applied before
//! termination is evaluated.

use crate::engine::seen::SeenSet;
use crate::engine::task::{run_task, TaskOutcome};
use crate::extract::Extractor;
use crate::sink::ResultSink;
use crate::SeineError;
use std::collections::VecDeque;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;

/// Emit a progress line every this many completed tasks
const PROGRESS_INTERVAL: u64 = 50;

/// What to do with a newly discovered URL once the backlog is full
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OverflowPolicy {
    /// Discard the URL with a warning; the run continues
    #[default]
    Drop,

    /// Abort the whole run with `SeineError::FrontierOverflow`
    Abort,
}

/// Engine tuning knobs
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Maximum number of extraction tasks alive at once (must be > 0)
    pub max_concurrency: usize,

    /// Per-task extraction timeout; a task over budget counts as failed
    pub task_timeout: Duration,

    /// Cap on admitted-but-not-yet-dispatched URLs; None means unbounded
    pub frontier_limit: Option<usize>,

    /// Policy applied when `frontier_limit` is reached
    pub overflow_policy: OverflowPolicy,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_concurrency: 64,
            task_timeout: Duration::from_secs(30),
            frontier_limit: None,
            overflow_policy: OverflowPolicy::Drop,
        }
    }
}

/// Counters for one crawl run
///
/// Returned by [`CrawlEngine::process`]; everything already written to the
/// sink when a run aborts stays written, so these also describe the partial
/// output of a failed run.
#[derive(Debug, Clone, Default)]
pub struct CrawlStats {
    /// Tasks that ran to completion, regardless of outcome
    pub completed: u64,

    /// Results written to the sink
    pub written: u64,

    /// Tasks whose extractor declined the URL
    pub empty: u64,

    /// Tasks that failed or timed out
    pub failed: u64,

    /// Discovered URLs discarded by the overflow policy
    pub dropped: u64,

    /// Wall-clock duration of the run
    pub elapsed: Duration,
}

impl CrawlStats {
    /// Share of completed tasks that produced a sink write, as a percentage
    pub fn success_rate(&self) -> f64 {
        if self.completed == 0 {
            return 0.0;
        }
        (self.written as f64 / self.completed as f64) * 100.0
    }
}

/// The crawl engine: one extractor, one sink, one pool
///
/// `E` decides what a URL yields (and which further URLs it links to);
/// `S` decides where results go. The engine owns everything in between:
/// dedup, scheduling, completion handling, and termination.
pub struct CrawlEngine<E: Extractor, S> {
    extractor: Arc<E>,
    sink: Arc<S>,
    config: EngineConfig,
}

impl<E, S> CrawlEngine<E, S>
where
    E: Extractor + 'static,
    S: ResultSink<E::Payload>,
{
    /// Creates an engine from its two collaborators and the tuning knobs
    pub fn new(extractor: E, sink: S, config: EngineConfig) -> Self {
        Self {
            extractor: Arc::new(extractor),
            sink: Arc::new(sink),
            config,
        }
    }

    /// Crawls everything reachable from `seed` and returns once the
    /// frontier is exhausted.
    ///
    /// Fails with `SeineError::EmptySeed` before any work starts if the
    /// seed is empty. Extraction failures are counted, not propagated; a
    /// sink write failure or a worker-pool fault aborts the run.
    pub async fn process(&self, seed: &str) -> crate::Result<CrawlStats> {
        self.process_with_cancellation(seed, CancellationToken::new())
            .await
    }

    /// Like [`process`](Self::process), but stops early when `cancel`
    /// fires: pending URLs are discarded, in-flight tasks are drained and
    /// their results still written, and no further discoveries are
    /// scheduled.
    pub async fn process_with_cancellation(
        &self,
        seed: &str,
        cancel: CancellationToken,
    ) -> crate::Result<CrawlStats> {
        let seed = seed.trim();
        if seed.is_empty() {
            return Err(SeineError::EmptySeed);
        }
        if self.config.max_concurrency == 0 {
            return Err(crate::ConfigError::Validation(
                "max-concurrency must be at least 1".to_string(),
            )
            .into());
        }

        let started = Instant::now();
        let seen = SeenSet::new();
        let mut tasks: JoinSet<TaskOutcome<E::Payload>> = JoinSet::new();
        let mut backlog: VecDeque<String> = VecDeque::new();
        let mut stats = CrawlStats::default();

        tracing::info!(
            "Starting crawl from {} (concurrency {})",
            seed,
            self.config.max_concurrency
        );

        seen.try_mark(seed);
        self.dispatch(seed.to_string(), &mut tasks);

        // Each pass handles exactly one completed task. join_next returns
        // None only when no task is alive, and the backlog is refilled
        // into the pool before the next pass, so falling out of this loop
        // means in-flight plus pending work is zero.
        while let Some(joined) = tasks.join_next().await {
            let outcome = joined.map_err(|e| SeineError::Pool {
                detail: e.to_string(),
            })?;
            stats.completed += 1;

            match outcome {
                TaskOutcome::Fetched(result) => {
                    self.sink
                        .write(&result)
                        .map_err(|source| SeineError::SinkWrite {
                            url: result.url.clone(),
                            source,
                        })?;
                    stats.written += 1;

                    if !cancel.is_cancelled() {
                        for link in result.outlinks {
                            self.submit(link, &seen, &mut tasks, &mut backlog, &mut stats)?;
                        }
                    }
                }
                TaskOutcome::Empty { .. } => stats.empty += 1,
                TaskOutcome::Failed { .. } => stats.failed += 1,
            }

            if cancel.is_cancelled() && !backlog.is_empty() {
                tracing::info!(
                    "Cancellation requested, discarding {} pending URLs",
                    backlog.len()
                );
                backlog.clear();
            }

            while tasks.len() < self.config.max_concurrency {
                match backlog.pop_front() {
                    Some(url) => self.dispatch(url, &mut tasks),
                    None => break,
                }
            }

            if stats.completed % PROGRESS_INTERVAL == 0 {
                let rate = stats.completed as f64 / started.elapsed().as_secs_f64();
                tracing::info!(
                    "Progress: {} URLs done, {} in flight, {} pending, {:.2} URLs/sec",
                    stats.completed,
                    tasks.len(),
                    backlog.len(),
                    rate
                );
            }
        }

        stats.elapsed = started.elapsed();
        tracing::info!(
            "Crawl complete: {} results written, {} empty, {} failed, {} dropped in {:?}",
            stats.written,
            stats.empty,
            stats.failed,
            stats.dropped,
            stats.elapsed
        );

        Ok(stats)
    }

    /// Admits one discovered URL.
    ///
    /// No-op for empty or already-seen URLs. The seen-set check and insert
    /// are one atomic step, so the same URL discovered by two concurrent
    /// parents is dispatched once. Admitted URLs go straight to the pool
    /// when a slot is free, otherwise onto the backlog subject to the
    /// frontier limit.
    fn submit(
        &self,
        url: String,
        seen: &SeenSet,
        tasks: &mut JoinSet<TaskOutcome<E::Payload>>,
        backlog: &mut VecDeque<String>,
        stats: &mut CrawlStats,
    ) -> crate::Result<()> {
        if url.trim().is_empty() {
            return Ok(());
        }
        if !seen.try_mark(&url) {
            return Ok(());
        }

        if tasks.len() < self.config.max_concurrency {
            self.dispatch(url, tasks);
            return Ok(());
        }

        if let Some(limit) = self.config.frontier_limit {
            if backlog.len() >= limit {
                return match self.config.overflow_policy {
                    OverflowPolicy::Drop => {
                        stats.dropped += 1;
                        tracing::warn!("Frontier full ({} pending), dropping {}", limit, url);
                        Ok(())
                    }
                    OverflowPolicy::Abort => Err(SeineError::FrontierOverflow { limit }),
                };
            }
        }

        backlog.push_back(url);
        Ok(())
    }

    /// Spawns the extraction task for one URL
    fn dispatch(&self, url: String, tasks: &mut JoinSet<TaskOutcome<E::Payload>>) {
        tracing::debug!("Dispatching {}", url);
        let extractor = Arc::clone(&self.extractor);
        tasks.spawn(run_task(extractor, url, self.config.task_timeout));
    }
}
