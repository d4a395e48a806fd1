/*!
 * Bounded-concurrency execution of work items.
 *
 * One executor serves both modes: parallel runs up to N items at once, sequential
 * is the same machinery with N = 1. Items are polled on the calling task, so
 * concurrency comes from interleaving at the translators' await points rather
 * than from threads.
 *
 * Results are always returned in input order: each item travels with its index
 * and the collected results are reassembled by it.
 */

use futures::stream::{self, StreamExt};
use indicatif::ProgressBar;
use log::warn;
use std::future::Future;
use std::time::Duration;

/// How a batch is scheduled
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutionMode {
    /// Up to `workers` items in flight, completion order unconstrained
    Parallel { workers: usize },
    /// One item at a time, in generation order
    Sequential,
}

impl ExecutionMode {
    /// Maximum number of items in flight
    pub fn concurrency(&self) -> usize {
        match self {
            ExecutionMode::Parallel { workers } => (*workers).max(1),
            ExecutionMode::Sequential => 1,
        }
    }
}

/// Runs batches of work items
#[derive(Debug, Clone, Copy)]
pub struct TaskExecutor {
    mode: ExecutionMode,
    pacing: Duration,
}

impl TaskExecutor {
    pub fn new(mode: ExecutionMode) -> Self {
        Self { mode, pacing: Duration::ZERO }
    }

    /// Pause after each item (except the last) while still holding its slot
    pub fn with_pacing(mut self, pacing: Duration) -> Self {
        self.pacing = pacing;
        self
    }

    /// Execute every item and return one result per item, index-aligned
    ///
    /// The worker is expected to turn failures into values (typically `Err`);
    /// a failing item never stops its siblings. There is no cancellation: the
    /// call returns once every item has finished.
    pub async fn run<T, R, F, Fut>(&self, items: Vec<T>, progress: &ProgressBar, worker: F) -> Vec<R>
    where
        F: Fn(T) -> Fut,
        Fut: Future<Output = R>,
    {
        let total = items.len();
        if total == 0 {
            warn!("No tasks available for processing.");
            return Vec::new();
        }

        progress.set_length(total as u64);
        let worker = &worker;
        let pacing = self.pacing;

        let mut results: Vec<(usize, R)> = stream::iter(items.into_iter().enumerate())
            .map(|(index, item)| async move {
                let result = worker(item).await;
                progress.inc(1);
                if !pacing.is_zero() && index + 1 < total {
                    tokio::time::sleep(pacing).await;
                }
                (index, result)
            })
            .buffer_unordered(self.mode.concurrency())
            .collect()
            .await;

        results.sort_by_key(|(index, _)| *index);
        results.into_iter().map(|(_, result)| result).collect()
    }
}
