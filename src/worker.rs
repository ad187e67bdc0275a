//! Worker pool executing conversion jobs from the queue.
//!
//! Each worker is an independent tokio task looping dequeue -> orchestrate.
//! An encoder invocation blocks its worker for the duration of the external
//! process, so the pool size bounds peak encoder load.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::context::EngineContext;
use crate::pipeline::Orchestrator;
use crate::queue::JobQueue;

/// Pool of conversion workers over a shared queue.
pub struct WorkerPool {
    orchestrator: Arc<Orchestrator>,
    queue: Arc<dyn JobQueue>,
    count: usize,
    poll_interval: Duration,
    cancel: CancellationToken,
}

impl WorkerPool {
    /// Build a pool from the engine context.
    pub fn new(ctx: &EngineContext) -> Self {
        let orchestrator = Arc::new(Orchestrator::new(
            ctx.store.clone(),
            ctx.encoder.clone(),
            ctx.queue.clone(),
            ctx.layout.clone(),
        ));

        Self {
            orchestrator,
            queue: ctx.queue.clone(),
            count: ctx.config.workers.count,
            poll_interval: Duration::from_secs(ctx.config.workers.poll_interval_secs),
            cancel: CancellationToken::new(),
        }
    }

    /// Token that stops every worker when cancelled.
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Spawn the worker tasks.
    pub fn spawn(&self) -> Vec<JoinHandle<()>> {
        (0..self.count)
            .map(|n| {
                let orchestrator = self.orchestrator.clone();
                let queue = self.queue.clone();
                let poll_interval = self.poll_interval;
                let cancel = self.cancel.clone();

                tokio::spawn(async move {
                    run_worker(n, orchestrator, queue, poll_interval, cancel).await;
                })
            })
            .collect()
    }

    /// Process jobs on the current task until the queue is empty.
    ///
    /// Used by one-shot commands (and tests) that enqueue and then want the
    /// result synchronously instead of running a resident pool.
    pub async fn drain(&self) {
        while let Some(job) = self.queue.dequeue() {
            self.orchestrator.run(&job).await;
        }
    }
}

async fn run_worker(
    n: usize,
    orchestrator: Arc<Orchestrator>,
    queue: Arc<dyn JobQueue>,
    poll_interval: Duration,
    cancel: CancellationToken,
) {
    tracing::info!(worker = n, "Worker started");

    loop {
        if cancel.is_cancelled() {
            break;
        }

        if let Some(job) = queue.dequeue() {
            orchestrator.run(&job).await;
            // Immediately check for the next job.
            continue;
        }

        tokio::select! {
            _ = tokio::time::sleep(poll_interval) => {}
            _ = cancel.cancelled() => break,
        }
    }

    tracing::info!(worker = n, "Worker stopped");
}
