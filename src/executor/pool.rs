//! Bounded worker pool for concurrent transfers.
//!
//! This module provides a dispatcher + worker inbox design:
//! - single-consumer upstream `mpsc::Receiver` (dispatcher)
//! - per-worker `mpsc` inbox channels, filled round-robin
//! - each worker runs one job at a time on the blocking thread pool
//! - explicit sender drop on shutdown before awaiting workers

use crate::organize::CancelToken;
use crate::types::{FileEntry, SortError};
use tokio::runtime::{Builder, Runtime};
use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use std::sync::Arc;

/// Work item accepted by the pool.
#[derive(Debug, Clone)]
pub struct TransferJob {
    /// Scan order of the file, carried into worker logs
    pub index: usize,
    pub entry: FileEntry,
}

/// Function run for every job that is not abandoned.
pub type JobHandler = Arc<dyn Fn(TransferJob) + Send + Sync>;

/// Runtime stats for the pool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoolStats {
    pub workers: usize,
    pub enqueued: usize,
    pub dispatched: usize,
    pub completed: usize,
    /// Jobs dropped unstarted because the run was cancelled
    pub abandoned: usize,
    /// Jobs whose handler panicked past its own guard
    pub panicked: usize,
    pub per_worker_completed: Vec<usize>,
}

impl PoolStats {
    fn new(workers: usize) -> Self {
        Self {
            workers,
            enqueued: 0,
            dispatched: 0,
            completed: 0,
            abandoned: 0,
            panicked: 0,
            per_worker_completed: vec![0; workers],
        }
    }
}

/// Dispatcher plus per-worker inboxes on a dedicated tokio runtime.
///
/// `enqueue` and `close_and_wait` block the calling thread, so the pool must
/// be driven from outside any tokio runtime.
pub struct ParallelExecutor {
    runtime: Runtime,
    enqueue_tx: Option<mpsc::Sender<TransferJob>>,
    dispatcher_handle: Option<JoinHandle<()>>,
    worker_handles: Vec<JoinHandle<()>>,
    stats: Arc<Mutex<PoolStats>>,
}

impl ParallelExecutor {
    /// Create a dispatcher + worker pool with bounded channels.
    pub fn new(
        worker_count: usize,
        queue_capacity: usize,
        handler: JobHandler,
        cancel: CancelToken,
    ) -> Result<Self, SortError> {
        let workers = worker_count.max(1);
        let capacity = queue_capacity.max(1);
        let runtime = Builder::new_multi_thread()
            .worker_threads(workers)
            .thread_name("sortfiles-worker")
            .enable_all()
            .build()
            .map_err(SortError::Io)?;

        let stats = Arc::new(Mutex::new(PoolStats::new(workers)));
        let handle = runtime.handle().clone();

        let (enqueue_tx, enqueue_rx) = mpsc::channel::<TransferJob>(capacity);

        let mut worker_txs = Vec::with_capacity(workers);
        let mut worker_handles = Vec::with_capacity(workers);
        for worker_id in 0..workers {
            let (worker_tx, worker_rx) = mpsc::channel::<TransferJob>(capacity);
            worker_txs.push(worker_tx);
            worker_handles.push(handle.spawn(worker_loop(
                worker_id,
                worker_rx,
                Arc::clone(&handler),
                cancel.clone(),
                Arc::clone(&stats),
            )));
        }

        let dispatcher_handle =
            handle.spawn(dispatcher_loop(enqueue_rx, worker_txs, Arc::clone(&stats)));

        Ok(Self {
            runtime,
            enqueue_tx: Some(enqueue_tx),
            dispatcher_handle: Some(dispatcher_handle),
            worker_handles,
            stats,
        })
    }

    /// Enqueue a job into the upstream dispatcher queue.
    ///
    /// Blocks while the queue is full.
    pub fn enqueue(&self, job: TransferJob) -> Result<(), SortError> {
        let sender = self
            .enqueue_tx
            .as_ref()
            .ok_or_else(|| pool_error("worker queue is already closed"))?;
        let stats = Arc::clone(&self.stats);

        self.runtime.block_on(async {
            sender
                .send(job)
                .await
                .map_err(|_| pool_error("worker queue receiver is closed"))?;

            let mut guard = stats.lock().await;
            guard.enqueued += 1;
            Ok(())
        })
    }

    /// Close queue input and wait for dispatcher/workers to drain and exit.
    pub fn close_and_wait(mut self) -> Result<PoolStats, SortError> {
        self.enqueue_tx.take();

        let dispatcher = self.dispatcher_handle.take();
        let workers = std::mem::take(&mut self.worker_handles);
        let stats = Arc::clone(&self.stats);

        self.runtime.block_on(async move {
            if let Some(handle) = dispatcher {
                handle.await.map_err(map_join_error)?;
            }
            for handle in workers {
                handle.await.map_err(map_join_error)?;
            }
            Ok(stats.lock().await.clone())
        })
    }
}

async fn dispatcher_loop(
    mut enqueue_rx: mpsc::Receiver<TransferJob>,
    worker_txs: Vec<mpsc::Sender<TransferJob>>,
    stats: Arc<Mutex<PoolStats>>,
) {
    let mut next_worker = 0usize;
    let worker_len = worker_txs.len();

    while let Some(job) = enqueue_rx.recv().await {
        if worker_len == 0 {
            break;
        }

        let target = next_worker % worker_len;
        if worker_txs[target].send(job).await.is_ok() {
            let mut guard = stats.lock().await;
            guard.dispatched += 1;
            next_worker = (next_worker + 1) % worker_len;
        }
    }
    // worker_txs are dropped here, which closes worker inboxes.
}

async fn worker_loop(
    worker_id: usize,
    mut worker_rx: mpsc::Receiver<TransferJob>,
    handler: JobHandler,
    cancel: CancelToken,
    stats: Arc<Mutex<PoolStats>>,
) {
    while let Some(job) = worker_rx.recv().await {
        let index = job.index;
        if cancel.is_cancelled() {
            debug!(
                worker_id,
                index,
                path = %job.entry.path.display(),
                "abandoning queued file"
            );
            stats.lock().await.abandoned += 1;
            continue;
        }

        let handler = Arc::clone(&handler);
        debug!(worker_id, index, "worker picked up file");
        let result = tokio::task::spawn_blocking(move || handler(job)).await;

        let mut guard = stats.lock().await;
        match result {
            Ok(()) => {
                guard.completed += 1;
                if let Some(slot) = guard.per_worker_completed.get_mut(worker_id) {
                    *slot += 1;
                }
            }
            Err(e) => {
                warn!(worker_id, index, error = %e, "transfer task failed");
                guard.panicked += 1;
            }
        }
    }
}

fn pool_error(message: &str) -> SortError {
    SortError::Io(std::io::Error::other(message.to_string()))
}

fn map_join_error(error: tokio::task::JoinError) -> SortError {
    SortError::Io(std::io::Error::other(format!(
        "worker pool task failed: {}",
        error
    )))
}
