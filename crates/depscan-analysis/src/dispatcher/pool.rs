//! Fixed-size worker pool fed by a bounded [`WorkQueue`].
//!
//! Results flow back over an unbounded channel. A panicking processor is
//! caught and reported as a failed result; the worker keeps running.

use std::panic::{self, AssertUnwindSafe};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Condvar, Mutex, PoisonError};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crossbeam_channel::{unbounded, Receiver, Sender};
use tracing::{debug, info, trace, warn};

use depscan_core::constants::MAX_THREAD_COUNT;
use depscan_core::errors::{DispatchError, ExtractError, PipelineError};

use super::processor::WorkProcessor;
use super::queue::WorkQueue;
use super::types::{DispatcherConfig, DispatcherStats, ProcessingResult, WorkItem};
use crate::scanner::language_detect::Language;

struct Shared {
    queue: WorkQueue<WorkItem>,
    /// Submitted but not yet finished.
    outstanding: Mutex<usize>,
    idle: Condvar,
    queued: AtomicU64,
    processed: AtomicU64,
    failed: AtomicU64,
    busy_nanos: AtomicU64,
}

impl Shared {
    fn finish(&self, count: usize) {
        let mut outstanding = self.outstanding.lock().unwrap_or_else(PoisonError::into_inner);
        *outstanding = outstanding.saturating_sub(count);
        if *outstanding == 0 {
            self.idle.notify_all();
        }
    }
}

pub struct ParallelDispatcher {
    config: DispatcherConfig,
    processor: Arc<dyn WorkProcessor>,
    shared: Arc<Shared>,
    results_tx: Sender<ProcessingResult>,
    results_rx: Receiver<ProcessingResult>,
    workers: Vec<JoinHandle<()>>,
    next_id: AtomicU64,
    started: AtomicBool,
}

impl ParallelDispatcher {
    pub fn new(config: DispatcherConfig, processor: Arc<dyn WorkProcessor>) -> Result<Self, DispatchError> {
        if config.threads == 0 || config.threads > MAX_THREAD_COUNT {
            return Err(DispatchError::InvalidThreadCount {
                requested: config.threads,
                max: MAX_THREAD_COUNT,
            });
        }
        let (results_tx, results_rx) = unbounded();
        Ok(Self {
            config,
            processor,
            shared: Arc::new(Shared {
                queue: WorkQueue::new(config.queue_capacity),
                outstanding: Mutex::new(0),
                idle: Condvar::new(),
                queued: AtomicU64::new(0),
                processed: AtomicU64::new(0),
                failed: AtomicU64::new(0),
                busy_nanos: AtomicU64::new(0),
            }),
            results_tx,
            results_rx,
            workers: Vec::new(),
            next_id: AtomicU64::new(0),
            started: AtomicBool::new(false),
        })
    }

    /// Spawn the worker threads.
    pub fn start(&mut self) -> Result<(), DispatchError> {
        if self.shared.queue.is_shutdown() {
            return Err(DispatchError::ShutDown);
        }
        if self.started.swap(true, Ordering::SeqCst) {
            return Err(DispatchError::AlreadyStarted);
        }
        for worker in 0..self.config.threads {
            let shared = Arc::clone(&self.shared);
            let processor = Arc::clone(&self.processor);
            let tx = self.results_tx.clone();
            let handle = thread::Builder::new()
                .name(format!("depscan-worker-{worker}"))
                .spawn(move || worker_loop(worker, &shared, processor.as_ref(), &tx))
                .map_err(|e| DispatchError::SpawnFailed {
                    worker,
                    message: e.to_string(),
                })?;
            self.workers.push(handle);
        }
        info!(
            workers = self.config.threads,
            queue_capacity = self.shared.queue.capacity(),
            "dispatcher started"
        );
        Ok(())
    }

    /// Queue one file, blocking while the queue is full. Before `start`,
    /// at most `queue_capacity` items can be queued without blocking.
    pub fn submit(&self, path: PathBuf, language: Language) -> Result<u64, DispatchError> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        *self.shared.outstanding.lock().unwrap_or_else(PoisonError::into_inner) += 1;
        if let Err(e) = self.shared.queue.push(WorkItem { id, path, language }) {
            self.shared.finish(1);
            return Err(e);
        }
        self.shared.queued.fetch_add(1, Ordering::Relaxed);
        Ok(id)
    }

    pub fn submit_batch<I>(&self, items: I) -> Result<Vec<u64>, DispatchError>
    where
        I: IntoIterator<Item = (PathBuf, Language)>,
    {
        items
            .into_iter()
            .map(|(path, language)| self.submit(path, language))
            .collect()
    }

    /// Block until every submitted item has finished. Returns false when
    /// `timeout` elapsed first.
    pub fn wait_completion(&self, timeout: Option<Duration>) -> bool {
        let deadline = timeout.map(|t| Instant::now() + t);
        let mut outstanding = self.shared.outstanding.lock().unwrap_or_else(PoisonError::into_inner);
        while *outstanding > 0 {
            match deadline {
                None => {
                    outstanding = self
                        .shared
                        .idle
                        .wait(outstanding)
                        .unwrap_or_else(PoisonError::into_inner);
                }
                Some(deadline) => {
                    let now = Instant::now();
                    if now >= deadline {
                        return false;
                    }
                    let (next, _) = self
                        .shared
                        .idle
                        .wait_timeout(outstanding, deadline - now)
                        .unwrap_or_else(PoisonError::into_inner);
                    outstanding = next;
                }
            }
        }
        true
    }

    pub fn try_result(&self) -> Option<ProcessingResult> {
        self.results_rx.try_recv().ok()
    }

    pub fn recv_timeout(&self, timeout: Duration) -> Option<ProcessingResult> {
        self.results_rx.recv_timeout(timeout).ok()
    }

    /// Every result received so far.
    pub fn drain_results(&self) -> Vec<ProcessingResult> {
        self.results_rx.try_iter().collect()
    }

    /// Stop the workers and join them. Items still queued are discarded.
    /// Safe to call more than once.
    pub fn shutdown(&mut self) {
        self.shared.queue.shutdown();
        let discarded = self.shared.queue.drain().len();
        if discarded > 0 {
            debug!(discarded, "discarding queued work on shutdown");
            self.shared.finish(discarded);
        }
        let joined = self.workers.len();
        for handle in self.workers.drain(..) {
            if handle.join().is_err() {
                warn!("dispatcher worker terminated abnormally");
            }
        }
        if joined > 0 {
            debug!(workers = joined, "dispatcher stopped");
        }
    }

    pub fn is_shutdown(&self) -> bool {
        self.shared.queue.is_shutdown()
    }

    pub fn stats(&self) -> DispatcherStats {
        DispatcherStats {
            workers: self.workers.len(),
            queued: self.shared.queued.load(Ordering::Relaxed),
            processed: self.shared.processed.load(Ordering::Relaxed),
            failed: self.shared.failed.load(Ordering::Relaxed),
            pending: *self.shared.outstanding.lock().unwrap_or_else(PoisonError::into_inner),
            busy: Duration::from_nanos(self.shared.busy_nanos.load(Ordering::Relaxed)),
        }
    }
}

impl Drop for ParallelDispatcher {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn worker_loop(worker: usize, shared: &Shared, processor: &dyn WorkProcessor, tx: &Sender<ProcessingResult>) {
    while let Some(item) = shared.queue.pop() {
        let started = Instant::now();
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| processor.process(&item)))
            .unwrap_or_else(|payload| {
                Err(PipelineError::from(ExtractError::Panicked {
                    path: item.path.clone(),
                    message: panic_message(payload.as_ref()),
                }))
            });
        let elapsed = started.elapsed();

        shared
            .busy_nanos
            .fetch_add(elapsed.as_nanos() as u64, Ordering::Relaxed);
        shared.processed.fetch_add(1, Ordering::Relaxed);
        if let Err(e) = &outcome {
            shared.failed.fetch_add(1, Ordering::Relaxed);
            warn!(worker_id = worker, path = %item.path.display(), error = %e, "file failed");
        } else {
            trace!(
                worker_id = worker,
                path = %item.path.display(),
                extract_time_us = elapsed.as_micros() as u64,
                "file processed"
            );
        }

        // Send before finishing so a completed wait sees every result.
        let _ = tx.send(ProcessingResult {
            id: item.id,
            path: item.path,
            language: item.language,
            outcome,
            elapsed,
            worker,
        });
        shared.finish(1);
    }
    debug!(worker_id = worker, "worker exiting");
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatcher::types::ProcessedFile;

    struct Echo;

    impl WorkProcessor for Echo {
        fn process(&self, item: &WorkItem) -> Result<ProcessedFile, PipelineError> {
            if item.path.ends_with("boom.rs") {
                panic!("boom");
            }
            Ok(ProcessedFile::default())
        }
    }

    fn config(threads: usize) -> DispatcherConfig {
        DispatcherConfig {
            threads,
            queue_capacity: 4,
        }
    }

    #[test]
    fn rejects_bad_thread_counts() {
        assert!(ParallelDispatcher::new(config(0), Arc::new(Echo)).is_err());
        assert!(ParallelDispatcher::new(config(MAX_THREAD_COUNT + 1), Arc::new(Echo)).is_err());
    }

    #[test]
    fn panics_become_failed_results() {
        let mut pool = ParallelDispatcher::new(config(2), Arc::new(Echo)).unwrap();
        pool.start().unwrap();
        pool.submit(PathBuf::from("ok.rs"), Language::Rust).unwrap();
        pool.submit(PathBuf::from("boom.rs"), Language::Rust).unwrap();
        assert!(pool.wait_completion(Some(Duration::from_secs(10))));

        let results = pool.drain_results();
        assert_eq!(results.len(), 2);
        let failed: Vec<_> = results.iter().filter(|r| !r.is_success()).collect();
        assert_eq!(failed.len(), 1);
        assert!(failed[0].path.ends_with("boom.rs"));

        let stats = pool.stats();
        assert_eq!((stats.queued, stats.processed, stats.failed, stats.pending), (2, 2, 1, 0));
    }

    #[test]
    fn double_start_and_submit_after_shutdown() {
        let mut pool = ParallelDispatcher::new(config(1), Arc::new(Echo)).unwrap();
        pool.start().unwrap();
        assert!(matches!(pool.start(), Err(DispatchError::AlreadyStarted)));
        pool.shutdown();
        assert!(matches!(
            pool.submit(PathBuf::from("a.rs"), Language::Rust),
            Err(DispatchError::ShutDown)
        ));
        assert_eq!(pool.stats().pending, 0);
    }
}
