//! Bounded blocking FIFO shared by the workers.

use std::collections::VecDeque;
use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

use depscan_core::errors::DispatchError;

#[derive(Debug)]
struct QueueState<T> {
    items: VecDeque<T>,
    shutdown: bool,
}

#[derive(Debug)]
pub struct WorkQueue<T> {
    state: Mutex<QueueState<T>>,
    not_empty: Condvar,
    not_full: Condvar,
    capacity: usize,
}

impl<T> WorkQueue<T> {
    /// A capacity of zero is treated as one.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            state: Mutex::new(QueueState {
                items: VecDeque::with_capacity(capacity.min(1024)),
                shutdown: false,
            }),
            not_empty: Condvar::new(),
            not_full: Condvar::new(),
            capacity,
        }
    }

    fn lock(&self) -> MutexGuard<'_, QueueState<T>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Append `item`, blocking while the queue is full.
    pub fn push(&self, item: T) -> Result<(), DispatchError> {
        let mut state = self.lock();
        while state.items.len() >= self.capacity && !state.shutdown {
            state = self.not_full.wait(state).unwrap_or_else(PoisonError::into_inner);
        }
        if state.shutdown {
            return Err(DispatchError::ShutDown);
        }
        state.items.push_back(item);
        drop(state);
        self.not_empty.notify_one();
        Ok(())
    }

    /// Like [`push`](Self::push) but gives up after `timeout`.
    pub fn push_timeout(&self, item: T, timeout: Duration) -> Result<(), DispatchError> {
        let deadline = Instant::now() + timeout;
        let mut state = self.lock();
        while state.items.len() >= self.capacity && !state.shutdown {
            let now = Instant::now();
            if now >= deadline {
                return Err(DispatchError::QueueFull {
                    waited_ms: timeout.as_millis() as u64,
                });
            }
            let (next, _) = self
                .not_full
                .wait_timeout(state, deadline - now)
                .unwrap_or_else(PoisonError::into_inner);
            state = next;
        }
        if state.shutdown {
            return Err(DispatchError::ShutDown);
        }
        state.items.push_back(item);
        drop(state);
        self.not_empty.notify_one();
        Ok(())
    }

    /// Next item, blocking while empty. `None` once shut down; items still
    /// queued at that point are left for [`drain`](Self::drain).
    pub fn pop(&self) -> Option<T> {
        let mut state = self.lock();
        loop {
            if state.shutdown {
                return None;
            }
            if let Some(item) = state.items.pop_front() {
                drop(state);
                self.not_full.notify_one();
                return Some(item);
            }
            state = self.not_empty.wait(state).unwrap_or_else(PoisonError::into_inner);
        }
    }

    /// Wake every blocked producer and consumer and refuse further pushes.
    pub fn shutdown(&self) {
        self.lock().shutdown = true;
        self.not_empty.notify_all();
        self.not_full.notify_all();
    }

    pub fn is_shutdown(&self) -> bool {
        self.lock().shutdown
    }

    /// Remove and return everything still queued.
    pub fn drain(&self) -> Vec<T> {
        let drained: Vec<T> = self.lock().items.drain(..).collect();
        self.not_full.notify_all();
        drained
    }

    pub fn len(&self) -> usize {
        self.lock().items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
