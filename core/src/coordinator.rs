use crossbeam::channel::{self, RecvTimeoutError};
use log::{debug, info, warn};
#[cfg(feature = "parallel")]
use rayon::iter::{IndexedParallelIterator, ParallelIterator};
#[cfg(feature = "parallel")]
use rayon::slice::ParallelSliceMut;
use std::{
    any::Any,
    ops::Range,
    panic::{self, AssertUnwindSafe},
    sync::{
        atomic::{AtomicBool, AtomicUsize, Ordering},
        Arc,
    },
    thread,
    time::{Duration, Instant},
};
use thiserror::Error;

use crate::{
    candidate::{CandidateRecord, LiveEntry},
    config::EngineConfig,
};

#[derive(Error, Debug)]
pub enum CoordinatorError {
    #[error("Worker for records {}..{} panicked: {message}", range.start, range.end)]
    WorkerPanicked { range: Range<usize>, message: String },
    #[error("Distribution pass was cancelled")]
    Cancelled,
    #[error("Distribution pass exceeded its deadline of {0:?}")]
    TimedOut(Duration),
    #[cfg(feature = "parallel")]
    #[error("Unable to build worker pool")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

/// Receives `(done, total)` from the monitor thread.
pub type ProgressMonitor<'a> = &'a mut (dyn FnMut(usize, usize) + Send);

struct Shared {
    done: AtomicUsize,
    failed: AtomicBool,
    started: Instant,
}

/// Splits a slice into one contiguous range per worker and runs a task on
/// every element, each worker writing only to its own range.
///
/// A pass either completes for every element or reports the first failure;
/// callers must treat the slice as garbage after an error.
#[derive(Debug, Clone)]
pub struct Coordinator {
    workers: usize,
    deadline: Option<Duration>,
    progress_interval: Duration,
    cancel: Option<Arc<AtomicBool>>,
}

impl Coordinator {
    pub fn new(workers: usize) -> Self {
        Self {
            workers: workers.max(1),
            deadline: None,
            progress_interval: EngineConfig::default().progress_interval,
            cancel: None,
        }
    }

    pub fn from_config(config: &EngineConfig) -> Self {
        Self {
            workers: config.workers(),
            deadline: config.deadline,
            progress_interval: config.progress_interval,
            cancel: None,
        }
    }

    pub fn with_deadline(mut self, deadline: Duration) -> Self {
        self.deadline = Some(deadline);
        self
    }

    pub fn with_cancel_flag(mut self, cancel: Arc<AtomicBool>) -> Self {
        self.cancel = Some(cancel);
        self
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    pub fn ranges(&self, len: usize) -> Vec<Range<usize>> {
        let chunk = self.chunk_len(len);
        (0..len)
            .step_by(chunk)
            .map(|start| start..(start + chunk).min(len))
            .collect()
    }

    fn chunk_len(&self, len: usize) -> usize {
        ((len + self.workers - 1) / self.workers).max(1)
    }

    pub fn recompute_distributions<const N: usize>(
        &self,
        records: &mut [CandidateRecord<N>],
        live: &[LiveEntry<N>],
        monitor: Option<ProgressMonitor<'_>>,
    ) -> Result<(), CoordinatorError> {
        self.run(records, |record| record.recompute_distribution(live), monitor)
    }

    pub fn run<T, F>(
        &self,
        items: &mut [T],
        task: F,
        monitor: Option<ProgressMonitor<'_>>,
    ) -> Result<(), CoordinatorError>
    where
        T: Send,
        F: Fn(&mut T) + Sync,
    {
        let total = items.len();
        let chunk = self.chunk_len(total);
        let shared = Shared {
            done: AtomicUsize::new(0),
            failed: AtomicBool::new(false),
            started: Instant::now(),
        };
        info!(
            "Starting pass over {total} records with {} workers",
            self.ranges(total).len()
        );

        let results = thread::scope(|s| {
            let (stop, stopped) = channel::bounded::<()>(0);
            if let Some(monitor) = monitor {
                let done = &shared.done;
                let interval = self.progress_interval;
                s.spawn(move || {
                    loop {
                        monitor(done.load(Ordering::Relaxed), total);
                        match stopped.recv_timeout(interval) {
                            Err(RecvTimeoutError::Timeout) => continue,
                            _ => break,
                        }
                    }
                    monitor(done.load(Ordering::Relaxed), total);
                });
            }

            let results = self.run_workers(items, &task, chunk, &shared);
            drop(stop);
            results
        })?;

        match results.into_iter().find_map(Result::err) {
            Some(err) => {
                warn!(
                    "Pass failed after {} of {total} records, discarding results: {err}",
                    shared.done.load(Ordering::Relaxed)
                );
                Err(err)
            }
            None => {
                debug!(
                    "Pass over {total} records took {}ms",
                    shared.started.elapsed().as_millis()
                );
                Ok(())
            }
        }
    }

    #[cfg(feature = "parallel")]
    fn run_workers<T, F>(
        &self,
        items: &mut [T],
        task: &F,
        chunk: usize,
        shared: &Shared,
    ) -> Result<Vec<Result<(), CoordinatorError>>, CoordinatorError>
    where
        T: Send,
        F: Fn(&mut T) + Sync,
    {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.workers)
            .thread_name(|i| format!("distribution-{i}"))
            .build()?;

        Ok(pool.install(|| {
            items
                .par_chunks_mut(chunk)
                .enumerate()
                .map(|(i, slice)| self.work(i * chunk, slice, task, shared))
                .collect()
        }))
    }

    #[cfg(not(feature = "parallel"))]
    fn run_workers<T, F>(
        &self,
        items: &mut [T],
        task: &F,
        chunk: usize,
        shared: &Shared,
    ) -> Result<Vec<Result<(), CoordinatorError>>, CoordinatorError>
    where
        T: Send,
        F: Fn(&mut T) + Sync,
    {
        Ok(items
            .chunks_mut(chunk)
            .enumerate()
            .map(|(i, slice)| self.work(i * chunk, slice, task, shared))
            .collect())
    }

    fn work<T, F>(
        &self,
        start: usize,
        slice: &mut [T],
        task: &F,
        shared: &Shared,
    ) -> Result<(), CoordinatorError>
    where
        F: Fn(&mut T),
    {
        let range = start..start + slice.len();
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
            for item in slice.iter_mut() {
                // another worker already failed, the pass is lost anyway
                if shared.failed.load(Ordering::Relaxed) {
                    return Ok(());
                }
                self.check_interrupt(shared.started)?;
                task(item);
                shared.done.fetch_add(1, Ordering::Relaxed);
            }
            Ok(())
        }));

        let result = outcome.unwrap_or_else(|payload| {
            Err(CoordinatorError::WorkerPanicked {
                range,
                message: panic_message(payload),
            })
        });
        if result.is_err() {
            shared.failed.store(true, Ordering::Relaxed);
        }
        result
    }

    fn check_interrupt(&self, started: Instant) -> Result<(), CoordinatorError> {
        if self
            .cancel
            .as_ref()
            .map_or(false, |cancel| cancel.load(Ordering::Relaxed))
        {
            return Err(CoordinatorError::Cancelled);
        }
        match self.deadline {
            Some(deadline) if started.elapsed() >= deadline => {
                Err(CoordinatorError::TimedOut(deadline))
            }
            _ => Ok(()),
        }
    }
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}
