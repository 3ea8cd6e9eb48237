//! # Job System
//!
//! Fixed-size worker pool. Jobs go through an unbounded crossbeam channel;
//! a mutex/condvar pair counts jobs that are queued or running so that
//! [`JobSystem::wait`] can block until the pool is idle.
//!
//! Nothing in the tick uses the pool yet. It exists for work that can be
//! split off the main thread, such as generating chunks ahead of the observer.

use std::io;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use crossbeam_channel::{unbounded, Receiver, Sender};
use parking_lot::{Condvar, Mutex};
use tracing::{error, info};

type Job = Box<dyn FnOnce() + Send + 'static>;

#[derive(Default)]
struct Pending {
    count: Mutex<usize>,
    idle: Condvar,
}

impl Pending {
    fn finish_one(&self) {
        let mut count = self.count.lock();
        *count -= 1;
        if *count == 0 {
            self.idle.notify_all();
        }
    }
}

/// Fixed-size thread pool with schedule / wait-for-all semantics.
pub struct JobSystem {
    sender: Option<Sender<Job>>,
    workers: Vec<JoinHandle<()>>,
    pending: Arc<Pending>,
}

impl JobSystem {
    /// Starts `threads` workers; `0` means one per available core.
    ///
    /// # Errors
    ///
    /// Returns the OS error if a worker thread cannot be spawned.
    pub fn new(threads: usize) -> io::Result<Self> {
        let threads = if threads == 0 {
            thread::available_parallelism().map_or(1, std::num::NonZeroUsize::get)
        } else {
            threads
        };

        let (sender, receiver) = unbounded::<Job>();
        let pending = Arc::new(Pending::default());

        let workers = (0..threads)
            .map(|i| {
                let receiver = receiver.clone();
                let pending = Arc::clone(&pending);
                thread::Builder::new()
                    .name(format!("myth-worker-{i}"))
                    .spawn(move || worker_loop(&receiver, &pending))
            })
            .collect::<io::Result<Vec<_>>>()?;

        info!(threads, "JobSystem started");

        Ok(Self {
            sender: Some(sender),
            workers,
            pending,
        })
    }

    /// Queues `job` to run on some worker.
    pub fn schedule(&self, job: impl FnOnce() + Send + 'static) {
        let Some(sender) = &self.sender else {
            return;
        };
        *self.pending.count.lock() += 1;
        if sender.send(Box::new(job)).is_err() {
            // Every worker is gone; keep the counter honest so wait() returns.
            self.pending.finish_one();
            error!("JobSystem has no workers left, job dropped");
        }
    }

    /// Blocks until every job scheduled so far has finished.
    pub fn wait(&self) {
        let mut count = self.pending.count.lock();
        while *count > 0 {
            self.pending.idle.wait(&mut count);
        }
    }

    /// Number of worker threads.
    #[must_use]
    pub fn thread_count(&self) -> usize {
        self.workers.len()
    }
}

fn worker_loop(receiver: &Receiver<Job>, pending: &Pending) {
    while let Ok(job) = receiver.recv() {
        if panic::catch_unwind(AssertUnwindSafe(job)).is_err() {
            error!("job panicked");
        }
        pending.finish_one();
    }
}

impl Drop for JobSystem {
    fn drop(&mut self) {
        // Disconnecting lets workers drain the queue and exit.
        drop(self.sender.take());
        for worker in self.workers.drain(..) {
            if worker.join().is_err() {
                error!("worker thread panicked during shutdown");
            }
        }
    }
}

impl std::fmt::Debug for JobSystem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JobSystem")
            .field("threads", &self.workers.len())
            .field("pending", &*self.pending.count.lock())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_wait_runs_every_job() {
        let jobs = JobSystem::new(4).unwrap();
        assert_eq!(jobs.thread_count(), 4);

        let counter = Arc::new(AtomicUsize::new(0));
        for _ in 0..1000 {
            let counter = Arc::clone(&counter);
            jobs.schedule(move || {
                counter.fetch_add(1, Ordering::Relaxed);
            });
        }
        jobs.wait();
        assert_eq!(counter.load(Ordering::Relaxed), 1000);
    }

    #[test]
    fn test_zero_threads_uses_available_parallelism() {
        let jobs = JobSystem::new(0).unwrap();
        assert!(jobs.thread_count() >= 1);
    }

    #[test]
    fn test_wait_with_nothing_scheduled() {
        let jobs = JobSystem::new(1).unwrap();
        jobs.wait();
    }

    #[test]
    fn test_panicking_job_does_not_hang_wait() {
        let jobs = JobSystem::new(2).unwrap();
        let counter = Arc::new(AtomicUsize::new(0));
        jobs.schedule(|| panic!("boom"));
        for _ in 0..10 {
            let counter = Arc::clone(&counter);
            jobs.schedule(move || {
                counter.fetch_add(1, Ordering::Relaxed);
            });
        }
        jobs.wait();
        assert_eq!(counter.load(Ordering::Relaxed), 10);
    }

    #[test]
    fn test_drop_drains_queue() {
        let counter = Arc::new(AtomicUsize::new(0));
        {
            let jobs = JobSystem::new(2).unwrap();
            for _ in 0..50 {
                let counter = Arc::clone(&counter);
                jobs.schedule(move || {
                    counter.fetch_add(1, Ordering::Relaxed);
                });
            }
        }
        assert_eq!(counter.load(Ordering::Relaxed), 50);
    }
}
