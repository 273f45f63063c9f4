//! Fixed-size worker pool over a shared task queue
//!
//! Each pool spawns a configured number of long-lived tokio tasks that pull
//! boxed futures from one unbounded mpsc queue. Submission never blocks the
//! submitter; tasks queue when every worker is busy. Shutdown drains the
//! queue, then aborts whatever refuses to finish.

use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::Instant;

type Task = Pin<Box<dyn Future<Output = ()> + Send>>;

/// Fixed-capacity pool of long-lived workers.
pub struct WorkerPool {
    name: &'static str,
    queue: Mutex<Option<mpsc::UnboundedSender<Task>>>,
    workers: Mutex<Vec<JoinHandle<()>>>,
}

impl WorkerPool {
    /// Spawns `size` workers pulling from a fresh queue.
    ///
    /// `name` only labels log lines.
    pub fn new(name: &'static str, size: usize) -> Self {
        let (tx, rx) = mpsc::unbounded_channel::<Task>();
        let rx = Arc::new(tokio::sync::Mutex::new(rx));

        let workers = (0..size)
            .map(|id| {
                let rx = Arc::clone(&rx);
                tokio::spawn(async move {
                    loop {
                        // The guard is dropped before the task runs, so only
                        // the dequeue is serialized, not the execution.
                        let task = { rx.lock().await.recv().await };
                        match task {
                            Some(task) => task.await,
                            None => break,
                        }
                    }
                    tracing::trace!("{name} worker {id} exiting");
                })
            })
            .collect();

        Self {
            name,
            queue: Mutex::new(Some(tx)),
            workers: Mutex::new(workers),
        }
    }

    /// Queues a task for execution.
    ///
    /// Never blocks. Returns `false` if the pool has been shut down, in which
    /// case the task is dropped without running.
    pub fn submit<F>(&self, task: F) -> bool
    where
        F: Future<Output = ()> + Send + 'static,
    {
        match self.queue.lock().unwrap().as_ref() {
            Some(tx) => tx.send(Box::pin(task)).is_ok(),
            None => false,
        }
    }

    /// Whether `shutdown` has been called.
    pub fn is_closed(&self) -> bool {
        self.queue.lock().unwrap().is_none()
    }

    /// Shuts the pool down.
    ///
    /// Closing the queue lets workers finish already-queued tasks and exit.
    /// Workers still running after `grace` are aborted and given the same
    /// grace again; if any survive even that, the condition is reported at
    /// warn level rather than returned as an error. Safe to call more than
    /// once. Returns `true` when every worker stopped.
    pub async fn shutdown(&self, grace: Duration) -> bool {
        drop(self.queue.lock().unwrap().take());

        let mut workers = std::mem::take(&mut *self.workers.lock().unwrap());
        if workers.is_empty() {
            return true;
        }

        if join_within(&mut workers, grace).await {
            return true;
        }

        tracing::warn!(
            "{} pool did not drain within {:?}, aborting remaining tasks",
            self.name,
            grace
        );
        for handle in &workers {
            handle.abort();
        }

        if join_within(&mut workers, grace).await {
            return true;
        }

        tracing::warn!("{} pool: unable to stop running tasks", self.name);
        false
    }
}

/// Joins the given workers, giving the whole group at most `grace`.
async fn join_within(workers: &mut Vec<JoinHandle<()>>, grace: Duration) -> bool {
    let deadline = Instant::now() + grace;

    while let Some(handle) = workers.last_mut() {
        let remaining = deadline.saturating_duration_since(Instant::now());
        match tokio::time::timeout(remaining, &mut *handle).await {
            // Cancelled handles resolve to a JoinError, which still counts
            // as the worker having stopped.
            Ok(_) => {
                workers.pop();
            }
            Err(_) => return false,
        }
    }

    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[tokio::test]
    async fn test_submitted_tasks_run() {
        let pool = WorkerPool::new("test", 2);
        let (tx, mut rx) = mpsc::unbounded_channel();

        for i in 0..10 {
            let tx = tx.clone();
            assert!(pool.submit(async move {
                tx.send(i).unwrap();
            }));
        }

        let mut seen = Vec::new();
        for _ in 0..10 {
            seen.push(rx.recv().await.unwrap());
        }
        seen.sort();
        assert_eq!(seen, (0..10).collect::<Vec<_>>());
    }

    #[tokio::test]
    async fn test_concurrency_bounded_by_pool_size() {
        let pool = WorkerPool::new("test", 2);
        let running = Arc::new(AtomicUsize::new(0));
        let peak = Arc::new(AtomicUsize::new(0));
        let (tx, mut rx) = mpsc::unbounded_channel();

        for _ in 0..8 {
            let running = Arc::clone(&running);
            let peak = Arc::clone(&peak);
            let tx = tx.clone();
            pool.submit(async move {
                let now = running.fetch_add(1, Ordering::SeqCst) + 1;
                peak.fetch_max(now, Ordering::SeqCst);
                tokio::time::sleep(Duration::from_millis(10)).await;
                running.fetch_sub(1, Ordering::SeqCst);
                tx.send(()).unwrap();
            });
        }

        for _ in 0..8 {
            rx.recv().await.unwrap();
        }
        assert!(peak.load(Ordering::SeqCst) <= 2);
    }

    #[tokio::test]
    async fn test_submit_after_shutdown_is_rejected() {
        let pool = WorkerPool::new("test", 1);
        assert!(pool.shutdown(Duration::from_secs(1)).await);
        assert!(pool.is_closed());
        assert!(!pool.submit(async {}));
    }

    #[tokio::test]
    async fn test_shutdown_waits_for_queued_tasks() {
        let pool = WorkerPool::new("test", 1);
        let counter = Arc::new(AtomicUsize::new(0));

        for _ in 0..5 {
            let counter = Arc::clone(&counter);
            pool.submit(async move {
                tokio::time::sleep(Duration::from_millis(5)).await;
                counter.fetch_add(1, Ordering::SeqCst);
            });
        }

        assert!(pool.shutdown(Duration::from_secs(5)).await);
        assert_eq!(counter.load(Ordering::SeqCst), 5);
    }

    #[tokio::test]
    async fn test_shutdown_twice_is_safe() {
        let pool = WorkerPool::new("test", 2);
        assert!(pool.shutdown(Duration::from_secs(1)).await);
        assert!(pool.shutdown(Duration::from_secs(1)).await);
    }

    #[tokio::test]
    async fn test_stuck_task_is_aborted() {
        let pool = WorkerPool::new("test", 1);
        pool.submit(async {
            // Never completes on its own.
            std::future::pending::<()>().await;
        });

        // First grace expires, the worker is aborted, second grace succeeds.
        assert!(pool.shutdown(Duration::from_millis(50)).await);
    }
}
