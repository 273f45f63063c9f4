//! Level barrier for joining a dynamically growing set of tasks
//!
//! A plain wait-group is not enough for one BFS level: the number of tasks is
//! not known when the orchestrator starts waiting, because a download that
//! completes mid-wait may register a follow-up extraction. This barrier keeps
//! an atomic outstanding count and lets new units be registered while a wait
//! is already in progress.

use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::Notify;

/// Counting join primitive with dynamic registration.
///
/// Callers must register follow-up work *before* arriving for their own unit;
/// together with the orchestrator registering every task of a level before
/// waiting, this keeps the count from touching zero while work remains.
pub struct LevelBarrier {
    outstanding: AtomicUsize,
    zero: Notify,
}

impl LevelBarrier {
    pub fn new() -> Self {
        Self {
            outstanding: AtomicUsize::new(0),
            zero: Notify::new(),
        }
    }

    /// Registers one outstanding unit of work.
    ///
    /// May be called at any time, including while a `wait` is in progress.
    pub fn register(&self) {
        self.outstanding.fetch_add(1, Ordering::AcqRel);
    }

    /// Signals completion of one unit, waking waiters when none remain.
    pub fn arrive(&self) {
        let previous = self.outstanding.fetch_sub(1, Ordering::AcqRel);
        debug_assert!(previous > 0, "arrive without a matching register");
        if previous == 1 {
            self.zero.notify_waiters();
        }
    }

    /// Waits until the outstanding count returns to zero.
    ///
    /// Returns immediately if nothing is registered. The waiter slot is
    /// enabled before the count is re-checked, so an `arrive` landing between
    /// the check and the await cannot be lost.
    pub async fn wait(&self) {
        loop {
            let notified = self.zero.notified();
            tokio::pin!(notified);
            notified.as_mut().enable();

            if self.outstanding.load(Ordering::Acquire) == 0 {
                return;
            }

            notified.await;
        }
    }

    /// Current number of outstanding units.
    pub fn outstanding(&self) -> usize {
        self.outstanding.load(Ordering::Acquire)
    }
}

impl Default for LevelBarrier {
    fn default() -> Self {
        Self::new()
    }
}
