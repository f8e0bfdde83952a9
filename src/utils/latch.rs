//! One-shot count-down latch.
//!
//! Callers count down from an initial value; once the count reaches zero the
//! latch is released and every waiter wakes. The count never goes below zero,
//! so extra `count_down` calls after release are no-ops.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use tokio::sync::watch;

#[derive(Debug)]
pub struct CountDownLatch {
    count: AtomicUsize,
    released: watch::Sender<bool>,
}

impl CountDownLatch {
    pub fn new(count: usize) -> Self {
        let (released, _) = watch::channel(count == 0);
        Self {
            count: AtomicUsize::new(count),
            released,
        }
    }

    /// Decrement the count, releasing waiters when it hits zero.
    ///
    /// Returns `true` only for the call that performed the release.
    pub fn count_down(&self) -> bool {
        let previous = self
            .count
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |c| c.checked_sub(1));

        if previous == Ok(1) {
            self.released.send_replace(true);
            true
        } else {
            false
        }
    }

    pub fn count(&self) -> usize {
        self.count.load(Ordering::Acquire)
    }

    pub fn is_released(&self) -> bool {
        *self.released.borrow()
    }

    /// Wait until released or until `timeout` elapses. Returns whether the
    /// latch was released in time.
    pub async fn wait(&self, timeout: Duration) -> bool {
        let mut rx = self.released.subscribe();
        matches!(
            tokio::time::timeout(timeout, rx.wait_for(|released| *released)).await,
            Ok(Ok(_))
        )
    }
}
