use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Single-shot coalescing trigger: `trigger()` schedules `f` to run after
/// `delay`, and any further `trigger()` calls made while that wait is
/// outstanding are absorbed into the same pending run. Grounded on go-zero's
/// `DelayExecutor`.
///
/// `triggered` is cleared immediately before `f` runs rather than after, so a
/// `trigger()` call that lands *during* `f`'s execution re-arms a fresh
/// delayed run instead of being silently dropped.
pub struct DelayExecutor {
    delay: Duration,
    triggered: Arc<AtomicBool>,
    f: Arc<dyn Fn() + Send + Sync>,
}

impl DelayExecutor {
    /// Builds a delay executor that runs `f` `delay` after the first
    /// un-coalesced `trigger()` call.
    pub fn new<F>(delay: Duration, f: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        Self {
            delay,
            triggered: Arc::new(AtomicBool::new(false)),
            f: Arc::new(f),
        }
    }

    /// Schedules a delayed run if one isn't already pending; otherwise a
    /// no-op, since the pending run will observe this trigger's intent too.
    pub fn trigger(&self) {
        if self.triggered.swap(true, Ordering::AcqRel) {
            return;
        }

        let delay = self.delay;
        let triggered = Arc::clone(&self.triggered);
        let f = Arc::clone(&self.f);
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            triggered.store(false, Ordering::Release);
            f();
        });
    }
}
