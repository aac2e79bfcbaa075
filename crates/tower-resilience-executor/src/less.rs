use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

/// Throttles execution to at most once per `threshold`, using a CAS-guarded
/// atomic timestamp the same way [`crate::executor`]'s circuit-adjacent
/// siblings guard their single-test admission. Grounded on go-zero's
/// `LessExecutor`.
pub struct LessExecutor {
    threshold: Duration,
    created_at: Instant,
    last_nanos: AtomicU64,
}

impl LessExecutor {
    /// Builds a less-executor that runs its callback at most once per
    /// `threshold`.
    pub fn new(threshold: Duration) -> Self {
        Self {
            threshold,
            created_at: Instant::now(),
            last_nanos: AtomicU64::new(0),
        }
    }

    /// Runs `f` and returns `true` if this is the first call or at least
    /// `threshold` has elapsed since the last successful run; otherwise
    /// discards `f` and returns `false`.
    pub fn do_or_discard<F>(&self, f: F) -> bool
    where
        F: FnOnce(),
    {
        let now = self.created_at.elapsed().as_nanos() as u64;
        let threshold_nanos = self.threshold.as_nanos() as u64;

        loop {
            let last = self.last_nanos.load(Ordering::Acquire);
            if last != 0 && now < last.saturating_add(threshold_nanos) {
                return false;
            }
            if self
                .last_nanos
                .compare_exchange(last, now, Ordering::AcqRel, Ordering::Acquire)
                .is_ok()
            {
                f();
                return true;
            }
        }
    }
}
