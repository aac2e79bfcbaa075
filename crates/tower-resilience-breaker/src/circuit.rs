use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::{Duration, Instant};

use tower_resilience_window::RollingWindow;

use crate::settings::Settings;

/// Circuit state, as reported by [`crate::Breaker::state`] and `StateTransition` events.
///
/// Half-open is not a persisted state: it is the transient permission a single
/// caller wins via [`Circuit::allow_single_test`] while `open` is still `true`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CircuitState {
    Closed,
    Open,
}

/// The state machine from hystrix-go's `CircuitBreaker`: an open/closed flag,
/// a manual override, the timestamp of the last open-or-single-test, and a
/// rolling health window tracking request volume and error rate.
///
/// `metrics` reuses [`RollingWindow`] the same way the adaptive throttle does:
/// each write is `add(1.0)` on failure, `add(0.0)` on success, so `sum()` is
/// the failure count and `count()` is the request volume, both over the same
/// 10-bucket/1s-each (10s total) horizon hystrix-go's default `CommandConfig` uses.
pub struct Circuit {
    open: AtomicBool,
    force_open: AtomicBool,
    opened_or_last_tested_nanos: AtomicU64,
    created_at: Instant,
    metrics: RollingWindow,
}

impl Circuit {
    pub fn new() -> Self {
        Self {
            open: AtomicBool::new(false),
            force_open: AtomicBool::new(false),
            opened_or_last_tested_nanos: AtomicU64::new(0),
            created_at: Instant::now(),
            metrics: RollingWindow::builder()
                .buckets(10)
                .interval(Duration::from_secs(1))
                .build(),
        }
    }

    pub fn state(&self) -> CircuitState {
        if self.open.load(Ordering::Acquire) {
            CircuitState::Open
        } else {
            CircuitState::Closed
        }
    }

    pub fn force_open(&self, toggle: bool) {
        self.force_open.store(toggle, Ordering::Release);
    }

    /// `forceOpen || open`, checking the error-rate health first so a newly
    /// unhealthy circuit is tripped lazily on the next admission check.
    pub fn is_open(&self, settings: &Settings) -> bool {
        if self.force_open.load(Ordering::Acquire) || self.open.load(Ordering::Acquire) {
            return true;
        }

        let (failures, total) = self.metrics.stats();
        if (total as u64) < settings.request_volume_threshold {
            return false;
        }

        let error_percent = if total > 0 {
            (failures / total as f64) * 100.0
        } else {
            0.0
        };

        if error_percent > settings.error_percent_threshold as f64 {
            self.set_open();
            true
        } else {
            false
        }
    }

    /// `AllowRequest`: admits if not open, or if open and this caller wins the
    /// single-test CAS after `sleep_window` has elapsed.
    pub fn allow_request(&self, settings: &Settings) -> bool {
        !self.is_open(settings) || self.allow_single_test(settings)
    }

    fn allow_single_test(&self, settings: &Settings) -> bool {
        if !self.open.load(Ordering::Acquire) {
            return false;
        }

        let now = self.created_at.elapsed().as_nanos() as u64;
        let last = self.opened_or_last_tested_nanos.load(Ordering::Acquire);
        if now <= last.saturating_add(settings.sleep_window.as_nanos() as u64) {
            return false;
        }

        self.opened_or_last_tested_nanos
            .compare_exchange(last, now, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }

    fn set_open(&self) {
        if self.open.swap(true, Ordering::AcqRel) {
            return;
        }
        self.opened_or_last_tested_nanos.store(
            self.created_at.elapsed().as_nanos() as u64,
            Ordering::Release,
        );
    }

    /// Closes the circuit and clears the health window, mirroring hystrix-go's
    /// behavior of resetting metrics whenever a `success` event closes an open circuit.
    fn set_closed(&self) {
        self.open.store(false, Ordering::Release);
        self.metrics.reset();
    }

    /// Records a single call outcome and, on success while open, closes the circuit.
    pub fn report(&self, failed: bool) -> bool {
        if !failed && self.open.load(Ordering::Acquire) {
            self.set_closed();
            self.metrics.add(0.0);
            return true;
        }
        self.metrics.add(if failed { 1.0 } else { 0.0 });
        false
    }
}

impl Default for Circuit {
    fn default() -> Self {
        Self::new()
    }
}
