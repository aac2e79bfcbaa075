use std::sync::Arc;
use std::time::Instant;
use tower_resilience_core::ErrorHistory;
use tower_resilience_core::EventListeners;
use tower_resilience_window::RollingWindow;

use crate::events::ThrottleEvent;

pub(crate) struct PromiseInner {
    pub(crate) name: String,
    pub(crate) window: Arc<RollingWindow>,
    pub(crate) history: Arc<ErrorHistory>,
    pub(crate) listeners: Arc<EventListeners<ThrottleEvent>>,
}

/// A single-use settlement handle returned by [`crate::Throttle::allow`].
///
/// `Promise` is a move-only value: `accept` and `reject` both consume `self`,
/// so the type system (not a runtime assertion) rules out double-settling.
#[must_use = "a Promise must be settled with accept() or reject() to record the call's outcome"]
pub struct Promise {
    inner: PromiseInner,
}

impl Promise {
    pub(crate) fn new(inner: PromiseInner) -> Self {
        Self { inner }
    }

    /// Records the guarded call as a success.
    pub fn accept(self) {
        self.inner.window.add(1.0);
        self.inner.listeners.emit(&ThrottleEvent::Accepted {
            name: self.inner.name.clone(),
            timestamp: Instant::now(),
        });
    }

    /// Records the guarded call as a failure, with a human-readable `reason`
    /// appended to the throttle's error-history ring.
    pub fn reject(self, reason: impl Into<String>) {
        self.inner.window.add(0.0);
        let reason = reason.into();
        self.inner.history.add(&reason);
        self.inner.listeners.emit(&ThrottleEvent::Declined {
            name: self.inner.name.clone(),
            reason,
            timestamp: Instant::now(),
        });
    }
}
