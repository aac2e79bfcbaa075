//! Events emitted by the adaptive throttle.

use std::time::Instant;
use tower_resilience_core::ResilienceEvent;

/// Events reported by a [`crate::Throttle`] over its lifetime.
#[derive(Debug, Clone)]
pub enum ThrottleEvent {
    /// The throttle admitted a call; `drop_ratio` was the computed rejection
    /// probability at decision time.
    Admitted {
        /// Throttle name.
        name: String,
        /// Drop ratio computed at admission time.
        drop_ratio: f64,
        /// When the event occurred.
        timestamp: Instant,
    },
    /// The throttle probabilistically rejected a call.
    Rejected {
        /// Throttle name.
        name: String,
        /// Drop ratio that caused the rejection.
        drop_ratio: f64,
        /// When the event occurred.
        timestamp: Instant,
    },
    /// A `Promise` was settled as a success.
    Accepted {
        /// Throttle name.
        name: String,
        /// When the event occurred.
        timestamp: Instant,
    },
    /// A `Promise` was settled as a failure, carrying the caller's reason.
    Declined {
        /// Throttle name.
        name: String,
        /// Human-readable rejection reason, as recorded in the error-history ring.
        reason: String,
        /// When the event occurred.
        timestamp: Instant,
    },
}

impl ResilienceEvent for ThrottleEvent {
    fn event_type(&self) -> &'static str {
        match self {
            ThrottleEvent::Admitted { .. } => "admitted",
            ThrottleEvent::Rejected { .. } => "rejected",
            ThrottleEvent::Accepted { .. } => "accepted",
            ThrottleEvent::Declined { .. } => "declined",
        }
    }

    fn timestamp(&self) -> Instant {
        match self {
            ThrottleEvent::Admitted { timestamp, .. }
            | ThrottleEvent::Rejected { timestamp, .. }
            | ThrottleEvent::Accepted { timestamp, .. }
            | ThrottleEvent::Declined { timestamp, .. } => *timestamp,
        }
    }

    fn pattern_name(&self) -> &str {
        match self {
            ThrottleEvent::Admitted { name, .. }
            | ThrottleEvent::Rejected { name, .. }
            | ThrottleEvent::Accepted { name, .. }
            | ThrottleEvent::Declined { name, .. } => name,
        }
    }
}
