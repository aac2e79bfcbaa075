//! Events emitted by a [`crate::Breaker`].

use std::time::{Duration, Instant};
use tower_resilience_core::ResilienceEvent;

/// The nine outcome kinds hystrix-go reports to its metrics exchange, plus a
/// breaker-level state transition.
#[derive(Debug, Clone)]
pub enum BreakerEvent {
    /// The guarded call completed and was classified as a success.
    Success {
        name: String,
        duration: Duration,
        timestamp: Instant,
    },
    /// The guarded call completed and was classified as a failure.
    Failure {
        name: String,
        duration: Duration,
        timestamp: Instant,
    },
    /// The call was rejected because the circuit was open (not the single test slot).
    ShortCircuit { name: String, timestamp: Instant },
    /// The call was rejected because the token pool had no free slot.
    Rejected { name: String, timestamp: Instant },
    /// The guarded call did not settle before `Settings::timeout` elapsed.
    Timeout {
        name: String,
        duration: Duration,
        timestamp: Instant,
    },
    /// The caller's cancellation token fired before the call settled.
    ContextCanceled { name: String, timestamp: Instant },
    /// A caller-provided deadline elapsed before the call settled.
    ContextDeadlineExceeded { name: String, timestamp: Instant },
    /// A fallback ran and returned successfully.
    FallbackSuccess { name: String, timestamp: Instant },
    /// A fallback ran and itself failed.
    FallbackFailure { name: String, timestamp: Instant },
    /// The circuit changed state.
    StateTransition {
        name: String,
        from: crate::circuit::CircuitState,
        to: crate::circuit::CircuitState,
        timestamp: Instant,
    },
}

impl ResilienceEvent for BreakerEvent {
    fn event_type(&self) -> &'static str {
        match self {
            BreakerEvent::Success { .. } => "success",
            BreakerEvent::Failure { .. } => "failure",
            BreakerEvent::ShortCircuit { .. } => "short-circuit",
            BreakerEvent::Rejected { .. } => "rejected",
            BreakerEvent::Timeout { .. } => "timeout",
            BreakerEvent::ContextCanceled { .. } => "context_canceled",
            BreakerEvent::ContextDeadlineExceeded { .. } => "context_deadline_exceeded",
            BreakerEvent::FallbackSuccess { .. } => "fallback-success",
            BreakerEvent::FallbackFailure { .. } => "fallback-failure",
            BreakerEvent::StateTransition { .. } => "state_transition",
        }
    }

    fn timestamp(&self) -> Instant {
        match self {
            BreakerEvent::Success { timestamp, .. }
            | BreakerEvent::Failure { timestamp, .. }
            | BreakerEvent::ShortCircuit { timestamp, .. }
            | BreakerEvent::Rejected { timestamp, .. }
            | BreakerEvent::Timeout { timestamp, .. }
            | BreakerEvent::ContextCanceled { timestamp, .. }
            | BreakerEvent::ContextDeadlineExceeded { timestamp, .. }
            | BreakerEvent::FallbackSuccess { timestamp, .. }
            | BreakerEvent::FallbackFailure { timestamp, .. }
            | BreakerEvent::StateTransition { timestamp, .. } => *timestamp,
        }
    }

    fn pattern_name(&self) -> &str {
        match self {
            BreakerEvent::Success { name, .. }
            | BreakerEvent::Failure { name, .. }
            | BreakerEvent::ShortCircuit { name, .. }
            | BreakerEvent::Rejected { name, .. }
            | BreakerEvent::Timeout { name, .. }
            | BreakerEvent::ContextCanceled { name, .. }
            | BreakerEvent::ContextDeadlineExceeded { name, .. }
            | BreakerEvent::FallbackSuccess { name, .. }
            | BreakerEvent::FallbackFailure { name, .. }
            | BreakerEvent::StateTransition { name, .. } => name,
        }
    }
}
