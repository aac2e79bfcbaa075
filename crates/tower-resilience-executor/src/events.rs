//! Events emitted by a [`crate::PeriodicalExecutor`].

use std::time::Instant;
use tower_resilience_core::ResilienceEvent;

/// Lifecycle events an executor reports for observability.
#[derive(Debug, Clone)]
pub enum ExecutorEvent {
    /// A non-empty batch was drained and handed to `execute`.
    BatchFlushed {
        name: String,
        size: usize,
        timestamp: Instant,
    },
    /// The background drainer exited after the idle-timeout window elapsed
    /// with nothing in flight.
    DrainerExited { name: String, timestamp: Instant },
}

impl ResilienceEvent for ExecutorEvent {
    fn event_type(&self) -> &'static str {
        match self {
            ExecutorEvent::BatchFlushed { .. } => "batch_flushed",
            ExecutorEvent::DrainerExited { .. } => "drainer_exited",
        }
    }

    fn timestamp(&self) -> Instant {
        match self {
            ExecutorEvent::BatchFlushed { timestamp, .. } => *timestamp,
            ExecutorEvent::DrainerExited { timestamp, .. } => *timestamp,
        }
    }

    fn pattern_name(&self) -> &str {
        match self {
            ExecutorEvent::BatchFlushed { name, .. } => name,
            ExecutorEvent::DrainerExited { name, .. } => name,
        }
    }
}
