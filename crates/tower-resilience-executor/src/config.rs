use std::time::Duration;

use tower_resilience_core::EventListeners;

use crate::events::ExecutorEvent;

/// Configuration for a [`crate::PeriodicalExecutor`].
pub struct ExecutorConfig {
    pub(crate) name: String,
    pub(crate) flush_interval: Duration,
    pub(crate) event_listeners: EventListeners<ExecutorEvent>,
}

impl ExecutorConfig {
    /// Starts building an executor configuration.
    pub fn builder() -> ExecutorConfigBuilder {
        ExecutorConfigBuilder::default()
    }
}

/// Builder for [`ExecutorConfig`].
pub struct ExecutorConfigBuilder {
    name: String,
    flush_interval: Duration,
    event_listeners: EventListeners<ExecutorEvent>,
}

impl ExecutorConfigBuilder {
    /// The name used for this executor's diagnostics.
    ///
    /// Default: `<unnamed>`
    pub fn name<N: Into<String>>(mut self, name: N) -> Self {
        self.name = name.into();
        self
    }

    /// The period of the background drainer's ticker.
    ///
    /// Default: 1 second.
    pub fn flush_interval(mut self, interval: Duration) -> Self {
        self.flush_interval = interval;
        self
    }

    /// Registers a callback invoked whenever a non-empty batch is flushed.
    pub fn on_flush<F>(mut self, f: F) -> Self
    where
        F: Fn(usize) + Send + Sync + 'static,
    {
        self.event_listeners
            .add(tower_resilience_core::FnListener::new(
                move |event: &ExecutorEvent| {
                    if let ExecutorEvent::BatchFlushed { size, .. } = event {
                        f(*size);
                    }
                },
            ));
        self
    }

    /// Builds the executor configuration.
    pub fn build(self) -> ExecutorConfig {
        ExecutorConfig {
            name: self.name,
            flush_interval: self.flush_interval,
            event_listeners: self.event_listeners,
        }
    }
}

impl Default for ExecutorConfigBuilder {
    fn default() -> Self {
        Self {
            name: String::from("<unnamed>"),
            flush_interval: Duration::from_secs(1),
            event_listeners: EventListeners::new(),
        }
    }
}
