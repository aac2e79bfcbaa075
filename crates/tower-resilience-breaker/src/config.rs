use std::time::Duration;

use tower_resilience_core::EventListeners;

use crate::events::BreakerEvent;
use crate::settings::Settings;

/// Configuration for a [`crate::Breaker`].
pub struct BreakerConfig {
    pub(crate) name: String,
    pub(crate) settings: Settings,
    pub(crate) event_listeners: EventListeners<BreakerEvent>,
}

impl BreakerConfig {
    /// Starts building a breaker configuration with hystrix-go's defaults
    /// (1s timeout, 10 concurrent, 20-call volume threshold, 5s sleep window, 50% error rate).
    pub fn builder() -> BreakerConfigBuilder {
        BreakerConfigBuilder::default()
    }
}

/// Builder for [`BreakerConfig`].
pub struct BreakerConfigBuilder {
    name: String,
    settings: Settings,
    event_listeners: EventListeners<BreakerEvent>,
}

impl BreakerConfigBuilder {
    /// The name used for diagnostics, metrics labels, and registry lookups.
    pub fn name<N: Into<String>>(mut self, name: N) -> Self {
        self.name = name.into();
        self
    }

    /// Time a guarded call is given before the watcher declares a timeout. Default: 1s.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.settings.timeout = timeout;
        self
    }

    /// Size of the token pool. Default: 10.
    pub fn max_concurrent_requests(mut self, max: usize) -> Self {
        self.settings.max_concurrent_requests = max;
        self
    }

    /// Minimum request volume over the 10s health window before the error rate
    /// is consulted. Default: 20.
    pub fn request_volume_threshold(mut self, threshold: u64) -> Self {
        self.settings.request_volume_threshold = threshold;
        self
    }

    /// How long the circuit stays fully open before a single test call is let through.
    /// Default: 5s.
    pub fn sleep_window(mut self, window: Duration) -> Self {
        self.settings.sleep_window = window;
        self
    }

    /// Error percentage (0-100) above which the circuit trips, once volume is met.
    /// Default: 50.
    pub fn error_percent_threshold(mut self, threshold: u8) -> Self {
        self.settings.error_percent_threshold = threshold;
        self
    }

    /// Registers a callback invoked on every circuit state transition.
    pub fn on_state_transition<F>(mut self, f: F) -> Self
    where
        F: Fn(crate::circuit::CircuitState, crate::circuit::CircuitState) + Send + Sync + 'static,
    {
        self.event_listeners
            .add(tower_resilience_core::FnListener::new(
                move |event: &BreakerEvent| {
                    if let BreakerEvent::StateTransition { from, to, .. } = event {
                        f(*from, *to);
                    }
                },
            ));
        self
    }

    /// Registers a callback invoked whenever a call is rejected (short-circuit or max-concurrency).
    pub fn on_rejected<F>(mut self, f: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.event_listeners
            .add(tower_resilience_core::FnListener::new(
                move |event: &BreakerEvent| {
                    if matches!(
                        event,
                        BreakerEvent::ShortCircuit { .. } | BreakerEvent::Rejected { .. }
                    ) {
                        f();
                    }
                },
            ));
        self
    }

    /// Builds the breaker configuration.
    pub fn build(self) -> BreakerConfig {
        BreakerConfig {
            name: self.name,
            settings: self.settings,
            event_listeners: self.event_listeners,
        }
    }
}

impl Default for BreakerConfigBuilder {
    fn default() -> Self {
        Self {
            name: String::from("<unnamed>"),
            settings: Settings::default(),
            event_listeners: EventListeners::new(),
        }
    }
}
