use std::time::Duration;
use tower_resilience_core::EventListeners;
use tower_resilience_window::RollingWindow;

use crate::events::ThrottleEvent;

/// Configuration for an [`crate::Throttle`].
pub struct ThrottleConfig {
    pub(crate) name: String,
    pub(crate) k: f64,
    pub(crate) protection: f64,
    pub(crate) window_buckets: usize,
    pub(crate) window_interval: Duration,
    pub(crate) event_listeners: EventListeners<ThrottleEvent>,
}

impl ThrottleConfig {
    /// Starts building a throttle configuration.
    pub fn builder() -> ThrottleConfigBuilder {
        ThrottleConfigBuilder::default()
    }

    pub(crate) fn build_window(&self) -> RollingWindow {
        RollingWindow::builder()
            .buckets(self.window_buckets)
            .interval(self.window_interval)
            .build()
    }
}

/// Builder for [`ThrottleConfig`].
pub struct ThrottleConfigBuilder {
    name: String,
    k: f64,
    protection: f64,
    window_buckets: usize,
    window_interval: Duration,
    event_listeners: EventListeners<ThrottleEvent>,
}

impl ThrottleConfigBuilder {
    /// The name used for this throttle's diagnostics and registry entry.
    ///
    /// Default: `<unnamed>`
    pub fn name<N: Into<String>>(mut self, name: N) -> Self {
        self.name = name.into();
        self
    }

    /// The multiplier `k` in `dropRatio = max(0, (total - k*accepts) / (total+1))`.
    ///
    /// Default: 1.5, the value the Google SRE overload chapter recommends.
    pub fn k(mut self, k: f64) -> Self {
        assert!(k >= 1.0, "k must be >= 1.0");
        self.k = k;
        self
    }

    /// An integer subtracted from `total` in the drop-ratio numerator before the
    /// `k * accepts` term is applied, giving newly-started traffic some slack
    /// before the throttle starts rejecting.
    ///
    /// Default: 0 (parity with the simpler formulation that omits this term).
    pub fn protection(mut self, protection: u32) -> Self {
        self.protection = protection as f64;
        self
    }

    /// Number of buckets in the underlying rolling window.
    ///
    /// Default: 40.
    pub fn window_buckets(mut self, buckets: usize) -> Self {
        self.window_buckets = buckets;
        self
    }

    /// Duration each bucket of the underlying rolling window spans.
    ///
    /// Default: 250ms (40 buckets * 250ms = 10s total horizon).
    pub fn window_interval(mut self, interval: Duration) -> Self {
        self.window_interval = interval;
        self
    }

    /// Registers a callback invoked whenever the throttle admits a call.
    pub fn on_admitted<F>(mut self, f: F) -> Self
    where
        F: Fn(f64) + Send + Sync + 'static,
    {
        self.event_listeners
            .add(tower_resilience_core::FnListener::new(
                move |event: &ThrottleEvent| {
                    if let ThrottleEvent::Admitted { drop_ratio, .. } = event {
                        f(*drop_ratio);
                    }
                },
            ));
        self
    }

    /// Registers a callback invoked whenever the throttle probabilistically rejects a call.
    pub fn on_rejected<F>(mut self, f: F) -> Self
    where
        F: Fn(f64) + Send + Sync + 'static,
    {
        self.event_listeners
            .add(tower_resilience_core::FnListener::new(
                move |event: &ThrottleEvent| {
                    if let ThrottleEvent::Rejected { drop_ratio, .. } = event {
                        f(*drop_ratio);
                    }
                },
            ));
        self
    }

    /// Builds the throttle configuration.
    pub fn build(self) -> ThrottleConfig {
        ThrottleConfig {
            name: self.name,
            k: self.k,
            protection: self.protection,
            window_buckets: self.window_buckets,
            window_interval: self.window_interval,
            event_listeners: self.event_listeners,
        }
    }
}

impl Default for ThrottleConfigBuilder {
    fn default() -> Self {
        Self {
            name: String::from("<unnamed>"),
            k: 1.5,
            protection: 0.0,
            window_buckets: 40,
            window_interval: Duration::from_millis(250),
            event_listeners: EventListeners::new(),
        }
    }
}
