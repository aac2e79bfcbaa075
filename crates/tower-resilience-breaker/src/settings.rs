use std::time::Duration;

/// Per-breaker tunables, mirroring hystrix-go's `CommandConfig`.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Time a guarded call is given to complete before the watcher declares a timeout.
    pub timeout: Duration,
    /// Size of the token pool: the hard cap on concurrently in-flight calls.
    pub max_concurrent_requests: usize,
    /// Minimum request volume over the health window before the error rate is consulted.
    pub request_volume_threshold: u64,
    /// How long the circuit stays open before a single test call is allowed through.
    pub sleep_window: Duration,
    /// Error percentage (0-100) above which the circuit trips, once volume is met.
    pub error_percent_threshold: u8,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            timeout: Duration::from_millis(1000),
            max_concurrent_requests: 10,
            request_volume_threshold: 20,
            sleep_window: Duration::from_millis(5000),
            error_percent_threshold: 50,
        }
    }
}
