//! Token-limited, timeout-bounded circuit breaker for Tower services.
//!
//! A [`Breaker`] combines three independent protections behind one named
//! entity, mirroring hystrix-go's `CircuitBreaker` + `executorPool`:
//!
//! - **Bulkhead**: a fixed-size token pool caps concurrent in-flight calls;
//!   once exhausted, further calls are rejected immediately with
//!   [`BreakerError::MaxConcurrency`].
//! - **Timeout**: each admitted call races against `Settings::timeout`; a
//!   call that doesn't settle in time is abandoned and reported as a failure.
//! - **Circuit breaker**: once request volume and error rate over a rolling
//!   10-second window both exceed their thresholds, the circuit opens and
//!   rejects all calls except a single periodic test admitted once
//!   `sleep_window` has elapsed since the trip (or the last test).
//!
//! ## As a Tower layer
//!
//! ```rust
//! use tower::{ServiceBuilder, service_fn};
//! use tower_resilience_breaker::BreakerLayer;
//! use std::time::Duration;
//!
//! # async fn example() {
//! let layer = BreakerLayer::builder()
//!     .name("downstream-api")
//!     .timeout(Duration::from_millis(500))
//!     .error_percent_threshold(50)
//!     .build_layer();
//!
//! let service = ServiceBuilder::new()
//!     .layer(layer)
//!     .service(service_fn(|req: String| async move { Ok::<_, std::io::Error>(req) }));
//! # let _ = service;
//! # }
//! ```
//!
//! ## Standalone
//!
//! ```rust
//! use tower_resilience_breaker::Breaker;
//!
//! # async fn example() {
//! let breaker = Breaker::new(
//!     tower_resilience_breaker::BreakerConfig::builder()
//!         .name("downstream-api")
//!         .build(),
//! );
//!
//! let result = breaker.run(|| async { Ok::<_, std::io::Error>("ok") }).await;
//! # let _ = result;
//! # }
//! ```
//!
//! ## Feature Flags
//! - `tracing`: logs state transitions and the last few recorded failures.
//! - `metrics`: reports rejection/timeout counters via the `metrics` crate.

mod breaker;
mod circuit;
mod config;
mod error;
mod events;
mod layer;
mod registry;
mod service;
mod settings;

pub use breaker::Breaker;
pub use circuit::CircuitState;
pub use config::{BreakerConfig, BreakerConfigBuilder};
pub use error::BreakerError;
pub use events::BreakerEvent;
pub use layer::BreakerLayer;
pub use registry::{flush, get_breaker, named_breaker, remove_breaker};
pub use service::BreakerService;
pub use settings::Settings;

impl BreakerConfigBuilder {
    /// Builds the configuration and immediately wraps it as a [`BreakerLayer`].
    pub fn build_layer(self) -> BreakerLayer {
        BreakerLayer::from_config(self.build())
    }
}
