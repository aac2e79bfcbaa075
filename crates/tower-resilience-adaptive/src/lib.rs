//! Adaptive client-side throttling for Tower services.
//!
//! Where a circuit breaker is binary — open or closed — the adaptive throttle
//! implements the probabilistic overload-shedding formula from Google's *Site
//! Reliability Engineering* book (the same approach go-zero's `Breaker` uses):
//!
//! ```text
//! dropRatio = max(0, (total - protection - k * accepts) / (total + 1))
//! ```
//!
//! `total` and `accepts` are tracked over a rolling time window (see
//! [`tower_resilience_window::RollingWindow`]). As the failure rate climbs,
//! `dropRatio` climbs with it and an increasing fraction of calls are
//! rejected *before* they reach the inner service — but a string of
//! successes always pulls the ratio back toward zero, so the throttle
//! self-heals without a half-open probing phase.
//!
//! ## As a Tower layer
//!
//! ```rust
//! use tower::{ServiceBuilder, service_fn};
//! use tower_resilience_adaptive::ThrottleLayer;
//!
//! # async fn example() {
//! let layer = ThrottleLayer::builder()
//!     .name("downstream-api")
//!     .k(1.5)
//!     .build_layer();
//!
//! let service = ServiceBuilder::new()
//!     .layer(layer)
//!     .service(service_fn(|req: String| async move { Ok::<_, std::io::Error>(req) }));
//! # let _ = service;
//! # }
//! ```
//!
//! ## Standalone, go-zero style
//!
//! ```rust
//! use tower_resilience_adaptive::Throttle;
//!
//! # async fn example() {
//! let throttle = Throttle::new(
//!     tower_resilience_adaptive::ThrottleConfig::builder()
//!         .name("downstream-api")
//!         .build(),
//! );
//!
//! let result = throttle.r#do(|| async { Ok::<_, std::io::Error>("ok") }).await;
//! # let _ = result;
//! # }
//! ```
//!
//! ## Feature Flags
//! - `tracing`: logs rejected calls and the last few recorded failures.
//! - `metrics`: reports admitted/rejected counters via the `metrics` crate.

mod config;
mod error;
mod events;
mod layer;
mod promise;
mod registry;
mod service;
mod throttle;

pub use config::{ThrottleConfig, ThrottleConfigBuilder};
pub use error::ThrottleError;
pub use events::ThrottleEvent;
pub use layer::ThrottleLayer;
pub use promise::Promise;
pub use registry::{get_throttle, named_throttle, remove_throttle};
pub use service::ThrottleService;
pub use throttle::Throttle;

impl ThrottleConfigBuilder {
    /// Builds the configuration and immediately wraps it as a [`ThrottleLayer`].
    pub fn build_layer(self) -> ThrottleLayer {
        ThrottleLayer::from_config(self.build())
    }
}
