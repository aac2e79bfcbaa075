use std::sync::Arc;
use tower::Layer;

use crate::config::{ThrottleConfig, ThrottleConfigBuilder};
use crate::service::ThrottleService;
use crate::throttle::Throttle;

/// A Tower `Layer` that wraps an inner service with an adaptive throttle.
///
/// Unlike a circuit breaker, the throttle never fully closes the door: it
/// probabilistically drops a fraction of calls proportional to the recent
/// failure rate, so a service under partial degradation keeps serving the
/// traffic it can handle instead of flipping between fully-open and
/// fully-closed.
#[derive(Clone)]
pub struct ThrottleLayer {
    throttle: Arc<Throttle>,
}

impl ThrottleLayer {
    /// Starts building a throttle layer with the go-zero/SRE defaults
    /// (`k = 1.5`, no protection, 40 buckets of 250ms).
    pub fn builder() -> ThrottleConfigBuilder {
        ThrottleConfig::builder()
    }

    /// Wraps a pre-built [`ThrottleConfig`] as a layer.
    pub fn from_config(config: ThrottleConfig) -> Self {
        Self {
            throttle: Arc::new(Throttle::new(config)),
        }
    }

    /// Wraps an already-constructed [`Throttle`], e.g. one pulled from a
    /// named registry so multiple routes can share the same rolling window.
    pub fn from_throttle(throttle: Arc<Throttle>) -> Self {
        Self { throttle }
    }

    /// Direct access to the underlying throttle, e.g. to inspect `drop_ratio()`.
    pub fn throttle(&self) -> &Arc<Throttle> {
        &self.throttle
    }
}

impl<S> Layer<S> for ThrottleLayer {
    type Service = ThrottleService<S>;

    fn layer(&self, service: S) -> Self::Service {
        ThrottleService::new(service, Arc::clone(&self.throttle))
    }
}
