use std::sync::Arc;
use tower::Layer;

use crate::breaker::Breaker;
use crate::config::{BreakerConfig, BreakerConfigBuilder};
use crate::service::BreakerService;

/// A Tower `Layer` that wraps an inner service with a [`Breaker`].
#[derive(Clone)]
pub struct BreakerLayer {
    breaker: Arc<Breaker>,
}

impl BreakerLayer {
    /// Starts building a breaker layer with hystrix-go's defaults.
    pub fn builder() -> BreakerConfigBuilder {
        BreakerConfig::builder()
    }

    /// Wraps a pre-built [`BreakerConfig`] as a layer.
    pub fn from_config(config: BreakerConfig) -> Self {
        Self {
            breaker: Arc::new(Breaker::new(config)),
        }
    }

    /// Wraps an already-constructed [`Breaker`], e.g. one pulled from the
    /// named registry so multiple routes can share state and token pool.
    pub fn from_breaker(breaker: Arc<Breaker>) -> Self {
        Self { breaker }
    }

    /// Direct access to the underlying breaker, e.g. to call `force_open`.
    pub fn breaker(&self) -> &Arc<Breaker> {
        &self.breaker
    }
}

impl<S> Layer<S> for BreakerLayer {
    type Service = BreakerService<S>;

    fn layer(&self, service: S) -> Self::Service {
        BreakerService::new(service, Arc::clone(&self.breaker))
    }
}
