use std::sync::Arc;
use std::task::{Context, Poll};

use futures::future::BoxFuture;
#[cfg(feature = "metrics")]
use metrics::counter;
use tower::Service;

use crate::error::ThrottleError;
use crate::throttle::Throttle;

/// A Tower `Service` that admits or probabilistically drops calls through an
/// adaptive [`Throttle`] before forwarding them to the inner service.
pub struct ThrottleService<S> {
    inner: S,
    throttle: Arc<Throttle>,
}

impl<S> ThrottleService<S> {
    pub(crate) fn new(inner: S, throttle: Arc<Throttle>) -> Self {
        Self { inner, throttle }
    }

    /// Direct access to the throttle backing this service.
    pub fn throttle(&self) -> &Arc<Throttle> {
        &self.throttle
    }
}

impl<S> Clone for ThrottleService<S>
where
    S: Clone,
{
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
            throttle: Arc::clone(&self.throttle),
        }
    }
}

impl<S, Req> Service<Req> for ThrottleService<S>
where
    S: Service<Req> + Clone + Send + 'static,
    S::Future: Send + 'static,
    S::Response: Send + 'static,
    S::Error: std::fmt::Display + Send + 'static,
    Req: Send + 'static,
{
    type Response = S::Response;
    type Error = ThrottleError<S::Error>;
    type Future = BoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx).map_err(ThrottleError::Application)
    }

    fn call(&mut self, req: Req) -> Self::Future {
        let throttle = Arc::clone(&self.throttle);
        let mut inner = self.inner.clone();

        Box::pin(async move {
            let promise = throttle.allow()?;

            #[cfg(feature = "metrics")]
            counter!("throttle_admitted_total", "name" => throttle.name().to_string())
                .increment(1);

            match inner.call(req).await {
                Ok(res) => {
                    promise.accept();
                    Ok(res)
                }
                Err(err) => {
                    promise.reject(err.to_string());
                    Err(ThrottleError::Application(err))
                }
            }
        })
    }
}
