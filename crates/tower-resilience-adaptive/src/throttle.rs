use std::sync::Arc;
use std::time::Instant;

use rand::Rng;
use tower_resilience_core::{ErrorHistory, EventListeners};
use tower_resilience_window::RollingWindow;

use crate::config::ThrottleConfig;
use crate::error::ThrottleError;
use crate::events::ThrottleEvent;
use crate::promise::{Promise, PromiseInner};

/// Client-side rejection that approximates the Google SRE overload formula:
///
/// `dropRatio = max(0, ((total - protection) - k * accepts) / (total + 1))`
///
/// A uniform random draw `r` rejects the call when `r < dropRatio`. Because
/// rejecting does not itself update the window, a run of successes always
/// drives the ratio back toward zero.
pub struct Throttle {
    name: String,
    k: f64,
    protection: f64,
    window: Arc<RollingWindow>,
    history: Arc<ErrorHistory>,
    listeners: Arc<EventListeners<ThrottleEvent>>,
}

impl Throttle {
    /// Builds a throttle from `config`.
    pub fn new(config: ThrottleConfig) -> Self {
        Self {
            name: config.name.clone(),
            k: config.k,
            protection: config.protection,
            window: Arc::new(config.build_window()),
            history: Arc::new(ErrorHistory::new()),
            listeners: Arc::new(config.event_listeners),
        }
    }

    /// The throttle's configured name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The drop ratio computed from the current window state.
    pub fn drop_ratio(&self) -> f64 {
        let (accepts, total) = self.window.stats();
        let numerator = (total as f64 - self.protection) - self.k * accepts;
        (numerator / (total as f64 + 1.0)).max(0.0)
    }

    /// Decides whether to admit a call.
    ///
    /// On admission, returns a [`Promise`] the caller must settle with `accept`
    /// or `reject` once the guarded operation completes. On rejection, no
    /// function runs and an `Open` error is returned immediately.
    pub fn allow<E>(&self) -> Result<Promise, ThrottleError<E>> {
        let drop_ratio = self.drop_ratio();
        let timestamp = Instant::now();

        if drop_ratio > 0.0 {
            let r: f64 = rand::rng().random();
            if r < drop_ratio {
                self.listeners.emit(&ThrottleEvent::Rejected {
                    name: self.name.clone(),
                    drop_ratio,
                    timestamp,
                });
                #[cfg(feature = "tracing")]
                tracing::warn!(
                    throttle = %self.name,
                    drop_ratio,
                    last_errors = %self.history.render(),
                    "adaptive throttle dropped call"
                );
                #[cfg(feature = "metrics")]
                metrics::counter!("throttle_rejected_total", "name" => self.name.clone())
                    .increment(1);

                return Err(ThrottleError::Open);
            }
        }

        self.listeners.emit(&ThrottleEvent::Admitted {
            name: self.name.clone(),
            drop_ratio,
            timestamp,
        });

        Ok(Promise::new(PromiseInner {
            name: self.name.clone(),
            window: Arc::clone(&self.window),
            history: Arc::clone(&self.history),
            listeners: Arc::clone(&self.listeners),
        }))
    }

    /// Runs `req` if admitted, treating any `Err` as a failure.
    pub async fn r#do<F, Fut, T, E>(&self, req: F) -> Result<T, ThrottleError<E>>
    where
        F: FnOnce() -> Fut,
        Fut: std::future::Future<Output = Result<T, E>>,
        E: std::fmt::Display,
    {
        self.do_with_acceptable(req, |_| false).await
    }

    /// Like [`Throttle::do`], but `acceptable` can classify an `Err` result as a
    /// non-failure so it doesn't count against the drop ratio.
    pub async fn do_with_acceptable<F, Fut, T, E>(
        &self,
        req: F,
        acceptable: impl Fn(&E) -> bool,
    ) -> Result<T, ThrottleError<E>>
    where
        F: FnOnce() -> Fut,
        Fut: std::future::Future<Output = Result<T, E>>,
        E: std::fmt::Display,
    {
        let promise = self.allow()?;
        match req().await {
            Ok(value) => {
                promise.accept();
                Ok(value)
            }
            Err(err) => {
                if acceptable(&err) {
                    promise.accept();
                } else {
                    promise.reject(err.to_string());
                }
                Err(ThrottleError::Application(err))
            }
        }
    }

    /// Like [`Throttle::do`], but invokes `fallback` instead of surfacing the
    /// error when the throttle rejects or the request fails.
    pub async fn do_with_fallback<F, Fut, FB, T, E>(
        &self,
        req: F,
        fallback: FB,
    ) -> Result<T, ThrottleError<E>>
    where
        F: FnOnce() -> Fut,
        Fut: std::future::Future<Output = Result<T, E>>,
        FB: FnOnce(ThrottleError<E>) -> Result<T, ThrottleError<E>>,
        E: std::fmt::Display,
    {
        self.do_with_fallback_acceptable(req, fallback, |_| false)
            .await
    }

    /// The full combination of fallback and custom acceptability classification.
    pub async fn do_with_fallback_acceptable<F, Fut, FB, T, E>(
        &self,
        req: F,
        fallback: FB,
        acceptable: impl Fn(&E) -> bool,
    ) -> Result<T, ThrottleError<E>>
    where
        F: FnOnce() -> Fut,
        Fut: std::future::Future<Output = Result<T, E>>,
        FB: FnOnce(ThrottleError<E>) -> Result<T, ThrottleError<E>>,
        E: std::fmt::Display,
    {
        match self.do_with_acceptable(req, acceptable).await {
            Ok(value) => Ok(value),
            Err(err) => fallback(err),
        }
    }
}
