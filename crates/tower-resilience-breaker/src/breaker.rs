use std::future::Future;
use std::time::Instant;

use tokio::sync::Semaphore;
use tokio_util::sync::CancellationToken;
use tower_resilience_core::{ErrorHistory, EventListeners};

use crate::circuit::{Circuit, CircuitState};
use crate::config::BreakerConfig;
use crate::error::BreakerError;
use crate::events::BreakerEvent;
use crate::settings::Settings;

enum Outcome<T, E> {
    Settled(Result<T, E>),
    TimedOut,
    Canceled,
    DeadlineExceeded,
}

/// A named, token-limited, timeout-bounded circuit breaker.
///
/// Combines a hard concurrency cap (the token pool), a per-call deadline, and
/// a closed/open state machine driven by request volume and error rate — the
/// three mechanisms hystrix-go's `CircuitBreaker` + `executorPool` combine.
pub struct Breaker {
    name: String,
    settings: Settings,
    circuit: Circuit,
    pool: Semaphore,
    history: ErrorHistory,
    listeners: EventListeners<BreakerEvent>,
}

impl Breaker {
    /// Builds a breaker from `config`.
    pub fn new(config: BreakerConfig) -> Self {
        let pool = Semaphore::new(config.settings.max_concurrent_requests);
        Self {
            name: config.name,
            settings: config.settings,
            circuit: Circuit::new(),
            pool,
            history: ErrorHistory::new(),
            listeners: config.event_listeners,
        }
    }

    /// The breaker's configured name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Current circuit state (ignores the transient single-test allowance).
    pub fn state(&self) -> CircuitState {
        self.circuit.state()
    }

    /// `IsOpen() = forceOpen || open`.
    pub fn is_open(&self) -> bool {
        self.circuit.is_open(&self.settings)
    }

    /// Forces the circuit open or closed, bypassing the health check.
    pub fn force_open(&self, toggle: bool) {
        self.circuit.force_open(toggle);
    }

    /// Runs `req` if admitted, treating any `Err` as a failure, with no fallback or cancellation.
    pub async fn run<F, Fut, T, E>(&self, req: F) -> Result<T, BreakerError<E>>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: std::fmt::Display,
    {
        self.run_full::<_, _, fn(&BreakerError<E>) -> Result<T, BreakerError<E>>, _, _>(
            req,
            None,
            |_| false,
            None,
            None,
        )
        .await
    }

    /// Like [`Breaker::run`], but `acceptable` can classify an `Err` result as a
    /// non-failure so it doesn't count against the circuit's error rate.
    pub async fn run_with_acceptable<F, Fut, T, E>(
        &self,
        req: F,
        acceptable: impl Fn(&E) -> bool,
    ) -> Result<T, BreakerError<E>>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: std::fmt::Display,
    {
        self.run_full::<_, _, fn(&BreakerError<E>) -> Result<T, BreakerError<E>>, _, _>(
            req, None, acceptable, None, None,
        )
        .await
    }

    /// Like [`Breaker::run`], but invokes `fallback` instead of surfacing a
    /// rejection, timeout, or classified failure.
    pub async fn run_with_fallback<F, Fut, FB, T, E>(
        &self,
        req: F,
        fallback: FB,
    ) -> Result<T, BreakerError<E>>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        FB: FnOnce(&BreakerError<E>) -> Result<T, BreakerError<E>>,
        E: std::fmt::Display,
    {
        self.run_full(req, Some(fallback), |_| false, None, None)
            .await
    }

    /// Like [`Breaker::run`], but settles early (as [`BreakerError::Canceled`])
    /// if `cancel` fires before the call completes or times out.
    pub async fn run_cancellable<F, Fut, T, E>(
        &self,
        req: F,
        cancel: CancellationToken,
    ) -> Result<T, BreakerError<E>>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: std::fmt::Display,
    {
        self.run_full::<_, _, fn(&BreakerError<E>) -> Result<T, BreakerError<E>>, _, _>(
            req,
            None,
            |_| false,
            Some(cancel),
            None,
        )
        .await
    }

    /// Like [`Breaker::run`], but settles early (as [`BreakerError::DeadlineExceeded`])
    /// if `deadline` passes before the call completes or the breaker's own
    /// `Settings::timeout` fires — distinct from an explicit
    /// [`CancellationToken`], which reports [`BreakerError::Canceled`] instead.
    pub async fn run_with_deadline<F, Fut, T, E>(
        &self,
        req: F,
        deadline: tokio::time::Instant,
    ) -> Result<T, BreakerError<E>>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: std::fmt::Display,
    {
        self.run_full::<_, _, fn(&BreakerError<E>) -> Result<T, BreakerError<E>>, _, _>(
            req,
            None,
            |_| false,
            None,
            Some(deadline),
        )
        .await
    }

    /// The full combination of fallback, custom acceptability, external
    /// cancellation, and an externally-provided deadline.
    pub async fn run_full<F, Fut, FB, T, E>(
        &self,
        req: F,
        fallback: Option<FB>,
        acceptable: impl Fn(&E) -> bool,
        cancel: Option<CancellationToken>,
        deadline: Option<tokio::time::Instant>,
    ) -> Result<T, BreakerError<E>>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        FB: FnOnce(&BreakerError<E>) -> Result<T, BreakerError<E>>,
        E: std::fmt::Display,
    {
        let state_before = self.circuit.state();
        let admitted = self.circuit.allow_request(&self.settings);
        self.emit_transition(state_before);

        if !admitted {
            self.listeners.emit(&BreakerEvent::ShortCircuit {
                name: self.name.clone(),
                timestamp: Instant::now(),
            });
            #[cfg(feature = "metrics")]
            metrics::counter!("breaker_short_circuited_total", "name" => self.name.clone())
                .increment(1);
            return self.resolve(BreakerError::CircuitOpen, fallback);
        }

        let _permit = match self.pool.try_acquire() {
            Ok(permit) => permit,
            Err(_) => {
                self.listeners.emit(&BreakerEvent::Rejected {
                    name: self.name.clone(),
                    timestamp: Instant::now(),
                });
                #[cfg(feature = "metrics")]
                metrics::counter!("breaker_rejected_total", "name" => self.name.clone())
                    .increment(1);
                return self.resolve(BreakerError::MaxConcurrency, fallback);
            }
        };

        let start = Instant::now();
        let cancel = cancel.unwrap_or_default();
        let wait_for_deadline = async {
            match deadline {
                Some(d) => tokio::time::sleep_until(d).await,
                None => std::future::pending().await,
            }
        };
        let outcome = tokio::select! {
            biased;
            _ = cancel.cancelled() => Outcome::Canceled,
            _ = wait_for_deadline => Outcome::DeadlineExceeded,
            _ = tokio::time::sleep(self.settings.timeout) => Outcome::TimedOut,
            res = req() => Outcome::Settled(res),
        };
        drop(_permit);
        let duration = start.elapsed();

        let state_before_report = self.circuit.state();
        match outcome {
            Outcome::Settled(Ok(value)) => {
                self.circuit.report(false);
                self.emit_transition(state_before_report);
                self.listeners.emit(&BreakerEvent::Success {
                    name: self.name.clone(),
                    duration,
                    timestamp: Instant::now(),
                });
                Ok(value)
            }
            Outcome::Settled(Err(err)) => {
                let failed = !acceptable(&err);
                self.circuit.report(failed);
                self.emit_transition(state_before_report);
                if failed {
                    self.history.add(err.to_string());
                    self.listeners.emit(&BreakerEvent::Failure {
                        name: self.name.clone(),
                        duration,
                        timestamp: Instant::now(),
                    });
                } else {
                    self.listeners.emit(&BreakerEvent::Success {
                        name: self.name.clone(),
                        duration,
                        timestamp: Instant::now(),
                    });
                }
                self.resolve(BreakerError::Application(err), fallback)
            }
            Outcome::TimedOut => {
                self.circuit.report(true);
                self.emit_transition(state_before_report);
                self.history.add("timeout");
                self.listeners.emit(&BreakerEvent::Timeout {
                    name: self.name.clone(),
                    duration,
                    timestamp: Instant::now(),
                });
                #[cfg(feature = "tracing")]
                tracing::warn!(
                    breaker = %self.name,
                    last_errors = %self.history.render(),
                    "circuit breaker call timed out"
                );
                self.resolve(BreakerError::Timeout, fallback)
            }
            Outcome::Canceled => {
                self.circuit.report(true);
                self.emit_transition(state_before_report);
                self.history.add("canceled");
                self.listeners.emit(&BreakerEvent::ContextCanceled {
                    name: self.name.clone(),
                    timestamp: Instant::now(),
                });
                self.resolve(BreakerError::Canceled, fallback)
            }
            Outcome::DeadlineExceeded => {
                self.circuit.report(true);
                self.emit_transition(state_before_report);
                self.history.add("deadline exceeded");
                self.listeners.emit(&BreakerEvent::ContextDeadlineExceeded {
                    name: self.name.clone(),
                    timestamp: Instant::now(),
                });
                self.resolve(BreakerError::DeadlineExceeded, fallback)
            }
        }
    }

    fn emit_transition(&self, before: CircuitState) {
        let after = self.circuit.state();
        if after != before {
            self.listeners.emit(&BreakerEvent::StateTransition {
                name: self.name.clone(),
                from: before,
                to: after,
                timestamp: Instant::now(),
            });
            #[cfg(feature = "tracing")]
            tracing::info!(breaker = %self.name, ?before, ?after, "circuit breaker state transition");
        }
    }

    fn resolve<FB, T, E>(
        &self,
        err: BreakerError<E>,
        fallback: Option<FB>,
    ) -> Result<T, BreakerError<E>>
    where
        FB: FnOnce(&BreakerError<E>) -> Result<T, BreakerError<E>>,
    {
        #[cfg(feature = "tracing")]
        if err.is_rejection() {
            tracing::warn!(
                breaker = %self.name,
                last_errors = %self.history.render(),
                "circuit breaker rejected call"
            );
        }

        match fallback {
            None => Err(err),
            Some(fb) => match fb(&err) {
                Ok(value) => {
                    self.listeners.emit(&BreakerEvent::FallbackSuccess {
                        name: self.name.clone(),
                        timestamp: Instant::now(),
                    });
                    Ok(value)
                }
                Err(cause) => {
                    self.listeners.emit(&BreakerEvent::FallbackFailure {
                        name: self.name.clone(),
                        timestamp: Instant::now(),
                    });
                    Err(BreakerError::FallbackFailed {
                        fallback: Box::new(cause),
                        cause: Box::new(err),
                    })
                }
            },
        }
    }
}
