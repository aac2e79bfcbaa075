use thiserror::Error;
use tower_resilience_core::ResilienceError;

/// Errors returned by a [`crate::Breaker`]-guarded call.
#[derive(Debug, Error)]
pub enum BreakerError<E> {
    /// The circuit was open and this call was not the single test allowed through.
    #[error("circuit breaker is open")]
    CircuitOpen,

    /// The token pool had no free slot at admit time.
    #[error("circuit breaker at max concurrency")]
    MaxConcurrency,

    /// The guarded call did not settle within `Settings::timeout`.
    #[error("circuit breaker call timed out")]
    Timeout,

    /// The caller's cancellation token fired before the call settled.
    #[error("circuit breaker call was canceled")]
    Canceled,

    /// A caller-provided deadline elapsed before the call settled.
    #[error("circuit breaker call exceeded its deadline")]
    DeadlineExceeded,

    /// A fallback was invoked but itself failed; `cause` is the error that triggered it.
    #[error("fallback failed: {fallback}; original cause: {cause}")]
    FallbackFailed {
        fallback: Box<BreakerError<E>>,
        cause: Box<BreakerError<E>>,
    },

    /// An error returned by the inner service, rejected by the `Acceptable` predicate.
    #[error("inner service error: {0}")]
    Application(E),
}

impl<E> BreakerError<E> {
    /// True for any rejection that never ran the guarded function.
    pub fn is_rejection(&self) -> bool {
        matches!(
            self,
            BreakerError::CircuitOpen | BreakerError::MaxConcurrency
        )
    }

    /// Returns the application error, if present.
    pub fn into_application(self) -> Option<E> {
        match self {
            BreakerError::Application(e) => Some(e),
            _ => None,
        }
    }
}

impl<E> From<BreakerError<E>> for ResilienceError<E> {
    fn from(err: BreakerError<E>) -> Self {
        match err {
            BreakerError::CircuitOpen => ResilienceError::Open,
            BreakerError::MaxConcurrency => ResilienceError::MaxConcurrency,
            BreakerError::Timeout => ResilienceError::Timeout,
            BreakerError::Canceled => ResilienceError::Canceled,
            BreakerError::DeadlineExceeded => ResilienceError::DeadlineExceeded,
            BreakerError::FallbackFailed { fallback, cause } => ResilienceError::FallbackFailed {
                fallback: Box::new((*fallback).into()),
                cause: Box::new((*cause).into()),
            },
            BreakerError::Application(e) => ResilienceError::Application(e),
        }
    }
}
