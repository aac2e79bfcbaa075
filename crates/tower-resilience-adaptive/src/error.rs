use thiserror::Error;
use tower_resilience_core::ResilienceError;

/// Errors returned by the adaptive throttle.
#[derive(Debug, Error)]
pub enum ThrottleError<E> {
    /// The throttle probabilistically rejected the call before it ran.
    #[error("throttle is open; call dropped")]
    Open,

    /// A fallback was invoked after rejection or failure, but the fallback itself failed.
    #[error("fallback failed: {fallback}; original cause: {cause}")]
    FallbackFailed {
        /// The error returned by the fallback.
        fallback: Box<ThrottleError<E>>,
        /// The error that triggered the fallback in the first place.
        cause: Box<ThrottleError<E>>,
    },

    /// An error returned by the inner service.
    #[error("inner service error: {0}")]
    Application(E),
}

impl<E> ThrottleError<E> {
    /// Returns true if the throttle rejected the call outright.
    pub fn is_open(&self) -> bool {
        matches!(self, ThrottleError::Open)
    }

    /// Returns the application error, if present.
    pub fn into_application(self) -> Option<E> {
        match self {
            ThrottleError::Application(e) => Some(e),
            _ => None,
        }
    }
}

impl<E> From<E> for ThrottleError<E> {
    fn from(err: E) -> Self {
        ThrottleError::Application(err)
    }
}

impl<E> From<ThrottleError<E>> for ResilienceError<E> {
    fn from(err: ThrottleError<E>) -> Self {
        match err {
            ThrottleError::Open => ResilienceError::Open,
            ThrottleError::FallbackFailed { fallback, cause } => ResilienceError::FallbackFailed {
                fallback: Box::new((*fallback).into()),
                cause: Box::new((*cause).into()),
            },
            ThrottleError::Application(e) => ResilienceError::Application(e),
        }
    }
}
