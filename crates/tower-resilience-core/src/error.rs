//! Common error types for tower-resilience components.
//!
//! This module provides [`ResilienceError`], a unified error type that
//! eliminates the need for manual `From` trait implementations when
//! composing multiple resilience components behind a single service error.
//!
//! # The Problem
//!
//! When a service is guarded by more than one component (an adaptive
//! throttle in front of a bulkhead breaker, say), you typically need a
//! `From` impl per component's error type:
//!
//! ```rust,ignore
//! impl From<ThrottleError<E>> for ServiceError { /* ... */ }
//! impl From<BreakerError<E>> for ServiceError { /* ... */ }
//! ```
//!
//! # The Solution
//!
//! Use [`ResilienceError<E>`] as your service error type instead, and let
//! each component's crate provide the conversion:
//!
//! ```rust
//! use tower_resilience_core::ResilienceError;
//!
//! #[derive(Debug, Clone)]
//! enum AppError {
//!     DatabaseDown,
//!     InvalidRequest,
//! }
//!
//! impl std::fmt::Display for AppError {
//!     fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
//!         match self {
//!             AppError::DatabaseDown => write!(f, "Database down"),
//!             AppError::InvalidRequest => write!(f, "Invalid request"),
//!         }
//!     }
//! }
//!
//! impl std::error::Error for AppError {}
//!
//! type ServiceError = ResilienceError<AppError>;
//! ```
//!
//! # Pattern Matching
//!
//! ```rust
//! use tower_resilience_core::ResilienceError;
//!
//! # #[derive(Debug)]
//! # struct AppError;
//! # impl std::fmt::Display for AppError {
//! #     fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result { Ok(()) }
//! # }
//! # impl std::error::Error for AppError {}
//! fn handle_error(error: ResilienceError<AppError>) {
//!     match error {
//!         ResilienceError::Open => {
//!             eprintln!("rejected pre-execution by a throttle or breaker");
//!         }
//!         ResilienceError::MaxConcurrency => {
//!             eprintln!("token pool empty at admit time");
//!         }
//!         ResilienceError::Timeout => {
//!             eprintln!("guarded call exceeded its per-call deadline");
//!         }
//!         ResilienceError::Canceled => {
//!             eprintln!("caller-supplied cancellation token fired");
//!         }
//!         ResilienceError::DeadlineExceeded => {
//!             eprintln!("caller-supplied deadline elapsed");
//!         }
//!         ResilienceError::TooLargeOffset => {
//!             eprintln!("bloom filter offset exceeded its bit capacity");
//!         }
//!         ResilienceError::FallbackFailed { cause, .. } => {
//!             eprintln!("fallback itself failed; original cause: {}", cause);
//!         }
//!         ResilienceError::Application(app_err) => {
//!             eprintln!("application error: {}", app_err);
//!         }
//!     }
//! }
//! ```
//!
//! # Helper Methods
//!
//! ```rust
//! use tower_resilience_core::ResilienceError;
//!
//! # #[derive(Debug)]
//! # struct AppError;
//! # impl std::fmt::Display for AppError {
//! #     fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result { Ok(()) }
//! # }
//! # impl std::error::Error for AppError {}
//! # let error: ResilienceError<AppError> = ResilienceError::Timeout;
//! if error.is_timeout() {
//!     // Handle timeout from any layer
//! } else if error.is_application() {
//!     let app_error = error.application_error().unwrap();
//!     // Handle application-specific error
//! }
//! ```
//!
//! # Migration
//!
//! Existing code using manual `From` implementations continues to work.
//! New code can adopt `ResilienceError<E>` incrementally by swapping the
//! service error type and relying on the conversions each component crate
//! provides (see `tower-resilience-breaker::error` and
//! `tower-resilience-adaptive::error`).

use std::fmt;

/// A common error type that wraps every guarded-call outcome across
/// tower-resilience's components.
///
/// This allows a service to compose multiple components (e.g. an adaptive
/// throttle in front of a bulkhead breaker) without writing any error
/// conversion code of its own: each component's own error type converts into
/// the matching `ResilienceError` variant via a `From` impl provided by that
/// component's crate.
///
/// # Type Parameters
///
/// - `E`: The application-specific error type from the wrapped service
///
/// # Examples
///
/// ```
/// use tower_resilience_core::ResilienceError;
///
/// #[derive(Debug)]
/// enum AppError {
///     Network(String),
///     InvalidData,
/// }
///
/// impl std::fmt::Display for AppError {
///     fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
///         match self {
///             AppError::Network(msg) => write!(f, "Network: {}", msg),
///             AppError::InvalidData => write!(f, "Invalid data"),
///         }
///     }
/// }
///
/// impl std::error::Error for AppError {}
///
/// type ServiceError = ResilienceError<AppError>;
///
/// fn handle_error(err: ServiceError) {
///     match err {
///         ResilienceError::Open => {
///             println!("rejected pre-execution");
///         }
///         ResilienceError::Application(app_err) => {
///             println!("Application error: {}", app_err);
///         }
///         _ => println!("Other resilience error"),
///     }
/// }
/// ```
#[derive(Debug, Clone)]
pub enum ResilienceError<E> {
    /// The adaptive throttle or bulkhead breaker rejected the call
    /// pre-execution, without running the guarded function.
    Open,

    /// The token pool was empty at admit time.
    MaxConcurrency,

    /// The guarded function exceeded its per-call deadline.
    Timeout,

    /// An externally supplied [`tokio_util::sync::CancellationToken`] fired
    /// before the call settled.
    ///
    /// Distinct from [`ResilienceError::DeadlineExceeded`]: this is explicit
    /// caller cancellation, not an elapsed deadline.
    Canceled,

    /// An externally supplied deadline elapsed before the call settled.
    DeadlineExceeded,

    /// A Bloom filter offset computed from the hashed element exceeded the
    /// bit-store's capacity `m`.
    TooLargeOffset,

    /// A fallback was invoked after the primary call failed, and the
    /// fallback itself failed. The original cause is preserved.
    FallbackFailed {
        /// The fallback's own failure.
        fallback: Box<ResilienceError<E>>,
        /// The original failure that triggered the fallback.
        cause: Box<ResilienceError<E>>,
    },

    /// The guarded function returned an error the `Acceptable` predicate
    /// rejected, or any other application-level failure.
    Application(E),
}

impl<E> fmt::Display for ResilienceError<E>
where
    E: fmt::Display,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResilienceError::Open => write!(f, "rejected: open"),
            ResilienceError::MaxConcurrency => write!(f, "max concurrency reached"),
            ResilienceError::Timeout => write!(f, "timeout"),
            ResilienceError::Canceled => write!(f, "canceled"),
            ResilienceError::DeadlineExceeded => write!(f, "deadline exceeded"),
            ResilienceError::TooLargeOffset => write!(f, "offset exceeds bit capacity"),
            ResilienceError::FallbackFailed { fallback, cause } => write!(
                f,
                "fallback failed: {} (original cause: {})",
                fallback, cause
            ),
            ResilienceError::Application(e) => write!(f, "application error: {}", e),
        }
    }
}

impl<E> std::error::Error for ResilienceError<E> where E: std::error::Error {}

// From implementations for each component's own error type are provided by
// that component's crate (tower-resilience-breaker, tower-resilience-adaptive)
// to avoid circular dependencies.

impl<E> ResilienceError<E> {
    /// Returns `true` if the call was rejected pre-execution.
    pub fn is_open(&self) -> bool {
        matches!(self, ResilienceError::Open)
    }

    /// Returns `true` if this is a timeout error.
    pub fn is_timeout(&self) -> bool {
        matches!(self, ResilienceError::Timeout)
    }

    /// Returns `true` if this is a max-concurrency rejection.
    pub fn is_max_concurrency(&self) -> bool {
        matches!(self, ResilienceError::MaxConcurrency)
    }

    /// Returns `true` if an external cancellation token fired.
    pub fn is_canceled(&self) -> bool {
        matches!(self, ResilienceError::Canceled)
    }

    /// Returns `true` if an external deadline elapsed.
    pub fn is_deadline_exceeded(&self) -> bool {
        matches!(self, ResilienceError::DeadlineExceeded)
    }

    /// Returns `true` if this is an application error.
    pub fn is_application(&self) -> bool {
        matches!(self, ResilienceError::Application(_))
    }

    /// Extracts the application error, if this is an `Application` variant.
    pub fn application_error(self) -> Option<E> {
        match self {
            ResilienceError::Application(e) => Some(e),
            _ => None,
        }
    }

    /// Maps the application error using a function.
    ///
    /// # Examples
    ///
    /// ```
    /// use tower_resilience_core::ResilienceError;
    ///
    /// let err: ResilienceError<String> = ResilienceError::Application("error".to_string());
    /// let mapped: ResilienceError<usize> = err.map_application(|s| s.len());
    /// assert_eq!(mapped.application_error(), Some(5));
    /// ```
    pub fn map_application<F, T>(self, f: F) -> ResilienceError<T>
    where
        F: FnOnce(E) -> T,
    {
        match self {
            ResilienceError::Open => ResilienceError::Open,
            ResilienceError::MaxConcurrency => ResilienceError::MaxConcurrency,
            ResilienceError::Timeout => ResilienceError::Timeout,
            ResilienceError::Canceled => ResilienceError::Canceled,
            ResilienceError::DeadlineExceeded => ResilienceError::DeadlineExceeded,
            ResilienceError::TooLargeOffset => ResilienceError::TooLargeOffset,
            ResilienceError::FallbackFailed { fallback, cause } => ResilienceError::FallbackFailed {
                fallback: Box::new(fallback.map_application(&f)),
                cause: Box::new(cause.map_application(f)),
            },
            ResilienceError::Application(e) => ResilienceError::Application(f(e)),
        }
    }
}
