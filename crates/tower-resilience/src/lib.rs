//! Composable resilience and fault-tolerance middleware for Tower services.
//!
//! `tower-resilience` collects six independent components, each shipped as
//! its own crate and re-exported here behind a matching feature flag.
//!
//! # Quick Start
//!
//! ```toml
//! [dependencies]
//! tower-resilience = { version = "0.8", features = ["breaker", "adaptive"] }
//! ```
//!
//! # Components
//!
//! - **[Rolling Window]** - lazy-expiring time-bucketed counter shared by the
//!   throttle and breaker
//! - **[Adaptive Throttle]** - Google SRE-style client-side probabilistic drop
//! - **[Bulkhead Breaker]** - token-limited, timeout-bounded circuit breaker
//!   (hystrix-style)
//! - **[Periodic Batching Executor]** - background batching/chunking/delayed
//!   execution, grounded on go-zero's `PeriodicalExecutor`
//! - **[Consistent Hash Ring]** - weighted consistent hashing with a
//!   pluggable storage backend
//! - **[Bloom Filter]** - probabilistic set-membership filter with a
//!   pluggable bit-store
//!
//! [Rolling Window]: #rolling-window
//! [Adaptive Throttle]: #adaptive-throttle
//! [Bulkhead Breaker]: #bulkhead-breaker
//! [Periodic Batching Executor]: #periodic-batching-executor
//! [Consistent Hash Ring]: #consistent-hash-ring
//! [Bloom Filter]: #bloom-filter
//!
//! # Rolling Window
//!
//! A grid-aligned sliding window over fixed-size time buckets, lazily
//! expiring stale buckets as new observations arrive rather than on a timer.
//! Feeds both [`adaptive`]'s drop-ratio estimate and [`breaker`]'s health
//! check.
//!
//! ```rust,no_run
//! # #[cfg(feature = "window")]
//! # {
//! use tower_resilience::window::RollingWindow;
//! use std::time::Duration;
//!
//! let window = RollingWindow::builder()
//!     .buckets(10)
//!     .interval(Duration::from_millis(500))
//!     .build();
//! window.add(1.0);
//! let (sum, count) = window.stats();
//! # }
//! ```
//!
//! # Adaptive Throttle
//!
//! Tracks total requests and accepted requests in a rolling window and
//! probabilistically rejects calls once the accept rate drops below a
//! configured multiple of recent successes, per Google's SRE handbook.
//!
//! ### When to Use
//!
//! - **Client-side self-protection**: shed load before a downstream collapses
//! - **No fixed rate limit available**: the throttle adapts to the service's
//!   own recent success rate instead of a static quota
//!
//! ### Example
//!
//! ```rust,no_run
//! # #[cfg(feature = "adaptive")]
//! # {
//! use tower::ServiceBuilder;
//! use tower_resilience::adaptive::ThrottleLayer;
//!
//! # async fn example() {
//! # let backend = tower::service_fn(|_req: ()| async { Ok::<_, std::io::Error>(()) });
//! let layer = ThrottleLayer::builder().name("downstream").build_layer();
//! let service = ServiceBuilder::new().layer(layer).service(backend);
//! # }
//! # }
//! ```
//!
//! # Bulkhead Breaker
//!
//! Combines a semaphore-backed concurrency bulkhead with a hystrix-style
//! circuit breaker: a token pool bounds concurrent calls, a per-call timeout
//! bounds latency, and sustained failures trip the breaker open until a
//! single test call is admitted after the sleep window.
//!
//! ### Example
//!
//! ```rust,no_run
//! # #[cfg(feature = "breaker")]
//! # {
//! use tower::ServiceBuilder;
//! use tower_resilience::breaker::BreakerLayer;
//!
//! # async fn example() {
//! # let database_client = tower::service_fn(|_req: ()| async { Ok::<_, std::io::Error>(()) });
//! let layer = BreakerLayer::builder().name("database").build_layer();
//! let service = ServiceBuilder::new().layer(layer).service(database_client);
//! # }
//! # }
//! ```
//!
//! # Periodic Batching Executor
//!
//! Accumulates work behind a single-slot handoff channel and flushes it
//! either once a batch threshold is reached or a flush interval elapses,
//! whichever comes first, idling down after a run of empty intervals.
//! Grounded on go-zero's `PeriodicalExecutor` and its `Bulk`/`Chunk`/`Less`/
//! `Delay` specializations.
//!
//! ```rust,no_run
//! # #[cfg(feature = "executor")]
//! # {
//! use tower_resilience::executor::BulkExecutor;
//! use std::time::Duration;
//!
//! # async fn example() {
//! let executor = BulkExecutor::with_capacity(100, Duration::from_millis(200), |batch: Vec<u32>| {
//!     println!("flushing {} items", batch.len());
//! });
//! executor.add(1).await;
//! executor.wait().await;
//! # }
//! # }
//! ```
//!
//! # Consistent Hash Ring
//!
//! Weighted consistent hashing over virtual nodes, generic over a pluggable
//! [`RingStore`](tower_resilience_hashring::RingStore) so the same ring type
//! serves an in-process cache or a Redis-backed fleet-wide ring.
//!
//! ```rust,no_run
//! # #[cfg(feature = "hashring")]
//! # {
//! use tower_resilience::hashring::{HashRing, LocalRingStore};
//!
//! # async fn example() {
//! let ring = HashRing::new(LocalRingStore::new());
//! ring.add("node-a".to_string()).await.unwrap();
//! let owner = ring.get("some-key").await.unwrap();
//! # }
//! # }
//! ```
//!
//! # Bloom Filter
//!
//! A probabilistic set-membership filter that never reports a false
//! negative, generic over a pluggable
//! [`BitSet`](tower_resilience_bloom::BitSet) backend.
//!
//! ```rust,no_run
//! # #[cfg(feature = "bloom")]
//! # {
//! use tower_resilience::bloom::Filter;
//!
//! # async fn example() {
//! let filter = Filter::new(10_000);
//! filter.add(b"some-element").await.unwrap();
//! assert!(filter.exists(b"some-element").await.unwrap());
//! # }
//! # }
//! ```
//!
//! # Composing Errors
//!
//! Each component's own error type (`ThrottleError<E>`, `BreakerError<E>`)
//! converts into the shared [`core::ResilienceError<E>`] via `From`, so a
//! service stacking multiple components can settle on one error type without
//! writing its own conversions:
//!
//! ```rust,no_run
//! # #[cfg(feature = "breaker")]
//! # {
//! use tower_resilience::core::ResilienceError;
//! use tower_resilience::breaker::BreakerError;
//!
//! fn convert(err: BreakerError<std::io::Error>) -> ResilienceError<std::io::Error> {
//!     err.into()
//! }
//! # }
//! ```

// Re-export core (always available)
pub use tower_resilience_core as core;

// Re-export components based on features
#[cfg(feature = "adaptive")]
pub use tower_resilience_adaptive as adaptive;

#[cfg(feature = "bloom")]
pub use tower_resilience_bloom as bloom;

#[cfg(feature = "breaker")]
pub use tower_resilience_breaker as breaker;

#[cfg(feature = "executor")]
pub use tower_resilience_executor as executor;

#[cfg(feature = "hashring")]
pub use tower_resilience_hashring as hashring;

#[cfg(feature = "window")]
pub use tower_resilience_window as window;
