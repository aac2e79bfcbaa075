//! A periodic batching executor for Tower services and standalone use.
//!
//! [`PeriodicalExecutor`] accepts items one at a time through [`add`] and
//! hands them to a user-supplied `execute` callback in batches, flushed
//! either when a pluggable [`TaskContainer`] reports it is full or on a fixed
//! wall-clock interval — whichever comes first. It is grounded directly on
//! go-zero's `PeriodicalExecutor`, including its "no task lost" guarantee
//! across graceful shutdown and the quiet background-drainer exit path.
//!
//! [`add`]: PeriodicalExecutor::add
//!
//! Four specializations are included, each grounded on its go-zero
//! counterpart:
//!
//! - [`BulkExecutor`] flushes once a fixed number of tasks has accumulated.
//! - [`ChunkExecutor`] flushes once the cumulative byte size of accumulated
//!   tasks (via an injected `size_of` accessor) crosses a threshold.
//! - [`DelayExecutor`] coalesces repeated triggers into a single delayed run.
//! - [`LessExecutor`] throttles a callback to at most once per interval.
//!
//! ## Example
//!
//! ```rust
//! use tower_resilience_executor::BulkExecutor;
//! use std::time::Duration;
//!
//! # async fn example() {
//! let executor = BulkExecutor::with_capacity(100, Duration::from_millis(200), |batch: Vec<u32>| {
//!     println!("flushing {} items", batch.len());
//! });
//!
//! for i in 0..250 {
//!     executor.add(i).await;
//! }
//! executor.wait().await;
//! # }
//! ```
//!
//! ## Feature Flags
//! - `tracing`: logs drainer start/exit and flush sizes.
//! - `metrics`: reports flushed-batch counters via the `metrics` crate.

mod bulk;
mod chunk;
mod config;
mod container;
mod delay;
mod events;
mod executor;
mod less;
mod waitgroup;

pub use bulk::BulkExecutor;
pub use chunk::ChunkExecutor;
pub use config::{ExecutorConfig, ExecutorConfigBuilder};
pub use container::TaskContainer;
pub use delay::DelayExecutor;
pub use events::ExecutorEvent;
pub use executor::PeriodicalExecutor;
pub use less::LessExecutor;
