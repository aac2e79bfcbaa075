//! A fixed-capacity ring of time buckets with lazy expiration.
//!
//! [`RollingWindow`] is the building block that the adaptive throttle and the
//! bulkhead breaker's health check both sit on top of: a ring of `N` buckets,
//! each covering `interval` of wall-clock time, that approximates counts over
//! the most recent `N * interval` without ever running a background tick.
//! Expiration happens lazily, inline with the next `add` or `reduce`.

mod bucket;
mod window;

pub use bucket::Bucket;
pub use window::{RollingWindow, RollingWindowBuilder};
