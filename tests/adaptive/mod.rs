//! Comprehensive tests for tower-resilience-adaptive.
//!
//! This test suite provides coverage for the adaptive throttle:
//!
//! - **integration**: Layer/service usage and passthrough behavior
//! - **throttling**: Drop-ratio formula behavior under load
//! - **concurrency**: Concurrent callers sharing one throttle

mod concurrency;
mod integration;
mod throttling;
