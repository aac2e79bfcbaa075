//! Property-based tests for tower-resilience patterns.
//!
//! Run with: cargo test --test property_tests
//!
//! These tests use proptest to generate random inputs and verify that
//! invariants hold across all patterns.

pub mod adaptive;
pub mod bloom;
pub mod hashring;
pub mod window;
