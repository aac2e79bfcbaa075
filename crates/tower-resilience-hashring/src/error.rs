use thiserror::Error;

/// Errors returned by a [`crate::store::RingStore`] implementation.
///
/// The in-process store never fails; this exists for the Redis-backed store,
/// where every operation is a real network round trip.
#[derive(Debug, Error)]
pub enum HashRingError {
    /// The backing store rejected or failed to complete an operation.
    #[error("ring store error: {0}")]
    Store(String),
}
