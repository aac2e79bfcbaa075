use thiserror::Error;

/// Errors returned by a [`crate::BitSet`] implementation or [`crate::Filter`].
#[derive(Debug, Error)]
pub enum BloomError {
    /// A computed bit offset was `>= m`, the filter's bit capacity.
    #[error("too large offset")]
    TooLargeOffset,
    /// The backing bit-store rejected or failed to complete an operation.
    #[error("bit store error: {0}")]
    Store(String),
}
