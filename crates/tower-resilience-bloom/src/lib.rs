//! A probabilistic set-membership filter with a pluggable bitmap backend.
//!
//! [`Filter`] never reports a false negative — once an element has been
//! added, checking for it always returns `true` — at the cost of a tunable
//! false-positive rate governed by the bit capacity `m` and hash count `k`.
//! The bitmap itself is abstracted behind [`BitSet`], so the same [`Filter`]
//! works whether the bits live in-process ([`LocalBitSet`]) or in a shared
//! Redis bitmap ([`RedisBitSet`], behind the `redis-backend` feature),
//! mirroring how `tower-resilience-hashring`'s `HashRing` generalizes over
//! its ring store.

mod bitset;
mod error;
mod filter;
mod hash;
#[cfg(feature = "redis-backend")]
mod redis_bitset;

pub use bitset::{BitSet, LocalBitSet};
pub use error::BloomError;
pub use filter::Filter;
pub use hash::DEFAULT_HASH_COUNT;

#[cfg(feature = "redis-backend")]
pub use redis_bitset::RedisBitSet;
