use crate::bitset::{BitSet, LocalBitSet};
use crate::error::BloomError;
use crate::hash::{locations, DEFAULT_HASH_COUNT};

/// A probabilistic set-membership filter over a pluggable bit-store.
///
/// `Filter<B>` never reports a false negative: once `add(x)` returns,
/// `exists(x)` always returns `true`. It may report a false positive, at a
/// rate governed by `m` (bit capacity) and `k` (hash count) relative to the
/// number of elements added. Grounded on go-zero's `bloom.Filter`,
/// generalized over its bit-store the same way
/// `tower-resilience-hashring::HashRing` is generalized over `RingStore`.
pub struct Filter<B: BitSet = LocalBitSet> {
    m: u64,
    k: u32,
    bits: B,
}

impl Filter<LocalBitSet> {
    /// Creates an in-process filter with `m` bits and go-zero's default
    /// hash count (14).
    pub fn new(m: u64) -> Self {
        Self::with_hash_count(m, DEFAULT_HASH_COUNT)
    }

    /// Creates an in-process filter with `m` bits and an explicit hash count.
    pub fn with_hash_count(m: u64, k: u32) -> Self {
        Self {
            m,
            k,
            bits: LocalBitSet::new(m),
        }
    }
}

impl<B: BitSet> Filter<B> {
    /// Wraps an arbitrary [`BitSet`] backend (e.g. a Redis-backed one) with
    /// `m` bits and go-zero's default hash count (14).
    pub fn with_bitset(m: u64, bits: B) -> Self {
        Self::with_bitset_and_hash_count(m, DEFAULT_HASH_COUNT, bits)
    }

    /// Wraps an arbitrary [`BitSet`] backend with `m` bits and an explicit
    /// hash count.
    pub fn with_bitset_and_hash_count(m: u64, k: u32, bits: B) -> Self {
        Self { m, k, bits }
    }

    fn locations(&self, data: &[u8]) -> Vec<u64> {
        locations(data, self.m, self.k)
    }

    /// Adds `data` to the filter.
    ///
    /// Fails with [`BloomError::TooLargeOffset`] only if the bit-store's own
    /// capacity is smaller than the `m` this filter was built with — under
    /// normal construction the two always agree, since every computed
    /// offset is already `< m` by construction.
    pub async fn add(&self, data: &[u8]) -> Result<(), BloomError> {
        self.bits.set(&self.locations(data)).await
    }

    /// Returns `true` if `data` may be a member (subject to the filter's
    /// false-positive rate), `false` if it is definitely not.
    pub async fn exists(&self, data: &[u8]) -> Result<bool, BloomError> {
        self.bits.check(&self.locations(data)).await
    }
}
