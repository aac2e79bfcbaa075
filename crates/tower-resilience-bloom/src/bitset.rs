use std::sync::RwLock;

use async_trait::async_trait;

use crate::error::BloomError;

/// Storage backend for a [`crate::Filter`]'s bitmap.
///
/// Offsets are always `< m` by the time they reach a `BitSet` — `Filter`
/// validates against `m` itself so every implementation can assume its
/// offsets are in range. Grounded on go-zero's `bitSetProvider` interface
/// (`check`/`set`), generalized the way `tower-resilience-hashring`'s
/// `RingStore` generalizes over its own backend.
#[async_trait]
pub trait BitSet: Send + Sync {
    /// Sets every bit in `offsets` to 1.
    async fn set(&self, offsets: &[u64]) -> Result<(), BloomError>;

    /// Returns true iff every bit in `offsets` is set.
    ///
    /// A backend where the underlying key/bitmap doesn't exist yet returns
    /// `Ok(false)` rather than an error — "key not found" is "not present",
    /// not a failure.
    async fn check(&self, offsets: &[u64]) -> Result<bool, BloomError>;
}

/// The default in-process bitmap: a `Vec<u64>` word array guarded by a
/// single reader-preferring lock. Grounded on go-zero's local `Filter`
/// (`bitmap []uint64`), which packs 64 bits per word with `idx = offset >>
/// 6`, `bit = offset & 63`.
pub struct LocalBitSet {
    bits: u64,
    words: RwLock<Vec<u64>>,
}

impl LocalBitSet {
    /// Allocates enough 64-bit words to hold `m` bits.
    pub fn new(m: u64) -> Self {
        let word_count = (m / 64 + 1) as usize;
        Self {
            bits: m,
            words: RwLock::new(vec![0u64; word_count]),
        }
    }
}

fn word_and_bit(offset: u64) -> (usize, u32) {
    ((offset >> 6) as usize, (offset & 63) as u32)
}

#[async_trait]
impl BitSet for LocalBitSet {
    async fn set(&self, offsets: &[u64]) -> Result<(), BloomError> {
        if offsets.iter().any(|&o| o >= self.bits) {
            return Err(BloomError::TooLargeOffset);
        }
        let mut words = self.words.write().unwrap();
        for &offset in offsets {
            let (idx, bit) = word_and_bit(offset);
            words[idx] |= 1u64 << bit;
        }
        Ok(())
    }

    async fn check(&self, offsets: &[u64]) -> Result<bool, BloomError> {
        if offsets.iter().any(|&o| o >= self.bits) {
            return Err(BloomError::TooLargeOffset);
        }
        let words = self.words.read().unwrap();
        for &offset in offsets {
            let (idx, bit) = word_and_bit(offset);
            if words[idx] & (1u64 << bit) == 0 {
                return Ok(false);
            }
        }
        Ok(true)
    }
}
