use crate::bucket::Bucket;
use std::sync::RwLock;
use std::time::{Duration, Instant};

/// A fixed ring of `N` time buckets covering the most recent `N * interval` horizon.
///
/// Expiration is lazy: no background task ever runs. Every `add` and `reduce`
/// recomputes how many buckets have gone stale since the last write and clears
/// them in place before touching the live bucket. This keeps the amortized cost
/// of a write at O(1) regardless of how long the window has been idle.
pub struct RollingWindow {
    created_at: Instant,
    interval: Duration,
    size: usize,
    ignore_current: bool,
    inner: RwLock<Inner>,
}

struct Inner {
    buckets: Vec<Bucket>,
    offset: usize,
    last_time: Duration,
}

/// Builder for [`RollingWindow`].
pub struct RollingWindowBuilder {
    size: usize,
    interval: Duration,
    ignore_current: bool,
}

impl RollingWindow {
    /// Creates a new window of `size` buckets, each spanning `interval`.
    ///
    /// Equivalent to `RollingWindow::builder().buckets(size).interval(interval).build()`.
    pub fn new(size: usize, interval: Duration) -> Self {
        Self::builder().buckets(size).interval(interval).build()
    }

    /// Starts building a window with the go-zero defaults: 40 buckets of 250ms (10s total).
    pub fn builder() -> RollingWindowBuilder {
        RollingWindowBuilder::default()
    }

    /// Accumulates `v` into the current bucket, first rolling forward any buckets
    /// that have expired since the last write.
    pub fn add(&self, v: f64) {
        let now = self.created_at.elapsed();
        let mut inner = self.inner.write().unwrap();
        self.update_offset(&mut inner, now);
        let offset = inner.offset;
        inner.buckets[offset].add(v);
    }

    /// Applies `f` to every non-expired bucket, oldest first, without mutating state.
    pub fn reduce<F>(&self, mut f: F)
    where
        F: FnMut(&Bucket),
    {
        let now = self.created_at.elapsed();
        let inner = self.inner.read().unwrap();
        let span = self.span(inner.last_time, now);

        let count = if span == 0 && self.ignore_current {
            self.size - 1
        } else {
            self.size.saturating_sub(span)
        };

        if count > 0 {
            let start = (inner.offset + span + 1) % self.size;
            for i in 0..count {
                f(&inner.buckets[(start + i) % self.size]);
            }
        }
    }

    /// Sum of all non-expired buckets, as computed by `reduce`.
    pub fn sum(&self) -> f64 {
        let mut total = 0.0;
        self.reduce(|b| total += b.sum());
        total
    }

    /// Count of all writes across non-expired buckets, as computed by `reduce`.
    pub fn count(&self) -> i64 {
        let mut total = 0;
        self.reduce(|b| total += b.count());
        total
    }

    /// Clears every bucket and rewinds the offset, as if the window had just
    /// been created. Used by callers (e.g. a circuit breaker closing) that need
    /// to discard historical counts without rebuilding the window.
    pub fn reset(&self) {
        let mut inner = self.inner.write().unwrap();
        for bucket in inner.buckets.iter_mut() {
            bucket.reset();
        }
        inner.offset = 0;
        inner.last_time = Duration::ZERO;
    }

    /// `(sum, count)` across non-expired buckets, computed in a single `reduce`
    /// pass so both figures reflect the same snapshot rather than two racing reads.
    pub fn stats(&self) -> (f64, i64) {
        let mut sum = 0.0;
        let mut count = 0;
        self.reduce(|b| {
            sum += b.sum();
            count += b.count();
        });
        (sum, count)
    }

    /// Number of buckets that have gone stale since `last_time`, clamped to `size`.
    fn span(&self, last_time: Duration, now: Duration) -> usize {
        let elapsed = now.saturating_sub(last_time);
        let offset = (elapsed.as_nanos() / self.interval.as_nanos().max(1)) as usize;
        if offset < self.size {
            offset
        } else {
            self.size
        }
    }

    fn update_offset(&self, inner: &mut Inner, now: Duration) {
        let span = self.span(inner.last_time, now);
        if span == 0 {
            return;
        }

        let offset = inner.offset;
        for i in 0..span {
            inner.buckets[(offset + i + 1) % self.size].reset();
        }
        inner.offset = (offset + span) % self.size;

        let elapsed = now.saturating_sub(inner.last_time);
        let remainder = Duration::from_nanos(
            (elapsed.as_nanos() % self.interval.as_nanos().max(1)) as u64,
        );
        inner.last_time = now.saturating_sub(remainder);

        #[cfg(feature = "tracing")]
        tracing::debug!(span, offset = inner.offset, "rolling window advanced");
    }
}

impl RollingWindowBuilder {
    /// Number of buckets in the ring.
    pub fn buckets(mut self, size: usize) -> Self {
        assert!(size > 0, "rolling window must have at least one bucket");
        self.size = size;
        self
    }

    /// Duration each bucket spans.
    pub fn interval(mut self, interval: Duration) -> Self {
        assert!(
            !interval.is_zero(),
            "rolling window bucket interval must be non-zero"
        );
        self.interval = interval;
        self
    }

    /// When set, `reduce` excludes the currently-live bucket (which may still
    /// receive writes) from its iteration, matching go-zero's `ignoreCurrentBucket`
    /// option used by callers who want only fully-settled buckets.
    pub fn ignore_current(mut self, ignore: bool) -> Self {
        self.ignore_current = ignore;
        self
    }

    /// Builds the window.
    pub fn build(self) -> RollingWindow {
        RollingWindow {
            created_at: Instant::now(),
            interval: self.interval,
            size: self.size,
            ignore_current: self.ignore_current,
            inner: RwLock::new(Inner {
                buckets: vec![Bucket::new(); self.size],
                offset: 0,
                last_time: Duration::ZERO,
            }),
        }
    }
}

impl Default for RollingWindowBuilder {
    fn default() -> Self {
        Self {
            size: 40,
            interval: Duration::from_millis(250),
            ignore_current: false,
        }
    }
}
