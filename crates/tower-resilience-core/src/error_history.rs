//! Fixed-size ring of the most recent human-readable rejection reasons.
//!
//! Shared by the adaptive throttle and the bulkhead breaker, both of which surface
//! a short "last N reasons" diagnostic line when they trip.

use std::sync::Mutex;
use std::time::{SystemTime, UNIX_EPOCH};

const CAPACITY: usize = 5;

/// A mutex-protected ring of the last [`CAPACITY`] reasons, newest-first on render.
pub struct ErrorHistory {
    inner: Mutex<Inner>,
}

struct Inner {
    reasons: [String; CAPACITY],
    index: usize,
    count: usize,
}

impl ErrorHistory {
    /// Creates an empty history.
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Inner {
                reasons: Default::default(),
                index: 0,
                count: 0,
            }),
        }
    }

    /// Records `reason`, overwriting the oldest entry once the ring is full.
    pub fn add(&self, reason: impl AsRef<str>) {
        let mut inner = self.inner.lock().unwrap();
        let stamped = format!("{} {}", elapsed_clock_label(), reason.as_ref());
        let index = inner.index;
        inner.reasons[index] = stamped;
        inner.index = (index + 1) % CAPACITY;
        inner.count = (inner.count + 1).min(CAPACITY);
    }

    /// Renders the recorded reasons newest-first, one per line.
    pub fn render(&self) -> String {
        let inner = self.inner.lock().unwrap();
        let mut lines = Vec::with_capacity(inner.count);
        for i in 0..inner.count {
            let idx = (inner.index + CAPACITY - 1 - i) % CAPACITY;
            lines.push(inner.reasons[idx].clone());
        }
        lines.join("\n")
    }
}

impl Default for ErrorHistory {
    fn default() -> Self {
        Self::new()
    }
}

/// A coarse, dependency-free "HH:MM:SS"-ish label for diagnostic lines.
///
/// Not wall-clock accurate across process restarts; good enough for a
/// human skimming a breaker-tripped log line, which is all this is for.
fn elapsed_clock_label() -> String {
    let secs = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);
    format!(
        "{:02}:{:02}:{:02}",
        (secs / 3600) % 24,
        (secs / 60) % 60,
        secs % 60
    )
}
