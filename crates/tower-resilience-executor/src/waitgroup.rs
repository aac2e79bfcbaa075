use std::sync::Mutex;
use tokio::sync::Notify;

/// An async-aware analogue of a `sync.WaitGroup`: tracks an outstanding count
/// and wakes every waiter once it returns to zero.
pub(crate) struct WaitGroup {
    count: Mutex<i64>,
    notify: Notify,
}

impl WaitGroup {
    pub(crate) fn new() -> Self {
        Self {
            count: Mutex::new(0),
            notify: Notify::new(),
        }
    }

    pub(crate) fn add(&self, delta: i64) {
        let mut count = self.count.lock().unwrap();
        *count += delta;
    }

    pub(crate) fn done(&self) {
        let hit_zero = {
            let mut count = self.count.lock().unwrap();
            *count -= 1;
            *count == 0
        };
        if hit_zero {
            self.notify.notify_waiters();
        }
    }

    /// Waits until the count returns to zero. The `Notified` future is
    /// created before the count is checked so a `done()` racing with the
    /// check can't be missed between the check and the await point.
    pub(crate) async fn wait(&self) {
        loop {
            let notified = self.notify.notified();
            if *self.count.lock().unwrap() == 0 {
                return;
            }
            notified.await;
        }
    }
}
