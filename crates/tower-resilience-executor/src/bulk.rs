use std::time::Duration;

use crate::config::ExecutorConfig;
use crate::container::TaskContainer;
use crate::executor::PeriodicalExecutor;

/// go-zero's `bulkContainer` default: flush after 1000 accumulated tasks.
const DEFAULT_MAX_TASKS: usize = 1000;
/// go-zero's `bulkContainer` default flush interval.
const DEFAULT_FLUSH_INTERVAL: Duration = Duration::from_secs(1);

struct BulkContainer<T: Send + 'static> {
    tasks: Vec<T>,
    max_tasks: usize,
}

impl<T: Send + 'static> TaskContainer for BulkContainer<T> {
    type Task = T;
    type Batch = Vec<T>;

    fn add_task(&mut self, task: T) -> bool {
        self.tasks.push(task);
        self.tasks.len() >= self.max_tasks
    }

    fn remove_all(&mut self) -> Vec<T> {
        std::mem::take(&mut self.tasks)
    }

    fn batch_len(batch: &Vec<T>) -> usize {
        batch.len()
    }
}

/// A [`PeriodicalExecutor`] specialized to flush once `cachedTasks` items
/// have accumulated, or on the flush interval, whichever comes first.
pub struct BulkExecutor<T: Send + 'static> {
    inner: PeriodicalExecutor<BulkContainer<T>>,
}

impl<T: Send + 'static> BulkExecutor<T> {
    /// Builds a bulk executor with go-zero's defaults: 1000 cached tasks, 1s
    /// flush interval.
    pub fn new<F>(execute: F) -> Self
    where
        F: Fn(Vec<T>) + Send + Sync + 'static,
    {
        Self::with_capacity(DEFAULT_MAX_TASKS, DEFAULT_FLUSH_INTERVAL, execute)
    }

    /// Builds a bulk executor that flushes at `cached_tasks` items or every
    /// `flush_interval`, whichever comes first.
    pub fn with_capacity<F>(cached_tasks: usize, flush_interval: Duration, execute: F) -> Self
    where
        F: Fn(Vec<T>) + Send + Sync + 'static,
    {
        let container = BulkContainer {
            tasks: Vec::new(),
            max_tasks: cached_tasks,
        };
        let config = ExecutorConfig::builder()
            .flush_interval(flush_interval)
            .build();
        Self {
            inner: PeriodicalExecutor::with_config(config, container, execute),
        }
    }

    /// Adds one task.
    pub async fn add(&self, task: T) {
        self.inner.add(task).await;
    }

    /// Flushes whatever has accumulated so far, without waiting for the interval.
    pub fn flush(&self) -> bool {
        self.inner.flush()
    }

    /// Flushes, then waits for every outstanding `execute` to complete.
    pub async fn wait(&self) {
        self.inner.wait().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[tokio::test]
    async fn no_task_lost_with_single_item_batches_and_a_tight_interval() {
        let executed = Arc::new(AtomicUsize::new(0));
        let executed_clone = Arc::clone(&executed);

        let executor = BulkExecutor::with_capacity(1, Duration::from_millis(1), move |batch| {
            executed_clone.fetch_add(batch.len(), Ordering::SeqCst);
        });

        for i in 0..100_000u32 {
            executor.add(i).await;
        }
        executor.wait().await;

        assert_eq!(executed.load(Ordering::SeqCst), 100_000);
    }
}
