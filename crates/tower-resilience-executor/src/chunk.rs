use std::sync::Arc;
use std::time::Duration;

use crate::config::ExecutorConfig;
use crate::container::TaskContainer;
use crate::executor::PeriodicalExecutor;

/// go-zero's `chunkContainer` default chunk size: 1 MiB.
const DEFAULT_CHUNK_SIZE: usize = 1 << 20;
const DEFAULT_FLUSH_INTERVAL: Duration = Duration::from_secs(1);

struct ChunkContainer<T: Send + 'static> {
    tasks: Vec<T>,
    size: usize,
    max_chunk_size: usize,
    size_of: Arc<dyn Fn(&T) -> usize + Send + Sync>,
}

impl<T: Send + 'static> TaskContainer for ChunkContainer<T> {
    type Task = T;
    type Batch = Vec<T>;

    fn add_task(&mut self, task: T) -> bool {
        self.size += (self.size_of)(&task);
        self.tasks.push(task);
        self.size >= self.max_chunk_size
    }

    fn remove_all(&mut self) -> Vec<T> {
        self.size = 0;
        std::mem::take(&mut self.tasks)
    }

    fn batch_len(batch: &Vec<T>) -> usize {
        batch.len()
    }
}

/// A [`PeriodicalExecutor`] specialized to flush once the cumulative byte
/// size of accumulated tasks reaches `chunk_size`, using an injected
/// `size_of` accessor since Rust has no uniform "size of an `interface{}`"
/// operation the way go-zero's `chunkContainer` does.
pub struct ChunkExecutor<T: Send + 'static> {
    inner: PeriodicalExecutor<ChunkContainer<T>>,
}

impl<T: Send + 'static> ChunkExecutor<T> {
    /// Builds a chunk executor with go-zero's defaults: 1 MiB chunk size, 1s
    /// flush interval.
    pub fn new<S, F>(size_of: S, execute: F) -> Self
    where
        S: Fn(&T) -> usize + Send + Sync + 'static,
        F: Fn(Vec<T>) + Send + Sync + 'static,
    {
        Self::with_chunk_size(DEFAULT_CHUNK_SIZE, DEFAULT_FLUSH_INTERVAL, size_of, execute)
    }

    /// Builds a chunk executor that flushes once accumulated `size_of` bytes
    /// reach `chunk_size`, or every `flush_interval`, whichever comes first.
    pub fn with_chunk_size<S, F>(
        chunk_size: usize,
        flush_interval: Duration,
        size_of: S,
        execute: F,
    ) -> Self
    where
        S: Fn(&T) -> usize + Send + Sync + 'static,
        F: Fn(Vec<T>) + Send + Sync + 'static,
    {
        let container = ChunkContainer {
            tasks: Vec::new(),
            size: 0,
            max_chunk_size: chunk_size,
            size_of: Arc::new(size_of),
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
