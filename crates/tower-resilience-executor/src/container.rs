/// A container that decides when a batch of accumulated tasks is ready to
/// flush.
///
/// Implementors only manage accumulation and draining; the decision of *when*
/// to call [`TaskContainer::remove_all`] and what to do with the result is
/// owned by [`crate::PeriodicalExecutor`].
pub trait TaskContainer: Send + 'static {
    /// A single item passed to [`TaskContainer::add_task`].
    type Task: Send + 'static;
    /// The drained accumulation, passed to the executor's `execute` callback.
    type Batch: Send + 'static;

    /// Adds one task to the container. Returns `true` if the container has
    /// reached its flush condition (size threshold, byte budget, ...) and
    /// should be drained immediately.
    fn add_task(&mut self, task: Self::Task) -> bool;

    /// Drains and returns every accumulated task, resetting the container to
    /// empty.
    fn remove_all(&mut self) -> Self::Batch;

    /// Number of tasks represented by a batch. Used to skip `execute` calls
    /// on an empty batch.
    fn batch_len(batch: &Self::Batch) -> usize;
}
