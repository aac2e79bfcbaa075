//! Periodic batching executor metrics regression tests

use super::helpers::*;
use serial_test::serial;
use std::time::Duration;
use tower_resilience_executor::{ExecutorConfig, PeriodicalExecutor, TaskContainer};

struct VecContainer(Vec<u32>);

impl TaskContainer for VecContainer {
    type Task = u32;
    type Batch = Vec<u32>;

    fn add_task(&mut self, task: u32) -> bool {
        self.0.push(task);
        self.0.len() >= 5
    }

    fn remove_all(&mut self) -> Vec<u32> {
        std::mem::take(&mut self.0)
    }

    fn batch_len(batch: &Vec<u32>) -> usize {
        batch.len()
    }
}

#[tokio::test]
#[serial]
async fn a_flushed_batch_increments_the_batches_flushed_counter() {
    init_recorder();

    let config = ExecutorConfig::builder()
        .name("metrics_executor")
        .flush_interval(Duration::from_secs(60))
        .build();
    let executor = PeriodicalExecutor::with_config(config, VecContainer(Vec::new()), |_batch| {});

    for i in 0..5 {
        executor.add(i).await;
    }
    executor.wait().await;

    assert_counter_exists("executor_batches_flushed_total");
    assert_metric_has_label(
        "executor_batches_flushed_total",
        "name",
        "metrics_executor",
    );
}
