use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Instant;

use tokio::sync::{mpsc, oneshot};
use tokio::time::MissedTickBehavior;

use tower_resilience_core::EventListeners;

use crate::config::ExecutorConfig;
use crate::container::TaskContainer;
use crate::events::ExecutorEvent;
use crate::waitgroup::WaitGroup;

/// Number of consecutive idle ticks the background drainer tolerates before
/// exiting, matching go-zero's `idleRound`.
const IDLE_ROUND: u32 = 10;

type Handoff<C> = (<C as TaskContainer>::Batch, oneshot::Sender<()>);

struct Guarded<C: TaskContainer> {
    container: C,
    guarded: bool,
    commander_rx: Option<mpsc::Receiver<Handoff<C>>>,
}

struct Inner<C: TaskContainer> {
    name: String,
    interval: std::time::Duration,
    guarded: Mutex<Guarded<C>>,
    commander_tx: mpsc::Sender<Handoff<C>>,
    wait_group: WaitGroup,
    inflight: AtomicI64,
    execute: Box<dyn Fn(C::Batch) + Send + Sync>,
    listeners: EventListeners<ExecutorEvent>,
}

/// A batching executor that accepts items one at a time and hands them to a
/// user-supplied `execute` callback in batches, flushed either when the
/// container reports it is full or on a fixed wall-clock interval.
///
/// Grounded directly on go-zero's `PeriodicalExecutor`: a single-slot handoff
/// channel carries a ready batch to a background drainer task; a rendezvous
/// (here, a per-call [`oneshot`] channel rather than go-zero's shared
/// `confirmChan`) lets [`PeriodicalExecutor::add`] block until the drainer has
/// registered the batch with the waitgroup, so [`PeriodicalExecutor::wait`]
/// never returns before every batch whose intake preceded the call has
/// completed `execute`.
pub struct PeriodicalExecutor<C: TaskContainer> {
    inner: Arc<Inner<C>>,
}

impl<C: TaskContainer> Clone for PeriodicalExecutor<C> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<C: TaskContainer> PeriodicalExecutor<C> {
    /// Builds an executor around `container`, flushing at the default
    /// 1-second interval.
    pub fn new<F>(container: C, execute: F) -> Self
    where
        F: Fn(C::Batch) + Send + Sync + 'static,
    {
        Self::with_config(ExecutorConfig::builder().build(), container, execute)
    }

    /// Builds an executor around `container` using an explicit [`ExecutorConfig`].
    pub fn with_config<F>(config: ExecutorConfig, container: C, execute: F) -> Self
    where
        F: Fn(C::Batch) + Send + Sync + 'static,
    {
        let (commander_tx, commander_rx) = mpsc::channel(1);
        let inner = Arc::new(Inner {
            name: config.name,
            interval: config.flush_interval,
            guarded: Mutex::new(Guarded {
                container,
                guarded: false,
                commander_rx: Some(commander_rx),
            }),
            commander_tx,
            wait_group: WaitGroup::new(),
            inflight: AtomicI64::new(0),
            execute: Box::new(execute),
            listeners: config.event_listeners,
        });
        Self { inner }
    }

    /// Adds one item. Returns once the container has accepted it and, if
    /// accepting it triggered a flush, once the background drainer has taken
    /// ownership of the resulting batch.
    ///
    /// Sending a ready batch into the single-slot handoff channel blocks
    /// while a prior batch is still in flight, giving natural backpressure.
    pub async fn add(&self, task: C::Task) {
        let (batch, commander_rx) = {
            let mut guarded = self.inner.guarded.lock().unwrap();
            let should_flush = guarded.container.add_task(task);
            if !should_flush {
                (None, None)
            } else {
                self.inner.inflight.fetch_add(1, Ordering::SeqCst);
                let batch = guarded.container.remove_all();
                let commander_rx = if !guarded.guarded {
                    guarded.guarded = true;
                    guarded.commander_rx.take()
                } else {
                    None
                };
                (Some(batch), commander_rx)
            }
        };

        if let Some(commander_rx) = commander_rx {
            self.spawn_drainer(commander_rx);
        }

        if let Some(batch) = batch {
            let (confirm_tx, confirm_rx) = oneshot::channel();
            // Blocks if the previous batch hasn't been picked up yet.
            if self.inner.commander_tx.send((batch, confirm_tx)).await.is_ok() {
                let _ = confirm_rx.await;
            }
        }
    }

    /// Drains the container directly and, if the drained batch was
    /// non-empty, runs `execute` inline. Returns whether a batch was
    /// executed.
    pub fn flush(&self) -> bool {
        self.inner.flush()
    }

    /// Flushes any remaining items, then suspends until every batch whose
    /// intake preceded this call has completed `execute`.
    pub async fn wait(&self) {
        self.flush();
        self.inner.wait_group.wait().await;
    }

    fn spawn_drainer(&self, commander_rx: mpsc::Receiver<Handoff<C>>) {
        let inner = Arc::clone(&self.inner);
        tokio::spawn(run_drainer(inner, commander_rx));
    }
}

impl<C: TaskContainer> Inner<C> {
    fn flush(&self) -> bool {
        let batch = {
            let mut guarded = self.guarded.lock().unwrap();
            guarded.container.remove_all()
        };
        let len = C::batch_len(&batch);
        if len == 0 {
            return false;
        }
        self.wait_group.add(1);
        (self.execute)(batch);
        self.wait_group.done();

        #[cfg(feature = "tracing")]
        tracing::debug!(executor = %self.name, size = len, "flushed batch");
        #[cfg(feature = "metrics")]
        metrics::counter!("executor_batches_flushed_total", "name" => self.name.clone())
            .increment(1);

        self.listeners.emit(&ExecutorEvent::BatchFlushed {
            name: self.name.clone(),
            size: len,
            timestamp: Instant::now(),
        });
        true
    }
}

/// The background drainer loop. Runs until the idle-timeout condition fires,
/// then performs one last flush (matching go-zero's `defer` finalizer) before
/// handing the receiver back so a later `add()` can restart it.
async fn run_drainer<C: TaskContainer>(
    inner: Arc<Inner<C>>,
    mut commander_rx: mpsc::Receiver<Handoff<C>>,
) {
    let mut ticker = tokio::time::interval(inner.interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    ticker.tick().await; // first tick fires immediately; consume it

    let mut last_activity = Instant::now();
    let mut skip_next_tick = false;

    loop {
        tokio::select! {
            biased;
            maybe_handoff = commander_rx.recv() => {
                let Some((batch, confirm)) = maybe_handoff else {
                    break;
                };
                inner.inflight.fetch_sub(1, Ordering::SeqCst);
                inner.wait_group.add(1);
                let _ = confirm.send(());
                let len = C::batch_len(&batch);
                (inner.execute)(batch);
                inner.wait_group.done();
                if len > 0 {
                    inner.listeners.emit(&ExecutorEvent::BatchFlushed {
                        name: inner.name.clone(),
                        size: len,
                        timestamp: Instant::now(),
                    });
                }
                last_activity = Instant::now();
                skip_next_tick = true;
            }
            _ = ticker.tick() => {
                if skip_next_tick {
                    // Give the item that just arrived a full interval to
                    // accumulate company before flushing on a tick again.
                    skip_next_tick = false;
                    continue;
                }

                inner.flush();

                let idle_long_enough =
                    last_activity.elapsed() > inner.interval * IDLE_ROUND;
                if idle_long_enough && inner.inflight.load(Ordering::SeqCst) == 0 {
                    break;
                }
            }
        }
    }

    inner.flush();

    #[cfg(feature = "tracing")]
    tracing::debug!(executor = %inner.name, "drainer exiting after idle timeout");

    inner.listeners.emit(&ExecutorEvent::DrainerExited {
        name: inner.name.clone(),
        timestamp: Instant::now(),
    });

    // Restore the receiver and clear `guarded` together so a concurrent
    // `add()` never observes `guarded == false` with no receiver to take.
    let mut guarded = inner.guarded.lock().unwrap();
    guarded.commander_rx = Some(commander_rx);
    guarded.guarded = false;
}
