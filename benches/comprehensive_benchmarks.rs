//! Heavier-load and worst-case scenarios, complementing the single-call
//! overhead measurements in `happy_path_overhead.rs`.

use criterion::{Criterion, criterion_group, criterion_main};
use futures::future::BoxFuture;
use std::hint::black_box;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::task::{Context, Poll};
use std::time::Duration;
use tower::{Service, ServiceBuilder, ServiceExt};
use tower_resilience_adaptive::ThrottleLayer;
use tower_resilience_bloom::Filter;
use tower_resilience_breaker::BreakerLayer;
use tower_resilience_executor::{ChunkExecutor, LessExecutor};
use tower_resilience_hashring::{HashRing, LocalRingStore};
use tower_resilience_window::RollingWindow;

#[derive(Clone, Debug)]
struct TestRequest(u64);

#[derive(Clone, Debug)]
struct TestResponse(#[allow(dead_code)] u64);

#[derive(Clone, Debug)]
struct TestError;

impl std::fmt::Display for TestError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "test error")
    }
}

impl std::error::Error for TestError {}

#[derive(Clone)]
struct BaselineService;

impl Service<TestRequest> for BaselineService {
    type Response = TestResponse;
    type Error = TestError;
    type Future = BoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, req: TestRequest) -> Self::Future {
        Box::pin(async move { Ok(TestResponse(req.0)) })
    }
}

#[derive(Clone)]
struct AlwaysFailingService;

impl Service<TestRequest> for AlwaysFailingService {
    type Response = TestResponse;
    type Error = TestError;
    type Future = BoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, _req: TestRequest) -> Self::Future {
        Box::pin(async move { Err(TestError) })
    }
}

// ============================================================================
// Rolling Window under sustained load
// ============================================================================

fn bench_window_add_hot_bucket(c: &mut Criterion) {
    let window = RollingWindow::builder()
        .buckets(20)
        .interval(Duration::from_secs(60))
        .build();

    c.bench_function("window_add_same_bucket", |b| {
        b.iter(|| window.add(black_box(1.0)));
    });
}

fn bench_window_stats_many_buckets(c: &mut Criterion) {
    let window = RollingWindow::builder()
        .buckets(50)
        .interval(Duration::from_millis(10))
        .build();
    for i in 0..50 {
        window.add(i as f64);
    }

    c.bench_function("window_stats_full_ring", |b| {
        b.iter(|| black_box(window.stats()));
    });
}

// ============================================================================
// Adaptive throttle under a degraded accept rate
// ============================================================================

fn bench_adaptive_throttle_degraded(c: &mut Criterion) {
    let runtime = tokio::runtime::Runtime::new().unwrap();

    c.bench_function("adaptive_throttle_high_drop_ratio", |b| {
        b.to_async(&runtime).iter(|| async {
            let service =
                tower::service_fn(|_req: TestRequest| async { Err::<TestResponse, _>(TestError) });
            let layer = ThrottleLayer::builder()
                .name("bench-degraded")
                .protection(1)
                .k(1.0)
                .build_layer();
            let mut service = ServiceBuilder::new().layer(layer).service(service);

            // Prime the window with a heavy request/failure history so the
            // drop ratio has risen above zero before the measured call.
            for _ in 0..200 {
                let _ = service.ready().await.unwrap().call(TestRequest(0)).await;
            }

            let response = service
                .ready()
                .await
                .unwrap()
                .call(black_box(TestRequest(42)))
                .await;
            black_box(response)
        });
    });
}

// ============================================================================
// Bulkhead breaker tripped open
// ============================================================================

fn bench_breaker_tripped_open(c: &mut Criterion) {
    let runtime = tokio::runtime::Runtime::new().unwrap();

    c.bench_function("breaker_tripped_open", |b| {
        b.to_async(&runtime).iter(|| async {
            let layer = BreakerLayer::builder()
                .name("bench-open")
                .request_volume_threshold(1)
                .error_percent_threshold(1)
                .sleep_window(Duration::from_secs(60))
                .build_layer();
            let mut service = ServiceBuilder::new()
                .layer(layer)
                .service(AlwaysFailingService);

            // Trip the breaker, then measure the cost of a rejected call
            // once it has settled into the open state.
            for _ in 0..5 {
                let _ = service.ready().await.unwrap().call(TestRequest(0)).await;
            }

            let response = service
                .ready()
                .await
                .unwrap()
                .call(black_box(TestRequest(42)))
                .await;
            black_box(response)
        });
    });
}

fn bench_breaker_max_concurrency(c: &mut Criterion) {
    let runtime = tokio::runtime::Runtime::new().unwrap();

    c.bench_function("breaker_small_token_pool", |b| {
        b.to_async(&runtime).iter(|| async {
            let layer = BreakerLayer::builder()
                .name("bench-bulkhead")
                .max_concurrent_requests(2)
                .build_layer();
            let mut service = ServiceBuilder::new().layer(layer).service(BaselineService);

            let response = service
                .ready()
                .await
                .unwrap()
                .call(black_box(TestRequest(42)))
                .await;
            black_box(response)
        });
    });
}

// ============================================================================
// Periodic batching executor specializations
// ============================================================================

fn bench_chunk_executor_add(c: &mut Criterion) {
    let runtime = tokio::runtime::Runtime::new().unwrap();
    let executor = ChunkExecutor::with_chunk_size(
        1 << 30,
        Duration::from_secs(60),
        |task: &Vec<u8>| task.len(),
        |_batch: Vec<Vec<u8>>| {},
    );

    c.bench_function("chunk_executor_add", |b| {
        b.to_async(&runtime)
            .iter(|| async { executor.add(black_box(vec![0u8; 16])).await });
    });
}

fn bench_less_executor_do_or_discard(c: &mut Criterion) {
    let executor = LessExecutor::new(Duration::from_secs(60));

    c.bench_function("less_executor_do_or_discard_within_threshold", |b| {
        b.iter(|| black_box(executor.do_or_discard(|| {})));
    });
}

// ============================================================================
// Consistent hash ring at scale
// ============================================================================

fn bench_hash_ring_large_ring(c: &mut Criterion) {
    let runtime = tokio::runtime::Runtime::new().unwrap();
    let ring = runtime.block_on(async {
        let ring = HashRing::new(LocalRingStore::new());
        for i in 0..500 {
            ring.add(format!("node-{i}")).await.unwrap();
        }
        ring
    });

    c.bench_function("hash_ring_get_large_ring", |b| {
        b.to_async(&runtime).iter(|| async {
            black_box(
                ring.get("some-key-that-does-not-exist-yet")
                    .await
                    .unwrap(),
            )
        });
    });
}

fn bench_hash_ring_add_node(c: &mut Criterion) {
    let runtime = tokio::runtime::Runtime::new().unwrap();
    let counter = Arc::new(AtomicUsize::new(0));

    c.bench_function("hash_ring_add_node", |b| {
        b.to_async(&runtime).iter(|| {
            let counter = Arc::clone(&counter);
            async move {
                let ring = HashRing::new(LocalRingStore::new());
                let id = counter.fetch_add(1, Ordering::SeqCst);
                ring.add(black_box(format!("node-{id}"))).await.unwrap();
            }
        });
    });
}

// ============================================================================
// Bloom filter at scale
// ============================================================================

fn bench_bloom_filter_populated(c: &mut Criterion) {
    let runtime = tokio::runtime::Runtime::new().unwrap();
    let filter = runtime.block_on(async {
        let filter = Filter::new(1_000_000);
        for i in 0..10_000 {
            filter
                .add(format!("element-{i}").as_bytes())
                .await
                .unwrap();
        }
        filter
    });

    c.bench_function("bloom_filter_exists_miss_large_set", |b| {
        b.to_async(&runtime).iter(|| async {
            black_box(
                filter
                    .exists(b"an-element-that-was-never-added")
                    .await
                    .unwrap(),
            )
        });
    });
}

// ============================================================================
// Full composition: throttle + breaker + hash ring lookup
// ============================================================================

fn bench_full_composition(c: &mut Criterion) {
    let runtime = tokio::runtime::Runtime::new().unwrap();
    let ring = runtime.block_on(async {
        let ring = HashRing::new(LocalRingStore::new());
        for i in 0..10 {
            ring.add(format!("node-{i}")).await.unwrap();
        }
        ring
    });

    c.bench_function("composition_throttle_breaker_hashring", |b| {
        b.to_async(&runtime).iter(|| async {
            let throttle_layer = ThrottleLayer::builder().name("bench-full").build_layer();
            let breaker_layer = BreakerLayer::builder().name("bench-full").build_layer();

            let mut service = ServiceBuilder::new()
                .layer(throttle_layer)
                .layer(breaker_layer)
                .service(BaselineService);

            let _owner = ring.get("routed-key").await.unwrap();
            let response = service
                .ready()
                .await
                .unwrap()
                .call(black_box(TestRequest(42)))
                .await;
            black_box(response)
        });
    });
}

criterion_group!(
    window_benches,
    bench_window_add_hot_bucket,
    bench_window_stats_many_buckets
);

criterion_group!(adaptive_benches, bench_adaptive_throttle_degraded);

criterion_group!(
    breaker_benches,
    bench_breaker_tripped_open,
    bench_breaker_max_concurrency,
);

criterion_group!(
    executor_benches,
    bench_chunk_executor_add,
    bench_less_executor_do_or_discard,
);

criterion_group!(
    hashring_benches,
    bench_hash_ring_large_ring,
    bench_hash_ring_add_node,
);

criterion_group!(bloom_benches, bench_bloom_filter_populated);

criterion_group!(composition_benches, bench_full_composition);

criterion_main!(
    window_benches,
    adaptive_benches,
    breaker_benches,
    executor_benches,
    hashring_benches,
    bloom_benches,
    composition_benches,
);
