//! Showcases each of the six components working independently.
//!
//! - Adaptive throttle: probabilistic client-side shedding
//! - Bulkhead breaker: token pool + timeout + circuit trip
//! - Periodic batching executor: background flush on size or interval
//! - Consistent hash ring: stable key-to-node assignment
//! - Bloom filter: probabilistic set membership
//!
//! Composing all of them in a single call stack is covered by `combined.rs`;
//! this example keeps each one isolated so its behavior is easy to read.

use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
};
use std::time::Duration;
use tokio::time::sleep;
use tower::{Service, ServiceBuilder, ServiceExt};
use tower_resilience::adaptive::ThrottleLayer;
use tower_resilience::breaker::BreakerLayer;
use tower_resilience::bloom::Filter;
use tower_resilience::executor::BulkExecutor;
use tower_resilience::hashring::{HashRing, LocalRingStore};

#[derive(Debug)]
struct ServiceError;

impl std::fmt::Display for ServiceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "service error")
    }
}

impl std::error::Error for ServiceError {}

#[tokio::main]
async fn main() {
    println!("tower-resilience component showcase");
    println!("====================================\n");

    demo_adaptive_throttle().await;
    demo_bulkhead_breaker().await;
    demo_periodic_executor().await;
    demo_hash_ring().await;
    demo_bloom_filter().await;

    println!("\n=== All components demonstrated ===");
}

async fn demo_adaptive_throttle() {
    println!("--- Adaptive throttle ---");

    let call_count = Arc::new(AtomicUsize::new(0));
    let cc = Arc::clone(&call_count);

    let service = tower::service_fn(move |_req: ()| {
        let cc = Arc::clone(&cc);
        async move {
            let count = cc.fetch_add(1, Ordering::SeqCst) + 1;
            if count % 3 == 0 {
                Ok(())
            } else {
                Err(ServiceError)
            }
        }
    });

    let throttle_layer = ThrottleLayer::builder().name("demo").k(1.5).build_layer();
    let mut service = ServiceBuilder::new().layer(throttle_layer).service(service);

    let mut rejected = 0;
    for _ in 1..=30 {
        if service.ready().await.unwrap().call(()).await.is_err() {
            rejected += 1;
        }
    }
    println!(
        "  {} of 30 calls rejected or failed; inner service reached {} times\n",
        rejected,
        call_count.load(Ordering::SeqCst)
    );
}

async fn demo_bulkhead_breaker() {
    println!("--- Bulkhead breaker ---");

    let call_count = Arc::new(AtomicUsize::new(0));
    let cc = Arc::clone(&call_count);

    let service = tower::service_fn(move |_req: ()| {
        let cc = Arc::clone(&cc);
        async move {
            cc.fetch_add(1, Ordering::SeqCst);
            Err::<(), _>(ServiceError)
        }
    });

    let breaker_layer = BreakerLayer::builder()
        .name("demo")
        .request_volume_threshold(5)
        .error_percent_threshold(50)
        .sleep_window(Duration::from_millis(200))
        .build_layer();
    let mut service = ServiceBuilder::new().layer(breaker_layer).service(service);

    for i in 1..=15 {
        let result = service.ready().await.unwrap().call(()).await;
        println!("  Request {i}: {}", if result.is_ok() { "ok" } else { "rejected/failed" });
    }
    println!(
        "  Inner service reached {} times out of 15 requests\n",
        call_count.load(Ordering::SeqCst)
    );
}

async fn demo_periodic_executor() {
    println!("--- Periodic batching executor ---");

    let executor = BulkExecutor::with_capacity(10, Duration::from_millis(100), |batch: Vec<u32>| {
        println!("  flushed batch of {} items", batch.len());
    });

    for i in 0..25 {
        executor.add(i).await;
    }
    executor.wait().await;
    println!();
}

async fn demo_hash_ring() {
    println!("--- Consistent hash ring ---");

    let ring = HashRing::new(LocalRingStore::new());
    for node in ["node-a", "node-b", "node-c"] {
        ring.add(node.to_string()).await.unwrap();
    }

    for key in ["user:1", "user:2", "user:3"] {
        let owner = ring.get(key).await.unwrap();
        println!("  {key} -> {owner:?}");
    }
    println!();
}

async fn demo_bloom_filter() {
    println!("--- Bloom filter ---");

    let filter = Filter::new(10_000);
    for word in ["alpha", "beta", "gamma"] {
        filter.add(word.as_bytes()).await.unwrap();
    }

    for word in ["alpha", "never-added"] {
        println!(
            "  exists(\"{word}\") = {}",
            filter.exists(word.as_bytes()).await.unwrap()
        );
    }
    println!();
}
