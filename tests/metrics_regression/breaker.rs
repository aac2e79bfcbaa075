//! Bulkhead breaker metrics regression tests

use super::helpers::*;
use serial_test::serial;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tower::{Service, ServiceBuilder, ServiceExt};
use tower_resilience_breaker::BreakerLayer;

#[tokio::test]
#[serial]
async fn short_circuit_increments_the_short_circuited_counter() {
    init_recorder();

    let layer = BreakerLayer::builder()
        .name("metrics_short_circuit")
        .request_volume_threshold(1)
        .error_percent_threshold(1)
        .sleep_window(Duration::from_secs(60))
        .build_layer();

    let mut service = ServiceBuilder::new().layer(layer).service(tower::service_fn(
        |_req: ()| async { Err::<(), _>(std::io::Error::other("boom")) },
    ));

    // First call trips the breaker; later calls are short-circuited.
    for _ in 0..5 {
        let _ = service.ready().await.unwrap().call(()).await;
    }

    assert_counter_exists("breaker_short_circuited_total");
    assert_metric_has_label(
        "breaker_short_circuited_total",
        "name",
        "metrics_short_circuit",
    );
}

#[tokio::test]
#[serial]
async fn an_exhausted_token_pool_increments_the_rejected_counter() {
    init_recorder();

    let call_count = Arc::new(AtomicUsize::new(0));
    let cc = Arc::clone(&call_count);

    let layer = BreakerLayer::builder()
        .name("metrics_rejected")
        .max_concurrent_requests(1)
        .build_layer();

    let service = tower::service_fn(move |_req: ()| {
        let cc = Arc::clone(&cc);
        async move {
            cc.fetch_add(1, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_millis(50)).await;
            Ok::<_, std::io::Error>(())
        }
    });

    let mut service = ServiceBuilder::new().layer(layer).service(service);

    let mut svc1 = service.clone();
    let call1 = tokio::spawn(async move { svc1.ready().await.unwrap().call(()).await });

    tokio::time::sleep(Duration::from_millis(10)).await;
    let _ = service.ready().await.unwrap().call(()).await;
    let _ = call1.await;

    assert_counter_exists("breaker_rejected_total");
    assert_metric_has_label("breaker_rejected_total", "name", "metrics_rejected");
}
