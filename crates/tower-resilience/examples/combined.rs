//! Stacking the adaptive throttle in front of the bulkhead breaker.
//!
//! The throttle sheds load client-side once the recent failure rate climbs,
//! so by the time a call reaches the breaker's token pool and timeout, most
//! of the doomed traffic has already been dropped.

use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
};
use std::time::Duration;
use tokio::time::sleep;
use tower::{Service, ServiceBuilder, ServiceExt};
use tower_resilience::adaptive::ThrottleLayer;
use tower_resilience::breaker::BreakerLayer;

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
    let total_calls = Arc::new(AtomicUsize::new(0));
    let failures = Arc::new(AtomicUsize::new(0));

    let total_clone = Arc::clone(&total_calls);
    let failures_clone = Arc::clone(&failures);

    let service = tower::service_fn(move |_req: ()| {
        let total = Arc::clone(&total_clone);
        let failures = Arc::clone(&failures_clone);
        async move {
            let call_num = total.fetch_add(1, Ordering::SeqCst) + 1;
            sleep(Duration::from_millis(5)).await;

            // Fail 70% of the time to exercise both layers.
            if call_num % 10 < 7 {
                failures.fetch_add(1, Ordering::SeqCst);
                Err(ServiceError)
            } else {
                Ok(())
            }
        }
    });

    let breaker_layer = BreakerLayer::builder()
        .name("downstream-api")
        .request_volume_threshold(10)
        .error_percent_threshold(50)
        .sleep_window(Duration::from_millis(500))
        .build_layer();

    let service = ServiceBuilder::new().layer(breaker_layer).service(service);

    let throttle_layer = ThrottleLayer::builder()
        .name("downstream-api")
        .k(1.5)
        .build_layer();

    let mut service = ServiceBuilder::new()
        .layer(throttle_layer)
        .service(service);

    println!("Sending 60 requests to a service with a 70% failure rate,");
    println!("guarded by an adaptive throttle in front of a bulkhead breaker.\n");

    let mut accepted = 0;
    let mut rejected = 0;
    for i in 1..=60 {
        match service.ready().await.unwrap().call(()).await {
            Ok(()) => {
                accepted += 1;
                println!("Request {i}: success");
            }
            Err(_) => {
                rejected += 1;
                println!("Request {i}: rejected or failed");
            }
        }
        sleep(Duration::from_millis(5)).await;
    }

    println!("\n--- Results ---");
    println!("Accepted: {accepted}, rejected/failed: {rejected}");
    println!("Calls that reached the inner service: {}", total_calls.load(Ordering::SeqCst));
    println!("Inner service failures: {}", failures.load(Ordering::SeqCst));
}
