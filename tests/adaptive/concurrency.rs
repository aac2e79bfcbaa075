//! Concurrency tests for the adaptive throttle: many callers sharing one
//! `Throttle`/`ThrottleLayer` instance.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tower::{Service, ServiceBuilder, ServiceExt};
use tower_resilience_adaptive::ThrottleLayer;

#[tokio::test]
async fn test_concurrent_successes_never_rejected() {
    let call_count = Arc::new(AtomicUsize::new(0));
    let cc = Arc::clone(&call_count);

    let service = tower::service_fn(move |_req: ()| {
        let count = cc.clone();
        async move {
            count.fetch_add(1, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_millis(5)).await;
            Ok::<_, &str>(())
        }
    });

    let service = ServiceBuilder::new()
        .layer(ThrottleLayer::builder().name("concurrency-success").build_layer())
        .service(service);

    let mut handles = vec![];
    for _ in 0..50 {
        let mut svc = service.clone();
        handles.push(tokio::spawn(
            async move { svc.ready().await.unwrap().call(()).await },
        ));
    }

    for handle in handles {
        assert!(handle.await.unwrap().is_ok());
    }

    assert_eq!(call_count.load(Ordering::SeqCst), 50);
}

#[tokio::test]
async fn test_concurrent_mixed_success_and_failure_converges_to_drop_ratio() {
    let call_count = Arc::new(AtomicUsize::new(0));
    let cc = Arc::clone(&call_count);

    let service = tower::service_fn(move |req: u32| {
        let count = cc.clone();
        async move {
            count.fetch_add(1, Ordering::SeqCst);
            if req.is_multiple_of(3) {
                Err("divisible by 3")
            } else {
                Ok(req)
            }
        }
    });

    let service = ServiceBuilder::new()
        .layer(ThrottleLayer::builder().name("concurrency-mixed").build_layer())
        .service(service);

    let mut handles = vec![];
    for i in 0..150 {
        let mut svc = service.clone();
        handles.push(tokio::spawn(
            async move { svc.ready().await.unwrap().call(i).await },
        ));
    }

    let mut successes = 0;
    let mut failures = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(_) => successes += 1,
            Err(_) => failures += 1,
        }
    }

    // Every call reaches the inner service (the throttle admits everything
    // until failures accumulate in the window); only the inner service's
    // own logic rejects multiples of 3.
    assert_eq!(successes + failures, 150);
    assert_eq!(call_count.load(Ordering::SeqCst), 150);
}

#[tokio::test]
async fn test_high_concurrency_does_not_deadlock() {
    let call_count = Arc::new(AtomicUsize::new(0));
    let cc = Arc::clone(&call_count);

    let service = tower::service_fn(move |_req: ()| {
        let count = cc.clone();
        async move {
            count.fetch_add(1, Ordering::SeqCst);
            Ok::<_, &str>(())
        }
    });

    let service = ServiceBuilder::new()
        .layer(ThrottleLayer::builder().name("concurrency-stress").build_layer())
        .service(service);

    let mut handles = vec![];
    for _ in 0..500 {
        let mut svc = service.clone();
        handles.push(tokio::spawn(
            async move { svc.ready().await.unwrap().call(()).await },
        ));
    }

    for handle in handles {
        handle.await.unwrap().ok();
    }

    assert_eq!(call_count.load(Ordering::SeqCst), 500);
}
