//! Adaptive throttle metrics regression tests

use super::helpers::*;
use serial_test::serial;
use tower_resilience_adaptive::{Throttle, ThrottleConfig, ThrottleError};

#[tokio::test]
#[serial]
async fn a_tripped_throttle_increments_the_rejected_counter() {
    init_recorder();

    let throttle = Throttle::new(
        ThrottleConfig::builder()
            .name("metrics_rejected")
            .protection(1)
            .k(1.0)
            .build(),
    );

    for _ in 0..200 {
        let _ = throttle
            .r#do(|| async { Err::<(), _>(std::io::Error::other("boom")) })
            .await;
    }

    let mut rejected = false;
    for _ in 0..200 {
        if let Err(ThrottleError::Open) = throttle
            .r#do(|| async { Err::<(), _>(std::io::Error::other("boom")) })
            .await
        {
            rejected = true;
            break;
        }
    }
    assert!(rejected, "expected the throttle to reject at least one call");

    assert_counter_exists("throttle_rejected_total");
    assert_metric_has_label("throttle_rejected_total", "name", "metrics_rejected");
}
