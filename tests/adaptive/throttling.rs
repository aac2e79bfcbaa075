//! Tests for the Google SRE drop-ratio formula and the `do_with_*` call styles.

use std::time::Duration;
use tower_resilience_adaptive::{get_throttle, named_throttle, ThrottleConfig, ThrottleError};

fn throttle(name: &str) -> tower_resilience_adaptive::Throttle {
    tower_resilience_adaptive::Throttle::new(
        ThrottleConfig::builder()
            .name(name)
            .window_buckets(8)
            .window_interval(Duration::from_millis(30))
            .build(),
    )
}

#[tokio::test]
async fn a_healthy_stream_never_rejects() {
    let t = throttle("healthy-stream");
    for _ in 0..200 {
        let result = t.r#do(|| async { Ok::<_, std::io::Error>(()) }).await;
        assert!(result.is_ok());
    }
    assert_eq!(t.drop_ratio(), 0.0);
}

#[tokio::test]
async fn a_failing_stream_eventually_rejects_most_calls() {
    let t = throttle("failing-stream");
    for _ in 0..1000 {
        let _ = t
            .r#do(|| async { Err::<(), _>(std::io::Error::other("boom")) })
            .await;
    }

    let mut rejected = 0;
    for _ in 0..1000 {
        match t
            .r#do(|| async { Err::<(), _>(std::io::Error::other("boom")) })
            .await
        {
            Err(ThrottleError::Open) => rejected += 1,
            _ => {}
        }
    }
    assert!(rejected > 700, "rejected = {rejected}");
}

#[tokio::test]
async fn acceptable_errors_do_not_count_toward_the_drop_ratio() {
    let t = throttle("acceptable-errors");
    for _ in 0..1000 {
        let _ = t
            .do_with_acceptable(
                || async { Err::<(), _>(std::io::Error::other("not-found")) },
                |_| true,
            )
            .await;
    }
    assert_eq!(t.drop_ratio(), 0.0);
}

#[tokio::test]
async fn fallback_runs_when_the_throttle_rejects() {
    let t = throttle("fallback-rejects");
    for _ in 0..1000 {
        let _ = t
            .r#do(|| async { Err::<(), _>(std::io::Error::other("boom")) })
            .await;
    }

    let result = t
        .do_with_fallback(
            || async { Err::<&str, _>(std::io::Error::other("boom")) },
            |_err| Ok("fallback-value"),
        )
        .await
        .unwrap();

    assert_eq!(result, "fallback-value");
}

#[tokio::test]
async fn a_string_of_successes_pulls_the_ratio_back_to_zero() {
    let t = throttle("self-heal");
    for _ in 0..1000 {
        let _ = t
            .r#do(|| async { Err::<(), _>(std::io::Error::other("boom")) })
            .await;
    }
    assert!(t.drop_ratio() > 0.0);

    // Flood with successes; the ratio is computed from a rolling window, so
    // once the failing buckets age out it returns to zero.
    tokio::time::sleep(Duration::from_millis(300)).await;
    for _ in 0..500 {
        let _ = t.r#do(|| async { Ok::<_, std::io::Error>(()) }).await;
    }

    assert_eq!(t.drop_ratio(), 0.0);
}

#[tokio::test]
async fn named_throttles_are_shared_process_wide() {
    let handle = named_throttle(
        "shared-registry-throttle",
        ThrottleConfig::builder().name("shared-registry-throttle").build(),
    );
    handle.allow::<()>().unwrap().accept();

    let same_handle = get_throttle("shared-registry-throttle").expect("registered throttle");
    assert_eq!(same_handle.name(), "shared-registry-throttle");
    assert_eq!(same_handle.drop_ratio(), handle.drop_ratio());
}
