//! Property tests for the adaptive throttle's drop-ratio formula and
//! self-healing behavior.

use proptest::prelude::*;
use std::time::Duration;
use tower_resilience_adaptive::{Throttle, ThrottleConfig};

proptest! {
    #![proptest_config(ProptestConfig::with_cases(30))]

    /// Property: the drop ratio is always clamped to `[0, 1]` regardless of
    /// how many successes or failures feed the rolling window.
    #[test]
    fn drop_ratio_stays_within_unit_interval(
        num_successes in 0usize..200,
        num_failures in 0usize..200,
        k in 0.5f64..3.0,
    ) {
        let rt = tokio::runtime::Runtime::new().unwrap();
        rt.block_on(async {
            let throttle = Throttle::new(
                ThrottleConfig::builder()
                    .name("property-unit-interval")
                    .k(k)
                    .build(),
            );

            for _ in 0..num_successes {
                let _ = throttle.r#do(|| async { Ok::<_, std::io::Error>(()) }).await;
            }
            for _ in 0..num_failures {
                let _ = throttle
                    .r#do(|| async { Err::<(), _>(std::io::Error::other("boom")) })
                    .await;
            }

            let ratio = throttle.drop_ratio();
            prop_assert!((0.0..=1.0).contains(&ratio), "drop_ratio = {ratio}");
            Ok(())
        })?;
    }

    /// Property: a throttle that has driven its ratio above zero returns to
    /// zero once its failing history ages out of the rolling window and is
    /// replaced with successes (self-healing).
    #[test]
    fn a_run_of_successes_drives_the_ratio_back_to_zero(
        num_failures in 50usize..500,
    ) {
        let rt = tokio::runtime::Runtime::new().unwrap();
        rt.block_on(async {
            let throttle = Throttle::new(
                ThrottleConfig::builder()
                    .name("property-self-heal")
                    .window_buckets(4)
                    .window_interval(Duration::from_millis(20))
                    .build(),
            );

            for _ in 0..num_failures {
                let _ = throttle
                    .r#do(|| async { Err::<(), _>(std::io::Error::other("boom")) })
                    .await;
            }
            prop_assert!(throttle.drop_ratio() > 0.0);

            tokio::time::sleep(Duration::from_millis(4 * 20 + 40)).await;
            for _ in 0..10 {
                let _ = throttle.r#do(|| async { Ok::<_, std::io::Error>(()) }).await;
            }

            prop_assert_eq!(throttle.drop_ratio(), 0.0);
            Ok(())
        })?;
    }
}
