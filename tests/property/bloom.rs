//! Property tests for the bloom filter's no-false-negative invariant.

use proptest::prelude::*;
use tower_resilience_bloom::Filter;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(30))]

    /// Property: every element that was added is reported present. A bloom
    /// filter may false-positive on elements never added, but it must never
    /// false-negative on one that was.
    #[test]
    fn every_added_element_is_found(
        elements in prop::collection::vec("[a-z]{1,16}", 1..100),
    ) {
        let rt = tokio::runtime::Runtime::new().unwrap();
        rt.block_on(async {
            let filter = Filter::new(10_000);
            for e in &elements {
                filter.add(e.as_bytes()).await.unwrap();
            }
            for e in &elements {
                prop_assert!(filter.exists(e.as_bytes()).await.unwrap());
            }
            Ok(())
        })?;
    }

    /// Property: an empty filter reports every query as absent.
    #[test]
    fn an_empty_filter_never_reports_membership(
        candidates in prop::collection::vec("[a-z]{1,16}", 1..50),
    ) {
        let rt = tokio::runtime::Runtime::new().unwrap();
        rt.block_on(async {
            let filter = Filter::new(10_000);
            for c in &candidates {
                prop_assert!(!filter.exists(c.as_bytes()).await.unwrap());
            }
            Ok(())
        })?;
    }
}
