//! Property tests for the consistent hash ring's stability and
//! minimal-disruption guarantees.

use proptest::prelude::*;
use tower_resilience_hashring::{HashRing, LocalRingStore};

proptest! {
    #![proptest_config(ProptestConfig::with_cases(20))]

    /// Property: looking up the same key against the same ring always
    /// returns the same node.
    #[test]
    fn lookup_is_stable_for_a_fixed_ring(
        num_nodes in 2usize..30,
        key in "[a-z]{1,12}",
    ) {
        let rt = tokio::runtime::Runtime::new().unwrap();
        rt.block_on(async {
            let ring = HashRing::new(LocalRingStore::new());
            for i in 0..num_nodes {
                ring.add(format!("node-{i}")).await.unwrap();
            }

            let first = ring.get(&key).await.unwrap();
            for _ in 0..5 {
                prop_assert_eq!(ring.get(&key).await.unwrap(), first.clone());
            }
            Ok(())
        })?;
    }

    /// Property: adding one more node only reassigns a minority of existing
    /// keys — the hallmark of consistent hashing over naive modulo hashing.
    #[test]
    fn adding_a_node_reassigns_a_minority_of_keys(
        num_nodes in 3usize..20,
        num_keys in 50usize..300,
    ) {
        let rt = tokio::runtime::Runtime::new().unwrap();
        rt.block_on(async {
            let ring = HashRing::new(LocalRingStore::new());
            for i in 0..num_nodes {
                ring.add(format!("node-{i}")).await.unwrap();
            }

            let keys: Vec<String> = (0..num_keys).map(|i| format!("key-{i}")).collect();
            let mut before = Vec::with_capacity(keys.len());
            for key in &keys {
                before.push(ring.get(key).await.unwrap());
            }

            ring.add(format!("node-{num_nodes}")).await.unwrap();

            let mut moved = 0;
            for (key, old_owner) in keys.iter().zip(before.iter()) {
                let new_owner = ring.get(key).await.unwrap();
                if &new_owner != old_owner {
                    moved += 1;
                }
            }

            // Consistent hashing over N+1 nodes should remap at most roughly
            // 1/(N+1) of keys; allow generous slack for virtual-node variance.
            let expected_max = (num_keys / (num_nodes + 1)) * 4 + num_keys / 4;
            prop_assert!(
                moved <= expected_max,
                "moved {moved} of {num_keys} keys, expected at most {expected_max}"
            );
            Ok(())
        })?;
    }

    /// Property: removing a node never leaves a key unassigned while other
    /// nodes remain on the ring.
    #[test]
    fn removing_a_node_still_resolves_every_key(
        num_nodes in 3usize..15,
    ) {
        let rt = tokio::runtime::Runtime::new().unwrap();
        rt.block_on(async {
            let ring = HashRing::new(LocalRingStore::new());
            for i in 0..num_nodes {
                ring.add(format!("node-{i}")).await.unwrap();
            }

            ring.remove(&"node-0".to_string()).await.unwrap();

            for i in 0..50 {
                let owner = ring.get(&format!("key-{i}")).await.unwrap();
                prop_assert!(owner.is_some());
                prop_assert_ne!(owner, Some("node-0".to_string()));
            }
            Ok(())
        })?;
    }
}
