use std::collections::{HashMap, HashSet};
use std::sync::RwLock;

use async_trait::async_trait;

use crate::error::HashRingError;
use crate::hash::{hash_virtual_node, tie_break};

/// Storage backend for a [`crate::HashRing`]'s virtual-node table.
///
/// Each method takes and returns node identities as their canonical string
/// form (`repr`); the typed `N -> repr` mapping lives in [`crate::HashRing`]
/// itself, since a distributed backend (see the `redis-backend` feature) can
/// only persist strings. Implementors own their own internal locking —
/// go-zero's explicit ring-level `Lock`/`Unlock` is folded into each method
/// rather than exposed separately, since every mutation here is already a
/// single atomic unit of work against the backing store.
#[async_trait]
pub trait RingStore: Send + Sync {
    /// Adds `replicas` virtual nodes for `repr`.
    async fn add_node(&self, repr: &str, replicas: u32) -> Result<(), HashRingError>;

    /// Removes up to `replicas` virtual nodes for `repr`.
    async fn remove_node(&self, repr: &str, replicas: u32) -> Result<(), HashRingError>;

    /// Returns true if `repr` currently owns at least one virtual node.
    async fn contains_node(&self, repr: &str) -> Result<bool, HashRingError>;

    /// Resolves the node that should own `query_repr`, or `None` if the ring
    /// is empty.
    async fn get_node(&self, query_repr: &str) -> Result<Option<String>, HashRingError>;
}

#[derive(Default)]
struct Ring {
    /// Sorted ascending; binary-searched by [`LocalRingStore::get_node`].
    keys: Vec<u64>,
    /// Hash key -> colliding real-node reprs, chained in insertion order.
    chains: HashMap<u64, Vec<String>>,
    /// Real nodes with at least one virtual node, for O(1) `contains_node`.
    nodes: HashSet<String>,
}

/// The default in-process ring store: a sorted virtual-node key array plus a
/// collision-chain map, guarded by a single reader-preferring lock. Grounded
/// on go-zero's `ConsistentHash`.
pub struct LocalRingStore {
    ring: RwLock<Ring>,
}

impl LocalRingStore {
    pub fn new() -> Self {
        Self {
            ring: RwLock::new(Ring::default()),
        }
    }
}

impl Default for LocalRingStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RingStore for LocalRingStore {
    async fn add_node(&self, repr: &str, replicas: u32) -> Result<(), HashRingError> {
        let mut ring = self.ring.write().unwrap();
        ring.nodes.insert(repr.to_string());
        for i in 0..replicas {
            let key = hash_virtual_node(repr, i);
            let chain = ring.chains.entry(key).or_default();
            if !chain.iter().any(|n| n == repr) {
                chain.push(repr.to_string());
            }
            if let Err(pos) = ring.keys.binary_search(&key) {
                ring.keys.insert(pos, key);
            }
        }
        Ok(())
    }

    async fn remove_node(&self, repr: &str, replicas: u32) -> Result<(), HashRingError> {
        let mut ring = self.ring.write().unwrap();
        ring.nodes.remove(repr);
        for i in 0..replicas {
            let key = hash_virtual_node(repr, i);
            let Ok(idx) = ring.keys.binary_search(&key) else {
                continue;
            };
            let became_empty = match ring.chains.get_mut(&key) {
                Some(chain) => {
                    chain.retain(|n| n != repr);
                    chain.is_empty()
                }
                None => false,
            };
            if became_empty {
                ring.chains.remove(&key);
                ring.keys.remove(idx);
            }
        }
        Ok(())
    }

    async fn contains_node(&self, repr: &str) -> Result<bool, HashRingError> {
        Ok(self.ring.read().unwrap().nodes.contains(repr))
    }

    async fn get_node(&self, query_repr: &str) -> Result<Option<String>, HashRingError> {
        let ring = self.ring.read().unwrap();
        if ring.keys.is_empty() {
            return Ok(None);
        }

        let h = crate::hash::hash_bytes(query_repr.as_bytes());
        let idx = match ring.keys.binary_search(&h) {
            Ok(i) => i,
            Err(i) => i % ring.keys.len(),
        };
        let key = ring.keys[idx];
        let Some(chain) = ring.chains.get(&key) else {
            return Ok(None);
        };

        if chain.len() == 1 {
            return Ok(Some(chain[0].clone()));
        }
        Ok(Some(chain[tie_break(query_repr, chain.len())].clone()))
    }
}
