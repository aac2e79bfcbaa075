use std::collections::HashMap;
use std::hash::Hash;
use std::sync::RwLock;

use crate::error::HashRingError;
use crate::store::RingStore;

/// Maximum accepted weight, and the weight at which `replicas == base_replicas`.
pub const TOP_WEIGHT: u32 = 100;

/// Minimum (and default) base replica count per real node, matching
/// go-zero's `minReplicas`.
pub const MIN_REPLICAS: u32 = 100;

/// A weighted consistent hash ring, generic over its storage backend.
///
/// `N` is the application's node type. This workspace prefers the
/// compile-time-polymorphic route of bounding `N: ToString + Clone + Eq +
/// Hash` over a boxed `repr` callback, reserving the callback form for
/// callers whose node type doesn't implement `ToString` (see
/// [`HashRing::with_repr`]).
///
/// Grounded on go-zero's `ConsistentHash`, generalized over storage the same
/// way `tower-resilience-bloom`'s `Filter<B: BitSet>` is generalized over its
/// bit-store.
pub struct HashRing<N, S: RingStore> {
    base_replicas: u32,
    store: S,
    /// repr -> (node, replicas actually registered), so `remove` can tear
    /// down exactly the virtual nodes `add_with_weight`/`add_with_replicas`
    /// created and `get` can map a resolved repr back to a typed node.
    nodes: RwLock<HashMap<String, (N, u32)>>,
}

impl<N, S> HashRing<N, S>
where
    N: Clone + Eq + Hash + ToString,
    S: RingStore,
{
    /// Builds a ring over `store` using go-zero's default base replica count (100).
    pub fn new(store: S) -> Self {
        Self::with_base_replicas(store, MIN_REPLICAS)
    }

    /// Builds a ring over `store` with an explicit base replica count (the
    /// ceiling `AddWithWeight`'s computed replica count is capped at).
    pub fn with_base_replicas(store: S, base_replicas: u32) -> Self {
        Self {
            base_replicas: base_replicas.max(MIN_REPLICAS),
            store,
            nodes: RwLock::new(HashMap::new()),
        }
    }

    /// Adds `node` at full weight (100), go-zero's `Add`.
    pub async fn add(&self, node: N) -> Result<(), HashRingError> {
        self.add_with_weight(node, TOP_WEIGHT).await
    }

    /// Adds `node` with `weight` in `[0, 100]`, computing
    /// `replicas = base_replicas * weight / 100`. go-zero's `AddWithWeight`.
    pub async fn add_with_weight(&self, node: N, weight: u32) -> Result<(), HashRingError> {
        let weight = weight.min(TOP_WEIGHT);
        let replicas = self.base_replicas * weight / TOP_WEIGHT;
        self.add_with_replicas(node, replicas).await
    }

    /// Adds `node` with an explicit virtual-node count, capped at
    /// `base_replicas`. go-zero's `AddWithReplicas`.
    pub async fn add_with_replicas(&self, node: N, replicas: u32) -> Result<(), HashRingError> {
        let replicas = replicas.min(self.base_replicas);
        let repr = node.to_string();

        self.store.add_node(&repr, replicas).await?;
        self.nodes.write().unwrap().insert(repr, (node, replicas));
        Ok(())
    }

    /// Removes every virtual node registered for `node`.
    pub async fn remove(&self, node: &N) -> Result<(), HashRingError> {
        let repr = node.to_string();
        let replicas = self
            .nodes
            .write()
            .unwrap()
            .remove(&repr)
            .map(|(_, replicas)| replicas)
            .unwrap_or(self.base_replicas);
        self.store.remove_node(&repr, replicas).await
    }

    /// Resolves the node that owns `v`.
    pub async fn get<V: ToString + ?Sized>(&self, v: &V) -> Result<Option<N>, HashRingError> {
        let repr = v.to_string();
        let Some(node_repr) = self.store.get_node(&repr).await? else {
            return Ok(None);
        };
        Ok(self
            .nodes
            .read()
            .unwrap()
            .get(&node_repr)
            .map(|(node, _)| node.clone()))
    }

    /// Returns whether `node` currently has at least one virtual node.
    pub async fn contains(&self, node: &N) -> Result<bool, HashRingError> {
        self.store.contains_node(&node.to_string()).await
    }
}
