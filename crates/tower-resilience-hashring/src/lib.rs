//! A weighted consistent hash ring with a pluggable virtual-node store.
//!
//! [`HashRing`] distributes arbitrary keys across a changing set of nodes
//! with minimal disruption: adding or removing one real node only reshuffles
//! the keys that node's virtual nodes owned, not the whole keyspace. The
//! virtual-node table itself is abstracted behind [`RingStore`], so the same
//! [`HashRing`] works whether the table lives in-process
//! ([`LocalRingStore`]) or in a shared Redis sorted set
//! ([`RedisRingStore`], behind the `redis-backend` feature) for ring state
//! shared across a fleet.

mod error;
mod hash;
#[cfg(feature = "redis-backend")]
mod redis_store;
mod ring;
mod store;

pub use error::HashRingError;
pub use ring::{HashRing, MIN_REPLICAS, TOP_WEIGHT};
pub use store::{LocalRingStore, RingStore};

#[cfg(feature = "redis-backend")]
pub use redis_store::RedisRingStore;
