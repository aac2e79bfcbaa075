use std::time::Duration;

use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::AsyncCommands;

use crate::error::HashRingError;
use crate::hash::{hash_bytes, hash_virtual_node, tie_break};
use crate::store::RingStore;

/// A consistent hash ring backed by a Redis sorted set, so the same ring can
/// be shared by every process in a fleet. Grounded on
/// `hash/hash/source/redis/zsethashring.go`.
///
/// The ring is stored under `ring_key` as a sorted set: each score is a
/// virtual-node hash (as an `f64`, which loses precision above 2^53 the same
/// way the Lua/Redis double score does in the original); each member is a
/// JSON array of the real-node reprs colliding at that score, since sorted
/// set members must be unique per score. Mutations are serialized with a
/// short-lived Redis lock (`SET key "" NX EX 5`) at
/// `redis:consistent_hash:ring:lock:<name>`, matching the lock key format and
/// 5s TTL the source uses.
pub struct RedisRingStore {
    conn: ConnectionManager,
    ring_key: String,
    lock_key: String,
}

impl RedisRingStore {
    /// Connects to `client` and binds to the ring named `name`.
    pub async fn connect(client: &redis::Client, name: &str) -> redis::RedisResult<Self> {
        let conn = ConnectionManager::new(client.clone()).await?;
        Ok(Self {
            conn,
            ring_key: format!("redis:consistent_hash:ring:{name}"),
            lock_key: format!("redis:consistent_hash:ring:lock:{name}"),
        })
    }

    async fn lock(&self) -> redis::RedisResult<()> {
        let mut conn = self.conn.clone();
        loop {
            let acquired: bool = redis::cmd("SET")
                .arg(&self.lock_key)
                .arg("")
                .arg("NX")
                .arg("EX")
                .arg(5)
                .query_async(&mut conn)
                .await?;
            if acquired {
                return Ok(());
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
    }

    async fn unlock(&self) -> redis::RedisResult<()> {
        let mut conn = self.conn.clone();
        let _: () = conn.del(&self.lock_key).await?;
        Ok(())
    }

    async fn chain_at(&self, score: f64) -> redis::RedisResult<Option<Vec<String>>> {
        let mut conn = self.conn.clone();
        let members: Vec<String> = conn
            .zrangebyscore(&self.ring_key, score, score)
            .await?;
        Ok(members
            .into_iter()
            .next()
            .map(|raw| serde_json::from_str(&raw).unwrap_or_default()))
    }

    async fn replace_chain(&self, score: f64, old_member: Option<&str>, chain: &[String]) -> redis::RedisResult<()> {
        let mut conn = self.conn.clone();
        if let Some(old) = old_member {
            let _: () = conn.zrem(&self.ring_key, old).await?;
        }
        if !chain.is_empty() {
            let encoded = serde_json::to_string(chain).expect("string vec always serializes");
            let _: () = conn.zadd(&self.ring_key, encoded, score).await?;
        }
        Ok(())
    }

    async fn try_add_node(&self, repr: &str, replicas: u32) -> redis::RedisResult<()> {
        self.lock().await?;
        let result = async {
            for i in 0..replicas {
                let score = hash_virtual_node(repr, i) as f64;
                let existing = self.chain_at(score).await?;
                let mut chain = existing.clone().unwrap_or_default();
                if chain.iter().any(|n| n == repr) {
                    continue;
                }
                let old_member = existing.as_ref().map(|c| serde_json::to_string(c).unwrap());
                chain.push(repr.to_string());
                self.replace_chain(score, old_member.as_deref(), &chain)
                    .await?;
            }
            Ok(())
        }
        .await;
        self.unlock().await?;
        result
    }

    async fn try_remove_node(&self, repr: &str, replicas: u32) -> redis::RedisResult<()> {
        self.lock().await?;
        let result = async {
            for i in 0..replicas {
                let score = hash_virtual_node(repr, i) as f64;
                let Some(mut chain) = self.chain_at(score).await? else {
                    continue;
                };
                if !chain.iter().any(|n| n == repr) {
                    continue;
                }
                let old_member = serde_json::to_string(&chain).unwrap();
                chain.retain(|n| n != repr);
                self.replace_chain(score, Some(&old_member), &chain).await?;
            }
            Ok(())
        }
        .await;
        self.unlock().await?;
        result
    }

    async fn try_contains_node(&self, repr: &str) -> redis::RedisResult<bool> {
        let mut conn = self.conn.clone();
        let members: Vec<String> = conn.zrange(&self.ring_key, 0, -1).await?;
        Ok(members.iter().any(|raw| {
            serde_json::from_str::<Vec<String>>(raw)
                .map(|chain| chain.iter().any(|n| n == repr))
                .unwrap_or(false)
        }))
    }

    async fn try_get_node(&self, query_repr: &str) -> redis::RedisResult<Option<String>> {
        let mut conn = self.conn.clone();
        let h = hash_bytes(query_repr.as_bytes()) as f64;

        let mut found: Vec<String> = conn
            .zrangebyscore_limit(&self.ring_key, h, f64::INFINITY, 0, 1)
            .await?;
        if found.is_empty() {
            found = conn
                .zrangebyscore_limit(&self.ring_key, f64::NEG_INFINITY, h, 0, 1)
                .await?;
        }

        let Some(raw) = found.into_iter().next() else {
            return Ok(None);
        };
        let chain: Vec<String> = serde_json::from_str(&raw).unwrap_or_default();
        if chain.is_empty() {
            return Ok(None);
        }
        if chain.len() == 1 {
            return Ok(Some(chain[0].clone()));
        }
        Ok(Some(chain[tie_break(query_repr, chain.len())].clone()))
    }
}

#[async_trait]
impl RingStore for RedisRingStore {
    async fn add_node(&self, repr: &str, replicas: u32) -> Result<(), HashRingError> {
        self.try_add_node(repr, replicas)
            .await
            .map_err(|e| HashRingError::Store(e.to_string()))
    }

    async fn remove_node(&self, repr: &str, replicas: u32) -> Result<(), HashRingError> {
        self.try_remove_node(repr, replicas)
            .await
            .map_err(|e| HashRingError::Store(e.to_string()))
    }

    async fn contains_node(&self, repr: &str) -> Result<bool, HashRingError> {
        self.try_contains_node(repr)
            .await
            .map_err(|e| HashRingError::Store(e.to_string()))
    }

    async fn get_node(&self, query_repr: &str) -> Result<Option<String>, HashRingError> {
        self.try_get_node(query_repr)
            .await
            .map_err(|e| HashRingError::Store(e.to_string()))
    }
}
