use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::Script;

use crate::bitset::BitSet;
use crate::error::BloomError;

/// Sets every offset in `KEYS[1]` to 1, matching go-zero's `setScript`.
const SET_SCRIPT: &str = r#"
for _, offset in ipairs(ARGV) do
    redis.call("setbit", KEYS[1], offset, 1)
end
"#;

/// Returns `0` on the first unset offset in `KEYS[1]`, else `1`, matching
/// go-zero's `testScript`.
const TEST_SCRIPT: &str = r#"
for _, offset in ipairs(ARGV) do
    if tonumber(redis.call("getbit", KEYS[1], offset)) == 0 then
        return 0
    end
end
return 1
"#;

/// A bloom filter bitmap backed by a single Redis string used as a bit
/// array, driven by the same two-script protocol as go-zero's Redis `Filter`:
/// a set-script that flips every offset to 1 in one round trip, and a
/// test-script that short-circuits to 0 on the first unset bit.
pub struct RedisBitSet {
    conn: ConnectionManager,
    key: String,
    bits: u64,
    set_script: Script,
    test_script: Script,
}

impl RedisBitSet {
    /// Connects to `client` and binds to the bitmap stored at `key`, sized
    /// for `bits` offsets.
    pub async fn connect(client: &redis::Client, key: &str, bits: u64) -> redis::RedisResult<Self> {
        let conn = ConnectionManager::new(client.clone()).await?;
        Ok(Self {
            conn,
            key: key.to_string(),
            bits,
            set_script: Script::new(SET_SCRIPT),
            test_script: Script::new(TEST_SCRIPT),
        })
    }

    fn validate(&self, offsets: &[u64]) -> Result<(), BloomError> {
        if offsets.iter().any(|&o| o >= self.bits) {
            return Err(BloomError::TooLargeOffset);
        }
        Ok(())
    }
}

#[async_trait]
impl BitSet for RedisBitSet {
    async fn set(&self, offsets: &[u64]) -> Result<(), BloomError> {
        self.validate(offsets)?;
        let mut conn = self.conn.clone();
        let mut invocation = self.set_script.key(&self.key);
        for &offset in offsets {
            invocation.arg(offset);
        }
        // A nil reply means the key didn't exist before this call — Redis
        // still creates it as a side effect of SETBIT, so there's nothing
        // to special-case here the way `check` must.
        let _: () = invocation
            .invoke_async(&mut conn)
            .await
            .map_err(|e| BloomError::Store(e.to_string()))?;
        Ok(())
    }

    async fn check(&self, offsets: &[u64]) -> Result<bool, BloomError> {
        self.validate(offsets)?;
        let mut conn = self.conn.clone();
        let mut invocation = self.test_script.key(&self.key);
        for &offset in offsets {
            invocation.arg(offset);
        }
        let result: Option<i64> = invocation
            .invoke_async(&mut conn)
            .await
            .map_err(|e| BloomError::Store(e.to_string()))?;
        // A missing key reads every offset back as 0 (Redis treats GETBIT
        // on an absent key as all-zero), so the script already returns 0
        // in that case; `None` is handled defensively for the same reason.
        Ok(result == Some(1))
    }
}
