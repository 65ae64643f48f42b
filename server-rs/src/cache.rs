use redis::aio::ConnectionManager;
use redis::{AsyncCommands, Client};

use crate::config::Config;

/// Read-through cache for unfiltered listings. A disabled cache misses on
/// every read and drops every write.
#[derive(Clone)]
pub struct Cache {
    conn: Option<ConnectionManager>,
    prefix: String,
}

impl Cache {
    pub async fn connect(config: &Config) -> Result<Self, redis::RedisError> {
        let client = Client::open(config.redis_url())?;
        let conn = ConnectionManager::new(client).await?;
        Ok(Self {
            conn: Some(conn),
            prefix: config.redis.key_prefix.clone(),
        })
    }

    pub fn disabled() -> Self {
        Self {
            conn: None,
            prefix: String::new(),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.conn.is_some()
    }

    fn key(&self, k: &str) -> String {
        format!("{}{}", self.prefix, k)
    }

    pub async fn get_json<T: serde::de::DeserializeOwned>(&self, key: &str) -> Option<T> {
        let mut conn = self.conn.clone()?;
        let raw: redis::RedisResult<Option<String>> = conn.get(self.key(key)).await;
        raw.ok().flatten().and_then(|s| serde_json::from_str(&s).ok())
    }

    pub async fn set_json<T: serde::Serialize>(&self, key: &str, value: &T, ttl_secs: u64) {
        let Some(mut conn) = self.conn.clone() else {
            return;
        };
        let Ok(json) = serde_json::to_string(value) else {
            return;
        };
        let k = self.key(key);
        let result: Result<(), _> = if ttl_secs > 0 {
            conn.set_ex(&k, json, ttl_secs).await
        } else {
            conn.set(&k, json).await
        };
        if let Err(e) = result {
            tracing::warn!(key = %k, error = %e, "Cache write failed");
        }
    }

    /// Integer counter at `key`; a missing key reads as 0. None when the
    /// cache is disabled or unreachable.
    pub async fn get_counter(&self, key: &str) -> Option<u64> {
        let mut conn = self.conn.clone()?;
        let k = self.key(key);
        match conn.get::<_, Option<u64>>(&k).await {
            Ok(value) => Some(value.unwrap_or(0)),
            Err(e) => {
                tracing::warn!(key = %k, error = %e, "Cache counter read failed");
                None
            }
        }
    }

    /// Increments the counter at `key`, retiring entries keyed by its old value.
    pub async fn bump(&self, key: &str) {
        let Some(mut conn) = self.conn.clone() else {
            return;
        };
        let k = self.key(key);
        let result: redis::RedisResult<u64> = conn.incr(&k, 1u64).await;
        if let Err(e) = result {
            tracing::warn!(key = %k, error = %e, "Cache invalidation failed");
        }
    }

    /// None when the cache is disabled.
    pub async fn health_check(&self) -> Option<bool> {
        let mut conn = self.conn.clone()?;
        Some(
            redis::cmd("PING")
                .query_async::<_, String>(&mut conn)
                .await
                .is_ok(),
        )
    }
}
