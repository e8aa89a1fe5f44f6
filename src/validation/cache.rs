use super::DomainRecords;
use async_trait::async_trait;
use redis::{AsyncCommands, Client, RedisError};
use std::sync::Arc;

/// The two Redis commands the cache needs.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RecordsStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, RedisError>;

    /// Stores `value` under `key`, expiring after `ttl` seconds (`SETEX`).
    async fn set(&self, key: &str, value: String, ttl: u64) -> Result<(), RedisError>;
}

/// [`RecordsStore`] over a multiplexed async Redis connection.
pub struct RedisStore {
    client: Client,
}

impl RedisStore {
    /// Parses `redis_url`; no connection is made until the first command.
    pub fn open(redis_url: &str) -> Result<Self, RedisError> {
        Ok(Self {
            client: Client::open(redis_url)?,
        })
    }
}

#[async_trait]
impl RecordsStore for RedisStore {
    async fn get(&self, key: &str) -> Result<Option<String>, RedisError> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        conn.get(key).await
    }

    async fn set(&self, key: &str, value: String, ttl: u64) -> Result<(), RedisError> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        let _: () = conn.set_ex(key, value, ttl).await?;
        Ok(())
    }
}

/// Memo of resolved [`DomainRecords`], keyed by ASCII domain.
///
/// Entries are written with a TTL, so the store drops them once `ttl`
/// seconds have passed. Every store failure is logged and reported as a miss.
#[derive(Clone)]
pub struct RecordsCache {
    store: Arc<dyn RecordsStore>,
    ttl: u64,
}

impl RecordsCache {
    /// Cache backed by Redis at `redis_url`.
    pub fn new(redis_url: &str, ttl: u64) -> Result<Self, RedisError> {
        Ok(Self::with_store(Arc::new(RedisStore::open(redis_url)?), ttl))
    }

    pub fn with_store(store: Arc<dyn RecordsStore>, ttl: u64) -> Self {
        Self { store, ttl }
    }

    pub fn ttl(&self) -> u64 {
        self.ttl
    }

    pub(crate) fn cache_key(ascii_domain: &str) -> String {
        format!("dns_records::{}", ascii_domain)
    }

    pub async fn get_records(&self, ascii_domain: &str) -> Option<DomainRecords> {
        let json = match self.store.get(&Self::cache_key(ascii_domain)).await {
            Ok(json) => json?,
            Err(err) => {
                tracing::warn!(ascii_domain, error = %err, "records cache read failed");
                return None;
            }
        };

        match serde_json::from_str(&json) {
            Ok(records) => Some(records),
            Err(err) => {
                tracing::warn!(ascii_domain, error = %err, "ignoring undecodable cache entry");
                None
            }
        }
    }

    pub async fn set_records(&self, ascii_domain: &str, records: &DomainRecords) {
        let json = match serde_json::to_string(records) {
            Ok(json) => json,
            Err(err) => {
                tracing::warn!(ascii_domain, error = %err, "cannot encode records for cache");
                return;
            }
        };

        if let Err(err) = self
            .store
            .set(&Self::cache_key(ascii_domain), json, self.ttl)
            .await
        {
            tracing::warn!(ascii_domain, error = %err, "records cache write failed");
        }
    }
}
