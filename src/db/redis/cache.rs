use redis::AsyncCommands;
use redis::Client;
use std::fmt::Display;
use std::time::Duration;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;

use crate::error::AppError;
use crate::error::AppResult;

/// Upper bound on a single cache lookup
const READ_TIMEOUT: Duration = Duration::from_millis(500);

/// Keys of the values this service caches
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CacheKey {
    Genres,
}

impl Display for CacheKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CacheKey::Genres => write!(f, "reelrank:genres:all"),
        }
    }
}

/// Opens a Redis client. No connection is made until the first command.
pub fn create_redis_client(redis_url: &str) -> anyhow::Result<Client> {
    Ok(Client::open(redis_url)?)
}

struct PendingWrite {
    key: String,
    payload: String,
    ttl_secs: u64,
}

/// Read-through cache backed by Redis
///
/// Lookups are awaited by the caller and bounded by a short timeout. Writes are
/// queued to a single background task, so a slow or unreachable Redis never
/// delays a response. Values are stored as JSON.
#[derive(Clone)]
pub struct Cache {
    client: Client,
    queue: mpsc::UnboundedSender<PendingWrite>,
}

/// Owns the background writer; shut it down to flush queued writes
pub struct CacheWriterHandle {
    stop: oneshot::Sender<()>,
    task: JoinHandle<()>,
}

impl CacheWriterHandle {
    /// Stops accepting writes, flushes what is queued and waits for the writer to exit
    pub async fn shutdown(self) {
        let _ = self.stop.send(());
        if let Err(e) = self.task.await {
            tracing::error!(error = %e, "Cache writer task ended abnormally");
        }
    }
}

struct CacheWriter {
    client: Client,
    queue: mpsc::UnboundedReceiver<PendingWrite>,
}

impl CacheWriter {
    async fn run(self, mut stop: oneshot::Receiver<()>) {
        let Self { client, mut queue } = self;
        tracing::info!("Cache writer started");

        loop {
            tokio::select! {
                Some(write) = queue.recv() => Self::write(&client, write).await,
                _ = &mut stop => break,
            }
        }

        // Refuse new writes, then drain what is already queued
        queue.close();
        let mut flushed = 0usize;
        while let Some(write) = queue.recv().await {
            Self::write(&client, write).await;
            flushed += 1;
        }

        tracing::info!(flushed, "Cache writer stopped");
    }

    async fn write(client: &Client, write: PendingWrite) {
        let key = write.key.clone();
        if let Err(e) = Self::try_write(client, write).await {
            tracing::error!(key = %key, error = %e, "Cache write failed");
        }
    }

    async fn try_write(client: &Client, write: PendingWrite) -> AppResult<()> {
        let mut conn = client.get_multiplexed_async_connection().await?;
        let _: () = conn
            .set_ex(write.key, write.payload, write.ttl_secs)
            .await?;
        Ok(())
    }
}

impl Cache {
    /// Creates a cache and spawns its background writer on the current runtime
    pub fn new(client: Client) -> (Self, CacheWriterHandle) {
        let (queue_tx, queue_rx) = mpsc::unbounded_channel();
        let (stop_tx, stop_rx) = oneshot::channel();

        let writer = CacheWriter {
            client: client.clone(),
            queue: queue_rx,
        };
        let task = tokio::spawn(writer.run(stop_rx));

        (
            Self {
                client,
                queue: queue_tx,
            },
            CacheWriterHandle {
                stop: stop_tx,
                task,
            },
        )
    }

    /// Looks up and decodes a cached value, `None` on a miss
    ///
    /// Connection failures, slow replies and undecodable payloads are errors; callers
    /// decide whether to fall back to the source of truth.
    pub async fn get_from_cache<T: serde::de::DeserializeOwned>(
        &self,
        key: &CacheKey,
    ) -> AppResult<Option<T>> {
        let raw = tokio::time::timeout(READ_TIMEOUT, self.read_raw(key))
            .await
            .map_err(|_| AppError::Timeout(format!("cache read of {}", key)))??;

        raw.map(|json| {
            serde_json::from_str(&json)
                .map_err(|e| AppError::Internal(format!("undecodable cache entry {}: {}", key, e)))
        })
        .transpose()
    }

    async fn read_raw(&self, key: &CacheKey) -> AppResult<Option<String>> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        Ok(conn.get(key.to_string()).await?)
    }

    /// Queues `value` to be stored under `key` for `ttl_secs` seconds
    pub fn set_in_background<T: serde::Serialize>(&self, key: &CacheKey, value: &T, ttl_secs: u64) {
        let payload = match serde_json::to_string(value) {
            Ok(payload) => payload,
            Err(e) => {
                tracing::error!(key = %key, error = %e, "Value not cacheable");
                return;
            }
        };

        let write = PendingWrite {
            key: key.to_string(),
            payload,
            ttl_secs,
        };

        // Only fails once the writer has shut down
        if self.queue.send(write).is_err() {
            tracing::warn!(key = %key, "Cache writer stopped, dropping write");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const UNREACHABLE_REDIS: &str = "redis://127.0.0.1:1";

    #[test]
    fn test_cache_key_display_genres() {
        assert_eq!(CacheKey::Genres.to_string(), "reelrank:genres:all");
    }

    #[tokio::test]
    async fn test_read_from_unreachable_redis_is_an_error() {
        let (cache, handle) = Cache::new(create_redis_client(UNREACHABLE_REDIS).unwrap());

        let result: AppResult<Option<Vec<String>>> = cache.get_from_cache(&CacheKey::Genres).await;
        assert!(result.is_err());

        handle.shutdown().await;
    }

    #[tokio::test]
    async fn test_shutdown_drains_queue_even_when_writes_fail() {
        let (cache, handle) = Cache::new(create_redis_client(UNREACHABLE_REDIS).unwrap());

        cache.set_in_background(&CacheKey::Genres, &vec!["Drama"], 60);
        cache.set_in_background(&CacheKey::Genres, &vec!["Comedy"], 60);
        handle.shutdown().await;

        // Writer is gone; further writes are dropped rather than queued forever
        cache.set_in_background(&CacheKey::Genres, &vec!["Horror"], 60);
    }

    #[tokio::test]
    #[ignore = "requires a running Redis"]
    async fn test_set_in_background_writes_to_cache() {
        let redis_url =
            std::env::var("REDIS_URL").unwrap_or_else(|_| "redis://localhost:6379".to_string());

        let client = create_redis_client(&redis_url).unwrap();
        let (cache, handle) = Cache::new(client.clone());

        let value = vec!["Drama".to_string(), "Comedy".to_string()];
        cache.set_in_background(&CacheKey::Genres, &value, 60);
        handle.shutdown().await;

        let retrieved: Option<Vec<String>> = cache.get_from_cache(&CacheKey::Genres).await.unwrap();
        assert_eq!(retrieved, Some(value));

        let mut conn = client.get_multiplexed_async_connection().await.unwrap();
        let _: () = conn.del(CacheKey::Genres.to_string()).await.unwrap();
    }
}
