/// Read-through caching around an async computation.
///
/// Returns the cached value for `$key` when present. On a miss, awaits `$block`,
/// queues the result for writing with `$ttl` seconds to live, and returns it.
///
/// The cache is never the source of truth: when the read itself fails, the
/// failure is logged and `$block` is served directly without a write-back.
///
/// ```rust,ignore
/// let genres = cached!(self.cache, CacheKey::Genres, self.ttl, async move {
///     self.inner.list().await
/// });
/// ```
#[macro_export]
macro_rules! cached {
    ($cache:expr, $key:expr, $ttl:expr, $block:expr) => {{
        let key = $key;
        match $cache.get_from_cache(&key).await {
            Ok(Some(hit)) => Ok(hit),
            Ok(None) => {
                let value = $block.await?;
                $cache.set_in_background(&key, &value, $ttl);
                Ok(value)
            }
            Err(e) => {
                ::tracing::warn!(key = %key, error = %e, "Cache read failed, serving from source");
                $block.await
            }
        }
    }};
}
