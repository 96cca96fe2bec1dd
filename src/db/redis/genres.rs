use std::sync::Arc;

use crate::{
    cached,
    db::{
        redis::{Cache, CacheKey},
        store::GenreStore,
    },
    error::AppResult,
    models::Genre,
};

/// Genre store decorator that serves the genre list from Redis
pub struct CachedGenreStore {
    inner: Arc<dyn GenreStore>,
    cache: Cache,
    ttl: u64,
}

impl CachedGenreStore {
    pub fn new(inner: Arc<dyn GenreStore>, cache: Cache, ttl: u64) -> Self {
        Self { inner, cache, ttl }
    }
}

#[async_trait::async_trait]
impl GenreStore for CachedGenreStore {
    async fn list(&self) -> AppResult<Vec<Genre>> {
        cached!(self.cache, CacheKey::Genres, self.ttl, async move {
            let genres = self.inner.list().await?;
            tracing::debug!(count = genres.len(), "Genre list loaded from store");
            Ok::<_, crate::error::AppError>(genres)
        })
    }
}
