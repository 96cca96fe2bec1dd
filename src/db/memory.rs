use std::collections::HashMap;
use std::sync::Arc;

use serde_json::Value;
use tokio::sync::RwLock;

use crate::{
    db::store::{GenreStore, MovieStore, PreferencesStore, RankingCatalog},
    error::{AppError, AppResult},
    models::{Genre, Movie, PreferencesLookup, Ranking, RankingCategory},
};

/// In-process implementation of every store trait
///
/// Follows the same ordering and matching rules as the Postgres store. Clones share
/// the same underlying data.
#[derive(Clone, Default)]
pub struct MemoryStore {
    inner: Arc<RwLock<MemoryStoreInner>>,
}

#[derive(Default)]
struct MemoryStoreInner {
    movies: Vec<Movie>,
    rankings: Vec<RankingCategory>,
    genres: Vec<Genre>,
    /// `None` models a preferences record without a favourite_genres field
    preferences: HashMap<String, Option<Value>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn with_rankings(self, rankings: Vec<RankingCategory>) -> Self {
        self.inner.write().await.rankings = rankings;
        self
    }

    pub async fn with_genres(self, genres: Vec<Genre>) -> Self {
        self.inner.write().await.genres = genres;
        self
    }

    pub async fn with_movies(self, movies: Vec<Movie>) -> Self {
        self.inner.write().await.movies = movies;
        self
    }

    /// Stores a raw preferences record for `user_id`
    pub async fn set_preferences(&self, user_id: &str, favourite_genres: Option<Value>) {
        self.inner
            .write()
            .await
            .preferences
            .insert(user_id.to_string(), favourite_genres);
    }
}

#[async_trait::async_trait]
impl MovieStore for MemoryStore {
    async fn list(&self) -> AppResult<Vec<Movie>> {
        let mut movies = self.inner.read().await.movies.clone();
        movies.sort_by(|a, b| a.imdb_id.cmp(&b.imdb_id));
        Ok(movies)
    }

    async fn find_by_id(&self, imdb_id: &str) -> AppResult<Option<Movie>> {
        let inner = self.inner.read().await;
        Ok(inner.movies.iter().find(|m| m.imdb_id == imdb_id).cloned())
    }

    async fn insert(&self, movie: Movie) -> AppResult<Movie> {
        let mut inner = self.inner.write().await;
        if inner.movies.iter().any(|m| m.imdb_id == movie.imdb_id) {
            return Err(AppError::Validation(format!(
                "movie {} already exists",
                movie.imdb_id
            )));
        }
        inner.movies.push(movie.clone());
        Ok(movie)
    }

    async fn update_review(
        &self,
        imdb_id: &str,
        admin_review: &str,
        ranking: &Ranking,
    ) -> AppResult<bool> {
        let mut inner = self.inner.write().await;
        match inner.movies.iter_mut().find(|m| m.imdb_id == imdb_id) {
            Some(movie) => {
                movie.admin_review = Some(admin_review.to_string());
                movie.ranking = Some(ranking.clone());
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn find_by_genres(&self, genres: &[String], limit: i64) -> AppResult<Vec<Movie>> {
        let inner = self.inner.read().await;

        let mut matches: Vec<Movie> = inner
            .movies
            .iter()
            .filter(|m| m.has_any_genre(genres))
            .cloned()
            .collect();

        // Ranked movies first by ascending weight, unranked after
        matches.sort_by_key(|m| match m.ranking_weight() {
            Some(weight) => (0, weight),
            None => (1, 0),
        });
        matches.truncate(usize::try_from(limit).unwrap_or(0));

        Ok(matches)
    }
}

#[async_trait::async_trait]
impl RankingCatalog for MemoryStore {
    async fn load_all(&self) -> AppResult<Vec<RankingCategory>> {
        Ok(self.inner.read().await.rankings.clone())
    }
}

#[async_trait::async_trait]
impl PreferencesStore for MemoryStore {
    async fn favourite_genres(&self, user_id: &str) -> AppResult<PreferencesLookup> {
        let inner = self.inner.read().await;
        Ok(match inner.preferences.get(user_id) {
            None => PreferencesLookup::NotFound,
            Some(field) => PreferencesLookup::from_stored(field.as_ref()),
        })
    }
}

#[async_trait::async_trait]
impl GenreStore for MemoryStore {
    async fn list(&self) -> AppResult<Vec<Genre>> {
        Ok(self.inner.read().await.genres.clone())
    }
}
