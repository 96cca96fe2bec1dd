//! Storage seams used by the services.
//!
//! Each trait exposes only the operations the services need, so the Postgres store,
//! the in-memory store, and test mocks are interchangeable.
use crate::{
    error::AppResult,
    models::{Genre, Movie, PreferencesLookup, Ranking, RankingCategory},
};

/// Movie records keyed by IMDB id
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait MovieStore: Send + Sync {
    /// All movies in the catalog
    async fn list(&self) -> AppResult<Vec<Movie>>;

    /// Exact lookup by IMDB id
    async fn find_by_id(&self, imdb_id: &str) -> AppResult<Option<Movie>>;

    /// Inserts a new movie; a duplicate id is a validation error
    async fn insert(&self, movie: Movie) -> AppResult<Movie>;

    /// Replaces the review text and ranking snapshot of the movie matching `imdb_id`.
    ///
    /// Returns `false` without writing anything when no movie matches.
    async fn update_review(
        &self,
        imdb_id: &str,
        admin_review: &str,
        ranking: &Ranking,
    ) -> AppResult<bool>;

    /// Movies sharing at least one genre name with `genres`, ordered by ascending
    /// ranking weight (unranked last), at most `limit` of them
    async fn find_by_genres(&self, genres: &[String], limit: i64) -> AppResult<Vec<Movie>>;
}

/// Read access to the ranking catalog
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait RankingCatalog: Send + Sync {
    /// Every category, in catalog order
    async fn load_all(&self) -> AppResult<Vec<RankingCategory>>;
}

/// Read access to user-owned favourite genres
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait PreferencesStore: Send + Sync {
    async fn favourite_genres(&self, user_id: &str) -> AppResult<PreferencesLookup>;
}

/// Read access to the genre list
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait GenreStore: Send + Sync {
    async fn list(&self) -> AppResult<Vec<Genre>>;
}
