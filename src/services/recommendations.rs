use std::sync::Arc;

use crate::{
    config::RecommendationSettings,
    db::{MovieStore, PreferencesStore},
    error::{AppError, AppResult},
    models::{Movie, PreferencesLookup},
    services::bounded,
};

/// Genre-based recommendation engine
///
/// Recommends movies sharing at least one genre with the user's favourites, best
/// ranked first. Pure read, no side effects.
pub struct RecommendationEngine {
    preferences: Arc<dyn PreferencesStore>,
    movies: Arc<dyn MovieStore>,
    settings: RecommendationSettings,
}

impl RecommendationEngine {
    pub fn new(
        preferences: Arc<dyn PreferencesStore>,
        movies: Arc<dyn MovieStore>,
        settings: RecommendationSettings,
    ) -> Self {
        Self {
            preferences,
            movies,
            settings,
        }
    }

    /// Recommendation limit taken from configuration
    pub fn default_limit(&self) -> i64 {
        self.settings.limit
    }

    /// Resolves a user's favourite genre names.
    ///
    /// A user without a preferences record has no favourites. A record whose genres
    /// cannot be read is a `Preferences` error.
    pub async fn favourite_genres(&self, user_id: &str) -> AppResult<Vec<String>> {
        let lookup = bounded(
            self.settings.store_timeout,
            self.preferences.favourite_genres(user_id),
            || AppError::Preferences(format!("timed out loading preferences for {}", user_id)),
        )
        .await?;

        match lookup {
            PreferencesLookup::NotFound => Ok(Vec::new()),
            PreferencesLookup::Found(genres) => Ok(genres),
            PreferencesLookup::Malformed => Err(AppError::Preferences(format!(
                "unable to retrieve favourite genres for user {}",
                user_id
            ))),
        }
    }

    /// Recommends at most `limit` movies for `user_id`, ordered by ascending ranking
    /// weight with unranked movies last
    pub async fn recommend(&self, user_id: &str, limit: i64) -> AppResult<Vec<Movie>> {
        let genres = self.favourite_genres(user_id).await?;

        if genres.is_empty() {
            tracing::debug!(user_id = %user_id, "No favourite genres, nothing to recommend");
            return Ok(Vec::new());
        }

        let mut movies = bounded(
            self.settings.store_timeout,
            self.movies.find_by_genres(&genres, limit),
            || AppError::Timeout("fetching recommended movies".to_string()),
        )
        .await?;

        // The bound holds even for a store that ignores the limit
        movies.truncate(usize::try_from(limit).unwrap_or(0));

        tracing::info!(
            user_id = %user_id,
            genres = genres.len(),
            count = movies.len(),
            "Recommendations computed"
        );

        Ok(movies)
    }
}
