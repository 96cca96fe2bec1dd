use std::time::Duration;

use crate::{
    db::MovieStore,
    error::{AppError, AppResult},
    models::{Ranking, ReviewUpdateResponse},
    services::{bounded, classifier::SentimentClassifier},
};

/// Writes a review and its ranking snapshot onto exactly one movie.
///
/// The previous snapshot is replaced wholesale. Fails with `NotFound` when no movie
/// has `imdb_id`.
pub async fn persist_ranking(
    movies: &dyn MovieStore,
    imdb_id: &str,
    admin_review: &str,
    ranking: &Ranking,
    timeout: Duration,
) -> AppResult<()> {
    let matched = bounded(
        timeout,
        movies.update_review(imdb_id, admin_review, ranking),
        || AppError::Persistence(format!("timed out updating movie {}", imdb_id)),
    )
    .await?;

    if !matched {
        return Err(AppError::NotFound(format!("movie {} not found", imdb_id)));
    }

    Ok(())
}

/// Admin review update: classify the review, then store review and ranking.
///
/// A failed classification never reaches the store.
pub async fn update_review(
    classifier: &SentimentClassifier,
    movies: &dyn MovieStore,
    imdb_id: &str,
    admin_review: &str,
    store_timeout: Duration,
) -> AppResult<ReviewUpdateResponse> {
    if imdb_id.trim().is_empty() {
        return Err(AppError::Validation("movie id is required".to_string()));
    }
    if admin_review.trim().is_empty() {
        return Err(AppError::Validation("admin review is required".to_string()));
    }

    let ranking = classifier.classify(admin_review).await?;

    persist_ranking(movies, imdb_id, admin_review, &ranking, store_timeout).await?;

    tracing::info!(
        movie_id = %imdb_id,
        category = %ranking.category_name,
        weight = ranking.weight,
        "Admin review stored"
    );

    Ok(ReviewUpdateResponse {
        category_name: ranking.category_name,
        review_text: admin_review.to_string(),
    })
}
