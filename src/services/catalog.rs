use std::time::Duration;

use validator::Validate;

use crate::{
    db::{GenreStore, MovieStore},
    error::{AppError, AppResult},
    models::{CreateMovieRequest, Genre, Movie},
    services::bounded,
};

pub async fn list_movies(movies: &dyn MovieStore, timeout: Duration) -> AppResult<Vec<Movie>> {
    bounded(timeout, movies.list(), || {
        AppError::Timeout("listing movies".to_string())
    })
    .await
}

pub async fn get_movie(
    movies: &dyn MovieStore,
    imdb_id: &str,
    timeout: Duration,
) -> AppResult<Movie> {
    if imdb_id.trim().is_empty() {
        return Err(AppError::Validation("movie id is required".to_string()));
    }

    bounded(timeout, movies.find_by_id(imdb_id), || {
        AppError::Timeout(format!("loading movie {}", imdb_id))
    })
    .await?
    .ok_or_else(|| AppError::NotFound(format!("movie {} not found", imdb_id)))
}

/// Validates and stores a new, unranked movie
pub async fn add_movie(
    movies: &dyn MovieStore,
    request: CreateMovieRequest,
    timeout: Duration,
) -> AppResult<Movie> {
    request
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let movie = Movie::from(request);
    let imdb_id = movie.imdb_id.clone();

    let stored = bounded(timeout, movies.insert(movie), || {
        AppError::Persistence(format!("timed out inserting movie {}", imdb_id))
    })
    .await?;

    tracing::info!(movie_id = %stored.imdb_id, "Movie added");

    Ok(stored)
}

pub async fn list_genres(genres: &dyn GenreStore, timeout: Duration) -> AppResult<Vec<Genre>> {
    bounded(timeout, genres.list(), || {
        AppError::Timeout("listing genres".to_string())
    })
    .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::MemoryStore;

    const TIMEOUT: Duration = Duration::from_secs(5);

    fn request(imdb_id: &str) -> CreateMovieRequest {
        CreateMovieRequest {
            imdb_id: imdb_id.to_string(),
            title: "Heat".to_string(),
            poster_path: "/heat.jpg".to_string(),
            youtube_id: "2GfZl4kuVNI".to_string(),
            genre: vec![Genre::new(3, "Crime")],
        }
    }

    #[tokio::test]
    async fn test_add_then_get_movie() {
        let store = MemoryStore::new();
        let added = add_movie(&store, request("tt0113277"), TIMEOUT).await.unwrap();
        assert!(added.ranking.is_none());

        let fetched = get_movie(&store, "tt0113277", TIMEOUT).await.unwrap();
        assert_eq!(fetched, added);
    }

    #[tokio::test]
    async fn test_add_invalid_movie() {
        let store = MemoryStore::new();
        let mut invalid = request("tt0113277");
        invalid.genre.clear();

        let err = add_movie(&store, invalid, TIMEOUT).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
        assert!(list_movies(&store, TIMEOUT).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_get_missing_movie() {
        let store = MemoryStore::new();
        let err = get_movie(&store, "tt404", TIMEOUT).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }
}
