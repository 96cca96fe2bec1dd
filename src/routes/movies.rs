use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Extension, Json,
};

use crate::{
    error::{AppError, AppResult},
    middleware::RequestId,
    models::{CreateMovieRequest, Movie},
    routes::AppState,
    services::catalog,
};

/// Lists every movie
pub async fn list(State(state): State<AppState>) -> AppResult<Json<Vec<Movie>>> {
    let movies = catalog::list_movies(state.movies.as_ref(), state.store_timeout).await?;
    Ok(Json(movies))
}

/// Fetches one movie by IMDB id
pub async fn get(
    State(state): State<AppState>,
    Path(imdb_id): Path<String>,
) -> AppResult<Json<Movie>> {
    let movie = catalog::get_movie(state.movies.as_ref(), &imdb_id, state.store_timeout).await?;
    Ok(Json(movie))
}

/// Adds a movie
pub async fn create(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    body: Result<Json<CreateMovieRequest>, JsonRejection>,
) -> AppResult<(StatusCode, Json<Movie>)> {
    let Json(request) =
        body.map_err(|e| AppError::Validation(format!("invalid request body: {}", e)))?;

    tracing::info!(request_id = %request_id, movie_id = %request.imdb_id, "Adding movie");

    let movie = catalog::add_movie(state.movies.as_ref(), request, state.store_timeout).await?;
    Ok((StatusCode::CREATED, Json(movie)))
}
