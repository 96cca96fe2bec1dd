use axum::{extract::State, Json};

use crate::{error::AppResult, models::Genre, routes::AppState, services::catalog};

/// Lists every genre
pub async fn list(State(state): State<AppState>) -> AppResult<Json<Vec<Genre>>> {
    let genres = catalog::list_genres(state.genres.as_ref(), state.store_timeout).await?;
    Ok(Json(genres))
}
