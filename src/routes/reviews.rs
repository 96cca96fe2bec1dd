use axum::{
    extract::{rejection::JsonRejection, Path, State},
    Extension, Json,
};

use crate::{
    error::{AppError, AppResult},
    middleware::{AuthUser, RequestId},
    models::{ReviewUpdateRequest, ReviewUpdateResponse},
    routes::AppState,
    services::review,
};

/// Classifies an admin review and stores it with its ranking on the movie
pub async fn update(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Extension(user): Extension<AuthUser>,
    Path(imdb_id): Path<String>,
    body: Result<Json<ReviewUpdateRequest>, JsonRejection>,
) -> AppResult<Json<ReviewUpdateResponse>> {
    user.require_admin()?;

    let Json(request) =
        body.map_err(|e| AppError::Validation(format!("invalid request body: {}", e)))?;

    tracing::info!(
        request_id = %request_id,
        movie_id = %imdb_id,
        user_id = %user.user_id,
        "Processing admin review update"
    );

    let response = review::update_review(
        &state.classifier,
        state.movies.as_ref(),
        &imdb_id,
        &request.admin_review,
        state.store_timeout,
    )
    .await?;

    Ok(Json(response))
}
