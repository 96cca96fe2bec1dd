use axum::{extract::State, Extension, Json};

use crate::{
    error::AppResult,
    middleware::{AuthUser, RequestId},
    models::Movie,
    routes::AppState,
};

/// Recommends movies for the authenticated user
pub async fn recommend(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Extension(user): Extension<AuthUser>,
) -> AppResult<Json<Vec<Movie>>> {
    tracing::info!(
        request_id = %request_id,
        user_id = %user.user_id,
        "Processing recommendation request"
    );

    let engine = &state.recommendations;
    let movies = engine.recommend(&user.user_id, engine.default_limit()).await?;

    Ok(Json(movies))
}
