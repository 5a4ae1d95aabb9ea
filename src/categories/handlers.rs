use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use tracing::instrument;
use uuid::Uuid;

use crate::{categories::repo::Category, error::ApiError, response::ApiResponse, state::AppState};

pub fn category_routes() -> Router<AppState> {
    Router::new()
        .route("/categories", get(list_categories))
        .route("/categories/:id", get(get_category))
}

#[instrument(skip(state))]
pub async fn list_categories(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<Category>>>, ApiError> {
    let categories = Category::list(&state.db).await?;
    Ok(Json(ApiResponse::list(categories.len(), categories)))
}

#[instrument(skip(state))]
pub async fn get_category(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<Category>>, ApiError> {
    let category = Category::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Category not found with id of {}", id)))?;

    Ok(Json(ApiResponse::ok(category)))
}
