use axum::{
    Extension, Json,
    extract::{
        Path, State,
        rejection::{JsonRejection, PathRejection},
    },
    http::StatusCode,
    response::IntoResponse,
};
use std::sync::Arc;

use super::{ApiError, ApiResponse, AppState, CategoryRequest, MessageResponse};
use crate::api::validation::path_id;
use crate::services::{AuthUser, Book, Category};

/// `GET /api/categories`
pub async fn list_categories(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<Vec<Category>>>, ApiError> {
    let categories = state.catalog_service().list_categories().await?;
    Ok(Json(ApiResponse::success(categories)))
}

/// `POST /api/categories`
pub async fn create_category(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    payload: Result<Json<CategoryRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(payload) = payload?;

    let category = state
        .catalog_service()
        .create_category(payload.name.as_deref(), &user.username)
        .await?;

    Ok((StatusCode::CREATED, Json(ApiResponse::success(category))))
}

/// `GET /api/categories/{id}`
pub async fn get_category(
    State(state): State<Arc<AppState>>,
    id: Result<Path<i32>, PathRejection>,
) -> Result<Json<ApiResponse<Category>>, ApiError> {
    let id = path_id("category", id)?;
    let category = state.catalog_service().get_category(id).await?;
    Ok(Json(ApiResponse::success(category)))
}

/// `DELETE /api/categories/{id}`
///
/// Refused with 400 while any book still references the category.
pub async fn delete_category(
    State(state): State<Arc<AppState>>,
    id: Result<Path<i32>, PathRejection>,
) -> Result<Json<ApiResponse<MessageResponse>>, ApiError> {
    let id = path_id("category", id)?;
    state.catalog_service().delete_category(id).await?;

    Ok(Json(ApiResponse::success(MessageResponse::new(format!(
        "Category {id} deleted"
    )))))
}

/// `GET /api/categories/{id}/books`
pub async fn list_category_books(
    State(state): State<Arc<AppState>>,
    id: Result<Path<i32>, PathRejection>,
) -> Result<Json<ApiResponse<Vec<Book>>>, ApiError> {
    let id = path_id("category", id)?;
    let books = state.catalog_service().list_books_by_category(id).await?;
    Ok(Json(ApiResponse::success(books)))
}
