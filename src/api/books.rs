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

use super::{ApiError, ApiResponse, AppState, MessageResponse};
use crate::api::validation::path_id;
use crate::domain::BookRequest;
use crate::services::{AuthUser, Book};

/// `GET /api/books`
pub async fn list_books(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<Vec<Book>>>, ApiError> {
    let books = state.catalog_service().list_books().await?;
    Ok(Json(ApiResponse::success(books)))
}

/// `GET /api/books/{id}`
pub async fn get_book(
    State(state): State<Arc<AppState>>,
    id: Result<Path<i32>, PathRejection>,
) -> Result<Json<ApiResponse<Book>>, ApiError> {
    let id = path_id("book", id)?;
    let book = state.catalog_service().get_book(id).await?;
    Ok(Json(ApiResponse::success(book)))
}

/// `POST /api/books`
///
/// `thickness` is derived from `total_page`; a value in the body is ignored.
pub async fn create_book(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    payload: Result<Json<BookRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(payload) = payload?;

    let book = state
        .catalog_service()
        .create_book(payload, &user.username)
        .await?;

    Ok((StatusCode::CREATED, Json(ApiResponse::success(book))))
}

/// `PUT /api/books/{id}`
pub async fn update_book(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    id: Result<Path<i32>, PathRejection>,
    payload: Result<Json<BookRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<Book>>, ApiError> {
    let id = path_id("book", id)?;
    let Json(payload) = payload?;

    let book = state
        .catalog_service()
        .update_book(id, payload, &user.username)
        .await?;

    Ok(Json(ApiResponse::success(book)))
}

/// `DELETE /api/books/{id}`
pub async fn delete_book(
    State(state): State<Arc<AppState>>,
    id: Result<Path<i32>, PathRejection>,
) -> Result<Json<ApiResponse<MessageResponse>>, ApiError> {
    let id = path_id("book", id)?;
    state.catalog_service().delete_book(id).await?;

    Ok(Json(ApiResponse::success(MessageResponse::new(format!(
        "Book {id} deleted"
    )))))
}
