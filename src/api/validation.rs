use axum::extract::{Path, rejection::PathRejection};

use super::ApiError;

pub fn validate_id(resource: &str, id: i32) -> Result<i32, ApiError> {
    if id <= 0 {
        return Err(ApiError::validation(format!(
            "Invalid {} ID: {}. ID must be a positive integer",
            resource, id
        )));
    }
    Ok(id)
}

/// Unwraps a `{id}` path segment, turning non-numeric and non-positive ids
/// into 400s.
pub fn path_id(resource: &str, path: Result<Path<i32>, PathRejection>) -> Result<i32, ApiError> {
    let Path(id) = path?;
    validate_id(resource, id)
}
