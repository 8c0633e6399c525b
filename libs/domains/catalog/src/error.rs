use axum::response::{IntoResponse, Response};
use axum_helpers::AppError;
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Resource not found: {0}")]
    NotFound(Uuid),

    #[error("Unknown category: {0}")]
    CategoryNotFound(Uuid),

    #[error("Resource {0} is still referenced and cannot be deleted")]
    IntegrityViolation(Uuid),

    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type CatalogResult<T> = Result<T, CatalogError>;

/// Convert CatalogError to AppError for standardized error responses
impl From<CatalogError> for AppError {
    fn from(err: CatalogError) -> Self {
        match err {
            CatalogError::NotFound(id) => AppError::NotFound(format!("Resource {} not found", id)),
            CatalogError::CategoryNotFound(id) => {
                AppError::UnprocessableEntity(format!("Category {} does not exist", id))
            }
            CatalogError::IntegrityViolation(id) => AppError::Conflict(format!(
                "Resource {} is referenced by other records and cannot be deleted",
                id
            )),
            CatalogError::Validation(msg) => AppError::BadRequest(msg),
            CatalogError::Internal(msg) => AppError::InternalServerError(msg),
        }
    }
}

impl IntoResponse for CatalogError {
    fn into_response(self) -> Response {
        // Convert to AppError for standardized error response format
        let app_error: AppError = self.into();
        app_error.into_response()
    }
}
