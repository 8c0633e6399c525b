//! Category API routes

use axum::Router;
use domain_catalog::{CategoryService, handlers};

use crate::state::AppState;

/// Create categories router
pub fn router(state: &AppState) -> Router {
    let service = CategoryService::new(state.store.clone());
    handlers::categories_router(service)
}
