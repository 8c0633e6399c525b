//! Product API routes

use axum::Router;
use domain_catalog::{ProductService, handlers};

use crate::state::AppState;

/// Create products router
pub fn router(state: &AppState) -> Router {
    let service = ProductService::new(state.store.clone());
    handlers::products_router(service)
}
