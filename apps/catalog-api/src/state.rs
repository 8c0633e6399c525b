//! Application state management

use domain_catalog::InMemoryCatalog;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub config: crate::config::Config,
    pub store: InMemoryCatalog,
}
