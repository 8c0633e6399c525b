//! Catalog API - REST server for products and categories

use axum_helpers::server::health_router;
use core_config::Environment;
use core_config::tracing::{init_tracing, install_color_eyre};
use domain_catalog::{InMemoryCatalog, seed};
use tracing::info;

mod api;
mod config;
mod openapi;
mod state;

use config::Config;
use state::AppState;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    install_color_eyre();

    let config = Config::from_env()?;
    init_tracing(&config.environment);

    let store = InMemoryCatalog::new();
    if config.environment == Environment::Development {
        info!("Seeding demo catalog");
        seed::demo_catalog(&store).await?;
    }

    let state = AppState {
        config: config.clone(),
        store,
    };

    // Build REST router
    let api_routes = api::routes(&state);
    let router = axum_helpers::create_router::<openapi::ApiDoc>(api_routes).await?;
    let app = router.merge(health_router(state.config.app.clone()));

    info!(
        "Starting Catalog API - REST on port {}",
        state.config.server.port
    );

    axum_helpers::server::create_app(app, &state.config.server).await?;

    info!("Catalog API shutdown complete");
    Ok(())
}
