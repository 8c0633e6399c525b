//! Readiness endpoint

use axum::{Json, Router, extract::State, http::StatusCode, routing::get};
use axum_helpers::server::{HealthCheckFuture, run_health_checks};
use domain_catalog::CatalogRepository;
use serde_json::Value;

use crate::state::AppState;

type ReadyResponse = Result<(StatusCode, Json<Value>), (StatusCode, Json<Value>)>;

async fn ready(State(state): State<AppState>) -> ReadyResponse {
    let checks: Vec<(&str, HealthCheckFuture<'_>)> = vec![(
        "store",
        Box::pin(async {
            state
                .store
                .count()
                .await
                .map(|_| ())
                .map_err(|err| err.to_string())
        }),
    )];

    run_health_checks(checks).await
}

pub fn router(state: AppState) -> Router {
    Router::new().route("/ready", get(ready)).with_state(state)
}
