//! Readiness endpoint

use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use axum_helpers::{run_health_checks, HealthCheckFuture};
use database::mongodb::check_health_detailed;
use serde_json::Value;
use std::time::Duration;

use crate::state::AppState;

/// Upper bound on a single readiness probe, well below the driver's
/// server selection timeout.
const READY_CHECK_TIMEOUT: Duration = Duration::from_secs(3);

async fn ready(
    State(state): State<AppState>,
) -> Result<(StatusCode, Json<Value>), (StatusCode, Json<Value>)> {
    let database = state.config.mongodb.database();

    let mongodb: HealthCheckFuture = Box::pin(async {
        let probe = check_health_detailed(&state.mongo_client, database);
        match tokio::time::timeout(READY_CHECK_TIMEOUT, probe).await {
            Ok(status) if status.healthy => Ok(()),
            Ok(status) => Err(status.message.unwrap_or_else(|| "ping failed".to_string())),
            Err(_) => Err(format!("no answer within {:?}", READY_CHECK_TIMEOUT)),
        }
    });

    run_health_checks(vec![("mongodb", mongodb)]).await
}

/// Router exposing `GET /ready`. Liveness (`/health`) comes from
/// `axum_helpers::health_router`.
pub fn router(state: AppState) -> Router {
    Router::new().route("/ready", get(ready)).with_state(state)
}
