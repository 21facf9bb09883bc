//! Products API - REST server over MongoDB

use axum_helpers::server::{create_production_app, create_router, health_router};
use core_config::tracing::{init_tracing, install_color_eyre};
use database::mongodb::{
    client_from_config, connect_from_config, connect_from_config_with_retry, Client,
};
use tracing::{info, warn};

mod api;
mod config;
mod openapi;
mod state;

use config::{Config, StartupPolicy};
use state::AppState;

/// Connect according to the startup policy.
///
/// Returns the client and whether the server answered.
async fn connect(config: &Config) -> eyre::Result<(Client, bool)> {
    match config.startup_policy {
        StartupPolicy::FailFast => {
            let client = connect_from_config_with_retry(&config.mongodb, None).await?;
            Ok((client, true))
        }
        StartupPolicy::Degrade => match connect_from_config(&config.mongodb).await {
            Ok(client) => Ok((client, true)),
            Err(e) => {
                warn!(
                    error = %e,
                    "MongoDB unreachable at startup; serving in degraded mode"
                );
                let client = client_from_config(&config.mongodb).await?;
                Ok((client, false))
            }
        },
    }
}

#[tokio::main]
async fn main() -> eyre::Result<()> {
    install_color_eyre();

    let config = Config::from_env()?;
    init_tracing(&config.environment);

    info!(
        url = %config.mongodb.redacted_url(),
        database = %config.mongodb.database(),
        policy = %config.startup_policy,
        "Connecting to MongoDB"
    );

    let (mongo_client, connected) = connect(&config).await?;
    let db = mongo_client.database(config.mongodb.database());

    let state = AppState {
        config: config.clone(),
        mongo_client,
        db,
    };

    if connected {
        info!(
            "Successfully connected to MongoDB database: {}",
            config.mongodb.database()
        );
        match (api::init_indexes(&state).await, config.startup_policy) {
            (Ok(()), _) => {}
            (Err(e), StartupPolicy::FailFast) => return Err(e),
            (Err(e), StartupPolicy::Degrade) => warn!(error = %e, "Failed to create indexes"),
        }
    }

    let api_routes = api::routes(&state).merge(health_router(config.app));
    let app = create_router::<openapi::ApiDoc>(api_routes, &config.server)?;

    info!(
        "Starting {} v{} on {}",
        config.app.name,
        config.app.version,
        config.server.address()
    );

    let mongo_client = state.mongo_client.clone();
    create_production_app(app, &config.server, async move {
        info!("Shutting down: closing MongoDB connections");
        mongo_client.shutdown().await;
        info!("MongoDB connection closed");
    })
    .await?;

    info!("Products API shutdown complete");
    Ok(())
}
