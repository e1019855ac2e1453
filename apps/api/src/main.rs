mod api;
mod config;
mod openapi;

use axum_helpers::server::{create_app, create_router, health_router};
use core_config::tracing::init_tracing;
use database::mongodb::connect_from_config_with_retry;
use eyre::WrapErr;

use crate::config::Config;
use crate::openapi::ApiDoc;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    let config = Config::from_env().wrap_err("failed to load configuration")?;
    init_tracing(&config.environment);

    tracing::info!(
        name = config.app.name,
        version = config.app.version,
        "starting service"
    );

    let client = connect_from_config_with_retry(&config.mongo, None)
        .await
        .wrap_err("failed to connect to MongoDB")?;

    let routes = api::routes(&client, &config.mongo.database);
    let router = create_router::<ApiDoc>(routes).merge(health_router(config.app));

    create_app(router, &config.server)
        .await
        .wrap_err("server error")?;

    Ok(())
}
