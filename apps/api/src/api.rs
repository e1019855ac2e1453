use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use axum_helpers::server::{run_health_checks, HealthCheckFuture};
use database::mongodb::{check_health, Client};
use domain_events::{EventService, MongoEventRepository};
use serde_json::Value;

/// Wires the domain routes to their MongoDB backends and adds the
/// readiness probe.
pub fn routes(client: &Client, database_name: &str) -> Router {
    let database = client.database(database_name);
    let repository = MongoEventRepository::new(&database);
    let service = EventService::new(repository);

    Router::new()
        .nest("/events", domain_events::router(service))
        .merge(ready_router(client.clone()))
}

fn ready_router(client: Client) -> Router {
    Router::new()
        .route("/ready", get(ready))
        .with_state(client)
}

/// Readiness probe: 200 when every backing service answers, 503 otherwise.
async fn ready(
    State(client): State<Client>,
) -> Result<(StatusCode, Json<Value>), (StatusCode, Json<Value>)> {
    let checks: Vec<(&str, HealthCheckFuture<'_>)> = vec![(
        "mongodb",
        Box::pin(async {
            if check_health(&client).await {
                Ok(())
            } else {
                Err("mongodb unreachable".to_string())
            }
        }),
    )];

    run_health_checks(checks).await
}
