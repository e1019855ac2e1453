use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use utoipa::OpenApi;

use axum_helpers::errors::responses::{
    BadRequestValidationResponse, InternalServerErrorResponse, NotFoundResponse,
    ServiceUnavailableResponse,
};

use crate::error::EventResult;
use crate::models::{Address, CreateEvent, Event, EventCreator, EventDetails, EventQuery, GeoJsonPoint};
use crate::repository::EventRepository;
use crate::service::EventService;

#[derive(OpenApi)]
#[openapi(
    paths(search_events, get_event, create_event),
    components(
        schemas(
            Event,
            CreateEvent,
            EventDetails,
            EventCreator,
            Address,
            GeoJsonPoint,
            EventQuery
        ),
        responses(
            BadRequestValidationResponse,
            NotFoundResponse,
            InternalServerErrorResponse,
            ServiceUnavailableResponse
        )
    ),
    tags(
        (name = "Events", description = "Event storage with geospatial and date-range search")
    )
)]
pub struct ApiDoc;

/// Routes for the events domain. Mount under `/events`.
pub fn router<R: EventRepository + 'static>(service: EventService<R>) -> Router {
    Router::new()
        .route("/", get(search_events::<R>).post(create_event::<R>))
        .route("/{id}", get(get_event::<R>))
        .with_state(service)
}

/// Search events by proximity and date range.
#[utoipa::path(
    get,
    path = "",
    tag = "Events",
    params(EventQuery),
    responses(
        (status = 200, description = "Matching events, capped at the requested limit", body = Vec<Event>),
        (status = 400, response = BadRequestValidationResponse),
        (status = 500, response = InternalServerErrorResponse),
        (status = 503, response = ServiceUnavailableResponse)
    )
)]
async fn search_events<R: EventRepository>(
    State(service): State<EventService<R>>,
    Query(query): Query<EventQuery>,
) -> EventResult<Json<Vec<Event>>> {
    let events = service.search_events(query).await?;
    Ok(Json(events))
}

/// Fetch a single event by id.
#[utoipa::path(
    get,
    path = "/{id}",
    tag = "Events",
    params(
        ("id" = String, Path, description = "Event identifier (24-character hex)")
    ),
    responses(
        (status = 200, description = "The event", body = Event),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse),
        (status = 503, response = ServiceUnavailableResponse)
    )
)]
async fn get_event<R: EventRepository>(
    State(service): State<EventService<R>>,
    Path(id): Path<String>,
) -> EventResult<Json<Event>> {
    let event = service.get_event(&id).await?;
    Ok(Json(event))
}

/// Create an event.
#[utoipa::path(
    post,
    path = "",
    tag = "Events",
    request_body = CreateEvent,
    responses(
        (status = 201, description = "The stored event with its assigned id", body = Event),
        (status = 400, response = BadRequestValidationResponse),
        (status = 500, response = InternalServerErrorResponse),
        (status = 503, response = ServiceUnavailableResponse)
    )
)]
async fn create_event<R: EventRepository>(
    State(service): State<EventService<R>>,
    Json(document): Json<serde_json::Value>,
) -> EventResult<(StatusCode, Json<Event>)> {
    let event = service.create_event(document).await?;
    Ok((StatusCode::CREATED, Json(event)))
}
