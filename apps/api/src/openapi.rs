use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Geoevents API",
        description = "Calendar events with geospatial proximity and date-range search"
    ),
    nest(
        (path = "/events", api = domain_events::ApiDoc)
    )
)]
pub struct ApiDoc;
