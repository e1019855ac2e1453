//! Events domain: calendar events with geospatial and date-range search.
//!
//! Layered the same way as the other domains:
//! - [`handlers`] — HTTP surface and OpenAPI paths
//! - [`service`] — business logic over an abstract repository
//! - [`repository`] / [`mongodb`] — storage trait and its MongoDB backend
//! - [`schema`] — declarative validation of creation payloads
//! - [`query`] — normalization of the raw search query string

pub mod error;
pub mod handlers;
pub mod models;
pub mod mongodb;
pub mod query;
pub mod repository;
pub mod schema;
pub mod service;

pub use error::{EventError, EventResult};
pub use handlers::{router, ApiDoc};
pub use models::{CreateEvent, Event, EventQuery};
pub use mongodb::MongoEventRepository;
pub use query::SearchParams;
pub use repository::EventRepository;
pub use service::EventService;
