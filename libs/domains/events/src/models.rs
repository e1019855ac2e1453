use chrono::{DateTime, Utc};
use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize, Serializer};
use utoipa::{IntoParams, ToSchema};

/// A calendar event as stored in MongoDB and returned by the API.
///
/// Date-times are persisted as RFC 3339 strings in UTC. The storage
/// identifier is serialized as its 24-character hex form in API
/// responses and omitted entirely on insert so the database assigns it.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Event {
    /// Storage-assigned identifier.
    #[serde(
        rename = "_id",
        default,
        skip_serializing_if = "Option::is_none",
        serialize_with = "serialize_object_id_hex"
    )]
    #[schema(value_type = Option<String>, example = "5f2b8c9e4f1a2b3c4d5e6f70")]
    pub id: Option<ObjectId>,

    /// When the event starts.
    pub start_date: DateTime<Utc>,

    /// When the event ends, if bounded.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<DateTime<Utc>>,

    /// Event category, e.g. "meetup" or "conference".
    #[serde(rename = "type")]
    pub event_type: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<EventDetails>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub creator: Option<EventCreator>,

    /// Geocoded location. Present only on documents that were seeded
    /// with geodata; it is not accepted through the creation API.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<Address>,
}

impl Event {
    /// Builds a storable event from validated creation input. The id is
    /// left unset so the database assigns one on insert.
    pub fn new(input: CreateEvent) -> Self {
        Self {
            id: None,
            start_date: input.start_date,
            end_date: input.end_date,
            event_type: input.event_type,
            details: input.details,
            creator: input.creator,
            address: None,
        }
    }
}

// ObjectId would otherwise serialize as the extended-JSON
// {"$oid": "..."} object; clients expect the plain hex string.
fn serialize_object_id_hex<S>(id: &Option<ObjectId>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match id {
        Some(oid) => serializer.serialize_str(&oid.to_hex()),
        None => serializer.serialize_none(),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct EventDetails {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct EventCreator {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

/// GeoJSON location wrapper. The 2dsphere index lives on `address.loc`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Address {
    pub loc: GeoJsonPoint,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct GeoJsonPoint {
    /// Always "Point".
    #[serde(rename = "type")]
    pub kind: String,
    /// `[longitude, latitude]`, GeoJSON axis order.
    pub coordinates: [f64; 2],
}

/// Payload for creating an event. Documents are validated against the
/// event schema (see [`crate::schema`]) before being deserialized into
/// this type, so every violation is reported rather than only the first.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreateEvent {
    pub start_date: DateTime<Utc>,
    pub end_date: Option<DateTime<Utc>>,
    #[serde(rename = "type")]
    pub event_type: String,
    pub details: Option<EventDetails>,
    pub creator: Option<EventCreator>,
}

/// Raw query string for event search. Everything arrives as optional
/// text; normalization into typed [`crate::query::SearchParams`] happens
/// in the service layer.
#[derive(Debug, Clone, Default, Deserialize, ToSchema, IntoParams)]
pub struct EventQuery {
    /// Latitude of the search center, degrees in [-90, 90].
    pub lat: Option<String>,
    /// Longitude of the search center, degrees in [-180, 180].
    pub lon: Option<String>,
    /// Maximum distance from the center, in meters. Only meaningful
    /// together with `lat` and `lon`.
    pub distance: Option<String>,
    /// Inclusive lower bound, ISO-8601 calendar date (YYYY-MM-DD).
    pub from_date: Option<String>,
    /// Inclusive upper bound, ISO-8601 calendar date (YYYY-MM-DD).
    pub to_date: Option<String>,
    /// Maximum number of results to return. Defaults to 5.
    pub limit: Option<String>,
}
