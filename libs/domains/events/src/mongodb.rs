//! MongoDB-backed event repository.

use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use futures_util::TryStreamExt;
use mongodb::bson::oid::ObjectId;
use mongodb::bson::{doc, Document};
use mongodb::options::FindOptions;
use mongodb::{Collection, Database};
use tracing::instrument;

use crate::error::{EventError, EventResult};
use crate::models::Event;
use crate::query::{DateFilter, SearchParams};
use crate::repository::EventRepository;

pub const COLLECTION_NAME: &str = "events";

#[derive(Debug, Clone)]
pub struct MongoEventRepository {
    collection: Collection<Event>,
}

impl MongoEventRepository {
    pub fn new(database: &Database) -> Self {
        Self {
            collection: database.collection(COLLECTION_NAME),
        }
    }

    pub fn with_collection(collection: Collection<Event>) -> Self {
        Self { collection }
    }
}

/// Builds the MongoDB filter for a normalized search.
///
/// Proximity becomes a `$nearSphere` on the 2dsphere-indexed
/// `address.loc` field; documents without geodata never match it. A full
/// date window matches events whose start or end falls inside it, while
/// a single bound constrains only the corresponding side.
fn build_filter(params: &SearchParams) -> Document {
    let mut filter = Document::new();

    if let Some(geo) = params.geo {
        let mut near = doc! {
            "$geometry": {
                "type": "Point",
                "coordinates": [geo.lon, geo.lat],
            },
        };
        if let Some(max_distance) = geo.max_distance {
            near.insert("$maxDistance", max_distance);
        }
        filter.insert("address.loc", doc! { "$nearSphere": near });
    }

    match params.dates {
        Some(DateFilter::Between { from, to }) => {
            let window = doc! { "$gte": bound(from), "$lte": bound(to) };
            filter.insert(
                "$or",
                vec![
                    doc! { "start_date": window.clone() },
                    doc! { "end_date": window },
                ],
            );
        }
        Some(DateFilter::From(from)) => {
            filter.insert("start_date", doc! { "$gte": bound(from) });
        }
        Some(DateFilter::Until(to)) => {
            filter.insert("end_date", doc! { "$lte": bound(to) });
        }
        None => {}
    }

    filter
}

// Stored date-times are RFC 3339 strings in UTC, so bounds rendered the
// same way compare correctly as strings.
fn bound(dt: DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Secs, true)
}

#[async_trait]
impl EventRepository for MongoEventRepository {
    #[instrument(skip(self), fields(collection = COLLECTION_NAME))]
    async fn find(&self, params: SearchParams) -> EventResult<Vec<Event>> {
        let filter = build_filter(&params);
        tracing::debug!(?filter, limit = params.limit, "searching events");

        let options = FindOptions::builder().limit(params.limit).build();
        let cursor = self.collection.find(filter).with_options(options).await?;
        let events = cursor.try_collect().await?;
        Ok(events)
    }

    #[instrument(skip(self), fields(collection = COLLECTION_NAME))]
    async fn find_by_id(&self, id: ObjectId) -> EventResult<Option<Event>> {
        let event = self.collection.find_one(doc! { "_id": id }).await?;
        Ok(event)
    }

    #[instrument(skip(self, event), fields(collection = COLLECTION_NAME))]
    async fn insert(&self, event: Event) -> EventResult<Event> {
        let result = self.collection.insert_one(&event).await?;
        let id = result.inserted_id.as_object_id().ok_or_else(|| {
            EventError::Internal("insert did not return an ObjectId".to_string())
        })?;

        tracing::info!(id = %id, "event created");
        let mut stored = event;
        stored.id = Some(id);
        Ok(stored)
    }
}
