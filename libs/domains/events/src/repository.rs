use async_trait::async_trait;
use mongodb::bson::oid::ObjectId;

use crate::error::EventResult;
use crate::models::Event;
use crate::query::SearchParams;

/// Storage abstraction for events. Mocked in service and handler tests.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EventRepository: Send + Sync {
    /// Returns events matching the normalized search parameters, capped
    /// at `params.limit`.
    async fn find(&self, params: SearchParams) -> EventResult<Vec<Event>>;

    /// Looks up a single event by its storage identifier.
    async fn find_by_id(&self, id: ObjectId) -> EventResult<Option<Event>>;

    /// Persists a new event and returns it with the assigned identifier.
    async fn insert(&self, event: Event) -> EventResult<Event>;
}
