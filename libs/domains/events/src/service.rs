use std::sync::Arc;

use mongodb::bson::oid::ObjectId;
use tracing::instrument;

use crate::error::{EventError, EventResult};
use crate::models::{CreateEvent, Event, EventQuery};
use crate::query::SearchParams;
use crate::repository::EventRepository;
use crate::schema::EVENT_SCHEMA;

/// Business logic for events, generic over the storage backend.
pub struct EventService<R: EventRepository> {
    repository: Arc<R>,
}

impl<R: EventRepository> Clone for EventService<R> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
        }
    }
}

impl<R: EventRepository> EventService<R> {
    pub fn new(repository: R) -> Self {
        Self {
            repository: Arc::new(repository),
        }
    }

    /// Searches events by proximity and date range.
    #[instrument(skip(self))]
    pub async fn search_events(&self, query: EventQuery) -> EventResult<Vec<Event>> {
        let params = SearchParams::from_query(&query)?;
        self.repository.find(params).await
    }

    /// Fetches a single event. An id that is not a well-formed ObjectId
    /// cannot refer to any stored event, so it reports not-found rather
    /// than an internal error.
    #[instrument(skip(self))]
    pub async fn get_event(&self, id: &str) -> EventResult<Event> {
        let object_id =
            ObjectId::parse_str(id).map_err(|_| EventError::NotFound(id.to_string()))?;

        self.repository
            .find_by_id(object_id)
            .await?
            .ok_or_else(|| EventError::NotFound(id.to_string()))
    }

    /// Validates a raw document against the event schema and stores it.
    /// Returns every schema violation at once on failure.
    #[instrument(skip(self, document))]
    pub async fn create_event(&self, document: serde_json::Value) -> EventResult<Event> {
        let violations = EVENT_SCHEMA.validate(&document);
        if !violations.is_empty() {
            return Err(EventError::SchemaValidation(violations));
        }

        // The schema is a superset of the typed model, so this only
        // fails on programming errors.
        let input: CreateEvent = serde_json::from_value(document)
            .map_err(|e| EventError::Internal(format!("validated document rejected: {e}")))?;

        self.repository.insert(Event::new(input)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::DEFAULT_LIMIT;
    use crate::repository::MockEventRepository;
    use serde_json::json;

    fn service(repository: MockEventRepository) -> EventService<MockEventRepository> {
        EventService::new(repository)
    }

    fn stored_event(id: ObjectId) -> Event {
        Event {
            id: Some(id),
            start_date: "2026-03-01T18:00:00Z".parse().unwrap(),
            end_date: None,
            event_type: "meetup".to_string(),
            details: None,
            creator: None,
            address: None,
        }
    }

    #[tokio::test]
    async fn test_search_uses_default_limit() {
        let mut repository = MockEventRepository::new();
        repository
            .expect_find()
            .withf(|params| params.limit == DEFAULT_LIMIT)
            .times(1)
            .returning(|_| Ok(vec![]));

        let events = service(repository)
            .search_events(EventQuery::default())
            .await
            .unwrap();
        assert!(events.is_empty());
    }

    #[tokio::test]
    async fn test_search_rejects_bad_coordinates_before_storage() {
        let mut repository = MockEventRepository::new();
        repository.expect_find().never();

        let mut query = EventQuery::default();
        query.lat = Some("95".to_string());
        query.lon = Some("10".to_string());

        let err = service(repository).search_events(query).await.unwrap_err();
        assert!(matches!(err, EventError::InvalidParameter("lat")));
    }

    #[tokio::test]
    async fn test_get_event_found() {
        let id = ObjectId::new();
        let mut repository = MockEventRepository::new();
        repository
            .expect_find_by_id()
            .withf(move |candidate| *candidate == id)
            .returning(move |_| Ok(Some(stored_event(id))));

        let event = service(repository).get_event(&id.to_hex()).await.unwrap();
        assert_eq!(event.id, Some(id));
    }

    #[tokio::test]
    async fn test_get_event_missing_is_not_found() {
        let mut repository = MockEventRepository::new();
        repository.expect_find_by_id().returning(|_| Ok(None));

        let err = service(repository)
            .get_event(&ObjectId::new().to_hex())
            .await
            .unwrap_err();
        assert!(matches!(err, EventError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_get_event_malformed_id_is_not_found() {
        let mut repository = MockEventRepository::new();
        repository.expect_find_by_id().never();

        let err = service(repository).get_event("not-an-id").await.unwrap_err();
        assert!(matches!(err, EventError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_create_event_valid() {
        let id = ObjectId::new();
        let mut repository = MockEventRepository::new();
        repository
            .expect_insert()
            .withf(|event| event.id.is_none() && event.event_type == "meetup")
            .returning(move |mut event| {
                event.id = Some(id);
                Ok(event)
            });

        let event = service(repository)
            .create_event(json!({
                "start_date": "2026-03-01T18:00:00Z",
                "type": "meetup"
            }))
            .await
            .unwrap();
        assert_eq!(event.id, Some(id));
    }

    #[tokio::test]
    async fn test_create_event_reports_all_violations() {
        let mut repository = MockEventRepository::new();
        repository.expect_insert().never();

        let err = service(repository)
            .create_event(json!({"type": "", "surprise": true}))
            .await
            .unwrap_err();
        match err {
            EventError::SchemaValidation(violations) => {
                assert_eq!(violations.len(), 3);
            }
            other => panic!("expected schema violations, got {other:?}"),
        }
    }
}
