//! Scan-backed `MessageStore` over a plain in-process key-value map.
//!
//! In-process double of the durable scan store: same retention semantics,
//! no external dependencies, no persistence across restarts. It backs tests
//! and the default local-development configuration.
//!
//! This backend has no spatial primitives at all: a nearby query reads every
//! record inside the retention window and applies the exact haversine filter
//! to each. Query cost is O(records-in-window), which is acceptable only
//! because the window bounds the candidate set; records older than the
//! window are purged on write and never scanned. `find_by_id` may still see
//! an aged-out record that no write has purged yet.
//!
//! The write lock makes the read-then-delete ownership check a single step,
//! so the conditional-delete race documented for remote stores does not
//! arise here.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use tokio::sync::RwLock;
use tracing::debug;

use crate::domain::message::{
    MessageId, MessageRecord, MessageRecordDraft, NewMessage, recency_key,
};
use crate::domain::ports::{DeleteOutcome, MessageStore, MessageStoreError, NearbyQuery};
use crate::domain::user::UserId;

/// In-memory scan backend with a bounded retention window.
pub struct MemoryScanStore {
    retention: Duration,
    records: RwLock<HashMap<MessageId, MessageRecord>>,
}

impl MemoryScanStore {
    /// Create a store with the default 24 hour retention window.
    pub fn new() -> Self {
        Self::with_retention(Duration::hours(24))
    }

    /// Create a store with an explicit retention window.
    pub fn with_retention(retention: Duration) -> Self {
        Self {
            retention,
            records: RwLock::new(HashMap::new()),
        }
    }

    /// Retention window applied to scans and purges.
    pub fn retention(&self) -> Duration {
        self.retention
    }

    fn is_expired(&self, record: &MessageRecord, now: DateTime<Utc>) -> bool {
        record.age_at(now) > self.retention
    }

    /// Insert a pre-built record, bypassing id and timestamp assignment.
    ///
    /// Integration tests use this to plant backdated records when exercising
    /// the retention window.
    #[cfg(any(test, feature = "test-support"))]
    pub async fn seed(&self, record: MessageRecord) {
        self.records.write().await.insert(record.id(), record);
    }
}

impl Default for MemoryScanStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MessageStore for MemoryScanStore {
    async fn create(&self, message: NewMessage) -> Result<MessageRecord, MessageStoreError> {
        let now = Utc::now();
        let NewMessage {
            content,
            location,
            author_id,
            author_display_name,
        } = message;
        let record = MessageRecord::new(MessageRecordDraft {
            id: MessageId::random(),
            author_id,
            author_display_name,
            content,
            location,
            created_at: now,
        });

        let mut records = self.records.write().await;
        let before = records.len();
        records.retain(|_, existing| !self.is_expired(existing, now));
        let purged = before - records.len();
        if purged > 0 {
            debug!(purged, "purged records past the retention window");
        }
        records.insert(record.id(), record.clone());

        Ok(record)
    }

    async fn find_by_id(
        &self,
        id: &MessageId,
    ) -> Result<Option<MessageRecord>, MessageStoreError> {
        Ok(self.records.read().await.get(id).cloned())
    }

    async fn delete(
        &self,
        id: &MessageId,
        requester: &UserId,
    ) -> Result<DeleteOutcome, MessageStoreError> {
        let mut records = self.records.write().await;
        match records.get(id) {
            None => Ok(DeleteOutcome::NotFound),
            Some(record) if record.author_id() != requester => Ok(DeleteOutcome::NotOwner),
            Some(_) => {
                records.remove(id);
                Ok(DeleteOutcome::Deleted)
            }
        }
    }

    async fn query_nearby(
        &self,
        query: NearbyQuery,
    ) -> Result<Vec<MessageRecord>, MessageStoreError> {
        let now = Utc::now();
        // Never hand out records past retention even when the caller's age
        // window is wider; they are scheduled for the next purge.
        let window = query.max_age.min(self.retention);

        let records = self.records.read().await;
        let mut matches: Vec<MessageRecord> = records
            .values()
            .filter(|record| record.age_at(now) <= window)
            .filter(|record| {
                record.location().distance_meters(&query.center) <= query.radius_meters
            })
            .cloned()
            .collect();
        drop(records);

        matches.sort_by(|a, b| recency_key(b).cmp(&recency_key(a)));
        Ok(matches)
    }
}

#[cfg(test)]
mod tests {
    //! Scan and retention behavior; the cross-backend contract suite lives
    //! in the integration tests.

    use rstest::rstest;

    use super::*;
    use crate::domain::geo::GeoPoint;
    use crate::domain::message::MessageContent;
    use crate::domain::user::DisplayName;

    fn new_message(content: &str, lat: f64, lng: f64, author: UserId) -> NewMessage {
        NewMessage {
            content: MessageContent::new(content).expect("valid content"),
            location: GeoPoint::new(lat, lng).expect("valid point"),
            author_id: author,
            author_display_name: DisplayName::new("Ada").expect("valid name"),
        }
    }

    fn backdated(record: &MessageRecord, age: Duration) -> MessageRecord {
        MessageRecord::new(MessageRecordDraft {
            id: record.id(),
            author_id: *record.author_id(),
            author_display_name: record.author_display_name().clone(),
            content: record.content().clone(),
            location: *record.location(),
            created_at: Utc::now() - age,
        })
    }

    fn nearby(lat: f64, lng: f64, radius: f64) -> NearbyQuery {
        NearbyQuery {
            center: GeoPoint::new(lat, lng).expect("valid point"),
            radius_meters: radius,
            max_age: Duration::hours(24),
        }
    }

    #[rstest]
    #[tokio::test]
    async fn created_record_is_visible_to_a_query_that_covers_it() {
        let store = MemoryScanStore::new();
        let author = UserId::random();
        let created = store
            .create(new_message("here", 52.52, 13.405, author))
            .await
            .expect("create succeeds");

        let found = store
            .query_nearby(nearby(52.52, 13.405, 100.0))
            .await
            .expect("query succeeds");
        assert_eq!(found, vec![created]);
    }

    #[rstest]
    #[tokio::test]
    async fn expired_record_is_invisible_to_queries_but_still_fetchable_by_id() {
        let store = MemoryScanStore::with_retention(Duration::hours(1));
        let author = UserId::random();
        let created = store
            .create(new_message("old news", 52.52, 13.405, author))
            .await
            .expect("create succeeds");
        let old = backdated(&created, Duration::hours(2));
        store.seed(old.clone()).await;

        let found = store
            .query_nearby(nearby(52.52, 13.405, 100.0))
            .await
            .expect("query succeeds");
        assert!(found.is_empty());

        // Not purged yet: no write has happened since it aged out.
        let by_id = store.find_by_id(&old.id()).await.expect("lookup succeeds");
        assert_eq!(by_id, Some(old));
    }

    #[rstest]
    #[tokio::test]
    async fn writes_purge_records_past_retention() {
        let store = MemoryScanStore::with_retention(Duration::hours(1));
        let author = UserId::random();
        let created = store
            .create(new_message("old news", 52.52, 13.405, author))
            .await
            .expect("create succeeds");
        let old = backdated(&created, Duration::hours(2));
        store.seed(old.clone()).await;

        store
            .create(new_message("fresh", 52.52, 13.405, author))
            .await
            .expect("create succeeds");

        let by_id = store.find_by_id(&old.id()).await.expect("lookup succeeds");
        assert!(by_id.is_none());
    }

    #[rstest]
    #[tokio::test]
    async fn delete_checks_ownership_before_mutating() {
        let store = MemoryScanStore::new();
        let owner = UserId::random();
        let stranger = UserId::random();
        let created = store
            .create(new_message("mine", 52.52, 13.405, owner))
            .await
            .expect("create succeeds");

        let refused = store
            .delete(&created.id(), &stranger)
            .await
            .expect("delete call succeeds");
        assert_eq!(refused, DeleteOutcome::NotOwner);
        assert!(
            store
                .find_by_id(&created.id())
                .await
                .expect("lookup succeeds")
                .is_some()
        );

        let deleted = store
            .delete(&created.id(), &owner)
            .await
            .expect("delete call succeeds");
        assert_eq!(deleted, DeleteOutcome::Deleted);

        let repeat = store
            .delete(&created.id(), &owner)
            .await
            .expect("delete call succeeds");
        assert_eq!(repeat, DeleteOutcome::NotFound);
    }
}
