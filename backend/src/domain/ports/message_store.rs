//! Driven port for message persistence and proximity queries.
//!
//! Three adapters implement this contract: the retention-bounded in-memory
//! store, the PostgreSQL scan store, and the index-backed PostgreSQL store.
//! Callers must not be able to tell them apart except by latency and
//! durability, which the shared contract test suite enforces.

use async_trait::async_trait;
use chrono::Duration;

use crate::domain::geo::GeoPoint;
use crate::domain::message::{MessageId, MessageRecord, NewMessage};
use crate::domain::user::UserId;

/// Errors raised by message store adapters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MessageStoreError {
    /// The backing storage could not be reached.
    #[error("message store connection failed: {message}")]
    Connection {
        /// Adapter-supplied failure description.
        message: String,
    },
    /// A query or mutation failed during execution.
    #[error("message store query failed: {message}")]
    Query {
        /// Adapter-supplied failure description.
        message: String,
    },
}

impl MessageStoreError {
    /// Create a connection error.
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    /// Create a query error.
    pub fn query(message: impl Into<String>) -> Self {
        Self::Query {
            message: message.into(),
        }
    }
}

/// Result of an ownership-checked delete.
///
/// Delete is not idempotent-success: repeating a delete of an id that is
/// already gone reports [`DeleteOutcome::NotFound`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    /// The record existed, the requester owned it, and it was removed.
    Deleted,
    /// No record with this id exists.
    NotFound,
    /// The record exists but belongs to a different user; nothing was
    /// mutated.
    NotOwner,
}

/// Parameters of a proximity query.
#[derive(Debug, Clone, PartialEq)]
pub struct NearbyQuery {
    /// Query center.
    pub center: GeoPoint,
    /// Inclusion radius in meters (great-circle distance).
    pub radius_meters: f64,
    /// Maximum record age at query time.
    pub max_age: Duration,
}

/// Port for persisting geotagged messages and answering radius queries.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MessageStore: Send + Sync {
    /// Persist a new message, assigning a fresh id and creation timestamp.
    ///
    /// The returned record becomes visible to subsequent nearby queries
    /// whose radius and age window include it, subject to the storage
    /// backend's read-after-write consistency (eventual, not strict).
    async fn create(&self, message: NewMessage) -> Result<MessageRecord, MessageStoreError>;

    /// Find a message by id. May return records that have aged out of the
    /// retention window but have not yet been purged.
    async fn find_by_id(
        &self,
        id: &MessageId,
    ) -> Result<Option<MessageRecord>, MessageStoreError>;

    /// Delete a message if `requester` owns it.
    ///
    /// The ownership check and the removal are a single logical step from
    /// the caller's perspective; adapters use a conditional primitive where
    /// the storage offers one.
    async fn delete(
        &self,
        id: &MessageId,
        requester: &UserId,
    ) -> Result<DeleteOutcome, MessageStoreError>;

    /// Return every record within `query.radius_meters` of `query.center`
    /// created within `query.max_age`, newest first (ties broken by id
    /// descending). An empty result set is `Ok`, never an error.
    async fn query_nearby(
        &self,
        query: NearbyQuery,
    ) -> Result<Vec<MessageRecord>, MessageStoreError>;
}

/// Fixture implementation for wiring tests that never touch storage.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureMessageStore;

#[async_trait]
impl MessageStore for FixtureMessageStore {
    async fn create(&self, message: NewMessage) -> Result<MessageRecord, MessageStoreError> {
        let NewMessage {
            content,
            location,
            author_id,
            author_display_name,
        } = message;
        Ok(MessageRecord::new(crate::domain::message::MessageRecordDraft {
            id: MessageId::random(),
            author_id,
            author_display_name,
            content,
            location,
            created_at: chrono::Utc::now(),
        }))
    }

    async fn find_by_id(
        &self,
        _id: &MessageId,
    ) -> Result<Option<MessageRecord>, MessageStoreError> {
        Ok(None)
    }

    async fn delete(
        &self,
        _id: &MessageId,
        _requester: &UserId,
    ) -> Result<DeleteOutcome, MessageStoreError> {
        Ok(DeleteOutcome::NotFound)
    }

    async fn query_nearby(
        &self,
        _query: NearbyQuery,
    ) -> Result<Vec<MessageRecord>, MessageStoreError> {
        Ok(Vec::new())
    }
}
