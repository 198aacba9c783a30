//! Message entity and its validated value types.
//!
//! A [`MessageRecord`] is immutable once created: ids and timestamps are
//! assigned by the storage backend at creation time and never supplied by
//! clients. Adapters reconstruct records from storage through
//! [`MessageRecord::new`], which re-runs validation so invalid rows cannot
//! leak into the domain.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::geo::GeoPoint;
use super::user::{DisplayName, UserId};

/// Validation errors for message values.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MessageValidationError {
    /// Content was empty once trimmed.
    #[error("message content must not be empty")]
    EmptyContent,
    /// Content exceeded the length bound.
    #[error("message content must be at most {max} characters", max = MessageContent::MAX_CHARS)]
    ContentTooLong,
    /// The message id was not a valid UUID.
    #[error("message id must be a valid UUID")]
    InvalidId,
}

/// Opaque identifier of a message, assigned by the store at creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
pub struct MessageId(Uuid);

impl MessageId {
    /// Parse a message id from its string form.
    pub fn new(raw: &str) -> Result<Self, MessageValidationError> {
        Uuid::parse_str(raw)
            .map(Self)
            .map_err(|_| MessageValidationError::InvalidId)
    }

    /// Wrap an existing UUID.
    pub fn from_uuid(id: Uuid) -> Self {
        Self(id)
    }

    /// Generate a fresh random id. Called by storage backends on create.
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Access the inner UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Validated message body.
///
/// ## Invariants
/// - Non-empty after trimming surrounding whitespace.
/// - At most [`MessageContent::MAX_CHARS`] characters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
pub struct MessageContent(String);

impl MessageContent {
    /// Upper bound on content length in characters.
    pub const MAX_CHARS: usize = 500;

    /// Construct content from raw input, trimming whitespace first.
    pub fn new(raw: &str) -> Result<Self, MessageValidationError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(MessageValidationError::EmptyContent);
        }
        if trimmed.chars().count() > Self::MAX_CHARS {
            return Err(MessageValidationError::ContentTooLong);
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// The validated text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Input for [`MessageStore::create`]: everything except the server-assigned
/// id and timestamp.
///
/// [`MessageStore::create`]: crate::domain::ports::MessageStore::create
#[derive(Debug, Clone, PartialEq)]
pub struct NewMessage {
    /// Validated message body.
    pub content: MessageContent,
    /// Where the message was posted.
    pub location: GeoPoint,
    /// Owning user.
    pub author_id: UserId,
    /// Author name snapshot; deliberately not kept in sync with later
    /// renames so queries need no user lookup.
    pub author_display_name: DisplayName,
}

/// Field bundle for [`MessageRecord::new`].
#[derive(Debug, Clone, PartialEq)]
pub struct MessageRecordDraft {
    /// Unique message id.
    pub id: MessageId,
    /// Owning user.
    pub author_id: UserId,
    /// Author name snapshot at creation time.
    pub author_display_name: DisplayName,
    /// Validated message body.
    pub content: MessageContent,
    /// Where the message was posted.
    pub location: GeoPoint,
    /// Server-assigned creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// A persisted geotagged message.
///
/// Created only through a store's `create` operation and immutable
/// afterwards; destroyed only by an owner delete or by falling out of a
/// backend's retention window.
#[derive(Debug, Clone, PartialEq)]
pub struct MessageRecord {
    id: MessageId,
    author_id: UserId,
    author_display_name: DisplayName,
    content: MessageContent,
    location: GeoPoint,
    created_at: DateTime<Utc>,
}

impl MessageRecord {
    /// Assemble a record from already-validated parts.
    ///
    /// Storage adapters use this to rebuild records from rows; the value
    /// types carry the validation, so this constructor cannot fail.
    pub fn new(draft: MessageRecordDraft) -> Self {
        let MessageRecordDraft {
            id,
            author_id,
            author_display_name,
            content,
            location,
            created_at,
        } = draft;
        Self {
            id,
            author_id,
            author_display_name,
            content,
            location,
            created_at,
        }
    }

    /// Unique message id.
    pub fn id(&self) -> MessageId {
        self.id
    }

    /// Owning user id. Only this user may delete the record.
    pub fn author_id(&self) -> &UserId {
        &self.author_id
    }

    /// Author name snapshot at creation time.
    pub fn author_display_name(&self) -> &DisplayName {
        &self.author_display_name
    }

    /// Message body.
    pub fn content(&self) -> &MessageContent {
        &self.content
    }

    /// Where the message was posted.
    pub fn location(&self) -> &GeoPoint {
        &self.location
    }

    /// Creation timestamp; drives result ordering and retention filtering.
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Age of the record relative to `now`.
    pub fn age_at(&self, now: DateTime<Utc>) -> chrono::Duration {
        now - self.created_at
    }
}

/// Ordering key for nearby results: newest first, ties broken by id
/// descending so repeated queries over unchanged data return identical
/// sequences.
pub fn recency_key(record: &MessageRecord) -> (DateTime<Utc>, MessageId) {
    (record.created_at(), record.id())
}
