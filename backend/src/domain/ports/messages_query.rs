//! Driving port for proximity reads.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::error::Error;
use crate::domain::message::{MessageId, MessageRecord};
use crate::domain::user::UserId;

/// Request for the messages around the caller's position.
///
/// Radius and age window are service policy, not caller input; see
/// [`NearbyPolicy`].
///
/// [`NearbyPolicy`]: crate::domain::NearbyPolicy
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NearbyMessagesRequest {
    /// Latitude in decimal degrees; validated by the service.
    pub latitude: f64,
    /// Longitude in decimal degrees; validated by the service.
    pub longitude: f64,
}

/// Transport-friendly projection of a [`MessageRecord`].
#[derive(Debug, Clone, PartialEq)]
pub struct MessagePayload {
    /// Unique message id.
    pub id: MessageId,
    /// Owning user id.
    pub author_id: UserId,
    /// Author name snapshot at creation time.
    pub author_display_name: String,
    /// Message body.
    pub content: String,
    /// Latitude in decimal degrees.
    pub latitude: f64,
    /// Longitude in decimal degrees.
    pub longitude: f64,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

impl From<MessageRecord> for MessagePayload {
    fn from(record: MessageRecord) -> Self {
        Self {
            id: record.id(),
            author_id: *record.author_id(),
            author_display_name: record.author_display_name().as_str().to_owned(),
            content: record.content().as_str().to_owned(),
            latitude: record.location().latitude(),
            longitude: record.location().longitude(),
            created_at: record.created_at(),
        }
    }
}

/// Ordered nearby result set, newest first.
#[derive(Debug, Clone, PartialEq)]
pub struct NearbyMessagesResponse {
    /// Matching messages, newest first.
    pub messages: Vec<MessagePayload>,
}

/// Use-cases that read from the message store.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MessagesQuery: Send + Sync {
    /// Return the messages within the configured radius of the caller,
    /// newest first.
    async fn nearby_messages(
        &self,
        request: NearbyMessagesRequest,
    ) -> Result<NearbyMessagesResponse, Error>;
}

/// Fixture implementation returning an empty result set.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureMessagesQuery;

#[async_trait]
impl MessagesQuery for FixtureMessagesQuery {
    async fn nearby_messages(
        &self,
        _request: NearbyMessagesRequest,
    ) -> Result<NearbyMessagesResponse, Error> {
        Ok(NearbyMessagesResponse {
            messages: Vec::new(),
        })
    }
}
