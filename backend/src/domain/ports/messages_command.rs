//! Driving port for message mutations: post and owner-checked delete.

use async_trait::async_trait;

use crate::domain::error::Error;
use crate::domain::message::{MessageId, MessageRecord};
use crate::domain::user::{AuthenticatedUser, UserId};

use super::messages_query::MessagePayload;

/// Request to post a new message at the caller's position.
#[derive(Debug, Clone, PartialEq)]
pub struct PostMessageRequest {
    /// Raw message body; validated by the service.
    pub content: String,
    /// Latitude in decimal degrees; validated by the service.
    pub latitude: f64,
    /// Longitude in decimal degrees; validated by the service.
    pub longitude: f64,
    /// Caller identity resolved by the authentication collaborator.
    pub author: AuthenticatedUser,
}

/// Request to delete a message owned by the requester.
#[derive(Debug, Clone, PartialEq)]
pub struct DeleteMessageRequest {
    /// Target message.
    pub id: MessageId,
    /// Caller asking for the delete; must match the record's author.
    pub requester: UserId,
}

/// Confirmation returned after a successful delete.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteMessageResponse {
    /// Id of the removed message.
    pub id: MessageId,
}

/// Use-cases that mutate the message store.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MessagesCommand: Send + Sync {
    /// Validate and persist a new message for the authenticated caller.
    async fn post_message(&self, request: PostMessageRequest) -> Result<MessagePayload, Error>;

    /// Delete a message after checking ownership.
    async fn delete_message(
        &self,
        request: DeleteMessageRequest,
    ) -> Result<DeleteMessageResponse, Error>;
}

/// Fixture implementation for handler tests that never reach a store.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureMessagesCommand;

#[async_trait]
impl MessagesCommand for FixtureMessagesCommand {
    async fn post_message(&self, request: PostMessageRequest) -> Result<MessagePayload, Error> {
        use crate::domain::geo::GeoPoint;
        use crate::domain::message::{MessageContent, MessageRecordDraft};

        let content = MessageContent::new(&request.content)
            .map_err(|err| Error::invalid_request(err.to_string()))?;
        let location = GeoPoint::new(request.latitude, request.longitude)
            .map_err(|err| Error::invalid_request(err.to_string()))?;
        let record = MessageRecord::new(MessageRecordDraft {
            id: MessageId::random(),
            author_id: request.author.user_id,
            author_display_name: request.author.display_name,
            content,
            location,
            created_at: chrono::Utc::now(),
        });
        Ok(MessagePayload::from(record))
    }

    async fn delete_message(
        &self,
        request: DeleteMessageRequest,
    ) -> Result<DeleteMessageResponse, Error> {
        let DeleteMessageRequest { id, .. } = request;
        Err(Error::not_found(format!("message {id} not found")))
    }
}
