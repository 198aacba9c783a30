//! Message domain service: the orchestration layer between the HTTP adapter
//! and whichever [`MessageStore`] backend is configured.
//!
//! The service is stateless per request. It validates inbound values through
//! the domain constructors, applies the fixed nearby policy, delegates to
//! the store, and maps storage failures onto the error taxonomy. Which
//! backend sits behind the port is decided once at startup and is invisible
//! here.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Duration;
use serde_json::json;
use tracing::warn;

use crate::domain::error::Error;
use crate::domain::geo::{GeoPoint, GeoValidationError};
use crate::domain::message::{MessageContent, MessageValidationError, NewMessage};
use crate::domain::ports::{
    DeleteMessageRequest, DeleteMessageResponse, DeleteOutcome, MessagePayload, MessageStore,
    MessageStoreError, MessagesCommand, MessagesQuery, NearbyMessagesRequest,
    NearbyMessagesResponse, NearbyQuery, PostMessageRequest,
};

/// Fixed, system-wide parameters of the nearby query.
///
/// Callers supply only their position; radius and age window are service
/// policy so every client sees the same neighborhood.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NearbyPolicy {
    /// Inclusion radius in meters.
    pub radius_meters: f64,
    /// Maximum age of a returned message.
    pub max_age: Duration,
}

impl Default for NearbyPolicy {
    fn default() -> Self {
        Self {
            radius_meters: 100.0,
            max_age: Duration::hours(24),
        }
    }
}

/// Service implementing the message command and query driving ports.
#[derive(Clone)]
pub struct MessageService<S> {
    store: Arc<S>,
    policy: NearbyPolicy,
}

impl<S> MessageService<S> {
    /// Create a service over the given store with the default policy.
    pub fn new(store: Arc<S>) -> Self {
        Self::with_policy(store, NearbyPolicy::default())
    }

    /// Create a service with an explicit nearby policy.
    pub fn with_policy(store: Arc<S>, policy: NearbyPolicy) -> Self {
        Self { store, policy }
    }
}

fn map_store_error(error: MessageStoreError) -> Error {
    match error {
        MessageStoreError::Connection { message } => {
            warn!(error = %message, "message store unreachable");
            Error::service_unavailable(format!("message store unavailable: {message}"))
        }
        MessageStoreError::Query { message } => {
            warn!(error = %message, "message store operation failed");
            Error::internal(format!("message store error: {message}"))
        }
    }
}

fn map_content_error(error: &MessageValidationError) -> Error {
    let code = match error {
        MessageValidationError::EmptyContent => "empty_content",
        MessageValidationError::ContentTooLong => "content_too_long",
        MessageValidationError::InvalidId => "invalid_id",
    };
    Error::invalid_request(error.to_string())
        .with_details(json!({ "field": "content", "code": code }))
}

fn map_geo_error(error: &GeoValidationError) -> Error {
    let field = match error {
        GeoValidationError::LatitudeOutOfRange(_) => "latitude",
        GeoValidationError::LongitudeOutOfRange(_) => "longitude",
    };
    Error::invalid_request(error.to_string())
        .with_details(json!({ "field": field, "code": "out_of_range" }))
}

fn parse_location(latitude: f64, longitude: f64) -> Result<GeoPoint, Error> {
    GeoPoint::new(latitude, longitude).map_err(|err| map_geo_error(&err))
}

#[async_trait]
impl<S> MessagesCommand for MessageService<S>
where
    S: MessageStore,
{
    async fn post_message(&self, request: PostMessageRequest) -> Result<MessagePayload, Error> {
        let content =
            MessageContent::new(&request.content).map_err(|err| map_content_error(&err))?;
        let location = parse_location(request.latitude, request.longitude)?;

        let record = self
            .store
            .create(NewMessage {
                content,
                location,
                author_id: request.author.user_id,
                author_display_name: request.author.display_name,
            })
            .await
            .map_err(map_store_error)?;

        Ok(MessagePayload::from(record))
    }

    async fn delete_message(
        &self,
        request: DeleteMessageRequest,
    ) -> Result<DeleteMessageResponse, Error> {
        let outcome = self
            .store
            .delete(&request.id, &request.requester)
            .await
            .map_err(map_store_error)?;

        match outcome {
            DeleteOutcome::Deleted => Ok(DeleteMessageResponse { id: request.id }),
            DeleteOutcome::NotFound => {
                Err(Error::not_found(format!("message {} not found", request.id)))
            }
            DeleteOutcome::NotOwner => {
                Err(Error::forbidden("only the author may delete a message"))
            }
        }
    }
}

#[async_trait]
impl<S> MessagesQuery for MessageService<S>
where
    S: MessageStore,
{
    async fn nearby_messages(
        &self,
        request: NearbyMessagesRequest,
    ) -> Result<NearbyMessagesResponse, Error> {
        let center = parse_location(request.latitude, request.longitude)?;

        let records = self
            .store
            .query_nearby(NearbyQuery {
                center,
                radius_meters: self.policy.radius_meters,
                max_age: self.policy.max_age,
            })
            .await
            .map_err(map_store_error)?;

        Ok(NearbyMessagesResponse {
            messages: records.into_iter().map(MessagePayload::from).collect(),
        })
    }
}

#[cfg(test)]
#[path = "message_service_tests.rs"]
mod tests;
