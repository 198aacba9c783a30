//! Message HTTP handlers.
//!
//! ```text
//! POST   /api/v1/messages
//! GET    /api/v1/messages/nearby
//! DELETE /api/v1/messages/{id}
//! ```
//!
//! All three endpoints require a bearer token; the radius and age window for
//! nearby reads are fixed server policy rather than caller input.

use actix_web::{HttpResponse, delete, get, post, web};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::ports::{
    DeleteMessageRequest, DeleteMessageResponse, MessagePayload, NearbyMessagesRequest,
    NearbyMessagesResponse, PostMessageRequest,
};
use crate::domain::{Error, MessageId};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::BearerIdentity;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, parse_uuid, require};

/// Request payload for posting a message.
///
/// Fields are optional at the serde level so absences surface as field-level
/// validation errors instead of a bare deserialization failure.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PostMessageBody {
    /// Message text, 1 to 500 characters after trimming.
    pub content: Option<String>,
    /// Latitude in decimal degrees, [-90, 90].
    pub latitude: Option<f64>,
    /// Longitude in decimal degrees, [-180, 180].
    pub longitude: Option<f64>,
}

/// Query parameters for the nearby endpoint.
#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct NearbyParams {
    /// Latitude in decimal degrees, [-90, 90].
    pub latitude: Option<f64>,
    /// Longitude in decimal degrees, [-180, 180].
    pub longitude: Option<f64>,
}

/// A message as returned to clients.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MessageResponseBody {
    #[schema(format = "uuid")]
    pub id: String,
    #[schema(format = "uuid")]
    pub author_id: String,
    pub author_display_name: String,
    pub content: String,
    pub latitude: f64,
    pub longitude: f64,
    #[schema(format = "date-time")]
    pub created_at: String,
}

impl From<MessagePayload> for MessageResponseBody {
    fn from(payload: MessagePayload) -> Self {
        Self {
            id: payload.id.to_string(),
            author_id: payload.author_id.to_string(),
            author_display_name: payload.author_display_name,
            content: payload.content,
            latitude: payload.latitude,
            longitude: payload.longitude,
            created_at: payload.created_at.to_rfc3339(),
        }
    }
}

/// Response payload for the nearby endpoint; messages arrive newest first.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NearbyMessagesResponseBody {
    pub messages: Vec<MessageResponseBody>,
}

impl From<NearbyMessagesResponse> for NearbyMessagesResponseBody {
    fn from(response: NearbyMessagesResponse) -> Self {
        Self {
            messages: response
                .messages
                .into_iter()
                .map(MessageResponseBody::from)
                .collect(),
        }
    }
}

/// Confirmation returned after a delete.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DeleteMessageResponseBody {
    #[schema(format = "uuid")]
    pub id: String,
}

impl From<DeleteMessageResponse> for DeleteMessageResponseBody {
    fn from(response: DeleteMessageResponse) -> Self {
        Self {
            id: response.id.to_string(),
        }
    }
}

fn parse_post_request(
    body: PostMessageBody,
    identity: BearerIdentity,
) -> Result<PostMessageRequest, Error> {
    Ok(PostMessageRequest {
        content: require(body.content, FieldName::new("content"))?,
        latitude: require(body.latitude, FieldName::new("latitude"))?,
        longitude: require(body.longitude, FieldName::new("longitude"))?,
        author: identity.into_user(),
    })
}

/// Post a message pinned to the caller's position.
#[utoipa::path(
    post,
    path = "/api/v1/messages",
    request_body = PostMessageBody,
    responses(
        (status = 201, description = "Message created", body = MessageResponseBody),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorized", body = Error),
        (status = 503, description = "Service unavailable", body = Error)
    ),
    tags = ["messages"],
    operation_id = "postMessage",
    security(("BearerToken" = []))
)]
#[post("/messages")]
pub async fn post_message(
    state: web::Data<HttpState>,
    identity: BearerIdentity,
    payload: web::Json<PostMessageBody>,
) -> ApiResult<HttpResponse> {
    let request = parse_post_request(payload.into_inner(), identity)?;
    let created = state.messages.post_message(request).await?;
    Ok(HttpResponse::Created().json(MessageResponseBody::from(created)))
}

/// List messages near the caller's position, newest first.
#[utoipa::path(
    get,
    path = "/api/v1/messages/nearby",
    params(NearbyParams),
    responses(
        (status = 200, description = "Messages within the service radius", body = NearbyMessagesResponseBody),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorized", body = Error),
        (status = 503, description = "Service unavailable", body = Error)
    ),
    tags = ["messages"],
    operation_id = "nearbyMessages",
    security(("BearerToken" = []))
)]
#[get("/messages/nearby")]
pub async fn nearby_messages(
    state: web::Data<HttpState>,
    _identity: BearerIdentity,
    query: web::Query<NearbyParams>,
) -> ApiResult<web::Json<NearbyMessagesResponseBody>> {
    let params = query.into_inner();
    let request = NearbyMessagesRequest {
        latitude: require(params.latitude, FieldName::new("latitude"))?,
        longitude: require(params.longitude, FieldName::new("longitude"))?,
    };

    let response = state.messages_query.nearby_messages(request).await?;
    Ok(web::Json(NearbyMessagesResponseBody::from(response)))
}

/// Delete one of the caller's own messages.
#[utoipa::path(
    delete,
    path = "/api/v1/messages/{id}",
    params(("id" = String, Path, description = "Message id")),
    responses(
        (status = 200, description = "Message deleted", body = DeleteMessageResponseBody),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorized", body = Error),
        (status = 403, description = "Not the message owner", body = Error),
        (status = 404, description = "Message not found", body = Error),
        (status = 503, description = "Service unavailable", body = Error)
    ),
    tags = ["messages"],
    operation_id = "deleteMessage",
    security(("BearerToken" = []))
)]
#[delete("/messages/{id}")]
pub async fn delete_message(
    state: web::Data<HttpState>,
    identity: BearerIdentity,
    path: web::Path<String>,
) -> ApiResult<web::Json<DeleteMessageResponseBody>> {
    let id = parse_uuid(&path.into_inner(), FieldName::new("id"))?;
    let response = state
        .messages
        .delete_message(DeleteMessageRequest {
            id: MessageId::from_uuid(id),
            requester: identity.user().user_id,
        })
        .await?;

    Ok(web::Json(DeleteMessageResponseBody::from(response)))
}

#[cfg(test)]
#[path = "messages_tests.rs"]
mod tests;
