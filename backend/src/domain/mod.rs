//! Domain primitives, ports, and services.
//!
//! Purpose: strongly typed, transport-agnostic entities for the proximity
//! message store. Types are immutable; invariants and serialization
//! contracts are documented on each type.

pub mod error;
pub mod geo;
pub mod message;
mod message_service;
pub mod ports;
pub mod user;

pub use self::error::{Error, ErrorCode};
pub use self::geo::{
    BoundingBox, EARTH_RADIUS_METERS, GeoPoint, GeoValidationError, LongitudeSpan,
    proximity_bounds,
};
pub use self::message::{
    MessageContent, MessageId, MessageRecord, MessageRecordDraft, MessageValidationError,
    NewMessage, recency_key,
};
pub use self::message_service::{MessageService, NearbyPolicy};
pub use self::user::{AuthenticatedUser, DisplayName, UserId, UserValidationError};

/// Convenient result alias for operations returning domain errors.
pub type ApiResult<T> = Result<T, Error>;
