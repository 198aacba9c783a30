//! User identity primitives referenced by messages.
//!
//! The user aggregate itself (registration, credentials, profile) lives in an
//! external collaborator; this core only carries the owner id and a
//! denormalized display name captured at message creation time.

use std::fmt;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Validation errors for user identity values.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UserValidationError {
    /// The user id was not a valid UUID.
    #[error("user id must be a valid UUID")]
    InvalidId,
    /// The display name was empty once trimmed.
    #[error("display name must not be empty")]
    EmptyDisplayName,
    /// The display name exceeded the length bound.
    #[error("display name must be at most {max} characters", max = DisplayName::MAX_CHARS)]
    DisplayNameTooLong,
}

/// Opaque identifier of a user account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
pub struct UserId(Uuid);

impl UserId {
    /// Parse a user id from its string form.
    pub fn new(raw: &str) -> Result<Self, UserValidationError> {
        Uuid::parse_str(raw)
            .map(Self)
            .map_err(|_| UserValidationError::InvalidId)
    }

    /// Wrap an existing UUID.
    pub fn from_uuid(id: Uuid) -> Self {
        Self(id)
    }

    /// Generate a random id for fixtures and tests.
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Access the inner UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Validated human-readable name shown next to a message.
///
/// ## Invariants
/// - Non-empty after trimming surrounding whitespace.
/// - At most [`DisplayName::MAX_CHARS`] characters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
pub struct DisplayName(String);

impl DisplayName {
    /// Upper bound on display name length in characters.
    pub const MAX_CHARS: usize = 100;

    /// Construct a display name from raw input, trimming whitespace.
    pub fn new(raw: &str) -> Result<Self, UserValidationError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(UserValidationError::EmptyDisplayName);
        }
        if trimmed.chars().count() > Self::MAX_CHARS {
            return Err(UserValidationError::DisplayNameTooLong);
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// The validated name.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DisplayName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Caller identity resolved by the authentication collaborator.
///
/// The HTTP adapter obtains this from the bearer token before a handler body
/// runs; this core never issues or cryptographically verifies tokens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser {
    /// Stable account id of the caller.
    pub user_id: UserId,
    /// Display name snapshot used to denormalize onto created messages.
    pub display_name: DisplayName,
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    fn user_id_round_trips_through_string_form() {
        let id = UserId::random();
        let parsed = UserId::new(&id.to_string()).expect("valid id");
        assert_eq!(parsed, id);
    }

    #[rstest]
    fn user_id_rejects_garbage() {
        assert_eq!(
            UserId::new("not-a-uuid"),
            Err(UserValidationError::InvalidId)
        );
    }

    #[rstest]
    fn display_name_trims_whitespace() {
        let name = DisplayName::new("  Ada Lovelace  ").expect("valid name");
        assert_eq!(name.as_str(), "Ada Lovelace");
    }

    #[rstest]
    #[case("")]
    #[case("   ")]
    fn display_name_rejects_blank_input(#[case] raw: &str) {
        assert_eq!(
            DisplayName::new(raw),
            Err(UserValidationError::EmptyDisplayName)
        );
    }

    #[rstest]
    fn display_name_rejects_overlong_input() {
        let raw = "x".repeat(DisplayName::MAX_CHARS + 1);
        assert_eq!(
            DisplayName::new(&raw),
            Err(UserValidationError::DisplayNameTooLong)
        );
    }
}
