//! Port to the external authentication collaborator.
//!
//! Token issuance and cryptographic verification live outside this core; the
//! HTTP adapter only needs a way to resolve a bearer token to the caller's
//! id and display name before a handler runs.

use std::collections::HashMap;

use async_trait::async_trait;

use crate::domain::user::{AuthenticatedUser, DisplayName, UserId};

/// Errors raised by token verifier adapters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TokenVerifierError {
    /// The token is unknown, expired, or malformed.
    #[error("invalid bearer token")]
    InvalidToken,
    /// The verifier backend could not be reached.
    #[error("token verifier unavailable: {message}")]
    Unavailable {
        /// Adapter-supplied failure description.
        message: String,
    },
}

impl TokenVerifierError {
    /// Create an unavailable error.
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable {
            message: message.into(),
        }
    }
}

/// Port resolving a bearer token to the caller's identity.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TokenVerifier: Send + Sync {
    /// Resolve `token` to an authenticated user, or fail with
    /// [`TokenVerifierError::InvalidToken`].
    async fn verify(&self, token: &str) -> Result<AuthenticatedUser, TokenVerifierError>;
}

/// Static token table for tests and local runs.
///
/// # Examples
/// ```
/// use geonote::domain::ports::FixtureTokenVerifier;
/// use geonote::domain::{AuthenticatedUser, DisplayName, UserId};
///
/// let user = AuthenticatedUser {
///     user_id: UserId::random(),
///     display_name: DisplayName::new("Ada").unwrap(),
/// };
/// let verifier = FixtureTokenVerifier::default().with_token("secret", user);
/// ```
#[derive(Debug, Clone, Default)]
pub struct FixtureTokenVerifier {
    tokens: HashMap<String, AuthenticatedUser>,
}

impl FixtureTokenVerifier {
    /// Token accepted by [`FixtureTokenVerifier::with_default_user`].
    pub const DEFAULT_TOKEN: &'static str = "fixture-token";

    /// Register a token for the given user.
    pub fn with_token(mut self, token: impl Into<String>, user: AuthenticatedUser) -> Self {
        self.tokens.insert(token.into(), user);
        self
    }

    /// Verifier accepting [`Self::DEFAULT_TOKEN`] for a fixed local user.
    pub fn with_default_user() -> Self {
        let user = AuthenticatedUser {
            user_id: UserId::from_uuid(uuid::Uuid::nil()),
            display_name: DisplayName::new("Local User").expect("static name is valid"),
        };
        Self::default().with_token(Self::DEFAULT_TOKEN, user)
    }
}

#[async_trait]
impl TokenVerifier for FixtureTokenVerifier {
    async fn verify(&self, token: &str) -> Result<AuthenticatedUser, TokenVerifierError> {
        self.tokens
            .get(token)
            .cloned()
            .ok_or(TokenVerifierError::InvalidToken)
    }
}
