//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports (use-cases) and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{MessagesCommand, MessagesQuery, TokenVerifier};

/// Dependency bundle for HTTP handlers.
///
/// # Examples
/// ```
/// use std::sync::Arc;
///
/// use geonote::domain::ports::{
///     FixtureMessagesCommand, FixtureMessagesQuery, FixtureTokenVerifier,
/// };
/// use geonote::inbound::http::state::HttpState;
///
/// let state = HttpState::new(
///     Arc::new(FixtureMessagesCommand),
///     Arc::new(FixtureMessagesQuery),
///     Arc::new(FixtureTokenVerifier::with_default_user()),
/// );
/// let _messages = state.messages.clone();
/// ```
#[derive(Clone)]
pub struct HttpState {
    pub messages: Arc<dyn MessagesCommand>,
    pub messages_query: Arc<dyn MessagesQuery>,
    pub verifier: Arc<dyn TokenVerifier>,
}

impl HttpState {
    /// Construct state from its port implementations.
    pub fn new(
        messages: Arc<dyn MessagesCommand>,
        messages_query: Arc<dyn MessagesQuery>,
        verifier: Arc<dyn TokenVerifier>,
    ) -> Self {
        Self {
            messages,
            messages_query,
            verifier,
        }
    }
}
