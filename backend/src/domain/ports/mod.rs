//! Domain ports for the hexagonal boundary.

mod message_store;
mod messages_command;
mod messages_query;
mod token_verifier;

#[cfg(test)]
pub use message_store::MockMessageStore;
pub use message_store::{
    DeleteOutcome, FixtureMessageStore, MessageStore, MessageStoreError, NearbyQuery,
};
#[cfg(test)]
pub use messages_command::MockMessagesCommand;
pub use messages_command::{
    DeleteMessageRequest, DeleteMessageResponse, FixtureMessagesCommand, MessagesCommand,
    PostMessageRequest,
};
#[cfg(test)]
pub use messages_query::MockMessagesQuery;
pub use messages_query::{
    FixtureMessagesQuery, MessagePayload, MessagesQuery, NearbyMessagesRequest,
    NearbyMessagesResponse,
};
#[cfg(test)]
pub use token_verifier::MockTokenVerifier;
pub use token_verifier::{FixtureTokenVerifier, TokenVerifier, TokenVerifierError};
