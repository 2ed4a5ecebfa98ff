//! Failure taxonomy for a single card invocation.
//!
//! Every variant is terminal for the invocation that produced it: nothing is
//! retried and no partial card is posted. `StreamMode::handle` turns each one
//! into exactly one warning notification.

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum CardError {
    /// A structured query is missing a key the card cannot be built without.
    #[error("{field} parameter is required for /{command}")]
    MissingRequiredField {
        field: &'static str,
        command: &'static str,
    },

    /// The provider returned an empty candidate set.
    #[error("No results match the query {query}")]
    NoMatch { query: String },

    /// More than one candidate and no unique exact-name match.
    #[error("More than one result matches the query {query}")]
    Ambiguous { query: String, candidates: usize },

    /// Transport failure or an explicit `error` reported by the provider.
    #[error("{0}")]
    Provider(String),

    /// A record did not have the shape the card needs.
    #[error("Malformed {what} record: {message}")]
    MalformedRecord { what: &'static str, message: String },

    /// A key is absent from one of the static presentation tables.
    #[error("No {table} entry for \"{key}\"")]
    LookupTableMiss { table: &'static str, key: String },

    #[error("Failed to render template {template}: {message}")]
    Render { template: String, message: String },

    #[error("Failed to post card to transcript: {0}")]
    Transcript(String),

    #[error("Unknown command {0}")]
    UnknownCommand(String),
}

impl CardError {
    pub(crate) fn provider(message: impl Into<String>) -> Self {
        CardError::Provider(message.into())
    }
}
