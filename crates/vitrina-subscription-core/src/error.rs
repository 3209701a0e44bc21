//! Subscription errors

use thiserror::Error;

/// Subscription lifecycle errors
#[derive(Error, Debug)]
pub enum SubscriptionError {
    /// Malformed or out-of-range input; rejected before any mutation
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Unknown subscriber
    #[error("subscriber not found")]
    SubscriberNotFound,

    /// Database error
    #[error("database error: {0}")]
    Database(#[from] vitrina_db::DbError),

    /// Internal error (e.g. corrupt stored state)
    #[error("internal error: {0}")]
    Internal(String),
}

impl SubscriptionError {
    /// Whether this error is safe to show to the caller verbatim
    pub fn is_user_facing(&self) -> bool {
        matches!(self, Self::InvalidInput(_) | Self::SubscriberNotFound)
    }
}
