//! Error types for listener registration.

use thiserror::Error;

/// Errors that can occur when registering event listeners.
#[derive(Debug, Error)]
pub enum EventsError {
    /// The event type key was empty
    #[error("event type must not be empty")]
    EmptyEventType,
}

/// Result type for registry operations.
pub type EventsResult<T> = Result<T, EventsError>;
