use thiserror::Error;

use ballast_serde::SerdeErr;

use crate::NetworkEventType;

/// Errors an entity reports while writing or reading one event
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodecError {
    /// The entity has no encoding for this event type
    #[error("Entity does not handle {event_type} events")]
    UnsupportedEvent { event_type: NetworkEventType },

    /// The event data does not fit the entity's current state
    #[error("Event could not be applied: {reason}")]
    InvalidState { reason: String },

    /// The payload ended early or held an impossible value
    #[error("Event payload is malformed")]
    Malformed(#[from] SerdeErr),
}
