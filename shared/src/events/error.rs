use thiserror::Error;

use crate::{CodecError, EntityId, NetworkEventType};

/// Errors raised while turning a queued event into its wire form
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DispatchError {
    /// The entity the event refers to no longer exists on this side
    #[error("Entity {entity_id} for {event_type} event no longer exists")]
    EntityNotFound {
        entity_id: EntityId,
        event_type: NetworkEventType,
    },

    /// Sub-events are framed with a one byte length
    #[error("{event_type} event for entity {entity_id} encodes to {len} bytes, the limit is 255")]
    SubEventTooLarge {
        entity_id: EntityId,
        event_type: NetworkEventType,
        len: usize,
    },

    /// The entity failed to write its payload
    #[error("Entity {entity_id} failed to encode {event_type} event: {source}")]
    Codec {
        entity_id: EntityId,
        event_type: NetworkEventType,
        #[source]
        source: CodecError,
    },
}
