use crate::{EntityId, NetworkEventType};

/// One queued gameplay event, before its entity has serialized it.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct NetworkEvent {
    pub entity_id: EntityId,
    pub event_type: NetworkEventType,
    /// Context the entity needs when writing, e.g. which component changed.
    pub data: Vec<u8>,
}

impl NetworkEvent {
    pub fn new(entity_id: EntityId, event_type: NetworkEventType, data: Vec<u8>) -> Self {
        Self {
            entity_id,
            event_type,
            data,
        }
    }

    /// Two events coalesce when this matches.
    pub fn same_key(&self, other: &NetworkEvent) -> bool {
        self.entity_id == other.entity_id
            && self.event_type == other.event_type
            && self.data == other.data
    }
}
