use ballast_serde::{ByteReader, ByteWrite};

use crate::{CodecError, EntityId, NetworkEventType};

/// Capability of a replicated entity to put its own state on the wire for a
/// given event type and to apply the same bytes on the other side.
pub trait NetworkSerializable {
    /// Writes the payload for one event. `data` is the extra context queued
    /// with the event.
    fn write_event(
        &self,
        event_type: NetworkEventType,
        data: &[u8],
        writer: &mut dyn ByteWrite,
    ) -> Result<(), CodecError>;

    /// Applies a payload. `reader` is bounded to this event's bytes.
    /// `send_time` is the sender's clock when the batch was composed.
    fn read_event(
        &mut self,
        event_type: NetworkEventType,
        reader: &mut ByteReader,
        send_time: f32,
    ) -> Result<(), CodecError>;
}

/// Lookup of live replicated entities by id.
pub trait EntityStore {
    fn entity(&self, id: EntityId) -> Option<&dyn NetworkSerializable>;

    fn entity_mut(&mut self, id: EntityId) -> Option<&mut dyn NetworkSerializable>;
}
