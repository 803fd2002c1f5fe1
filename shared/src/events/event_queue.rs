use log::{debug, warn};

use ballast_serde::{ByteWrite, ByteWriter, Serde};

use crate::{
    events::{DeliveryClass, DispatchError, EventPolicies, NetworkEvent},
    messages::PacketCategory,
    EntityId, EntityStore, NetworkEventType,
};

pub const MAX_SUB_EVENT_LEN: usize = u8::MAX as usize;
pub const MAX_EVENTS_PER_BATCH: usize = u8::MAX as usize;

/// One composed `NetworkEventBatch` body: `[f32 send time][u8 count]` followed
/// by the length-prefixed sub-events.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EventBatch {
    event_count: u8,
    body: Vec<u8>,
}

impl EventBatch {
    pub fn event_count(&self) -> u8 {
        self.event_count
    }

    /// Body without the category byte, as nested in a reliable wrapper.
    pub fn payload(&self) -> &[u8] {
        &self.body
    }

    /// Full datagram for sending outside the reliable channel.
    pub fn to_datagram(&self) -> Vec<u8> {
        let mut writer = ByteWriter::with_capacity(self.body.len() + 1);
        PacketCategory::NetworkEventBatch.ser(&mut writer);
        writer.write_bytes(&self.body);
        writer.to_bytes()
    }
}

struct BatchBuilder {
    send_time: f32,
    event_count: u8,
    events: ByteWriter,
}

impl BatchBuilder {
    fn new(send_time: f32) -> Self {
        Self {
            send_time,
            event_count: 0,
            events: ByteWriter::new(),
        }
    }

    fn is_full(&self) -> bool {
        usize::from(self.event_count) >= MAX_EVENTS_PER_BATCH
    }

    fn push(&mut self, sub_event: &[u8]) {
        // callers never hand in more than MAX_SUB_EVENT_LEN bytes
        (sub_event.len() as u8).ser(&mut self.events);
        self.events.write_bytes(sub_event);
        self.event_count += 1;
    }

    fn finish(self) -> EventBatch {
        let mut writer = ByteWriter::with_capacity(self.events.len() + 5);
        self.send_time.ser(&mut writer);
        self.event_count.ser(&mut writer);
        writer.write_bytes(self.events.as_slice());
        EventBatch {
            event_count: self.event_count,
            body: writer.to_bytes(),
        }
    }
}

/// Per-tick collection of "something changed" notifications, coalesced by
/// policy and composed into batches per delivery class.
pub struct EventQueue {
    policies: EventPolicies,
    queued: Vec<NetworkEvent>,
}

impl EventQueue {
    pub fn new(policies: &EventPolicies) -> Self {
        Self {
            policies: policies.clone(),
            queued: Vec::new(),
        }
    }

    pub fn policies(&self) -> &EventPolicies {
        &self.policies
    }

    /// Queues an event unless its type overrides previous ones and an
    /// identical event is already queued. Returns whether it was queued.
    pub fn enqueue(&mut self, entity_id: EntityId, event_type: NetworkEventType, data: Vec<u8>) -> bool {
        let event = NetworkEvent::new(entity_id, event_type, data);
        if self.policies.get(event_type).override_previous
            && self.queued.iter().any(|queued| queued.same_key(&event))
        {
            return false;
        }
        self.queued.push(event);
        true
    }

    pub fn len(&self) -> usize {
        self.queued.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queued.is_empty()
    }

    pub fn queued(&self) -> &[NetworkEvent] {
        &self.queued
    }

    pub fn has_class(&self, class: DeliveryClass) -> bool {
        self.queued
            .iter()
            .any(|event| self.policies.get(event.event_type).delivery == class)
    }

    /// Serializes every queued event of `class` through its entity and packs
    /// the results into batches of at most 255 sub-events. Events that cannot
    /// be encoded are logged and left out.
    pub fn compose(&self, class: DeliveryClass, store: &dyn EntityStore, send_time: f32) -> Vec<EventBatch> {
        let mut batches = Vec::new();
        let mut builder = BatchBuilder::new(send_time);

        for event in &self.queued {
            if self.policies.get(event.event_type).delivery != class {
                continue;
            }
            let sub_event = match encode_event(event, store) {
                Ok(sub_event) => sub_event,
                Err(err @ DispatchError::EntityNotFound { .. }) => {
                    debug!("{err}");
                    continue;
                }
                Err(err) => {
                    warn!("Dropping event: {err}");
                    continue;
                }
            };

            builder.push(&sub_event);
            if builder.is_full() {
                batches.push(std::mem::replace(&mut builder, BatchBuilder::new(send_time)).finish());
            }
        }

        if builder.event_count > 0 {
            batches.push(builder.finish());
        }
        batches
    }

    pub fn clear(&mut self) {
        self.queued.clear();
    }
}

/// Writes `[event type][u16 entity id][payload]` for one event.
pub fn encode_event(event: &NetworkEvent, store: &dyn EntityStore) -> Result<Vec<u8>, DispatchError> {
    let entity = store
        .entity(event.entity_id)
        .ok_or(DispatchError::EntityNotFound {
            entity_id: event.entity_id,
            event_type: event.event_type,
        })?;

    let mut writer = ByteWriter::new();
    event.event_type.ser(&mut writer);
    event.entity_id.ser(&mut writer);
    entity
        .write_event(event.event_type, &event.data, &mut writer)
        .map_err(|source| DispatchError::Codec {
            entity_id: event.entity_id,
            event_type: event.event_type,
            source,
        })?;

    if writer.len() > MAX_SUB_EVENT_LEN {
        return Err(DispatchError::SubEventTooLarge {
            entity_id: event.entity_id,
            event_type: event.event_type,
            len: writer.len(),
        });
    }
    Ok(writer.to_bytes())
}
