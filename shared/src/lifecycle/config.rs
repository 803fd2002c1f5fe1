use crate::EntityId;

#[derive(Clone, Debug, PartialEq)]
pub struct LifecycleConfig {
    /// Seconds between sync heartbeats to a peer that is already caught up.
    pub sync_interval: f32,
    /// First id handed out by the spawn allocator. Ids below it are left to
    /// entities that exist before the log starts, such as the map.
    pub first_entity_id: EntityId,
    /// Upper bound on one sync message. A longer suffix goes out in chunks,
    /// one per acked step. A single oversized record is still sent alone.
    pub max_sync_message_bytes: usize,
}

impl Default for LifecycleConfig {
    fn default() -> Self {
        Self {
            sync_interval: 1.0,
            first_entity_id: 1,
            max_sync_message_bytes: 1200,
        }
    }
}
