use std::collections::{HashSet, VecDeque};

use log::{debug, info, warn};

use ballast_serde::{ByteWriter, Serde};

use crate::{
    messages::PacketCategory, EntityFactory, EntityId, EntityKind, LifecycleConfig,
    LifecycleError, LifecycleRecord, Round, Watermark,
};

/// `[EntitySync][u16 round][u32 watermark][u16 count]`
const SYNC_HEADER_BYTES: usize = 9;

struct SpawnRequest {
    entity_id: EntityId,
    kind: EntityKind,
    params: Vec<u8>,
}

/// Counts of what one [`EntityLifecycleAuthority::materialize_tick`] did.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MaterializeReport {
    pub spawned: usize,
    pub removed: usize,
    pub failed: usize,
}

/// Authority side of the lifecycle synchronizer. Owns the append-only log of
/// spawns and removals. The log's length is the watermark peers catch up to.
pub struct EntityLifecycleAuthority {
    config: LifecycleConfig,
    round: Round,
    spawn_queue: VecDeque<SpawnRequest>,
    remove_queue: VecDeque<EntityId>,
    log: Vec<LifecycleRecord>,
    live: HashSet<EntityId>,
    reserved: HashSet<EntityId>,
    next_entity_id: EntityId,
}

impl EntityLifecycleAuthority {
    pub fn new(config: &LifecycleConfig) -> Self {
        Self {
            config: config.clone(),
            round: 0,
            spawn_queue: VecDeque::new(),
            remove_queue: VecDeque::new(),
            log: Vec::new(),
            live: HashSet::new(),
            reserved: HashSet::new(),
            next_entity_id: config.first_entity_id.max(1),
        }
    }

    pub fn watermark(&self) -> Watermark {
        // the log cannot outgrow u32 within a round
        self.log.len() as Watermark
    }

    /// Bumped on every [`EntityLifecycleAuthority::reset`].
    pub fn round(&self) -> Round {
        self.round
    }

    pub fn records(&self) -> &[LifecycleRecord] {
        &self.log
    }

    pub fn is_live(&self, entity_id: EntityId) -> bool {
        self.live.contains(&entity_id)
    }

    pub fn pending_spawns(&self) -> usize {
        self.spawn_queue.len()
    }

    pub fn pending_removals(&self) -> usize {
        self.remove_queue.len()
    }

    /// Buffers a spawn and reserves the id the entity will get.
    pub fn queue_spawn(&mut self, kind: EntityKind, params: Vec<u8>) -> Result<EntityId, LifecycleError> {
        let entity_id = self.allocate_id()?;
        self.reserved.insert(entity_id);
        self.spawn_queue.push_back(SpawnRequest {
            entity_id,
            kind,
            params,
        });
        Ok(entity_id)
    }

    /// Buffers a removal. Only entities spawned through this log, or still
    /// queued for spawning, can be removed.
    pub fn queue_remove(&mut self, entity_id: EntityId) -> Result<(), LifecycleError> {
        if !self.live.contains(&entity_id) && !self.reserved.contains(&entity_id) {
            return Err(LifecycleError::UnknownEntity { entity_id });
        }
        self.remove_queue.push_back(entity_id);
        Ok(())
    }

    /// Drains both queues through the factory, spawns first, and appends a
    /// record for everything that actually happened.
    pub fn materialize_tick(&mut self, factory: &mut dyn EntityFactory) -> MaterializeReport {
        let mut report = MaterializeReport::default();

        while let Some(request) = self.spawn_queue.pop_front() {
            self.reserved.remove(&request.entity_id);
            match factory.create(request.kind, request.entity_id, &request.params) {
                Ok(()) => {
                    debug!("Spawned {} entity {}", request.kind, request.entity_id);
                    self.live.insert(request.entity_id);
                    self.log.push(LifecycleRecord::Spawn {
                        entity_id: request.entity_id,
                        kind: request.kind,
                        params: request.params,
                    });
                    report.spawned += 1;
                }
                Err(err) => {
                    warn!("Dropping spawn of entity {}: {err}", request.entity_id);
                    report.failed += 1;
                }
            }
        }

        while let Some(entity_id) = self.remove_queue.pop_front() {
            if !self.live.remove(&entity_id) {
                debug!("Skipping removal of entity {entity_id}, it is not live");
                continue;
            }
            if !factory.remove(entity_id) {
                debug!("Entity {entity_id} was already gone from the world");
            }
            self.log.push(LifecycleRecord::Remove { entity_id });
            report.removed += 1;
        }

        report
    }

    /// `[EntitySync][u16 round][u32 watermark][u16 count][records]` with the
    /// records after `peer_watermark`. The declared watermark is the log
    /// position just past the last record carried, so a suffix that does not
    /// fit in `max_sync_message_bytes` is sent from its start and the peer
    /// catches up over several messages without skipping any record.
    pub fn compose_sync_message(&self, peer_watermark: Watermark) -> Vec<u8> {
        let start = peer_watermark.min(self.watermark()) as usize;

        let mut size = SYNC_HEADER_BYTES;
        let mut end = start;
        for record in &self.log[start..] {
            let record_size = record.byte_length();
            let full = end - start == usize::from(u16::MAX)
                || (end > start && size + record_size > self.config.max_sync_message_bytes);
            if full {
                break;
            }
            size += record_size;
            end += 1;
        }
        if end < self.log.len() {
            debug!(
                "Sync suffix from {start} split, sending up to {end} of {}",
                self.log.len()
            );
        }
        let suffix = &self.log[start..end];

        let mut writer = ByteWriter::with_capacity(size);
        PacketCategory::EntitySync.ser(&mut writer);
        self.round.ser(&mut writer);
        // bounded by the log length, which fits a watermark
        (end as Watermark).ser(&mut writer);
        (suffix.len() as u16).ser(&mut writer);
        for record in suffix {
            record.ser(&mut writer);
        }
        writer.to_bytes()
    }

    /// Round reset. Live entities are forgotten, the caller tears the world
    /// down separately. Sync messages of the old round still in flight are
    /// told apart by the bumped round.
    pub fn reset(&mut self) {
        self.round = self.round.wrapping_add(1);
        info!(
            "Resetting lifecycle log at watermark {}, starting round {}",
            self.watermark(),
            self.round
        );
        self.spawn_queue.clear();
        self.remove_queue.clear();
        self.log.clear();
        self.live.clear();
        self.reserved.clear();
        self.next_entity_id = self.config.first_entity_id.max(1);
    }

    fn allocate_id(&mut self) -> Result<EntityId, LifecycleError> {
        for _ in 0..=u16::MAX {
            let candidate = self.next_entity_id;
            self.next_entity_id = match self.next_entity_id.wrapping_add(1) {
                0 => self.config.first_entity_id.max(1),
                next => next,
            };
            if !self.live.contains(&candidate) && !self.reserved.contains(&candidate) {
                return Ok(candidate);
            }
        }
        Err(LifecycleError::EntityIdsExhausted)
    }
}
