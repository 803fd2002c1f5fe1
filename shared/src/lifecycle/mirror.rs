use std::collections::HashSet;

use log::{debug, info, warn};

use ballast_serde::{ByteReader, ByteWriter, Serde};

use crate::{
    messages::PacketCategory, sequence_greater_than, sequence_less_than, EntityFactory, EntityId,
    LifecycleError, LifecycleRecord, Round, Watermark,
};

/// What one sync message did on the peer side.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SyncReport {
    pub round: Round,
    /// The message started a round this peer had not followed yet.
    pub new_round: bool,
    /// Entities of the previous round removed before this message's records.
    pub cleared: usize,
    pub declared: Watermark,
    pub applied: usize,
    /// Records at positions this peer already had.
    pub duplicates: usize,
    /// Records the factory rejected, plus a truncated tail.
    pub failed: usize,
}

/// Peer side of the lifecycle synchronizer. Remembers which round of the
/// authority's log it follows, how far into it it has caught up, and which
/// entities that round has spawned here.
#[derive(Default)]
pub struct LifecycleMirror {
    round: Round,
    watermark: Watermark,
    live: HashSet<EntityId>,
}

impl LifecycleMirror {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn watermark(&self) -> Watermark {
        self.watermark
    }

    pub fn round(&self) -> Round {
        self.round
    }

    /// Entities the current round has spawned on this peer and not removed.
    pub fn live_count(&self) -> usize {
        self.live.len()
    }

    /// Applies the records of a sync body (the reader sits just past the
    /// category byte) that lie at or beyond the local watermark, then moves
    /// the watermark up to the declared one even if records were lost.
    ///
    /// Messages of an older round are rejected untouched. The first message
    /// of a newer round removes every entity the previous round spawned here
    /// and starts over from watermark 0.
    pub fn ingest(
        &mut self,
        reader: &mut ByteReader,
        factory: &mut dyn EntityFactory,
    ) -> Result<SyncReport, LifecycleError> {
        let round = Round::de(reader)?;
        if sequence_less_than(round, self.round) {
            return Err(LifecycleError::StaleRound {
                round,
                current: self.round,
            });
        }
        let declared = Watermark::de(reader)?;
        let count = u16::de(reader)?;
        if Watermark::from(count) > declared {
            return Err(LifecycleError::InconsistentSync {
                watermark: declared,
                count,
            });
        }

        let mut report = SyncReport {
            round,
            declared,
            ..Default::default()
        };

        if sequence_greater_than(round, self.round) {
            info!(
                "Following round {round}, clearing {} entities of round {}",
                self.live.len(),
                self.round
            );
            for entity_id in self.live.drain() {
                if factory.remove(entity_id) {
                    report.cleared += 1;
                }
            }
            self.round = round;
            self.watermark = 0;
            report.new_round = true;
        }

        let start = declared - Watermark::from(count);

        for index in 0..Watermark::from(count) {
            let Ok(record) = LifecycleRecord::de(reader) else {
                warn!(
                    "Sync message truncated at record {index} of {count}, the rest is lost"
                );
                report.failed += 1;
                break;
            };
            if start + index < self.watermark {
                report.duplicates += 1;
                continue;
            }
            match record {
                LifecycleRecord::Spawn {
                    entity_id,
                    kind,
                    params,
                } => match factory.create(kind, entity_id, &params) {
                    Ok(()) => {
                        self.live.insert(entity_id);
                        report.applied += 1;
                    }
                    Err(err) => {
                        warn!("Failed to spawn replicated entity {entity_id}: {err}");
                        report.failed += 1;
                    }
                },
                LifecycleRecord::Remove { entity_id } => {
                    self.live.remove(&entity_id);
                    if !factory.remove(entity_id) {
                        debug!("Replicated entity {entity_id} was already gone");
                    }
                    report.applied += 1;
                }
            }
        }

        self.watermark = self.watermark.max(declared);
        Ok(report)
    }

    /// `[EntitySyncAck][u16 round][u32 watermark]`
    pub fn compose_ack(&self) -> Vec<u8> {
        let mut writer = ByteWriter::with_capacity(7);
        PacketCategory::EntitySyncAck.ser(&mut writer);
        self.round.ser(&mut writer);
        self.watermark.ser(&mut writer);
        writer.to_bytes()
    }
}
