use crate::{sequence_greater_than, SequenceId, Watermark};

/// What the authority knows a peer has caught up to. Neither field ever
/// moves backwards outside of a round reset.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PeerSyncState {
    last_acked_sequence_id: Option<SequenceId>,
    last_known_watermark: Watermark,
}

impl PeerSyncState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last_acked_sequence_id(&self) -> Option<SequenceId> {
        self.last_acked_sequence_id
    }

    pub fn last_known_watermark(&self) -> Watermark {
        self.last_known_watermark
    }

    /// Folds in the newest id the peer announced. Older ids are ignored.
    pub fn observe_sequence_id(&mut self, id: SequenceId) -> bool {
        match self.last_acked_sequence_id {
            Some(current) if !sequence_greater_than(id, current) => false,
            _ => {
                self.last_acked_sequence_id = Some(id);
                true
            }
        }
    }

    /// Folds in a sync ack, clamped to what the authority has actually
    /// written.
    pub fn observe_watermark(&mut self, watermark: Watermark, authority_watermark: Watermark) -> bool {
        let clamped = watermark.min(authority_watermark);
        if clamped > self.last_known_watermark {
            self.last_known_watermark = clamped;
            true
        } else {
            false
        }
    }

    pub fn is_behind(&self, authority_watermark: Watermark) -> bool {
        self.last_known_watermark < authority_watermark
    }

    pub fn reset_watermark(&mut self) {
        self.last_known_watermark = 0;
    }
}
