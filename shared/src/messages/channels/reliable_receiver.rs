use log::{debug, warn};

use crate::{ids_between, sequence_list::SequenceList, wrapping_diff, ReliableChannelConfig, SequenceId};

/// Outcome of checking an incoming reliable id.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MessageCheck {
    /// Newer than anything seen so far.
    Accepted,
    /// Fills a gap that was being tracked.
    Recovered,
    /// Already processed, or given up on. The payload must be dropped.
    Duplicate,
}

impl MessageCheck {
    pub fn is_accepted(self) -> bool {
        !matches!(self, MessageCheck::Duplicate)
    }
}

struct MissingMessage {
    resend_attempts: u8,
    resend_timer: f32,
}

/// Receiving half of the reliable channel. Tracks the newest id seen and
/// the set of ids skipped over, asking the peer for the latter until they
/// arrive or the attempt ceiling runs out.
pub struct ReliableReceiver {
    config: ReliableChannelConfig,
    last_received: SequenceId,
    missing: SequenceList<MissingMessage>,
    resend_interval: f32,
}

impl ReliableReceiver {
    pub fn new(config: &ReliableChannelConfig) -> Self {
        Self {
            config: config.clone(),
            last_received: 0,
            missing: SequenceList::new(),
            resend_interval: config.min_resend_interval,
        }
    }

    pub fn last_received(&self) -> SequenceId {
        self.last_received
    }

    pub fn missing_ids(&self) -> Vec<SequenceId> {
        self.missing.ids().collect()
    }

    pub fn is_missing(&self, id: SequenceId) -> bool {
        self.missing.contains_scan_from_back(id)
    }

    /// Decides whether the payload carried under `id` should be processed.
    pub fn check_message(&mut self, id: SequenceId) -> MessageCheck {
        if wrapping_diff(self.last_received, id) > 0 {
            self.mark_missing(ids_between(self.last_received, id));
            self.last_received = id;
            return MessageCheck::Accepted;
        }

        if self.missing.remove_scan_from_back(id).is_some() {
            debug!("Recovered reliable message {id}");
            MessageCheck::Recovered
        } else {
            MessageCheck::Duplicate
        }
    }

    /// Reconciles against the peer's newest sent id. Everything after
    /// `last_received` up to and including `latest_id` is now missing.
    /// Returns how many ids were added.
    pub fn handle_latest_id(&mut self, latest_id: SequenceId) -> usize {
        if wrapping_diff(self.last_received, latest_id) <= 0 {
            return 0;
        }

        let before = self.missing.len();
        self.mark_missing(ids_between(self.last_received, latest_id).chain(Some(latest_id)));
        self.last_received = latest_id;
        self.missing.len() - before
    }

    /// Counts down every retry timer and returns the ids to request again.
    pub fn update(&mut self, delta: f32, rtt: f32) -> Vec<SequenceId> {
        self.resend_interval = self.config.resend_interval(rtt);
        let interval = self.resend_interval;
        let max_attempts = self.config.max_resend_attempts;

        let mut requests = Vec::new();
        self.missing.retain(|id, missing| {
            missing.resend_timer -= delta;
            if missing.resend_timer > 0.0 {
                return true;
            }
            if let Some(max_attempts) = max_attempts {
                if missing.resend_attempts >= max_attempts {
                    warn!("Giving up on reliable message {id} after {max_attempts} resend requests");
                    return false;
                }
            }
            missing.resend_attempts = missing.resend_attempts.saturating_add(1);
            missing.resend_timer = interval;
            requests.push(id);
            true
        });
        requests
    }

    pub fn reset(&mut self) {
        self.last_received = 0;
        self.missing.clear();
        self.resend_interval = self.config.min_resend_interval;
    }

    fn mark_missing(&mut self, ids: impl Iterator<Item = SequenceId>) {
        for id in ids {
            let entry = MissingMessage {
                resend_attempts: 0,
                resend_timer: self.resend_interval,
            };
            // an id can only already be tracked if it wrapped all the way round
            let _ = self.missing.try_insert_scan_from_back(id, entry);
        }
    }
}
