use std::collections::VecDeque;

use log::debug;

use ballast_serde::{ByteWrite, ByteWriter, Serde};

use crate::{messages::PacketCategory, ReliableChannelConfig, SequenceId};

/// A reliable message as it went out on the wire, kept so it can be resent
/// byte for byte.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReliableMessage {
    id: SequenceId,
    bytes: Vec<u8>,
}

impl ReliableMessage {
    pub fn id(&self) -> SequenceId {
        self.id
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }
}

/// Sending half of the reliable channel. Stamps outgoing messages with
/// consecutive ids, buffers the most recent ones and periodically
/// announces the newest id so the peer can notice a lost tail.
pub struct ReliableSender {
    config: ReliableChannelConfig,
    last_sent_id: SequenceId,
    has_sent: bool,
    resend_buffer: VecDeque<ReliableMessage>,
    ack_timer: f32,
}

impl ReliableSender {
    pub fn new(config: &ReliableChannelConfig) -> Self {
        Self {
            config: config.clone(),
            last_sent_id: 0,
            has_sent: false,
            resend_buffer: VecDeque::with_capacity(config.resend_buffer_capacity),
            ack_timer: config.min_ack_interval,
        }
    }

    /// Wraps `payload` in `[ReliableWrapper][id][category]`, assigns the
    /// next id and keeps a copy for resending.
    pub fn create_message(&mut self, category: PacketCategory, payload: &[u8]) -> ReliableMessage {
        self.last_sent_id = self.last_sent_id.wrapping_add(1);
        self.has_sent = true;

        let mut writer = ByteWriter::with_capacity(payload.len() + 4);
        PacketCategory::ReliableWrapper.ser(&mut writer);
        self.last_sent_id.ser(&mut writer);
        category.ser(&mut writer);
        writer.write_bytes(payload);

        let message = ReliableMessage {
            id: self.last_sent_id,
            bytes: writer.to_bytes(),
        };

        self.resend_buffer.push_back(message.clone());
        while self.resend_buffer.len() > self.config.resend_buffer_capacity.max(1) {
            self.resend_buffer.pop_front();
        }

        message
    }

    /// Looks up a buffered message. `None` once it has been evicted.
    pub fn handle_resend_request(&self, id: SequenceId) -> Option<&ReliableMessage> {
        let found = self.resend_buffer.iter().rev().find(|message| message.id == id);
        if found.is_none() {
            debug!("Resend requested for message {id} which is no longer buffered");
        }
        found
    }

    /// Id of the newest message, if anything has been sent yet.
    pub fn latest_id(&self) -> Option<SequenceId> {
        self.has_sent.then_some(self.last_sent_id)
    }

    pub fn buffered_ids(&self) -> impl Iterator<Item = SequenceId> + '_ {
        self.resend_buffer.iter().map(ReliableMessage::id)
    }

    /// Advances the broadcast timer. Returns a `LatestMessageId` packet when
    /// one is due.
    pub fn update(&mut self, delta: f32, rtt: f32) -> Option<Vec<u8>> {
        self.ack_timer -= delta;
        if self.ack_timer > 0.0 {
            return None;
        }
        self.ack_timer = self.config.ack_interval(rtt);

        let latest_id = self.latest_id()?;
        let mut writer = ByteWriter::with_capacity(3);
        PacketCategory::LatestMessageId.ser(&mut writer);
        latest_id.ser(&mut writer);
        Some(writer.to_bytes())
    }

    pub fn reset(&mut self) {
        self.last_sent_id = 0;
        self.has_sent = false;
        self.resend_buffer.clear();
        self.ack_timer = self.config.min_ack_interval;
    }
}
