use log::{debug, trace};

use ballast_serde::{ByteReader, ByteWriter, Serde};

use crate::{
    messages::{
        channels::{ReliableMessage, ReliableReceiver, ReliableSender},
        PacketCategory, PacketError,
    },
    ReliableChannelConfig, SequenceId,
};

/// What the channel made of one incoming datagram.
pub enum Incoming<'b> {
    /// A payload for a higher layer. `reliable_id` is set when it arrived
    /// through the reliable wrapper.
    Payload {
        category: PacketCategory,
        reliable_id: Option<SequenceId>,
        reader: ByteReader<'b>,
    },
    /// Bytes that must go straight back to the sender of the datagram.
    Reply(Vec<u8>),
    /// The peer announced the newest id it has sent. Already reconciled
    /// against the receiver.
    LatestId(SequenceId),
    /// Consumed by the channel, nothing further to do.
    Handled,
}

/// Represents the channel state shared with one remote host: the reliable
/// sender and receiver pair and the routing of control packets between them.
pub struct BaseConnection {
    sender: ReliableSender,
    receiver: ReliableReceiver,
}

impl BaseConnection {
    pub fn new(config: &ReliableChannelConfig) -> Self {
        Self {
            sender: ReliableSender::new(config),
            receiver: ReliableReceiver::new(config),
        }
    }

    pub fn sender(&self) -> &ReliableSender {
        &self.sender
    }

    pub fn receiver(&self) -> &ReliableReceiver {
        &self.receiver
    }

    /// Wraps `payload` for the reliable channel. The returned bytes still
    /// have to be handed to the transport.
    pub fn send_reliable(&mut self, category: PacketCategory, payload: &[u8]) -> ReliableMessage {
        self.sender.create_message(category, payload)
    }

    /// Routes one datagram. Channel control categories are consumed here,
    /// everything else is handed back with a reader positioned on its body.
    pub fn process_incoming<'b>(&mut self, bytes: &'b [u8]) -> Result<Incoming<'b>, PacketError> {
        let mut reader = ByteReader::new(bytes);
        let tag = reader.read_byte().map_err(|_| PacketError::Empty)?;
        let category = PacketCategory::from_u8(tag).ok_or(PacketError::UnknownCategory { tag })?;

        match category {
            PacketCategory::ReliableWrapper => {
                let id = SequenceId::de(&mut reader)?;
                let nested_tag = reader.read_byte()?;
                let nested = PacketCategory::from_u8(nested_tag)
                    .ok_or(PacketError::UnknownCategory { tag: nested_tag })?;
                if nested.is_channel_control() {
                    return Err(PacketError::NestedControl { id });
                }

                if self.receiver.check_message(id).is_accepted() {
                    Ok(Incoming::Payload {
                        category: nested,
                        reliable_id: Some(id),
                        reader,
                    })
                } else {
                    trace!("Dropping duplicate reliable message {id}");
                    Ok(Incoming::Handled)
                }
            }
            PacketCategory::ResendRequest => {
                let id = SequenceId::de(&mut reader)?;
                match self.sender.handle_resend_request(id) {
                    Some(message) => {
                        debug!("Resending reliable message {id}");
                        Ok(Incoming::Reply(message.bytes().to_vec()))
                    }
                    None => Ok(Incoming::Handled),
                }
            }
            PacketCategory::LatestMessageId => {
                let latest_id = SequenceId::de(&mut reader)?;
                let added = self.receiver.handle_latest_id(latest_id);
                if added > 0 {
                    debug!("Peer reports latest id {latest_id}, {added} message(s) now missing");
                }
                Ok(Incoming::LatestId(latest_id))
            }
            _ => Ok(Incoming::Payload {
                category,
                reliable_id: None,
                reader,
            }),
        }
    }

    /// Drives both halves of the channel. Returns the control packets
    /// (resend requests and the latest-id broadcast) to send this tick.
    pub fn update(&mut self, delta: f32, rtt: f32) -> Vec<Vec<u8>> {
        let mut outgoing: Vec<Vec<u8>> = self
            .receiver
            .update(delta, rtt)
            .into_iter()
            .map(|id| {
                let mut writer = ByteWriter::with_capacity(3);
                PacketCategory::ResendRequest.ser(&mut writer);
                id.ser(&mut writer);
                writer.to_bytes()
            })
            .collect();

        if let Some(latest_id) = self.sender.update(delta, rtt) {
            outgoing.push(latest_id);
        }
        outgoing
    }

    pub fn reset(&mut self) {
        self.sender.reset();
        self.receiver.reset();
    }
}
