use ballast_serde::{ByteReader, ByteWrite, ConstByteLength, Serde, SerdeErr};

/// Leading byte of every datagram. Selects the handler the rest of the
/// payload is routed to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum PacketCategory {
    Chat = 0,
    StartGame = 1,
    EndGame = 2,
    NetworkEventBatch = 3,
    ReliableWrapper = 4,
    ResendRequest = 5,
    LatestMessageId = 6,
    EntitySync = 7,
    EntitySyncAck = 8,
    Respawn = 9,
    VoteStatus = 10,
    Permissions = 11,
    FileTransfer = 12,
}

impl PacketCategory {
    pub fn from_u8(tag: u8) -> Option<Self> {
        let category = match tag {
            0 => Self::Chat,
            1 => Self::StartGame,
            2 => Self::EndGame,
            3 => Self::NetworkEventBatch,
            4 => Self::ReliableWrapper,
            5 => Self::ResendRequest,
            6 => Self::LatestMessageId,
            7 => Self::EntitySync,
            8 => Self::EntitySyncAck,
            9 => Self::Respawn,
            10 => Self::VoteStatus,
            11 => Self::Permissions,
            12 => Self::FileTransfer,
            _ => return None,
        };
        Some(category)
    }

    pub fn to_u8(self) -> u8 {
        self as u8
    }

    /// Categories consumed by the channel itself rather than handed on.
    pub fn is_channel_control(self) -> bool {
        matches!(
            self,
            Self::ReliableWrapper | Self::ResendRequest | Self::LatestMessageId
        )
    }

    /// Categories this crate has no handler for. These are surfaced to the
    /// application untouched.
    pub fn is_application(self) -> bool {
        matches!(
            self,
            Self::Chat
                | Self::StartGame
                | Self::EndGame
                | Self::VoteStatus
                | Self::Permissions
                | Self::FileTransfer
        )
    }
}

impl Serde for PacketCategory {
    fn ser(&self, writer: &mut dyn ByteWrite) {
        writer.write_byte(self.to_u8());
    }

    fn de(reader: &mut ByteReader) -> Result<Self, SerdeErr> {
        Self::from_u8(reader.read_byte()?).ok_or(SerdeErr)
    }

    fn byte_length(&self) -> usize {
        1
    }
}

impl ConstByteLength for PacketCategory {
    fn const_byte_length() -> usize {
        1
    }
}
