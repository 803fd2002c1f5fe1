use thiserror::Error;

use ballast_serde::SerdeErr;

use crate::SequenceId;

/// Errors raised while routing an incoming datagram
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PacketError {
    /// Datagram carried no bytes at all
    #[error("Received an empty datagram")]
    Empty,

    /// Leading byte is not a known category
    #[error("Unknown packet category tag {tag}")]
    UnknownCategory { tag: u8 },

    /// A reliable wrapper carried another reliable wrapper
    #[error("Reliable message {id} nests a channel control category")]
    NestedControl { id: SequenceId },

    /// Header or body ended early
    #[error("Packet was truncated or malformed")]
    Malformed(#[from] SerdeErr),
}
