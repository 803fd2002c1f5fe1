use thiserror::Error;

use crate::PeerKey;

/// Errors reported by a [`Transport`](crate::Transport) implementation
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    /// No connection is known for the addressed peer
    #[error("No connection is known for {peer}")]
    UnknownPeer { peer: PeerKey },

    /// The datagram could not be handed to the underlying socket
    #[error("Failed to send {len} bytes to {peer}: {reason}")]
    SendFailed {
        peer: PeerKey,
        len: usize,
        reason: String,
    },

    /// The underlying socket failed while polling for datagrams
    #[error("Failed to receive datagram: {reason}")]
    ReceiveFailed { reason: String },
}
