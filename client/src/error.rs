use thiserror::Error;

use ballast_shared::{LifecycleError, PacketError, PeerKey, SerdeErr, TransportError};

/// Errors surfaced by the client through [`ErrorEvent`](crate::ErrorEvent)
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BallastClientError {
    /// The transport failed to send or receive
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    /// A datagram from the server could not be routed
    #[error("Bad packet from server: {0}")]
    Packet(#[from] PacketError),

    /// Something other than the configured server sent a datagram
    #[error("Datagram from {peer}, which is not the server")]
    UnknownSender { peer: PeerKey },

    /// A lifecycle sync message could not be read at all
    #[error("Lifecycle sync error: {0}")]
    Lifecycle(#[from] LifecycleError),

    /// A respawn control message could not be read
    #[error("Malformed respawn control message")]
    MalformedRespawn(#[source] SerdeErr),

    /// The category only ever travels from peers to the server
    #[error("Server sent peer-only category {category}")]
    PeerOnly { category: u8 },
}
