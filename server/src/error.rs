use thiserror::Error;

use ballast_shared::{LifecycleError, PacketError, PeerKey, RespawnError, TransportError};

/// Errors surfaced by the server through [`ErrorEvent`](crate::ErrorEvent)
/// or returned from its fallible calls
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BallastServerError {
    /// The transport failed to send or receive
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    /// A datagram from a peer could not be routed
    #[error("Bad packet from {peer}: {source}")]
    Packet {
        peer: PeerKey,
        #[source]
        source: PacketError,
    },

    /// A datagram arrived from, or was addressed to, a peer that is not connected
    #[error("{peer} is not connected")]
    UnknownPeer { peer: PeerKey },

    /// A peer connected twice
    #[error("{peer} is already connected")]
    AlreadyConnected { peer: PeerKey },

    /// The lifecycle log refused a request
    #[error("Lifecycle error: {0}")]
    Lifecycle(#[from] LifecycleError),

    /// The respawn cycle could not be set up
    #[error("Respawn error: {0}")]
    Respawn(#[from] RespawnError),

    /// The category belongs to the authority and a peer may not send it
    #[error("{peer} sent authority-only category {category}")]
    AuthorityOnly { peer: PeerKey, category: u8 },
}
