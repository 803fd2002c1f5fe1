//! # Ballast Server
//! The authoritative endpoint. Owns the entity lifecycle log and the respawn
//! cycle, batches network events out to every connected peer and keeps one
//! reliable channel per peer.

#![deny(
    trivial_casts,
    trivial_numeric_casts,
    unstable_features,
    unused_import_braces
)]

pub mod shared {
    pub use ballast_shared::{
        ByteReader, ByteWrite, ByteWriter, DeliveryClass, DeliveryMethod, EntityFactory, EntityId,
        EntityKind, EntityStore, EventPolicy, NetworkEventType, NetworkSerializable, PacketCategory,
        PeerKey, Protocol, RespawnConfig, RespawnControl, RespawnState, Serde, SerdeErr, Transport,
        TransportError, Vec2,
    };
}

mod connection;
mod error;
mod events;
mod respawn;
mod server;

pub use connection::Connection;
pub use error::BallastServerError;
pub use events::{
    ConnectEvent, DisconnectEvent, ErrorEvent, Event, EventBatchEvent, Events, LeaveWarningEvent,
    PacketEvent, RespawnEvent, SyncAckEvent,
};
pub use respawn::{ForcedMove, RespawnCandidate, RespawnCoordinator, RespawnShuttle, RespawnUpdate};
pub use server::{Server, ServerConfig};
