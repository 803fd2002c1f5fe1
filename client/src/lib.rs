//! # Ballast Client
//! The peer endpoint. Mirrors the server's entity lifecycle log, applies
//! network event batches to the local world and follows the server's
//! respawn cycle without ever deciding a transition itself.

#![deny(
    trivial_casts,
    trivial_numeric_casts,
    unstable_features,
    unused_import_braces
)]

pub mod shared {
    pub use ballast_shared::{
        ByteReader, ByteWrite, ByteWriter, DeliveryClass, DeliveryMethod, EntityFactory, EntityId,
        EntityKind, EntityStore, EventPolicy, IngestReport, NetworkEventType, NetworkSerializable,
        PacketCategory, PeerKey, Protocol, RespawnControl, RespawnState, Serde, SerdeErr,
        SyncReport, Transport, TransportError,
    };
}

mod client;
mod error;
mod events;
mod respawn;

pub use client::{Client, ClientConfig};
pub use error::BallastClientError;
pub use events::{
    ErrorEvent, Event, EventBatchEvent, Events, LeaveWarningEvent, PacketEvent, RespawnEvent,
    SyncEvent,
};
pub use respawn::RespawnMirror;
