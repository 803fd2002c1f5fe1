//! # Ballast Shared
//! Common functionality shared between ballast-server & ballast-client crates:
//! the sequenced reliable channel, the network event registry, the entity
//! lifecycle log and the respawn control wire types.

#![deny(trivial_numeric_casts, unstable_features, unused_import_braces)]

pub use ballast_serde::{
    ByteCounter, ByteReader, ByteWrite, ByteWriter, ConstByteLength, Serde, SerdeErr,
};

mod connection;
mod events;
mod lifecycle;
mod messages;
mod protocol;
mod respawn;
mod sequence_list;
mod transport;
mod types;
mod world;
mod wrapping_number;

pub use connection::base_connection::{BaseConnection, Incoming};
pub use events::{
    encode_event, read_event_batch, DeliveryClass, DispatchError, EventBatch, EventPolicies,
    EventPolicy, EventQueue, IngestReport, NetworkEvent, NetworkEventType, MAX_EVENTS_PER_BATCH,
    MAX_SUB_EVENT_LEN,
};
pub use lifecycle::{
    EntityFactory, EntityKind, EntityLifecycleAuthority, FactoryError, LifecycleConfig,
    LifecycleError, LifecycleMirror, LifecycleRecord, MaterializeReport, PeerSyncState,
    SyncReport,
};
pub use messages::{
    channels::{MessageCheck, ReliableChannelConfig, ReliableMessage, ReliableReceiver, ReliableSender},
    PacketCategory, PacketError,
};
pub use protocol::{Protocol, ProtocolError};
pub use respawn::{RespawnConfig, RespawnControl, RespawnError, RespawnState, Vec2};
pub use sequence_list::{SequenceError, SequenceList};
pub use transport::{DeliveryMethod, Transport, TransportError};
pub use types::{EntityId, PeerKey, Round, SequenceId, Watermark};
pub use world::{CodecError, EntityStore, NetworkSerializable};
pub use wrapping_number::{
    ids_between, is_wrapped, sequence_greater_than, sequence_less_than, wrapping_diff,
    WRAP_THRESHOLD,
};
