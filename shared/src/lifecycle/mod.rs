mod authority;
mod config;
mod entity_kind;
mod error;
mod factory;
mod mirror;
mod peer_sync_state;
mod record;


pub use authority::{EntityLifecycleAuthority, MaterializeReport};
pub use config::LifecycleConfig;
pub use entity_kind::EntityKind;
pub use error::LifecycleError;
pub use factory::{EntityFactory, FactoryError};
pub use mirror::{LifecycleMirror, SyncReport};
pub use peer_sync_state::PeerSyncState;
pub use record::LifecycleRecord;
