mod error;
mod serializable;

pub use error::CodecError;
pub use serializable::{EntityStore, NetworkSerializable};
