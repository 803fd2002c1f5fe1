use thiserror::Error;

/// The error returned when a value cannot be read back off the wire.
///
/// Readers never try to recover by themselves: once a field fails to parse
/// the surrounding framing is considered lost and the caller decides how much
/// of the enclosing message to skip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("Failed to deserialize value from byte stream")]
pub struct SerdeErr;
