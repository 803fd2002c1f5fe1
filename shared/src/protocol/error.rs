use thiserror::Error;

/// Errors raised while building a [`Protocol`](crate::Protocol)
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProtocolError {
    /// Protocol is locked and cannot be modified
    #[error("Protocol already locked! It can no longer be changed once handed to an endpoint")]
    AlreadyLocked,
}
