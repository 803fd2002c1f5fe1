use std::fmt;

/// Per-message counter of the sequenced reliable channel. Wraps at 65535.
pub type SequenceId = u16;
/// Identifier of a replicated entity, shared by the authority and every peer.
pub type EntityId = u16;
/// Length of the authority's entity lifecycle log.
pub type Watermark = u32;
/// Which round of the authority's lifecycle log a sync message belongs to.
/// Wraps at 65535.
pub type Round = u16;

/// Opaque handle the transport uses to address a remote peer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PeerKey(u64);

impl PeerKey {
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    pub fn to_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Display for PeerKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "peer#{}", self.0)
    }
}
