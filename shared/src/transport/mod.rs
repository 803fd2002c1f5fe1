mod error;

pub use error::TransportError;

use crate::PeerKey;

/// Delivery guarantee requested from the underlying datagram layer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DeliveryMethod {
    /// May be dropped, duplicated or reordered.
    Unreliable,
    /// Arrives exactly once, in no particular order.
    ReliableUnordered,
}

/// Datagram primitive the endpoints are driven on top of. Connection setup
/// and peer discovery are the implementation's business.
pub trait Transport {
    fn send(
        &mut self,
        peer: &PeerKey,
        payload: &[u8],
        method: DeliveryMethod,
    ) -> Result<(), TransportError>;

    /// Polls for the next datagram. `Ok(None)` once the inbox is drained.
    fn receive(&mut self) -> Result<Option<(PeerKey, Vec<u8>)>, TransportError>;

    /// Average round trip to `peer` in seconds. Zero when unknown.
    fn average_round_trip_time(&self, peer: &PeerKey) -> f32;
}
