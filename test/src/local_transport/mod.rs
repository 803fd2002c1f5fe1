/// In-memory transport for E2E testing
/// Routes datagrams between endpoints without network I/O, optionally
/// losing some of them

use std::{
    collections::{HashMap, VecDeque},
    sync::{Arc, Mutex, MutexGuard},
};

use ballast_shared::{DeliveryMethod, PeerKey, Transport, TransportError};

/// Decides whether one datagram is lost: `(from, to, bytes)`.
pub type DropFilter = Box<dyn FnMut(PeerKey, PeerKey, &[u8]) -> bool + Send>;

struct HubState {
    inboxes: HashMap<PeerKey, VecDeque<(PeerKey, Vec<u8>)>>,
    rng: fastrand::Rng,
    loss: f32,
    drop_filter: Option<DropFilter>,
    round_trip_time: f32,
    delivered: usize,
    dropped: usize,
}

/// Shared switchboard every [`LocalTransport`] plugs into.
#[derive(Clone)]
pub struct LocalHub {
    state: Arc<Mutex<HubState>>,
}

impl LocalHub {
    /// `seed` drives the random loss so a failing run can be replayed.
    pub fn new(seed: u64) -> Self {
        Self {
            state: Arc::new(Mutex::new(HubState {
                inboxes: HashMap::new(),
                rng: fastrand::Rng::with_seed(seed),
                loss: 0.0,
                drop_filter: None,
                round_trip_time: 0.0,
                delivered: 0,
                dropped: 0,
            })),
        }
    }

    fn lock(&self) -> MutexGuard<'_, HubState> {
        self.state.lock().unwrap()
    }

    /// Registers `peer` and returns its end of the hub.
    pub fn transport(&self, peer: PeerKey) -> LocalTransport {
        self.lock().inboxes.entry(peer).or_default();
        LocalTransport {
            peer,
            hub: self.clone(),
        }
    }

    /// Share of unreliable datagrams lost at random, from 0 to 1.
    pub fn set_loss(&self, loss: f32) {
        self.lock().loss = loss;
    }

    /// Drops every unreliable datagram the filter returns `true` for, on
    /// top of the random loss.
    pub fn set_drop_filter(&self, filter: DropFilter) {
        self.lock().drop_filter = Some(filter);
    }

    pub fn clear_drop_filter(&self) {
        self.lock().drop_filter = None;
    }

    pub fn set_round_trip_time(&self, seconds: f32) {
        self.lock().round_trip_time = seconds;
    }

    /// Datagrams waiting for `peer`.
    pub fn in_flight(&self, peer: PeerKey) -> usize {
        self.lock().inboxes.get(&peer).map_or(0, VecDeque::len)
    }

    /// Peeks at what is waiting for `peer`, oldest first.
    pub fn pending(&self, peer: PeerKey) -> Vec<Vec<u8>> {
        self.lock()
            .inboxes
            .get(&peer)
            .map(|inbox| inbox.iter().map(|(_, bytes)| bytes.clone()).collect())
            .unwrap_or_default()
    }

    pub fn delivered(&self) -> usize {
        self.lock().delivered
    }

    pub fn dropped(&self) -> usize {
        self.lock().dropped
    }
}

/// One endpoint's view of a [`LocalHub`].
pub struct LocalTransport {
    peer: PeerKey,
    hub: LocalHub,
}

impl LocalTransport {
    pub fn peer(&self) -> PeerKey {
        self.peer
    }
}

impl Transport for LocalTransport {
    fn send(&mut self, peer: &PeerKey, payload: &[u8], method: DeliveryMethod) -> Result<(), TransportError> {
        let mut state = self.hub.lock();
        if !state.inboxes.contains_key(peer) {
            return Err(TransportError::UnknownPeer { peer: *peer });
        }

        if method == DeliveryMethod::Unreliable {
            let random_loss = state.loss > 0.0 && state.rng.f32() < state.loss;
            let filtered = match state.drop_filter.as_mut() {
                Some(filter) => filter(self.peer, *peer, payload),
                None => false,
            };
            if random_loss || filtered {
                state.dropped += 1;
                return Ok(());
            }
        }

        state.delivered += 1;
        let from = self.peer;
        if let Some(inbox) = state.inboxes.get_mut(peer) {
            inbox.push_back((from, payload.to_vec()));
        }
        Ok(())
    }

    fn receive(&mut self) -> Result<Option<(PeerKey, Vec<u8>)>, TransportError> {
        let mut state = self.hub.lock();
        Ok(state.inboxes.get_mut(&self.peer).and_then(VecDeque::pop_front))
    }

    fn average_round_trip_time(&self, _peer: &PeerKey) -> f32 {
        self.hub.lock().round_trip_time
    }
}

#[cfg(test)]
mod tests {
    use ballast_shared::{DeliveryMethod, PeerKey, Transport, TransportError};

    use super::LocalHub;

    const A: PeerKey = PeerKey::new(1);
    const B: PeerKey = PeerKey::new(2);

    #[test]
    fn delivers_in_send_order() {
        let hub = LocalHub::new(7);
        let mut a = hub.transport(A);
        let mut b = hub.transport(B);

        a.send(&B, &[1], DeliveryMethod::Unreliable).unwrap();
        a.send(&B, &[2], DeliveryMethod::ReliableUnordered).unwrap();

        assert_eq!(b.receive().unwrap(), Some((A, vec![1])));
        assert_eq!(b.receive().unwrap(), Some((A, vec![2])));
        assert_eq!(b.receive().unwrap(), None);
    }

    #[test]
    fn filter_only_touches_unreliable() {
        let hub = LocalHub::new(7);
        let mut a = hub.transport(A);
        let _b = hub.transport(B);
        hub.set_drop_filter(Box::new(|_, _, _| true));

        a.send(&B, &[1], DeliveryMethod::Unreliable).unwrap();
        a.send(&B, &[2], DeliveryMethod::ReliableUnordered).unwrap();

        assert_eq!(hub.pending(B), vec![vec![2]]);
        assert_eq!(hub.dropped(), 1);
    }

    #[test]
    fn unknown_peer_is_an_error() {
        let hub = LocalHub::new(7);
        let mut a = hub.transport(A);

        assert_eq!(
            a.send(&B, &[1], DeliveryMethod::Unreliable),
            Err(TransportError::UnknownPeer { peer: B })
        );
    }

    #[test]
    fn full_loss_drops_everything_unreliable() {
        let hub = LocalHub::new(7);
        let mut a = hub.transport(A);
        let _b = hub.transport(B);
        hub.set_loss(1.0);

        for byte in 0..10u8 {
            a.send(&B, &[byte], DeliveryMethod::Unreliable).unwrap();
        }

        assert_eq!(hub.in_flight(B), 0);
        assert_eq!(hub.dropped(), 10);
    }
}
