use std::{mem, vec::IntoIter};

use ballast_shared::{IngestReport, PacketCategory, PeerKey, RespawnState, Watermark};

use crate::BallastServerError;

/// Everything that happened during one [`Server::receive`](crate::Server::receive)
/// call, drained by type with [`Events::read`].
pub struct Events {
    connections: Vec<PeerKey>,
    disconnections: Vec<PeerKey>,
    packets: Vec<(PeerKey, PacketCategory, Box<[u8]>)>,
    event_batches: Vec<(PeerKey, IngestReport)>,
    sync_acks: Vec<(PeerKey, Watermark)>,
    respawn_states: Vec<RespawnState>,
    leave_warnings: usize,
    errors: Vec<BallastServerError>,

    empty: bool,
}

impl Default for Events {
    fn default() -> Self {
        Self::new()
    }
}

impl Events {
    pub(crate) fn new() -> Self {
        Self {
            connections: Vec::new(),
            disconnections: Vec::new(),
            packets: Vec::new(),
            event_batches: Vec::new(),
            sync_acks: Vec::new(),
            respawn_states: Vec::new(),
            leave_warnings: 0,
            errors: Vec::new(),

            empty: true,
        }
    }

    // Public

    pub fn is_empty(&self) -> bool {
        self.empty
    }

    pub fn read<V: Event>(&mut self) -> V::Iter {
        V::iter(self)
    }

    pub fn has<V: Event>(&self) -> bool {
        V::has(self)
    }

    // Crate-public

    pub(crate) fn push_connection(&mut self, peer: PeerKey) {
        self.connections.push(peer);
        self.empty = false;
    }

    pub(crate) fn push_disconnection(&mut self, peer: PeerKey) {
        self.disconnections.push(peer);
        self.empty = false;
    }

    pub(crate) fn push_packet(&mut self, peer: PeerKey, category: PacketCategory, payload: Box<[u8]>) {
        self.packets.push((peer, category, payload));
        self.empty = false;
    }

    pub(crate) fn push_event_batch(&mut self, peer: PeerKey, report: IngestReport) {
        self.event_batches.push((peer, report));
        self.empty = false;
    }

    pub(crate) fn push_sync_ack(&mut self, peer: PeerKey, watermark: Watermark) {
        self.sync_acks.push((peer, watermark));
        self.empty = false;
    }

    pub(crate) fn push_respawn_state(&mut self, state: RespawnState) {
        self.respawn_states.push(state);
        self.empty = false;
    }

    pub(crate) fn push_leave_warning(&mut self) {
        self.leave_warnings += 1;
        self.empty = false;
    }

    pub(crate) fn push_error(&mut self, error: BallastServerError) {
        self.errors.push(error);
        self.empty = false;
    }
}

// Event Trait
pub trait Event {
    type Iter;

    fn iter(events: &mut Events) -> Self::Iter;

    fn has(events: &Events) -> bool;
}

// ConnectEvent
pub struct ConnectEvent;
impl Event for ConnectEvent {
    type Iter = IntoIter<PeerKey>;

    fn iter(events: &mut Events) -> Self::Iter {
        mem::take(&mut events.connections).into_iter()
    }

    fn has(events: &Events) -> bool {
        !events.connections.is_empty()
    }
}

// DisconnectEvent
pub struct DisconnectEvent;
impl Event for DisconnectEvent {
    type Iter = IntoIter<PeerKey>;

    fn iter(events: &mut Events) -> Self::Iter {
        mem::take(&mut events.disconnections).into_iter()
    }

    fn has(events: &Events) -> bool {
        !events.disconnections.is_empty()
    }
}

/// Datagrams in categories the server has no handler for, such as chat.
pub struct PacketEvent;
impl Event for PacketEvent {
    type Iter = IntoIter<(PeerKey, PacketCategory, Box<[u8]>)>;

    fn iter(events: &mut Events) -> Self::Iter {
        mem::take(&mut events.packets).into_iter()
    }

    fn has(events: &Events) -> bool {
        !events.packets.is_empty()
    }
}

/// One entry per network event batch a peer sent and the server applied.
pub struct EventBatchEvent;
impl Event for EventBatchEvent {
    type Iter = IntoIter<(PeerKey, IngestReport)>;

    fn iter(events: &mut Events) -> Self::Iter {
        mem::take(&mut events.event_batches).into_iter()
    }

    fn has(events: &Events) -> bool {
        !events.event_batches.is_empty()
    }
}

// SyncAckEvent
pub struct SyncAckEvent;
impl Event for SyncAckEvent {
    type Iter = IntoIter<(PeerKey, Watermark)>;

    fn iter(events: &mut Events) -> Self::Iter {
        mem::take(&mut events.sync_acks).into_iter()
    }

    fn has(events: &Events) -> bool {
        !events.sync_acks.is_empty()
    }
}

/// States the respawn cycle entered.
pub struct RespawnEvent;
impl Event for RespawnEvent {
    type Iter = IntoIter<RespawnState>;

    fn iter(events: &mut Events) -> Self::Iter {
        mem::take(&mut events.respawn_states).into_iter()
    }

    fn has(events: &Events) -> bool {
        !events.respawn_states.is_empty()
    }
}

/// The shuttle is about to leave and occupants should get out.
pub struct LeaveWarningEvent;
impl Event for LeaveWarningEvent {
    type Iter = IntoIter<()>;

    fn iter(events: &mut Events) -> Self::Iter {
        vec![(); mem::take(&mut events.leave_warnings)].into_iter()
    }

    fn has(events: &Events) -> bool {
        events.leave_warnings > 0
    }
}

// Error Event
pub struct ErrorEvent;
impl Event for ErrorEvent {
    type Iter = IntoIter<BallastServerError>;

    fn iter(events: &mut Events) -> Self::Iter {
        mem::take(&mut events.errors).into_iter()
    }

    fn has(events: &Events) -> bool {
        !events.errors.is_empty()
    }
}
