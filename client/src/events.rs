use std::{mem, vec::IntoIter};

use ballast_shared::{IngestReport, PacketCategory, RespawnControl, SyncReport};

use crate::BallastClientError;

/// Everything that happened during one [`Client::receive`](crate::Client::receive)
/// call, drained by type with [`Events::read`].
pub struct Events {
    packets: Vec<(PacketCategory, Box<[u8]>)>,
    event_batches: Vec<IngestReport>,
    syncs: Vec<SyncReport>,
    respawn_controls: Vec<RespawnControl>,
    leave_warnings: usize,
    errors: Vec<BallastClientError>,

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
            packets: Vec::new(),
            event_batches: Vec::new(),
            syncs: Vec::new(),
            respawn_controls: Vec::new(),
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

    pub(crate) fn push_packet(&mut self, category: PacketCategory, payload: Box<[u8]>) {
        self.packets.push((category, payload));
        self.empty = false;
    }

    pub(crate) fn push_event_batch(&mut self, report: IngestReport) {
        self.event_batches.push(report);
        self.empty = false;
    }

    pub(crate) fn push_sync(&mut self, report: SyncReport) {
        self.syncs.push(report);
        self.empty = false;
    }

    pub(crate) fn push_respawn_control(&mut self, control: RespawnControl) {
        self.respawn_controls.push(control);
        self.empty = false;
    }

    pub(crate) fn push_leave_warning(&mut self) {
        self.leave_warnings += 1;
        self.empty = false;
    }

    pub(crate) fn push_error(&mut self, error: BallastClientError) {
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

/// Datagrams in categories the client has no handler for, such as chat.
pub struct PacketEvent;
impl Event for PacketEvent {
    type Iter = IntoIter<(PacketCategory, Box<[u8]>)>;

    fn iter(events: &mut Events) -> Self::Iter {
        mem::take(&mut events.packets).into_iter()
    }

    fn has(events: &Events) -> bool {
        !events.packets.is_empty()
    }
}

// EventBatchEvent
pub struct EventBatchEvent;
impl Event for EventBatchEvent {
    type Iter = IntoIter<IngestReport>;

    fn iter(events: &mut Events) -> Self::Iter {
        mem::take(&mut events.event_batches).into_iter()
    }

    fn has(events: &Events) -> bool {
        !events.event_batches.is_empty()
    }
}

/// One report per lifecycle sync message replayed into the world.
pub struct SyncEvent;
impl Event for SyncEvent {
    type Iter = IntoIter<SyncReport>;

    fn iter(events: &mut Events) -> Self::Iter {
        mem::take(&mut events.syncs).into_iter()
    }

    fn has(events: &Events) -> bool {
        !events.syncs.is_empty()
    }
}

/// Respawn control messages from the server, in arrival order.
pub struct RespawnEvent;
impl Event for RespawnEvent {
    type Iter = IntoIter<RespawnControl>;

    fn iter(events: &mut Events) -> Self::Iter {
        mem::take(&mut events.respawn_controls).into_iter()
    }

    fn has(events: &Events) -> bool {
        !events.respawn_controls.is_empty()
    }
}

// LeaveWarningEvent
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
    type Iter = IntoIter<BallastClientError>;

    fn iter(events: &mut Events) -> Self::Iter {
        mem::take(&mut events.errors).into_iter()
    }

    fn has(events: &Events) -> bool {
        !events.errors.is_empty()
    }
}
