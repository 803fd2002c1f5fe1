use ballast_shared::{BaseConnection, PeerKey, PeerSyncState, Protocol, Watermark};

/// Server-side state kept for one connected peer.
pub struct Connection {
    pub peer: PeerKey,
    pub base: BaseConnection,
    pub sync_state: PeerSyncState,
    sync_timer: f32,
}

impl Connection {
    pub fn new(peer: PeerKey, protocol: &Protocol) -> Self {
        Self {
            peer,
            base: BaseConnection::new(&protocol.reliable),
            sync_state: PeerSyncState::new(),
            sync_timer: 0.0,
        }
    }

    /// Whether a lifecycle sync message is due. Always while the peer is
    /// behind, otherwise once per `interval` as a heartbeat.
    pub fn sync_due(&mut self, delta: f32, interval: f32, watermark: Watermark) -> bool {
        self.sync_timer -= delta;
        if self.sync_state.is_behind(watermark) || self.sync_timer <= 0.0 {
            self.sync_timer = interval;
            return true;
        }
        false
    }

    pub fn reset_round(&mut self) {
        self.sync_state.reset_watermark();
        self.sync_timer = 0.0;
    }
}
