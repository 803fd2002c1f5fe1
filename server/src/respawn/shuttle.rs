use ballast_shared::{EntityId, EntityKind, PeerKey, Vec2};

/// A connected player as the respawn cycle sees it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RespawnCandidate {
    pub peer: PeerKey,
    /// Loaded into the running round.
    pub in_game: bool,
    pub spectating: bool,
    pub has_living_character: bool,
}

impl RespawnCandidate {
    pub fn needs_respawn(&self, allow_spectating: bool) -> bool {
        self.in_game && !(self.spectating && allow_spectating) && !self.has_living_character
    }
}

/// The simulation side of the respawn shuttle.
pub trait RespawnShuttle {
    fn position(&self) -> Vec2;

    fn set_velocity(&mut self, velocity: Vec2);

    /// Whether anyone alive is still on board.
    fn has_living_occupants(&self) -> bool;

    /// Repairs the shuttle and parks it at `position`. Returns the entities
    /// that belonged to the previous trip and must be removed.
    fn reset(&mut self, position: Vec2) -> Vec<EntityId>;

    /// Spawn requests (kind and creation parameters) for the characters of
    /// `peers`, placed inside the shuttle.
    fn spawn_batch(&mut self, peers: &[PeerKey]) -> Vec<(EntityKind, Vec<u8>)>;
}
