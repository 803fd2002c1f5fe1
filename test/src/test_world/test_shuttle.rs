use ballast_server::RespawnShuttle;
use ballast_shared::{EntityId, EntityKind, PeerKey, Vec2};

use super::spawn_params;

/// Shuttle that moves by integrating its velocity whenever the test calls
/// [`TestShuttle::step`]
pub struct TestShuttle {
    pub position: Vec2,
    pub velocity: Vec2,
    /// Living characters on board.
    pub occupants: usize,
    /// Entities that belong to the current trip.
    pub trip_entities: Vec<EntityId>,
    pub resets: usize,
}

impl TestShuttle {
    pub fn new(position: Vec2) -> Self {
        Self {
            position,
            velocity: Vec2::ZERO,
            occupants: 0,
            trip_entities: Vec::new(),
            resets: 0,
        }
    }

    pub fn step(&mut self, delta: f32) {
        self.position = self.position + self.velocity * delta;
    }

    /// Records the ids the server reserved for this trip's characters.
    pub fn board(&mut self, entity_ids: &[EntityId]) {
        self.trip_entities.extend_from_slice(entity_ids);
        self.occupants += entity_ids.len();
    }
}

impl RespawnShuttle for TestShuttle {
    fn position(&self) -> Vec2 {
        self.position
    }

    fn set_velocity(&mut self, velocity: Vec2) {
        self.velocity = velocity;
    }

    fn has_living_occupants(&self) -> bool {
        self.occupants > 0
    }

    fn reset(&mut self, position: Vec2) -> Vec<EntityId> {
        self.resets += 1;
        self.position = position;
        self.velocity = Vec2::ZERO;
        self.occupants = 0;
        std::mem::take(&mut self.trip_entities)
    }

    fn spawn_batch(&mut self, peers: &[PeerKey]) -> Vec<(EntityKind, Vec<u8>)> {
        peers
            .iter()
            .map(|_| (EntityKind::CHARACTER, spawn_params(self.position)))
            .collect()
    }
}
