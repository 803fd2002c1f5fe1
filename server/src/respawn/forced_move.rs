use ballast_shared::Vec2;

use crate::RespawnShuttle;

/// Steers the shuttle straight at a target at constant speed until it is
/// within `tolerance` of it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ForcedMove {
    pub target: Vec2,
    pub speed: f32,
    pub tolerance: f32,
}

impl ForcedMove {
    pub fn new(target: Vec2, speed: f32, tolerance: f32) -> Self {
        Self {
            target,
            speed,
            tolerance,
        }
    }

    pub fn has_arrived(&self, position: Vec2) -> bool {
        position.distance(self.target) <= self.tolerance
    }

    /// Sets the shuttle's velocity for this tick. Returns `true` and stops
    /// the shuttle once it has arrived.
    pub fn step(&self, shuttle: &mut dyn RespawnShuttle) -> bool {
        let position = shuttle.position();
        if self.has_arrived(position) {
            shuttle.set_velocity(Vec2::ZERO);
            return true;
        }
        shuttle.set_velocity((self.target - position).normalize_or_zero() * self.speed);
        false
    }
}
